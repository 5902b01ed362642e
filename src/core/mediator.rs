//! 中介者：对感兴趣的通知做出反应的应用组件

use compact_str::CompactString;
use std::sync::Arc;

use super::downcast::AsAny;
use super::error::HandlerResult;
use super::notification::Notification;

pub trait Mediator: AsAny {
    fn mediator_name(&self) -> &str;

    /// Names this mediator subscribes to; read once at registration.
    fn list_notification_interests(&self) -> Vec<CompactString> {
        Vec::new()
    }

    fn handle_notification(&self, _notification: &Notification) -> HandlerResult {
        Ok(())
    }

    fn on_register(&self) {}

    fn on_remove(&self) {}
}

impl dyn Mediator {
    #[inline]
    pub fn downcast_ref<T: Mediator>(&self) -> Option<&T> {
        AsAny::as_any(self).downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_arc<T: Mediator>(self: Arc<Self>) -> Option<Arc<T>> {
        AsAny::into_any_arc(self).downcast::<T>().ok()
    }
}
