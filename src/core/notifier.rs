use compact_str::CompactString;
use std::any::Any;
use std::sync::{Arc, Weak};

use super::error::HandlerResult;
use super::facade::Facade;
use super::notification::Notification;

/// Weak handle that lets commands, mediators and proxies send notifications
/// without keeping the facade alive.
#[derive(Clone, Default)]
pub struct Notifier {
    facade: Weak<Facade>,
}

impl Notifier {
    pub fn new(facade: Weak<Facade>) -> Self {
        Self { facade }
    }

    pub fn facade(&self) -> Option<Arc<Facade>> {
        self.facade.upgrade()
    }

    pub fn is_attached(&self) -> bool {
        self.facade.strong_count() > 0
    }

    pub fn notify(&self, notification: &Notification) -> HandlerResult {
        match self.facade.upgrade() {
            Some(facade) => facade.notify_observers(notification),
            None => {
                tracing::debug!(notification = notification.name(), "facade gone, dropped");
                Ok(())
            }
        }
    }

    pub fn send_notification(&self, name: impl Into<CompactString>) -> HandlerResult {
        self.notify(&Notification::new(name))
    }

    pub fn send_with_body<T: Any + Send + Sync>(
        &self,
        name: impl Into<CompactString>,
        body: T,
    ) -> HandlerResult {
        self.notify(&Notification::new(name).with_body(body))
    }
}
