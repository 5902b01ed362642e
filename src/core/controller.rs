//! 控制器：通知名 -> 命令工厂
//!
//! 每个已映射的名字在 View 中恰好有一个控制器观察者：
//! - 首次 register_command 时订阅，之后只替换工厂
//! - remove_command 移除工厂并退订

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};

use super::command::CommandFactory;
use super::error::HandlerResult;
use super::notification::Notification;
use super::observer::{NotifyTarget, Observer};
use super::view::View;

pub struct Controller {
    view: Arc<View>,
    target: NotifyTarget,
    command_map: Mutex<FxHashMap<CompactString, CommandFactory>>,
    this: Weak<Controller>,
}

impl Controller {
    pub fn new(view: Arc<View>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            view,
            target: NotifyTarget::next(),
            command_map: Mutex::new(FxHashMap::default()),
            this: this.clone(),
        })
    }

    /// Process-wide instance bound to [`View::instance`].
    pub fn instance() -> Arc<Controller> {
        static INSTANCE: OnceLock<Arc<Controller>> = OnceLock::new();
        Arc::clone(INSTANCE.get_or_init(|| Controller::new(View::instance())))
    }

    pub fn view(&self) -> &Arc<View> {
        &self.view
    }

    /// Handle the controller's observers are registered under.
    pub fn notify_target(&self) -> NotifyTarget {
        self.target
    }

    fn commands(&self) -> MutexGuard<'_, FxHashMap<CompactString, CommandFactory>> {
        self.command_map
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn execute_command(&self, notification: &Notification) -> HandlerResult {
        let Some(factory) = self.commands().get(notification.name()).cloned() else {
            return Ok(());
        };

        let mut command = factory();
        tracing::trace!(notification = notification.name(), "execute command");
        command.execute(notification)
    }

    pub fn register_command(&self, name: &str, factory: CommandFactory) {
        // Held across the View call so register/remove stay atomic per name.
        let mut commands = self.commands();
        let first = commands.insert(CompactString::from(name), factory).is_none();
        if !first {
            tracing::debug!(notification = name, "command factory replaced");
            return;
        }

        let this = self.this.clone();
        self.view.register_observer(
            name,
            Observer::new(self.target, move |n: &Notification| match this.upgrade() {
                Some(controller) => controller.execute_command(n),
                None => Ok(()),
            }),
        );
        tracing::debug!(notification = name, "command registered");
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands().contains_key(name)
    }

    pub fn remove_command(&self, name: &str) {
        let mut commands = self.commands();
        if commands.remove(name).is_some() {
            self.view.remove_observer(name, self.target);
            tracing::debug!(notification = name, "command removed");
        }
    }

    pub fn command_names(&self) -> Vec<CompactString> {
        self.commands().keys().cloned().collect()
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        // The View outlives us when shared; take our subscriptions with us.
        let commands = self
            .command_map
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for name in commands.keys() {
            self.view.remove_observer(name, self.target);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/controller.rs"]
mod tests;
