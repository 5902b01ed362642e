//! 门面：Model / View / Controller 的统一入口
//!
//! 纯转发层，同时负责把三者装配在一起

use compact_str::CompactString;
use std::any::Any;
use std::path::Path;
use std::sync::{Arc, OnceLock, Weak};

use super::command::CommandFactory;
use super::controller::Controller;
use super::error::{HandlerResult, Result};
use super::mediator::Mediator;
use super::model::Model;
use super::notification::Notification;
use super::notifier::Notifier;
use super::proxy::Proxy;
use super::view::View;
use crate::config::CoreConfig;

pub struct Facade {
    model: Arc<Model>,
    view: Arc<View>,
    controller: Arc<Controller>,
    this: Weak<Facade>,
}

impl Facade {
    pub fn new() -> Arc<Self> {
        Self::with_config(CoreConfig::default())
    }

    pub fn with_config(config: CoreConfig) -> Arc<Self> {
        let view = Arc::new(View::with_config(config));
        let controller = Controller::new(Arc::clone(&view));
        Self::from_parts(Arc::new(Model::new()), view, controller)
    }

    pub fn from_config_file(path: &Path) -> Result<Arc<Self>> {
        Ok(Self::with_config(CoreConfig::load(path)?))
    }

    pub fn from_parts(model: Arc<Model>, view: Arc<View>, controller: Arc<Controller>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            model,
            view,
            controller,
            this: this.clone(),
        })
    }

    /// Process-wide facade over the process-wide Model, View and Controller.
    pub fn instance() -> Arc<Facade> {
        static INSTANCE: OnceLock<Arc<Facade>> = OnceLock::new();
        Arc::clone(INSTANCE.get_or_init(|| {
            Facade::from_parts(Model::instance(), View::instance(), Controller::instance())
        }))
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    pub fn view(&self) -> &Arc<View> {
        &self.view
    }

    pub fn controller(&self) -> &Arc<Controller> {
        &self.controller
    }

    pub fn notifier(&self) -> Notifier {
        Notifier::new(self.this.clone())
    }

    // ==================== 命令 ====================

    pub fn register_command(&self, name: &str, factory: CommandFactory) {
        self.controller.register_command(name, factory);
    }

    pub fn remove_command(&self, name: &str) {
        self.controller.remove_command(name);
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.controller.has_command(name)
    }

    // ==================== 代理 ====================

    pub fn register_proxy(&self, proxy: Arc<dyn Proxy>) {
        self.model.register_proxy(proxy);
    }

    pub fn retrieve_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        self.model.retrieve_proxy(name)
    }

    pub fn retrieve_proxy_as<P: Proxy>(&self, name: &str) -> Option<Arc<P>> {
        self.model.retrieve_proxy_as::<P>(name)
    }

    pub fn remove_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        self.model.remove_proxy(name)
    }

    pub fn has_proxy(&self, name: &str) -> bool {
        self.model.has_proxy(name)
    }

    // ==================== 中介者 ====================

    pub fn register_mediator(&self, mediator: Arc<dyn Mediator>) -> Result<()> {
        self.view.register_mediator(mediator)
    }

    pub fn retrieve_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        self.view.retrieve_mediator(name)
    }

    pub fn retrieve_mediator_as<M: Mediator>(&self, name: &str) -> Option<Arc<M>> {
        self.view.retrieve_mediator_as::<M>(name)
    }

    pub fn remove_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        self.view.remove_mediator(name)
    }

    pub fn has_mediator(&self, name: &str) -> bool {
        self.view.has_mediator(name)
    }

    // ==================== 通知 ====================

    pub fn notify_observers(&self, notification: &Notification) -> HandlerResult {
        self.view.notify_observers(notification)
    }

    pub fn send_notification(&self, name: impl Into<CompactString>) -> HandlerResult {
        self.notify_observers(&Notification::new(name))
    }

    pub fn send_with_body<T: Any + Send + Sync>(
        &self,
        name: impl Into<CompactString>,
        body: T,
    ) -> HandlerResult {
        self.notify_observers(&Notification::new(name).with_body(body))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/facade.rs"]
mod tests;
