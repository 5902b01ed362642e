//! 核心框架模块
//!
//! 通知驱动的 MVC 装配框架：
//! - Notification / Observer: 总线上的值与订阅
//! - View: 观察者与中介者注册表，负责分发
//! - Controller: 通知名到命令工厂的映射
//! - Model: 代理注册表
//! - Facade: 三者的统一入口

pub mod command;
pub mod controller;
pub mod downcast;
pub mod error;
pub mod facade;
pub mod mediator;
pub mod model;
pub mod notification;
pub mod notifier;
pub mod observer;
pub mod proxy;
pub mod view;

pub use command::{command_fn, factory, Command, CommandFactory, MacroCommand};
pub use controller::Controller;
pub use error::{HandlerResult, MvcError, Result};
pub use facade::Facade;
pub use mediator::Mediator;
pub use model::Model;
pub use notification::{Body, Notification};
pub use notifier::Notifier;
pub use observer::{NotifyMethod, NotifyTarget, Observer};
pub use proxy::{DataProxy, Proxy};
pub use view::{ObserverId, View};
