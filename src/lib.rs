//! puremvc - 通知驱动的 MVC 装配框架
//!
//! 模块结构：
//! - core: 核心框架（Notification, Observer, View, Controller, Model, Facade）
//! - config: 核心配置（JSON）
//! - logging: tracing 初始化

pub mod config;
pub mod core;
pub mod logging;

pub use crate::config::CoreConfig;
pub use crate::core::{
    command_fn, factory, Command, CommandFactory, Controller, DataProxy, Facade, HandlerResult,
    MacroCommand, Mediator, Model, MvcError, Notification, Notifier, NotifyTarget, Observer,
    Proxy, View,
};
