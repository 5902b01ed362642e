//! 演示：用 Facade 装配一个最小的登录流程
//!
//! 用法：mvc_demo [config.json]

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;
use compact_str::CompactString;
use puremvc::logging::{self, LoggingOptions};
use puremvc::{
    Command, CommandFactory, CoreConfig, DataProxy, Facade, HandlerResult, Mediator,
    Notification, Notifier,
};

const LOGIN: &str = "login";
const LOGIN_SUCCESS: &str = "loginSuccess";
const LOGIN_FAILED: &str = "loginFailed";
const USERS_PROXY: &str = "users";
const STATUS_MEDIATOR: &str = "status";

type UsersProxy = DataProxy<Vec<String>>;

struct LoginCommand {
    notifier: Notifier,
}

impl Command for LoginCommand {
    fn execute(&mut self, notification: &Notification) -> HandlerResult {
        let user = notification
            .body::<String>()
            .context("login notification without a user")?;
        let facade = self
            .notifier
            .facade()
            .context("facade dropped during login")?;
        let known = facade
            .retrieve_proxy_as::<UsersProxy>(USERS_PROXY)
            .is_some_and(|users| users.with_data(|list| list.contains(user)));

        let reply = if known { LOGIN_SUCCESS } else { LOGIN_FAILED };
        self.notifier.send_with_body(reply, user.clone())
    }
}

fn login_command(notifier: Notifier) -> CommandFactory {
    Arc::new(move || {
        Box::new(LoginCommand {
            notifier: notifier.clone(),
        }) as Box<dyn Command>
    })
}

#[derive(Default)]
struct StatusMediator {
    lines: Mutex<Vec<String>>,
}

impl Mediator for StatusMediator {
    fn mediator_name(&self) -> &str {
        STATUS_MEDIATOR
    }

    fn list_notification_interests(&self) -> Vec<CompactString> {
        vec![LOGIN_SUCCESS.into(), LOGIN_FAILED.into()]
    }

    fn handle_notification(&self, notification: &Notification) -> HandlerResult {
        let user = notification.body::<String>().map_or("?", String::as_str);
        let line = match notification.name() {
            LOGIN_SUCCESS => format!("welcome, {user}"),
            _ => format!("unknown user: {user}"),
        };
        println!("{line}");
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let _logging = logging::init(&LoggingOptions::default());

    let config = match std::env::args().nth(1) {
        Some(path) => CoreConfig::load(Path::new(&path))?,
        None => CoreConfig::default(),
    };
    let facade = Facade::with_config(config);

    facade.register_proxy(Arc::new(UsersProxy::new(
        USERS_PROXY,
        vec!["alice".to_string(), "bob".to_string()],
    )));
    facade.register_mediator(Arc::new(StatusMediator::default()))?;
    facade.register_command(LOGIN, login_command(facade.notifier()));

    for user in ["alice", "mallory", "bob"] {
        facade.send_with_body(LOGIN, user.to_string())?;
    }

    if let Some(status) = facade.retrieve_mediator_as::<StatusMediator>(STATUS_MEDIATOR) {
        let lines = status.lines.lock().unwrap_or_else(PoisonError::into_inner);
        tracing::info!(handled = lines.len(), "demo finished");
    }
    Ok(())
}
