//! 命令系统：每次分发都新建实例的一次性行为单元
//!
//! - Command: 执行入口
//! - CommandFactory: 通知名映射到的工厂，保证实例不跨通知复用
//! - MacroCommand: 按 FIFO 顺序依次执行子命令

use std::sync::Arc;

use super::error::HandlerResult;
use super::notification::Notification;

pub trait Command {
    fn execute(&mut self, notification: &Notification) -> HandlerResult;
}

pub type CommandFactory = Arc<dyn Fn() -> Box<dyn Command> + Send + Sync>;

/// Factory for any `Command + Default`.
pub fn factory<C: Command + Default + 'static>() -> CommandFactory {
    Arc::new(|| Box::new(C::default()) as Box<dyn Command>)
}

/// Wrap a plain function as a command factory.
pub fn command_fn<F>(f: F) -> CommandFactory
where
    F: Fn(&Notification) -> HandlerResult + Send + Sync + 'static,
{
    let f = Arc::new(f);
    Arc::new(move || {
        Box::new(FnCommand {
            f: Arc::clone(&f),
        }) as Box<dyn Command>
    })
}

struct FnCommand<F> {
    f: Arc<F>,
}

impl<F> Command for FnCommand<F>
where
    F: Fn(&Notification) -> HandlerResult,
{
    fn execute(&mut self, notification: &Notification) -> HandlerResult {
        (self.f)(notification)
    }
}

#[derive(Default)]
pub struct MacroCommand {
    sub_commands: Vec<CommandFactory>,
}

impl MacroCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sub_command(&mut self, factory: CommandFactory) {
        self.sub_commands.push(factory);
    }

    pub fn with_sub_command(mut self, factory: CommandFactory) -> Self {
        self.add_sub_command(factory);
        self
    }

    pub fn len(&self) -> usize {
        self.sub_commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sub_commands.is_empty()
    }
}

impl Command for MacroCommand {
    fn execute(&mut self, notification: &Notification) -> HandlerResult {
        for factory in self.sub_commands.drain(..) {
            let mut command = factory();
            command.execute(notification)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/command.rs"]
mod tests;
