use super::*;
use std::sync::Mutex;

#[derive(Default)]
struct Noop;

impl Command for Noop {
    fn execute(&mut self, _notification: &Notification) -> HandlerResult {
        Ok(())
    }
}

fn push(log: &Arc<Mutex<Vec<String>>>, label: &'static str) -> CommandFactory {
    let log = Arc::clone(log);
    command_fn(move |n| {
        log.lock().unwrap().push(format!("{label}:{}", n.name()));
        Ok(())
    })
}

#[test]
fn test_default_factory() {
    let make = factory::<Noop>();
    let mut command = make();
    command.execute(&Notification::new("x")).unwrap();
}

#[test]
fn test_command_fn_sees_notification() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let make = push(&log, "fn");
    make().execute(&Notification::new("go")).unwrap();
    make().execute(&Notification::new("again")).unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["fn:go", "fn:again"]);
}

#[test]
fn test_macro_command_runs_in_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut macro_command = MacroCommand::new()
        .with_sub_command(push(&log, "a"))
        .with_sub_command(push(&log, "b"));
    macro_command.add_sub_command(push(&log, "c"));
    assert_eq!(macro_command.len(), 3);

    macro_command.execute(&Notification::new("m")).unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["a:m", "b:m", "c:m"]);
    assert!(macro_command.is_empty());
}

#[test]
fn test_macro_command_stops_at_failure() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut macro_command = MacroCommand::new()
        .with_sub_command(push(&log, "a"))
        .with_sub_command(command_fn(|_| anyhow::bail!("sub command failed")))
        .with_sub_command(push(&log, "c"));

    let err = macro_command.execute(&Notification::new("m")).unwrap_err();
    assert_eq!(err.to_string(), "sub command failed");
    assert_eq!(*log.lock().unwrap(), vec!["a:m"]);
}
