use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Weak;

type Log = Arc<Mutex<Vec<String>>>;

fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn recording(log: &Log, label: &'static str) -> Observer {
    let log = Arc::clone(log);
    Observer::new(NotifyTarget::next(), move |n: &Notification| {
        log.lock().unwrap().push(format!("{label}:{}", n.name()));
        Ok(())
    })
}

struct TestMediator {
    name: &'static str,
    interests: Vec<&'static str>,
    log: Log,
    registered: AtomicUsize,
    removed: AtomicUsize,
}

impl TestMediator {
    fn new(name: &'static str, interests: &[&'static str], log: &Log) -> Arc<Self> {
        Arc::new(Self {
            name,
            interests: interests.to_vec(),
            log: Arc::clone(log),
            registered: AtomicUsize::new(0),
            removed: AtomicUsize::new(0),
        })
    }
}

impl Mediator for TestMediator {
    fn mediator_name(&self) -> &str {
        self.name
    }

    fn list_notification_interests(&self) -> Vec<CompactString> {
        self.interests.iter().map(|s| CompactString::from(*s)).collect()
    }

    fn handle_notification(&self, n: &Notification) -> HandlerResult {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, n.name()));
        Ok(())
    }

    fn on_register(&self) {
        self.registered.fetch_add(1, Ordering::SeqCst);
    }

    fn on_remove(&self) {
        self.removed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Removes mediator `victim` from the view when notified.
struct RemovingMediator {
    name: &'static str,
    victim: &'static str,
    interest: &'static str,
    view: Weak<View>,
    log: Log,
}

impl Mediator for RemovingMediator {
    fn mediator_name(&self) -> &str {
        self.name
    }

    fn list_notification_interests(&self) -> Vec<CompactString> {
        vec![CompactString::from(self.interest)]
    }

    fn handle_notification(&self, n: &Notification) -> HandlerResult {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, n.name()));
        if let Some(view) = self.view.upgrade() {
            view.remove_mediator(self.victim);
        }
        Ok(())
    }
}

#[test]
fn test_instance_is_shared() {
    assert!(Arc::ptr_eq(&View::instance(), &View::instance()));
}

#[test]
fn test_observers_notified_in_registration_order() {
    let view = View::new();
    let log = new_log();
    view.register_observer("n", recording(&log, "o1"));
    view.register_observer("n", recording(&log, "o2"));
    view.register_observer("n", recording(&log, "o3"));

    view.notify_observers(&Notification::new("n")).unwrap();
    assert_eq!(entries(&log), vec!["o1:n", "o2:n", "o3:n"]);
    assert_eq!(view.observer_count("n"), 3);
}

#[test]
fn test_notify_without_observers_is_noop() {
    let view = View::new();
    view.notify_observers(&Notification::new("nobody")).unwrap();
    assert!(!view.has_observers("nobody"));
}

#[test]
fn test_observer_receives_body() {
    let view = View::new();
    let seen = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&seen);
    view.register_observer(
        "value",
        Observer::new(NotifyTarget::next(), move |n: &Notification| {
            sink.store(*n.body::<usize>().unwrap(), Ordering::SeqCst);
            Ok(())
        }),
    );

    view.notify_observers(&Notification::new("value").with_body(10usize))
        .unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 10);
}

#[test]
fn test_remove_observer_drops_empty_list() {
    let view = View::new();
    let log = new_log();
    let observer = recording(&log, "o");
    let target = observer.target();
    view.register_observer("n", observer);
    assert!(view.has_observers("n"));

    view.remove_observer("n", target);
    assert!(!view.has_observers("n"));
    assert_eq!(view.observer_count("n"), 0);

    view.notify_observers(&Notification::new("n")).unwrap();
    assert!(entries(&log).is_empty());
}

#[test]
fn test_remove_observer_unknown_target_is_noop() {
    let view = View::new();
    let log = new_log();
    view.register_observer("n", recording(&log, "o"));

    view.remove_observer("n", NotifyTarget::next());
    view.remove_observer("other", NotifyTarget::next());
    assert_eq!(view.observer_count("n"), 1);
}

#[test]
fn test_remove_observer_removes_only_first_match() {
    let view = View::new();
    let log = new_log();
    let first = recording(&log, "dup");
    let target = first.target();
    let second = first.clone();
    view.register_observer("n", first);
    view.register_observer("n", second);

    view.notify_observers(&Notification::new("n")).unwrap();
    assert_eq!(entries(&log), vec!["dup:n", "dup:n"]);

    view.remove_observer("n", target);
    assert_eq!(view.observer_count("n"), 1);
}

#[test]
fn test_register_mediator_subscribes_interests() {
    let view = View::new();
    let log = new_log();
    let mediator = TestMediator::new("login", &["login"], &log);
    view.register_mediator(mediator.clone()).unwrap();

    assert!(view.has_mediator("login"));
    assert_eq!(mediator.registered.load(Ordering::SeqCst), 1);

    view.notify_observers(&Notification::new("login")).unwrap();
    assert_eq!(entries(&log), vec!["login:login"]);
}

#[test]
fn test_register_mediator_twice_is_rejected() {
    let view = View::new();
    let log = new_log();
    let first = TestMediator::new("m", &["a"], &log);
    let second = TestMediator::new("m", &["b"], &log);

    view.register_mediator(first.clone()).unwrap();
    let err = view.register_mediator(second.clone()).unwrap_err();
    assert!(err.is_already_registered());
    assert_eq!(second.registered.load(Ordering::SeqCst), 0);

    let kept = view.retrieve_mediator_as::<TestMediator>("m").unwrap();
    assert!(Arc::ptr_eq(&kept, &first));
    assert!(!view.has_observers("b"));
}

#[test]
fn test_retrieve_missing_mediator() {
    let view = View::new();
    assert!(view.retrieve_mediator("missing").is_none());
    assert!(view.remove_mediator("missing").is_none());
    assert!(!view.has_mediator("missing"));
}

#[test]
fn test_remove_mediator_unsubscribes_everything() {
    let view = View::new();
    let log = new_log();
    let mediator = TestMediator::new("m", &["a", "b", "a"], &log);
    view.register_mediator(mediator.clone()).unwrap();
    view.register_observer("a", recording(&log, "other"));
    assert_eq!(view.observer_count("a"), 3);

    let removed = view.remove_mediator("m").unwrap();
    assert_eq!(removed.mediator_name(), "m");
    assert_eq!(mediator.removed.load(Ordering::SeqCst), 1);
    assert!(!view.has_mediator("m"));
    assert_eq!(view.observer_count("a"), 1);
    assert!(!view.has_observers("b"));

    view.notify_observers(&Notification::new("a")).unwrap();
    view.notify_observers(&Notification::new("b")).unwrap();
    assert_eq!(entries(&log), vec!["other:a"]);
}

#[test]
fn test_duplicate_interest_delivers_twice() {
    let view = View::new();
    let log = new_log();
    view.register_mediator(TestMediator::new("m", &["a", "a"], &log))
        .unwrap();

    view.notify_observers(&Notification::new("a")).unwrap();
    assert_eq!(entries(&log), vec!["m:a", "m:a"]);
}

#[test]
fn test_mediator_removing_itself_mid_dispatch() {
    let view = Arc::new(View::new());
    let log = new_log();
    view.register_mediator(TestMediator::new("first", &["tick"], &log))
        .unwrap();
    view.register_mediator(Arc::new(RemovingMediator {
        name: "self",
        victim: "self",
        interest: "tick",
        view: Arc::downgrade(&view),
        log: Arc::clone(&log),
    }))
    .unwrap();
    view.register_mediator(TestMediator::new("last", &["tick"], &log))
        .unwrap();

    view.notify_observers(&Notification::new("tick")).unwrap();
    assert_eq!(entries(&log), vec!["first:tick", "self:tick", "last:tick"]);
    assert!(!view.has_mediator("self"));

    log.lock().unwrap().clear();
    view.notify_observers(&Notification::new("tick")).unwrap();
    assert_eq!(entries(&log), vec!["first:tick", "last:tick"]);
}

#[test]
fn test_removed_later_observer_is_skipped_in_same_pass() {
    let view = Arc::new(View::new());
    let log = new_log();
    view.register_mediator(Arc::new(RemovingMediator {
        name: "killer",
        victim: "victim",
        interest: "tick",
        view: Arc::downgrade(&view),
        log: Arc::clone(&log),
    }))
    .unwrap();
    let victim = TestMediator::new("victim", &["tick"], &log);
    view.register_mediator(victim.clone()).unwrap();
    view.register_mediator(TestMediator::new("bystander", &["tick"], &log))
        .unwrap();

    view.notify_observers(&Notification::new("tick")).unwrap();
    assert_eq!(entries(&log), vec!["killer:tick", "bystander:tick"]);
    assert_eq!(victim.removed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_observer_added_mid_dispatch_waits_for_next_pass() {
    let view = Arc::new(View::new());
    let log = new_log();
    let weak = Arc::downgrade(&view);
    let added = Arc::new(AtomicUsize::new(0));
    let added_flag = Arc::clone(&added);
    let late_log = Arc::clone(&log);
    view.register_observer(
        "tick",
        Observer::new(NotifyTarget::next(), move |_: &Notification| {
            if added_flag.fetch_add(1, Ordering::SeqCst) == 0 {
                if let Some(view) = weak.upgrade() {
                    view.register_observer("tick", recording(&late_log, "late"));
                }
            }
            Ok(())
        }),
    );

    view.notify_observers(&Notification::new("tick")).unwrap();
    assert!(entries(&log).is_empty());

    view.notify_observers(&Notification::new("tick")).unwrap();
    assert_eq!(entries(&log), vec!["late:tick"]);
}

#[test]
fn test_nested_dispatch_is_depth_first() {
    let view = Arc::new(View::new());
    let log = new_log();
    let weak = Arc::downgrade(&view);
    let outer_log = Arc::clone(&log);
    view.register_observer(
        "outer",
        Observer::new(NotifyTarget::next(), move |_: &Notification| {
            outer_log.lock().unwrap().push("outer:start".to_string());
            if let Some(view) = weak.upgrade() {
                view.notify_observers(&Notification::new("inner"))?;
            }
            outer_log.lock().unwrap().push("outer:end".to_string());
            Ok(())
        }),
    );
    view.register_observer("inner", recording(&log, "inner"));
    view.register_observer("outer", recording(&log, "after"));

    view.notify_observers(&Notification::new("outer")).unwrap();
    assert_eq!(
        entries(&log),
        vec!["outer:start", "inner:inner", "outer:end", "after:outer"]
    );
}

#[test]
fn test_handler_error_aborts_pass() {
    let view = View::new();
    let log = new_log();
    view.register_observer("n", recording(&log, "before"));
    view.register_observer(
        "n",
        Observer::new(NotifyTarget::next(), |_: &Notification| {
            anyhow::bail!("handler failed")
        }),
    );
    view.register_observer("n", recording(&log, "after"));

    let err = view.notify_observers(&Notification::new("n")).unwrap_err();
    assert_eq!(err.to_string(), "handler failed");
    assert_eq!(entries(&log), vec!["before:n"]);
}

#[test]
fn test_dispatch_depth_limit() {
    let view = Arc::new(View::with_config(CoreConfig {
        max_dispatch_depth: Some(3),
        ..CoreConfig::default()
    }));
    let weak = Arc::downgrade(&view);
    let depth = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&depth);
    view.register_observer(
        "loop",
        Observer::new(NotifyTarget::next(), move |n: &Notification| {
            counter.fetch_add(1, Ordering::SeqCst);
            match weak.upgrade() {
                Some(view) => view.notify_observers(n),
                None => Ok(()),
            }
        }),
    );

    let err = view.notify_observers(&Notification::new("loop")).unwrap_err();
    let core = err.downcast_ref::<MvcError>().unwrap();
    assert!(matches!(
        core,
        MvcError::DispatchDepthExceeded { limit: 3, .. }
    ));
    assert_eq!(depth.load(Ordering::SeqCst), 3);

    // the depth counter unwinds with the error
    let fresh = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&fresh);
    view.register_observer(
        "once",
        Observer::new(NotifyTarget::next(), move |_: &Notification| {
            sink.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }),
    );
    view.notify_observers(&Notification::new("once")).unwrap();
    assert_eq!(fresh.load(Ordering::SeqCst), 1);
}

#[test]
fn test_registration_from_other_threads() {
    let view = Arc::new(View::new());
    let hits = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let view = Arc::clone(&view);
            let hits = Arc::clone(&hits);
            std::thread::spawn(move || {
                view.register_observer(
                    "shared",
                    Observer::new(NotifyTarget::next(), move |_: &Notification| {
                        hits.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    }),
                );
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    view.notify_observers(&Notification::new("shared")).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 8);
}

#[test]
fn test_remove_single_mediator_subscription() {
    let view = View::new();
    let log = new_log();
    view.register_mediator(TestMediator::new("m", &["a", "b"], &log))
        .unwrap();
    assert!(view.mediator_target("missing").is_none());

    let target = view.mediator_target("m").unwrap();
    view.remove_observer("a", target);
    assert!(!view.has_observers("a"));
    assert!(view.has_mediator("m"));

    view.notify_observers(&Notification::new("a")).unwrap();
    view.notify_observers(&Notification::new("b")).unwrap();
    assert_eq!(entries(&log), vec!["m:b"]);
}

#[test]
fn test_mediator_names() {
    let view = View::new();
    let log = new_log();
    view.register_mediator(TestMediator::new("one", &[], &log)).unwrap();
    view.register_mediator(TestMediator::new("two", &[], &log)).unwrap();

    let mut names = view.mediator_names();
    names.sort();
    assert_eq!(names, vec!["one", "two"]);

    view.remove_mediator("one");
    assert_eq!(view.mediator_names(), vec!["two"]);
}

#[test]
fn test_depth_limit_counts_each_view_separately() {
    let limited = Arc::new(View::with_config(CoreConfig {
        max_dispatch_depth: Some(1),
        ..CoreConfig::default()
    }));
    let log = new_log();
    limited.register_observer("leaf", recording(&log, "leaf"));

    let outer = Arc::new(View::new());
    let weak_outer = Arc::downgrade(&outer);
    let weak_limited = Arc::downgrade(&limited);
    let hops = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hops);
    outer.register_observer(
        "hop",
        Observer::new(NotifyTarget::next(), move |n: &Notification| {
            if counter.fetch_add(1, Ordering::SeqCst) < 3 {
                if let Some(outer) = weak_outer.upgrade() {
                    return outer.notify_observers(n);
                }
            }
            match weak_limited.upgrade() {
                Some(limited) => limited.notify_observers(&Notification::new("leaf")),
                None => Ok(()),
            }
        }),
    );

    outer.notify_observers(&Notification::new("hop")).unwrap();
    assert_eq!(hops.load(Ordering::SeqCst), 4);
    assert_eq!(entries(&log), vec!["leaf:leaf"]);
}
