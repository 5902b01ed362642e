//! 观察者：目标句柄 + 通知处理函数
//!
//! View 只持有目标的不透明句柄，不持有目标本身；比较只看句柄。

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::error::HandlerResult;
use super::notification::Notification;

pub type NotifyMethod = Arc<dyn Fn(&Notification) -> HandlerResult + Send + Sync>;

/// Opaque identity of whatever owns an observer registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NotifyTarget(u64);

static NEXT_TARGET: AtomicU64 = AtomicU64::new(1);

impl NotifyTarget {
    /// Allocate a handle that no other target in this process shares.
    pub fn next() -> Self {
        Self(NEXT_TARGET.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Clone)]
pub struct Observer {
    target: NotifyTarget,
    method: NotifyMethod,
}

impl Observer {
    pub fn new<F>(target: NotifyTarget, method: F) -> Self
    where
        F: Fn(&Notification) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            target,
            method: Arc::new(method),
        }
    }

    pub fn from_method(target: NotifyTarget, method: NotifyMethod) -> Self {
        Self { target, method }
    }

    pub fn target(&self) -> NotifyTarget {
        self.target
    }

    pub fn notify_observer(&self, notification: &Notification) -> HandlerResult {
        (self.method)(notification)
    }

    pub fn compare_notify_target(&self, target: NotifyTarget) -> bool {
        self.target == target
    }
}

impl PartialEq for Observer {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
    }
}

impl Eq for Observer {}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/observer.rs"]
mod tests;
