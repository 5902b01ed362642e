//! 视图：观察者注册表 + 中介者注册表
//!
//! 架构：
//! - 观察者条目存放在 SlotMap 中（带代数的 ID，移除后旧 ID 不会复用）
//! - 每个通知名对应一个有序的 ObserverId 列表，插入顺序即投递顺序
//! - 分发前先拍快照，快照期间新增的观察者不参与本轮；已移除的会被跳过
//! - 回调永远不在锁内执行，处理器可以重入注册/移除/发送
//! - 嵌套深度按 View 分别计数（每个线程独立）

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use super::error::{HandlerResult, MvcError, Result};
use super::mediator::Mediator;
use super::notification::Notification;
use super::observer::{NotifyTarget, Observer};
use crate::config::CoreConfig;

new_key_type! { pub struct ObserverId; }

struct MediatorEntry {
    mediator: Arc<dyn Mediator>,
    target: NotifyTarget,
    interests: Vec<CompactString>,
}

#[derive(Default)]
struct ViewState {
    observers: SlotMap<ObserverId, Observer>,
    observer_map: FxHashMap<CompactString, Vec<ObserverId>>,
    mediator_map: FxHashMap<CompactString, MediatorEntry>,
}

impl ViewState {
    fn push_observer(&mut self, name: &str, observer: Observer) -> ObserverId {
        let id = self.observers.insert(observer);
        self.observer_map
            .entry(CompactString::from(name))
            .or_default()
            .push(id);
        id
    }

    fn contains_target(&self, name: &str, target: NotifyTarget) -> bool {
        self.observer_map.get(name).is_some_and(|ids| {
            ids.iter().any(|id| {
                self.observers
                    .get(*id)
                    .is_some_and(|o| o.compare_notify_target(target))
            })
        })
    }

    /// Drops the first (or, with `all`, every) observer of `target` under `name`.
    fn drop_target(&mut self, name: &str, target: NotifyTarget, all: bool) -> usize {
        let Some(ids) = self.observer_map.get_mut(name) else {
            return 0;
        };

        let mut removed = 0;
        let mut i = 0;
        while i < ids.len() {
            let matches = self
                .observers
                .get(ids[i])
                .is_some_and(|o| o.compare_notify_target(target));
            if matches {
                let id = ids.remove(i);
                self.observers.remove(id);
                removed += 1;
                if !all {
                    break;
                }
            } else {
                i += 1;
            }
        }

        if ids.is_empty() {
            self.observer_map.remove(name);
        }
        removed
    }
}

thread_local! {
    // keyed by View address; entries vanish once a View's depth returns to 0
    static DISPATCH_DEPTH: RefCell<FxHashMap<usize, usize>> = RefCell::new(FxHashMap::default());
}

/// Tracks nested `notify_observers` calls of one View on the current thread.
struct DepthGuard {
    view: usize,
}

impl DepthGuard {
    fn enter(view: &View, name: &str, limit: Option<usize>) -> Result<Self> {
        let key = view as *const View as usize;
        DISPATCH_DEPTH.with(|depths| {
            let mut depths = depths.borrow_mut();
            let depth = depths.get(&key).copied().unwrap_or(0);
            if let Some(limit) = limit {
                if depth >= limit {
                    return Err(MvcError::DispatchDepthExceeded {
                        name: CompactString::from(name),
                        limit,
                    });
                }
            }
            depths.insert(key, depth + 1);
            Ok(Self { view: key })
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DISPATCH_DEPTH.with(|depths| {
            let mut depths = depths.borrow_mut();
            if let Some(depth) = depths.get_mut(&self.view) {
                *depth = depth.saturating_sub(1);
                if *depth == 0 {
                    depths.remove(&self.view);
                }
            }
        });
    }
}

pub struct View {
    state: Mutex<ViewState>,
    config: CoreConfig,
}

impl View {
    pub fn new() -> Self {
        Self::with_config(CoreConfig::default())
    }

    pub fn with_config(config: CoreConfig) -> Self {
        Self {
            state: Mutex::new(ViewState::default()),
            config,
        }
    }

    /// Process-wide instance, created on first use.
    pub fn instance() -> Arc<View> {
        static INSTANCE: OnceLock<Arc<View>> = OnceLock::new();
        Arc::clone(INSTANCE.get_or_init(|| Arc::new(View::new())))
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ==================== 观察者 ====================

    pub fn register_observer(&self, name: &str, observer: Observer) -> ObserverId {
        let target = observer.target();
        let mut state = self.state();
        if self.config.warn_duplicate_observers && state.contains_target(name, target) {
            tracing::warn!(
                notification = name,
                target = target.raw(),
                "target subscribed twice, it will be notified twice"
            );
        }
        let id = state.push_observer(name, observer);
        tracing::debug!(notification = name, target = target.raw(), "observer registered");
        id
    }

    pub fn remove_observer(&self, name: &str, target: NotifyTarget) {
        let removed = self.state().drop_target(name, target, false);
        if removed > 0 {
            tracing::debug!(notification = name, target = target.raw(), "observer removed");
        }
    }

    pub fn has_observers(&self, name: &str) -> bool {
        self.state().observer_map.contains_key(name)
    }

    pub fn observer_count(&self, name: &str) -> usize {
        self.state().observer_map.get(name).map_or(0, Vec::len)
    }

    pub fn notify_observers(&self, notification: &Notification) -> HandlerResult {
        let name = notification.name();
        let _depth = DepthGuard::enter(self, name, self.config.max_dispatch_depth)?;

        let snapshot: Vec<(ObserverId, Observer)> = {
            let state = self.state();
            let Some(ids) = state.observer_map.get(name) else {
                tracing::trace!(notification = name, "no observers");
                return Ok(());
            };
            let snapshot = ids
                .iter()
                .filter_map(|id| state.observers.get(*id).map(|o| (*id, o.clone())))
                .collect();
            snapshot
        };

        tracing::trace!(notification = name, observers = snapshot.len(), "dispatch");
        for (id, observer) in snapshot {
            // removed by an earlier handler in this pass
            if !self.state().observers.contains_key(id) {
                tracing::trace!(
                    notification = name,
                    target = observer.target().raw(),
                    "skip removed observer"
                );
                continue;
            }
            observer.notify_observer(notification)?;
        }
        Ok(())
    }

    // ==================== 中介者 ====================

    pub fn register_mediator(&self, mediator: Arc<dyn Mediator>) -> Result<()> {
        let name = CompactString::from(mediator.mediator_name());
        let interests = mediator.list_notification_interests();

        {
            let mut state = self.state();
            if state.mediator_map.contains_key(&name) {
                tracing::warn!(mediator = %name, "mediator already registered");
                return Err(MvcError::MediatorAlreadyRegistered(name));
            }

            let target = NotifyTarget::next();
            let weak = Arc::downgrade(&mediator);
            for interest in &interests {
                let weak = weak.clone();
                let observer = Observer::new(target, move |n: &Notification| match weak.upgrade() {
                    Some(mediator) => mediator.handle_notification(n),
                    None => Ok(()),
                });
                if self.config.warn_duplicate_observers && state.contains_target(interest, target) {
                    tracing::warn!(mediator = %name, notification = %interest, "duplicate interest");
                }
                state.push_observer(interest, observer);
            }

            state.mediator_map.insert(
                name.clone(),
                MediatorEntry {
                    mediator: Arc::clone(&mediator),
                    target,
                    interests,
                },
            );
        }

        tracing::debug!(mediator = %name, "mediator registered");
        mediator.on_register();
        Ok(())
    }

    pub fn retrieve_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        self.state()
            .mediator_map
            .get(name)
            .map(|entry| Arc::clone(&entry.mediator))
    }

    pub fn retrieve_mediator_as<M: Mediator>(&self, name: &str) -> Option<Arc<M>> {
        self.retrieve_mediator(name)?.downcast_arc::<M>()
    }

    pub fn remove_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        let entry = {
            let mut state = self.state();
            let entry = state.mediator_map.remove(name)?;
            for interest in &entry.interests {
                state.drop_target(interest, entry.target, true);
            }
            entry
        };

        tracing::debug!(mediator = name, "mediator removed");
        entry.mediator.on_remove();
        Some(entry.mediator)
    }

    pub fn has_mediator(&self, name: &str) -> bool {
        self.state().mediator_map.contains_key(name)
    }

    /// Handle a registered mediator's observers share; pass it to
    /// [`View::remove_observer`] to drop a single subscription.
    pub fn mediator_target(&self, name: &str) -> Option<NotifyTarget> {
        self.state().mediator_map.get(name).map(|entry| entry.target)
    }

    pub fn mediator_names(&self) -> Vec<CompactString> {
        self.state().mediator_map.keys().cloned().collect()
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/view.rs"]
mod tests;
