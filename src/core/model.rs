//! 模型：代理注册表
//!
//! 平坦的 名字 -> 代理 映射，注册/移除时调用生命周期钩子（锁外调用）

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use super::proxy::Proxy;

pub struct Model {
    proxy_map: Mutex<FxHashMap<CompactString, Arc<dyn Proxy>>>,
}

impl Model {
    pub fn new() -> Self {
        Self {
            proxy_map: Mutex::new(FxHashMap::default()),
        }
    }

    /// Process-wide instance, created on first use.
    pub fn instance() -> Arc<Model> {
        static INSTANCE: OnceLock<Arc<Model>> = OnceLock::new();
        Arc::clone(INSTANCE.get_or_init(|| Arc::new(Model::new())))
    }

    fn proxies(&self) -> MutexGuard<'_, FxHashMap<CompactString, Arc<dyn Proxy>>> {
        self.proxy_map.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `proxy` under its name, replacing any previous one.
    pub fn register_proxy(&self, proxy: Arc<dyn Proxy>) {
        let name = CompactString::from(proxy.proxy_name());
        let replaced = self.proxies().insert(name.clone(), Arc::clone(&proxy));
        if replaced.is_some() {
            tracing::debug!(proxy = %name, "proxy replaced");
        } else {
            tracing::debug!(proxy = %name, "proxy registered");
        }
        proxy.on_register();
    }

    pub fn retrieve_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        self.proxies().get(name).cloned()
    }

    pub fn retrieve_proxy_as<P: Proxy>(&self, name: &str) -> Option<Arc<P>> {
        self.retrieve_proxy(name)?.downcast_arc::<P>()
    }

    pub fn has_proxy(&self, name: &str) -> bool {
        self.proxies().contains_key(name)
    }

    pub fn remove_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        let proxy = self.proxies().remove(name)?;
        tracing::debug!(proxy = name, "proxy removed");
        proxy.on_remove();
        Some(proxy)
    }

    pub fn proxy_names(&self) -> Vec<CompactString> {
        self.proxies().keys().cloned().collect()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/model.rs"]
mod tests;
