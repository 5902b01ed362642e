//! 代理：带注册生命周期钩子的具名数据持有者

use compact_str::CompactString;
use std::sync::{Arc, PoisonError, RwLock};

use super::downcast::AsAny;

pub trait Proxy: AsAny {
    fn proxy_name(&self) -> &str;

    fn on_register(&self) {}

    fn on_remove(&self) {}
}

impl dyn Proxy {
    #[inline]
    pub fn downcast_ref<T: Proxy>(&self) -> Option<&T> {
        AsAny::as_any(self).downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_arc<T: Proxy>(self: Arc<Self>) -> Option<Arc<T>> {
        AsAny::into_any_arc(self).downcast::<T>().ok()
    }
}

/// A named proxy that just holds a value.
pub struct DataProxy<T> {
    name: CompactString,
    data: RwLock<T>,
}

impl<T> DataProxy<T> {
    pub fn new(name: impl Into<CompactString>, data: T) -> Self {
        Self {
            name: name.into(),
            data: RwLock::new(data),
        }
    }

    pub fn with_data<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        f(&data)
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut data)
    }

    pub fn set_data(&self, data: T) {
        self.update(|slot| *slot = data);
    }
}

impl<T: Clone> DataProxy<T> {
    pub fn data(&self) -> T {
        self.with_data(T::clone)
    }
}

impl<T: Send + Sync + 'static> Proxy for DataProxy<T> {
    fn proxy_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/proxy.rs"]
mod tests;
