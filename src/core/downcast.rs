use std::any::Any;
use std::sync::Arc;

/// Upcast to `Any` so registries can hand back concrete types.
///
/// Blanket-implemented for every sized `Send + Sync + 'static` type; trait
/// objects reach the concrete impl through their vtable.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
