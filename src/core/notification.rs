//! 通知：在总线上传递的不可变值
//!
//! - name: 路由键
//! - body: 可选的任意负载（共享、只读）
//! - kind: 可选的类型标签

use compact_str::CompactString;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub type Body = Arc<dyn Any + Send + Sync>;

#[derive(Clone)]
pub struct Notification {
    name: CompactString,
    body: Option<Body>,
    kind: Option<CompactString>,
}

impl Notification {
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            body: None,
            kind: None,
        }
    }

    pub fn with_body<T: Any + Send + Sync>(mut self, body: T) -> Self {
        self.body = Some(Arc::new(body));
        self
    }

    /// Attach an already shared body without re-wrapping it.
    pub fn with_shared_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_type(mut self, kind: impl Into<CompactString>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub fn body<T: Any>(&self) -> Option<&T> {
        self.body.as_deref().and_then(|b| b.downcast_ref::<T>())
    }

    pub fn shared_body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }
}

impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("name", &self.name)
            .field("has_body", &self.body.is_some())
            .field("kind", &self.kind)
            .finish()
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Notification Name: {}", self.name)?;
        match self.body {
            Some(_) => writeln!(f, "Body: <opaque>")?,
            None => writeln!(f, "Body: null")?,
        }
        write!(f, "Type: {}", self.kind.as_deref().unwrap_or("null"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/notification.rs"]
mod tests;
