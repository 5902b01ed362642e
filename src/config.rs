//! 核心配置：分发深度限制、重复订阅告警
//!
//! 可从 JSON 文件加载，缺失字段使用默认值。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Maximum nesting of `notify_observers` on one thread; `None` means unlimited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_dispatch_depth: Option<usize>,
    pub warn_duplicate_observers: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            max_dispatch_depth: None,
            warn_duplicate_observers: true,
        }
    }
}

impl CoreConfig {
    pub fn from_json_str(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Missing file yields the defaults; an unreadable or malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file missing, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&data)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
