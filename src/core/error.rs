use compact_str::CompactString;

pub type Result<T> = std::result::Result<T, MvcError>;

/// 处理器返回值：应用层错误统一使用 anyhow，核心错误可直接 `?` 转换
pub type HandlerResult = anyhow::Result<()>;

#[derive(Debug, thiserror::Error)]
pub enum MvcError {
    #[error("mediator already registered: {0}")]
    MediatorAlreadyRegistered(CompactString),

    #[error("notification `{name}` nested deeper than {limit} dispatch levels")]
    DispatchDepthExceeded { name: CompactString, limit: usize },

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("config io failed: {0}")]
    Io(#[from] std::io::Error),
}

impl MvcError {
    pub fn is_already_registered(&self) -> bool {
        matches!(self, MvcError::MediatorAlreadyRegistered(_))
    }
}
