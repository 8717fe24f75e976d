use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("missing field: {0}")]
    MissingField(String),
    #[error("RPCError: {code} {message}")]
    RemoteStore { code: String, message: String },
    #[error("remote store timeout")]
    StoreTimeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::RemoteStore { .. } => "REMOTE_STORE_ERROR",
            Self::StoreTimeout => "REMOTE_STORE_TIMEOUT",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the fault was caused by the caller's envelope rather than by
    /// the pipeline behind it.
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingField(name.into())
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

impl From<roxmltree::Error> for AppError {
    fn from(value: roxmltree::Error) -> Self {
        Self::InvalidInput(format!("xml parse failed: {value}"))
    }
}

impl From<toml::de::Error> for AppError {
    fn from(value: toml::de::Error) -> Self {
        Self::Config(value.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
