use crate::domain::ports::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{message}")]
    InputInvalid { code: &'static str, message: String },

    #[error("{message}")]
    NotFound { code: &'static str, message: String },

    #[error("{message}")]
    Conflict { code: &'static str, message: String },

    #[error("{message}")]
    KeysImmutable { code: &'static str, message: String },

    #[error("Store failure: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 錯誤分類，供傳輸層對應狀態碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    NotFound,
    Conflict,
    Internal,
}

impl CatalogError {
    pub fn input(code: &'static str, message: impl Into<String>) -> Self {
        Self::InputInvalid {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            message: message.into(),
        }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            message: message.into(),
        }
    }

    pub fn keys_immutable() -> Self {
        Self::KeysImmutable {
            code: "BRANCH_PRODUCT_KEYS_IMMUTABLE",
            message: "branchId/productId cannot be changed for an existing BranchProduct"
                .to_string(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InputInvalid { code, .. }
            | Self::NotFound { code, .. }
            | Self::Conflict { code, .. }
            | Self::KeysImmutable { code, .. } => code,
            Self::Store(_) => "STORE_FAILURE",
            Self::Config { .. } => "CONFIG_INVALID",
            Self::Io(_) => "IO_FAILURE",
            Self::Serialization(_) => "SERIALIZATION_FAILURE",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InputInvalid { .. } | Self::KeysImmutable { .. } | Self::Config { .. } => {
                ErrorCategory::Input
            }
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Conflict { .. } => ErrorCategory::Conflict,
            Self::Store(_) | Self::Io(_) | Self::Serialization(_) => ErrorCategory::Internal,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.category() != ErrorCategory::Internal
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
