use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Query on '{collection}' failed: {message}")]
    Query { collection: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn query(collection: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Query {
            collection: collection.into(),
            message: message.into(),
        }
    }

    /// Text shown in the error pane. Store messages pass through untouched.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Query { message, .. } => message.clone(),
            AppError::Config(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_error_message_is_verbatim() {
        let err = AppError::query("novels", "permission denied for table novels");
        assert_eq!(err.user_message(), "permission denied for table novels");
        assert_eq!(
            err.to_string(),
            "Query on 'novels' failed: permission denied for table novels"
        );
    }

    #[test]
    fn config_error_message_drops_prefix() {
        let err = AppError::Config("store not configured".to_string());
        assert_eq!(err.user_message(), "store not configured");
    }
}
