use thiserror::Error;

/// Backup Recovery errors that can occur during API operations.
///
/// Error messages never carry the API key or bearer token.
#[derive(Debug, Error)]
pub enum BackupRecoveryError {
    /// Provider configuration is incomplete or invalid
    #[error("client initialization failed: {message}")]
    Config { message: String },

    /// IAM token exchange failed
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network-level error (connection failed, timeout, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// Identifier is not `<tenant>::<id>`
    #[error("invalid identifier '{identifier}': {message}")]
    InvalidIdentifier { identifier: String, message: String },

    /// Configuration map could not be turned into a request (or back)
    #[error("conversion failed: {message}")]
    Conversion { message: String },
}

impl BackupRecoveryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackupRecoveryError::Api { status: 404, .. })
    }

    pub(crate) fn conversion(message: impl Into<String>) -> Self {
        BackupRecoveryError::Conversion {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for BackupRecoveryError {
    fn from(err: serde_json::Error) -> Self {
        BackupRecoveryError::Conversion {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = BackupRecoveryError::Api {
            status: 403,
            message: "Forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "API error (403): Forbidden");
    }

    #[test]
    fn not_found_only_for_404() {
        let missing = BackupRecoveryError::Api {
            status: 404,
            message: "not found".to_string(),
        };
        let forbidden = BackupRecoveryError::Api {
            status: 403,
            message: "no".to_string(),
        };
        assert!(missing.is_not_found());
        assert!(!forbidden.is_not_found());
        assert!(!BackupRecoveryError::conversion("x").is_not_found());
    }

    #[test]
    fn config_error_display() {
        let err = BackupRecoveryError::Config {
            message: "missing API key".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "client initialization failed: missing API key"
        );
    }

    #[test]
    fn serde_errors_become_conversion_errors() {
        let err: BackupRecoveryError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert!(matches!(err, BackupRecoveryError::Conversion { .. }));
    }
}
