use thiserror::Error;

/// Registry cleanup error types
#[derive(Error, Debug)]
pub enum CleanupError {
    /// An external registry operation reported failure
    #[error("{operation} failed: {message}")]
    ExternalOperation { operation: String, message: String },

    /// The external tool could not be started at all
    #[error("{operation} could not be started: {message}")]
    Spawn { operation: String, message: String },

    /// Manifest listing could not be understood
    #[error("Manifest parse error: {0}")]
    ManifestParse(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CleanupError {
    /// Build an `ExternalOperation` error from captured stderr text.
    pub fn external(operation: impl Into<String>, stderr: impl AsRef<str>) -> Self {
        CleanupError::ExternalOperation {
            operation: operation.into(),
            message: stderr.as_ref().trim().to_string(),
        }
    }
}

impl From<serde_json::Error> for CleanupError {
    fn from(err: serde_json::Error) -> Self {
        CleanupError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for CleanupError {
    fn from(err: serde_yaml::Error) -> Self {
        CleanupError::SerializationError(err.to_string())
    }
}

/// Result type alias for cleanup operations
pub type Result<T> = std::result::Result<T, CleanupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_operation_display() {
        let error = CleanupError::ExternalOperation {
            operation: "az acr login".to_string(),
            message: "registry not found".to_string(),
        };
        assert_eq!(error.to_string(), "az acr login failed: registry not found");
    }

    #[test]
    fn test_external_trims_stderr() {
        let error = CleanupError::external("az login", "ERROR: no identity\n\n");
        match error {
            CleanupError::ExternalOperation { operation, message } => {
                assert_eq!(operation, "az login");
                assert_eq!(message, "ERROR: no identity");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_spawn_error_display() {
        let error = CleanupError::Spawn {
            operation: "az login".to_string(),
            message: "No such file or directory".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "az login could not be started: No such file or directory"
        );
    }

    #[test]
    fn test_manifest_parse_display() {
        let error = CleanupError::ManifestParse("expected array".to_string());
        assert_eq!(error.to_string(), "Manifest parse error: expected array");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: CleanupError = io_error.into();
        assert!(matches!(error, CleanupError::IoError(_)));
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let result: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope }");
        let error: CleanupError = result.unwrap_err().into();
        assert!(matches!(error, CleanupError::SerializationError(_)));
    }

    #[test]
    fn test_serde_yaml_error_conversion() {
        let result: std::result::Result<serde_yaml::Value, _> =
            serde_yaml::from_str("invalid: yaml: content:");
        let error: CleanupError = result.unwrap_err().into();
        assert!(matches!(error, CleanupError::SerializationError(_)));
    }

    #[test]
    fn test_config_error_display() {
        let error = CleanupError::ConfigError("concurrency must be at least 1".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: concurrency must be at least 1"
        );
    }
}
