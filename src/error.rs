use std::path::PathBuf;
use thiserror::Error;

/// Core library errors
#[derive(Error, Debug)]
pub enum SpelunkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error at path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Scan cancelled")]
    Cancelled,

    #[error("Failed to move '{path}' to trash: {message}")]
    Trash { path: PathBuf, message: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl SpelunkError {
    /// Classify an IO failure on a path the caller explicitly asked for.
    ///
    /// Permission problems get their own variant so the navigation layer
    /// can tell "you may not look here" apart from other IO failures.
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => SpelunkError::PermissionDenied(path),
            std::io::ErrorKind::NotFound => SpelunkError::PathNotFound(path),
            _ => SpelunkError::Io { path, source },
        }
    }
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SpelunkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = ConfigError::Invalid("fan_out must be at least 1".into());
        assert!(err.to_string().contains("fan_out"));
    }

    #[test]
    fn error_conversion() {
        let config_err = ConfigError::Invalid("test".into());
        let err: SpelunkError = config_err.into();
        assert!(matches!(err, SpelunkError::Config(_)));
    }

    #[test]
    fn from_io_distinguishes_permission_denied() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = SpelunkError::from_io(PathBuf::from("/secret"), source);
        assert!(matches!(err, SpelunkError::PermissionDenied(_)));

        let source = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = SpelunkError::from_io(PathBuf::from("/x"), source);
        assert!(matches!(err, SpelunkError::Io { .. }));
    }
}
