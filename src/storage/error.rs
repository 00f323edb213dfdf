//! Storage errors.

use std::path::PathBuf;

/// Error returned when the preference store cannot be read or written.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The store is not reachable in this context (e.g. storage disabled
    /// by the browser).
    #[error("preference storage unavailable: {0}")]
    Unavailable(String),
    /// Reading or writing the backing file failed.
    #[error("failed to access preference file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The backing file exists but is not a JSON object of strings.
    #[error("malformed preference file '{path}': {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_display() {
        let err = StorageError::Unavailable("SecurityError".to_string());
        assert!(err.to_string().contains("SecurityError"));
    }

    #[test]
    fn test_io_display_names_path() {
        let err = StorageError::Io {
            path: PathBuf::from("/tmp/prefs.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/prefs.json"));
        assert!(msg.contains("denied"));
    }
}
