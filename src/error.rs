//! Crate-level errors.

use std::path::PathBuf;

/// Error returned when configuration or fixtures cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Error returned when the toggle markup cannot be rendered.
///
/// Selector, storage and configuration failures keep their own types.
/// The event entry points of the reconciler and the sweep never fail;
/// they degrade and log instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured selectors are too complex to render markup for.
    #[error("cannot render toggle markup: {0}")]
    Markup(String),
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_error_converts() {
        let source = minijinja::Error::new(minijinja::ErrorKind::SyntaxError, "unexpected end");
        let err: Error = source.into();
        assert!(matches!(err, Error::Template(_)));
        assert!(err.to_string().starts_with("template error:"));
    }

    #[test]
    fn test_config_io_display_names_path() {
        let err = ConfigError::Io {
            path: PathBuf::from("theme.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("theme.yaml"));
    }
}
