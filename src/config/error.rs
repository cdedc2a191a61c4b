//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("cannot parse config `{0}`")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("pagemap.toml"),
            Error::new(ErrorKind::PermissionDenied, "denied"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("pagemap.toml"));

        let parse_err = ConfigError::Parse(
            PathBuf::from("site/pagemap.toml"),
            toml::from_str::<toml::Table>("[pages").unwrap_err(),
        );
        assert!(format!("{parse_err}").contains("site/pagemap.toml"));

        let validation_err = ConfigError::Validation("[pages.home] must not be empty".into());
        let display = format!("{validation_err}");
        assert!(display.contains("[pages.home] must not be empty"));
    }
}
