//! Domain errors for the role dashboard.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to read the roles file.
///
/// Never surfaced to callers of the HTTP surface: the loader logs it and falls
/// back to an empty [`RoleConfig`](super::model::RoleConfig).
#[derive(Error, Debug)]
pub enum RoleConfigError {
    #[error("roles file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read roles file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse roles file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl RoleConfigError {
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    #[must_use]
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}
