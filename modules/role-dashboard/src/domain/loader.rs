//! Roles file loader.
//!
//! The file is read in full on every call so that operator edits to the
//! mounted file take effect on the next request. Any failure degrades to an
//! empty [`RoleConfig`].

use std::path::Path;

use tracing::{debug, warn};

use super::error::RoleConfigError;
use super::model::RoleConfig;

/// Load the roles file, degrading to an empty mapping on any failure.
#[must_use]
pub fn load(path: &Path) -> RoleConfig {
    match try_load(path) {
        Ok(config) => {
            debug!(
                path = %path.display(),
                admins = config.roles.admin.len(),
                users = config.roles.user.len(),
                "Loaded roles file"
            );
            config
        }
        Err(err @ RoleConfigError::NotFound { .. }) => {
            warn!(error = %err, "Running with empty role mapping; every caller resolves to 'none'");
            RoleConfig::default()
        }
        Err(err) => {
            warn!(error = %err, "Falling back to empty role mapping");
            RoleConfig::default()
        }
    }
}

/// Load the roles file, reporting why it could not be used.
///
/// # Errors
/// - [`RoleConfigError::NotFound`] if `path` does not exist
/// - [`RoleConfigError::Io`] if the file cannot be read
/// - [`RoleConfigError::Parse`] if the content is not a roles document
pub fn try_load(path: &Path) -> Result<RoleConfig, RoleConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| RoleConfigError::io(path, e))?;
    parse(path, &content)
}

fn parse(path: &Path, content: &str) -> Result<RoleConfig, RoleConfigError> {
    if is_blank_document(content) {
        return Ok(RoleConfig::default());
    }
    serde_saphyr::from_str(content).map_err(|e| RoleConfigError::parse(path, e.to_string()))
}

fn is_blank_document(content: &str) -> bool {
    content.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}
