//! Configuration for the role dashboard.

use std::path::PathBuf;

use http::HeaderName;
use serde::{Deserialize, Serialize};

use crate::domain::model::{RequestIdentity, Role, RoleConfig};
use crate::domain::resolver;

/// Default location of the mounted roles file.
pub const DEFAULT_ROLES_PATH: &str = "/config/roles.yaml";

/// Dashboard configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Path of the roles file, re-read on every request.
    pub roles_path: PathBuf,

    /// How a caller is matched against the roles file.
    pub strategy: ResolutionStrategy,

    /// Headers injected by the trusted reverse proxy.
    pub headers: TrustedHeaders,

    /// Endpoints served by the external OAuth proxy.
    pub oauth: OAuthPaths,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            roles_path: PathBuf::from(DEFAULT_ROLES_PATH),
            strategy: ResolutionStrategy::default(),
            headers: TrustedHeaders::default(),
            oauth: OAuthPaths::default(),
        }
    }
}

impl DashboardConfig {
    /// Check the values that cannot be expressed in the type system.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a header name or OAuth path is empty, or a
    /// header name is not a valid HTTP header name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.headers.header_names()?;
        self.oauth.validate()
    }
}

/// Role resolution strategy.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// Match the forwarded user name against the role lists.
    #[default]
    Identity,
    /// Match any of the forwarded groups against the role lists.
    Groups,
}

impl ResolutionStrategy {
    /// Resolve the role of `identity` against `config`.
    #[must_use]
    pub fn resolve(self, identity: &RequestIdentity, config: &RoleConfig) -> Role {
        match self {
            Self::Identity => resolver::resolve_by_identity(identity.user(), config),
            Self::Groups => resolver::resolve_by_groups(identity.groups(), config),
        }
    }
}

/// Names of the headers set by the trusted proxy.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TrustedHeaders {
    /// Header carrying the authenticated user name.
    pub user: String,

    /// Header carrying a comma-separated list of group names.
    pub groups: String,
}

impl Default for TrustedHeaders {
    fn default() -> Self {
        Self {
            user: "X-Forwarded-User".to_owned(),
            groups: "X-Forwarded-Group".to_owned(),
        }
    }
}

impl TrustedHeaders {
    /// Parse the configured names into [`HeaderName`]s.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if either name is empty or invalid.
    pub fn header_names(&self) -> Result<TrustedHeaderNames, ConfigError> {
        Ok(TrustedHeaderNames {
            user: parse_header_name("headers.user", &self.user)?,
            groups: parse_header_name("headers.groups", &self.groups)?,
        })
    }
}

/// Parsed trusted header names.
#[derive(Debug, Clone)]
pub struct TrustedHeaderNames {
    pub user: HeaderName,
    pub groups: HeaderName,
}

fn parse_header_name(field: &'static str, value: &str) -> Result<HeaderName, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Empty { field });
    }
    HeaderName::from_bytes(value.as_bytes()).map_err(|source| ConfigError::InvalidHeaderName {
        field,
        name: value.to_owned(),
        source,
    })
}

/// External OAuth proxy endpoints linked from the views.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct OAuthPaths {
    /// Entry point that starts the OAuth flow.
    pub login_path: String,

    /// Sign-out endpoint.
    pub logout_path: String,
}

impl Default for OAuthPaths {
    fn default() -> Self {
        Self {
            login_path: "/oauth/start".to_owned(),
            logout_path: "/oauth/sign_out".to_owned(),
        }
    }
}

impl OAuthPaths {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.login_path.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "oauth.login_path",
            });
        }
        if self.logout_path.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "oauth.logout_path",
            });
        }
        Ok(())
    }
}

/// Invalid dashboard configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field}: invalid header name '{name}': {source}")]
    InvalidHeaderName {
        field: &'static str,
        name: String,
        #[source]
        source: http::header::InvalidHeaderName,
    },
}
