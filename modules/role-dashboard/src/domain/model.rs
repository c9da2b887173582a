//! Domain models for the role dashboard.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identity assumed when the proxy forwards no user.
pub const GUEST_IDENTITY: &str = "guest";

/// Authorization level of a caller.
///
/// Declared in precedence order: a caller listed under several roles gets the
/// first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
    /// Not listed anywhere; treated as not logged in.
    None,
}

impl Role {
    /// Roles that can be granted by the roles file, highest first.
    pub const GRANTABLE: [Self; 2] = [Self::Admin, Self::User];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed roles file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RoleConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: RoleBindings,
}

impl RoleConfig {
    /// Identities or groups granted `role`. Always empty for [`Role::None`].
    #[must_use]
    pub fn members(&self, role: Role) -> &[String] {
        match role {
            Role::Admin => &self.roles.admin,
            Role::User => &self.roles.user,
            Role::None => &[],
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.admin.is_empty() && self.roles.user.is_empty()
    }
}

/// Role name to member list mapping. Unknown role names are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RoleBindings {
    #[serde(default, deserialize_with = "null_as_default")]
    pub admin: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: Vec<String>,
}

// `admin:` with no value is a YAML null; treat it like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Caller identity as asserted by the trusted proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    user: String,
    groups: Vec<String>,
}

impl RequestIdentity {
    /// Build an identity; an empty or blank `user` becomes [`GUEST_IDENTITY`].
    #[must_use]
    pub fn new(user: impl Into<String>, groups: Vec<String>) -> Self {
        let user: String = user.into();
        let trimmed = user.trim();
        let user = if trimmed.is_empty() {
            GUEST_IDENTITY.to_owned()
        } else {
            trimmed.to_owned()
        };
        Self { user, groups }
    }

    #[must_use]
    pub fn guest() -> Self {
        Self::new(GUEST_IDENTITY, Vec::new())
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }
}

/// Split a comma-separated group header into trimmed, non-empty entries.
#[must_use]
pub fn parse_groups(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Per-request authorization result handed to the view handlers.
#[derive(Debug, Clone)]
pub struct RequestContext {
    identity: RequestIdentity,
    role: Role,
}

impl RequestContext {
    #[must_use]
    pub fn new(identity: RequestIdentity, role: Role) -> Self {
        Self { identity, role }
    }

    #[must_use]
    pub fn identity(&self) -> &RequestIdentity {
        &self.identity
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn role_display_uses_lowercase_names() {
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::None.to_string(), "none");
    }

    #[test]
    fn members_of_none_is_always_empty() {
        let config = RoleConfig {
            roles: RoleBindings {
                admin: vec!["alice".to_owned()],
                user: vec!["bob".to_owned()],
            },
        };
        assert_eq!(config.members(Role::Admin), ["alice"]);
        assert_eq!(config.members(Role::User), ["bob"]);
        assert!(config.members(Role::None).is_empty());
    }

    #[test]
    fn blank_user_becomes_guest() {
        assert_eq!(RequestIdentity::new("", vec![]).user(), GUEST_IDENTITY);
        assert_eq!(RequestIdentity::new("   ", vec![]).user(), GUEST_IDENTITY);
        assert_eq!(RequestIdentity::new(" alice ", vec![]).user(), "alice");
        assert_eq!(RequestIdentity::guest().user(), "guest");
    }

    #[test]
    fn parse_groups_trims_and_drops_empty_entries() {
        assert_eq!(
            parse_groups(" admins, ,devs ,,ops"),
            vec!["admins".to_owned(), "devs".to_owned(), "ops".to_owned()]
        );
        assert!(parse_groups("").is_empty());
        assert!(parse_groups(" , ").is_empty());
    }
}
