//! Role resolution.
//!
//! Both strategies walk [`Role::GRANTABLE`] in precedence order, so a caller
//! listed as both admin and user resolves to admin. Membership is exact,
//! case-sensitive string equality.

use super::model::{Role, RoleConfig};

/// Resolve the role granted to the user name itself.
#[must_use]
pub fn resolve_by_identity(identity: &str, config: &RoleConfig) -> Role {
    first_granted(config, |members| members.iter().any(|m| m == identity))
}

/// Resolve the highest role granted to any of the caller's groups.
#[must_use]
pub fn resolve_by_groups(groups: &[String], config: &RoleConfig) -> Role {
    first_granted(config, |members| groups.iter().any(|g| members.contains(g)))
}

fn first_granted(config: &RoleConfig, is_member: impl Fn(&[String]) -> bool) -> Role {
    Role::GRANTABLE
        .into_iter()
        .find(|role| is_member(config.members(*role)))
        .unwrap_or(Role::None)
}
