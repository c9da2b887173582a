//! Domain service for the role dashboard.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::debug;

use super::loader;
use super::model::{RequestContext, RequestIdentity, RoleConfig};
use crate::config::{DashboardConfig, ResolutionStrategy};

/// Resolves callers to roles against the roles file.
///
/// The last loaded [`RoleConfig`] is published through an [`ArcSwap`]: a
/// reload builds a complete value before swapping it in, so concurrent
/// requests only ever observe a whole mapping.
pub struct DashboardService {
    roles_path: PathBuf,
    strategy: ResolutionStrategy,
    current: ArcSwap<RoleConfig>,
}

impl DashboardService {
    #[must_use]
    pub fn new(roles_path: impl Into<PathBuf>, strategy: ResolutionStrategy) -> Self {
        Self {
            roles_path: roles_path.into(),
            strategy,
            current: ArcSwap::from_pointee(RoleConfig::default()),
        }
    }

    #[must_use]
    pub fn from_config(cfg: &DashboardConfig) -> Self {
        Self::new(cfg.roles_path.clone(), cfg.strategy)
    }

    #[must_use]
    pub fn roles_path(&self) -> &Path {
        &self.roles_path
    }

    #[must_use]
    pub fn strategy(&self) -> ResolutionStrategy {
        self.strategy
    }

    /// Re-read the roles file and publish the result.
    #[must_use]
    pub fn reload(&self) -> Arc<RoleConfig> {
        let fresh = Arc::new(loader::load(&self.roles_path));
        self.current.store(Arc::clone(&fresh));
        fresh
    }

    /// Mapping published by the last reload.
    #[must_use]
    pub fn current(&self) -> Arc<RoleConfig> {
        self.current.load_full()
    }

    /// Reload the roles file and resolve the caller's role.
    #[must_use]
    pub fn authorize(&self, identity: RequestIdentity) -> RequestContext {
        let config = self.reload();
        let role = self.strategy.resolve(&identity, &config);
        debug!(
            user = %identity.user(),
            groups = ?identity.groups(),
            strategy = ?self.strategy,
            role = %role,
            "Resolved caller role"
        );
        RequestContext::new(identity, role)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::domain::model::Role;

    fn write_roles(path: &Path, content: &str) {
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn authorize_picks_up_roles_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roles.yaml");
        let service = DashboardService::new(&path, ResolutionStrategy::Identity);

        let ctx = service.authorize(RequestIdentity::new("alice", vec![]));
        assert_eq!(ctx.role(), Role::None);

        write_roles(&path, "roles:\n  user: [alice]\n");
        let ctx = service.authorize(RequestIdentity::new("alice", vec![]));
        assert_eq!(ctx.role(), Role::User);

        write_roles(&path, "roles:\n  admin: [alice]\n");
        let ctx = service.authorize(RequestIdentity::new("alice", vec![]));
        assert_eq!(ctx.role(), Role::Admin);
        assert_eq!(ctx.identity().user(), "alice");
    }

    #[test]
    fn reload_publishes_latest_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roles.yaml");
        write_roles(&path, "roles:\n  admin: [alice]\n");
        let service = DashboardService::new(&path, ResolutionStrategy::Identity);
        assert!(service.current().is_empty());

        let loaded = service.reload();
        assert_eq!(*service.current(), *loaded);
        assert_eq!(loaded.roles.admin, vec!["alice".to_owned()]);

        std::fs::remove_file(&path).unwrap();
        assert!(service.reload().is_empty());
        assert!(service.current().is_empty());
    }

    #[test]
    fn group_strategy_uses_forwarded_groups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roles.yaml");
        write_roles(&path, "roles:\n  admin: [ops]\n  user: [alice]\n");
        let service = DashboardService::new(&path, ResolutionStrategy::Groups);

        let ctx = service.authorize(RequestIdentity::new("alice", vec![]));
        assert_eq!(ctx.role(), Role::None);

        let ctx = service.authorize(RequestIdentity::new("alice", vec!["ops".to_owned()]));
        assert_eq!(ctx.role(), Role::Admin);
    }
}
