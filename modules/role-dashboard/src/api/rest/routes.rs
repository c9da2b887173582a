use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::{Extension, Router};
use tracing::info;

use super::context::{ContextState, request_context_middleware};
use super::handlers;
use super::views::ViewLinks;
use crate::config::{ConfigError, DashboardConfig, TrustedHeaderNames};
use crate::domain::service::DashboardService;

/// Build the dashboard router from configuration.
///
/// # Errors
/// Returns [`ConfigError`] if the configuration does not validate.
pub fn build_router(cfg: &DashboardConfig) -> Result<Router, ConfigError> {
    cfg.validate()?;
    let headers = cfg.headers.header_names()?;
    let service = Arc::new(DashboardService::from_config(cfg));
    let links = Arc::new(ViewLinks {
        login_url: cfg.oauth.login_path.clone(),
        logout_url: cfg.oauth.logout_path.clone(),
    });

    info!(
        roles_path = %cfg.roles_path.display(),
        strategy = ?cfg.strategy,
        user_header = %headers.user,
        groups_header = %headers.groups,
        "Dashboard routes configured"
    );

    Ok(register_routes(Router::new(), service, headers, links))
}

/// Register `GET /` and `GET /admin` on `router`.
///
/// The context middleware is attached as a route layer so unmatched paths
/// never trigger a roles file read.
#[must_use]
pub fn register_routes(
    router: Router,
    service: Arc<DashboardService>,
    headers: TrustedHeaderNames,
    links: Arc<ViewLinks>,
) -> Router {
    let state = ContextState { service, headers };

    router
        .route("/", get(handlers::dashboard))
        .route("/admin", get(handlers::admin_panel))
        .route_layer(from_fn_with_state(state, request_context_middleware))
        .layer(Extension(links))
}
