//! Request context middleware.
//!
//! Reads the identity forwarded by the trusted proxy, resolves it through the
//! [`DashboardService`] and stores the resulting
//! [`RequestContext`](crate::RequestContext) in the
//! request extensions for the handlers.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use http::HeaderName;

use crate::config::TrustedHeaderNames;
use crate::domain::model::{RequestIdentity, parse_groups};
use crate::domain::service::DashboardService;

/// Shared state for the context middleware.
#[derive(Clone)]
pub struct ContextState {
    pub service: Arc<DashboardService>,
    pub headers: TrustedHeaderNames,
}

/// Resolve the caller and insert its [`RequestContext`](crate::RequestContext).
pub async fn request_context_middleware(
    State(state): State<ContextState>,
    mut req: Request,
    next: Next,
) -> Response {
    let identity = extract_identity(req.headers(), &state.headers);
    let ctx = state.service.authorize(identity);
    req.extensions_mut().insert(ctx);
    next.run(req).await
}

/// Build the caller identity from the trusted headers.
///
/// A missing, empty or non-UTF-8 user header yields the guest identity; a
/// missing group header yields no groups.
#[must_use]
pub fn extract_identity(headers: &HeaderMap, names: &TrustedHeaderNames) -> RequestIdentity {
    let user = header_str(headers, &names.user).unwrap_or_default();
    let groups = header_str(headers, &names.groups)
        .map(parse_groups)
        .unwrap_or_default();
    RequestIdentity::new(user, groups)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
