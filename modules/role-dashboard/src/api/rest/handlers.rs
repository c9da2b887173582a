use std::sync::Arc;

use axum::Extension;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::{field::Empty, info};

use super::views::{self, View, ViewContext, ViewLinks};
use crate::domain::model::{RequestContext, Role};

/// What a route serves for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub status: StatusCode,
    pub view: View,
    pub show_admin_link: bool,
}

impl Dispatch {
    const fn ok(view: View) -> Self {
        Self {
            status: StatusCode::OK,
            view,
            show_admin_link: false,
        }
    }
}

/// Decision table for `GET /`.
#[must_use]
pub const fn dashboard_dispatch(role: Role) -> Dispatch {
    match role {
        Role::Admin => Dispatch {
            show_admin_link: true,
            ..Dispatch::ok(View::Dashboard)
        },
        Role::User => Dispatch::ok(View::Dashboard),
        Role::None => Dispatch::ok(View::Login),
    }
}

/// Decision table for `GET /admin`.
///
/// A caller without a role is sent to the login prompt rather than refused:
/// only an identified but under-privileged caller gets a 403.
#[must_use]
pub const fn admin_dispatch(role: Role) -> Dispatch {
    match role {
        Role::Admin => Dispatch::ok(View::Admin),
        Role::User => Dispatch {
            status: StatusCode::FORBIDDEN,
            ..Dispatch::ok(View::AccessDenied)
        },
        Role::None => Dispatch::ok(View::Login),
    }
}

/// Main dashboard.
#[tracing::instrument(
    skip_all,
    fields(user = %ctx.identity().user(), role = %ctx.role(), view = Empty)
)]
pub async fn dashboard(
    Extension(ctx): Extension<RequestContext>,
    Extension(links): Extension<Arc<ViewLinks>>,
) -> Response {
    respond(&ctx, &links, dashboard_dispatch(ctx.role()))
}

/// Admin panel.
#[tracing::instrument(
    skip_all,
    fields(user = %ctx.identity().user(), role = %ctx.role(), view = Empty)
)]
pub async fn admin_panel(
    Extension(ctx): Extension<RequestContext>,
    Extension(links): Extension<Arc<ViewLinks>>,
) -> Response {
    respond(&ctx, &links, admin_dispatch(ctx.role()))
}

fn respond(ctx: &RequestContext, links: &ViewLinks, dispatch: Dispatch) -> Response {
    tracing::Span::current().record("view", tracing::field::debug(dispatch.view));
    if dispatch.status == StatusCode::FORBIDDEN {
        info!(groups = ?ctx.identity().groups(), "Denied admin panel");
    }
    let html = views::render(
        dispatch.view,
        &ViewContext::new(ctx, links, dispatch.show_admin_link),
    );
    (dispatch.status, Html(html)).into_response()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn dashboard_table() {
        let admin = dashboard_dispatch(Role::Admin);
        assert_eq!(admin.status, StatusCode::OK);
        assert_eq!(admin.view, View::Dashboard);
        assert!(admin.show_admin_link);

        let user = dashboard_dispatch(Role::User);
        assert_eq!(user.status, StatusCode::OK);
        assert_eq!(user.view, View::Dashboard);
        assert!(!user.show_admin_link);

        let none = dashboard_dispatch(Role::None);
        assert_eq!(none.status, StatusCode::OK);
        assert_eq!(none.view, View::Login);
    }

    #[test]
    fn admin_table() {
        assert_eq!(admin_dispatch(Role::Admin), Dispatch::ok(View::Admin));

        let user = admin_dispatch(Role::User);
        assert_eq!(user.status, StatusCode::FORBIDDEN);
        assert_eq!(user.view, View::AccessDenied);

        assert_eq!(admin_dispatch(Role::None), Dispatch::ok(View::Login));
    }

    #[test]
    fn roleless_caller_is_never_forbidden() {
        for dispatch in [dashboard_dispatch(Role::None), admin_dispatch(Role::None)] {
            assert_ne!(dispatch.status, StatusCode::FORBIDDEN);
            assert_eq!(dispatch.view, View::Login);
        }
    }
}
