//! HTML views.
//!
//! Views only render what the handlers put in the [`ViewContext`]; every
//! decision (status code, admin link visibility) is made before rendering.

use crate::domain::model::{RequestContext, Role};

/// The four pages the dashboard can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Admin,
    AccessDenied,
    Login,
}

/// Links to the external OAuth proxy endpoints.
#[derive(Debug, Clone)]
pub struct ViewLinks {
    pub login_url: String,
    pub logout_url: String,
}

/// Data rendered by a view.
#[derive(Debug, Clone)]
pub struct ViewContext<'a> {
    pub user: &'a str,
    pub groups: &'a [String],
    pub role: Role,
    pub show_admin_link: bool,
    pub links: &'a ViewLinks,
}

impl<'a> ViewContext<'a> {
    #[must_use]
    pub fn new(ctx: &'a RequestContext, links: &'a ViewLinks, show_admin_link: bool) -> Self {
        Self {
            user: ctx.identity().user(),
            groups: ctx.identity().groups(),
            role: ctx.role(),
            show_admin_link,
            links,
        }
    }
}

/// Render `view` as a complete HTML document.
#[must_use]
pub fn render(view: View, ctx: &ViewContext<'_>) -> String {
    match view {
        View::Dashboard => dashboard(ctx),
        View::Admin => admin(ctx),
        View::AccessDenied => access_denied(ctx),
        View::Login => login(ctx),
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><title>{title}</title></head>\n<body>\n{body}</body>\n</html>\n"
    )
}

fn dashboard(ctx: &ViewContext<'_>) -> String {
    let admin_link = if ctx.show_admin_link {
        "  <p><strong><a href=\"/admin\">Go to Admin Panel</a></strong></p>\n"
    } else {
        ""
    };
    let body = format!(
        "  <h1>Welcome to the Main Dashboard, {user}!</h1>
  <p>Your role is: <strong>{role}</strong></p>
  <p>Your groups are: {groups}</p>
  <hr>
  <h3>Dashboard Content</h3>
  <p>Here is your basic user-level dashboard information.</p>
{admin_link}  <p><a href=\"{logout}\">Sign out</a></p>
",
        user = escape_html(ctx.user),
        role = ctx.role,
        groups = groups_list(ctx.groups),
        logout = escape_html(&ctx.links.logout_url),
    );
    page("Dashboard", &body)
}

fn admin(ctx: &ViewContext<'_>) -> String {
    let body = format!(
        "  <h1>Admin Control Panel</h1>
  <p>Welcome, <strong>{user}</strong>. You have admin access.</p>
  <p>Your groups are: {groups}</p>
  <hr>
  <h3>Admin Functions</h3>
  <ul>
    <li>Manage Users</li>
    <li>System Settings</li>
    <li>View Audit Logs</li>
  </ul>
  <p><a href=\"/\">Back to Dashboard</a></p>
  <p><a href=\"{logout}\">Sign out</a></p>
",
        user = escape_html(ctx.user),
        groups = groups_list(ctx.groups),
        logout = escape_html(&ctx.links.logout_url),
    );
    page("Admin Panel", &body)
}

fn access_denied(ctx: &ViewContext<'_>) -> String {
    let body = format!(
        "  <h1>Access Denied (403)</h1>
  <p>Sorry, <strong>{user}</strong>, you do not have permission to view this page.</p>
  <p>Your role '<strong>{role}</strong>' (groups: {groups}) is not authorized.</p>
  <p><a href=\"/\">Back to Dashboard</a></p>
",
        user = escape_html(ctx.user),
        role = ctx.role,
        groups = groups_list(ctx.groups),
    );
    page("Access Denied", &body)
}

fn login(ctx: &ViewContext<'_>) -> String {
    let body = format!(
        "  <h1>Please log in</h1>
  <p>You need to sign in to view the dashboard.</p>
  <p><a href=\"{login}\">Log in</a></p>
",
        login = escape_html(&ctx.links.login_url),
    );
    page("Login", &body)
}

fn groups_list(groups: &[String]) -> String {
    if groups.is_empty() {
        return "(none)".to_owned();
    }
    escape_html(&groups.join(", "))
}

/// Escape text for inclusion in HTML element content or a quoted attribute.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}
