#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Role Dashboard
//!
//! Renders a small dashboard behind a trusted OAuth reverse proxy. The proxy
//! authenticates the caller and forwards the identity in request headers; this
//! crate only maps that identity to a [`Role`] and picks a view.
//!
//! ## Request flow
//!
//! 1. The context middleware reads the trusted identity and group headers.
//! 2. The roles file is re-read and published through an atomic swap.
//! 3. The configured [`ResolutionStrategy`] resolves exactly one [`Role`].
//! 4. The handler looks the role up in its decision table and renders a view.
//!
//! ## Roles file
//!
//! ```yaml
//! roles:
//!   admin: ["alice"]
//!   user: ["bob", "carol"]
//! ```
//!
//! A missing or malformed roles file degrades to an empty mapping, so every
//! caller resolves to [`Role::None`] and sees the login prompt.

pub mod api;
pub mod config;
pub mod domain;

pub use api::rest::routes::{build_router, register_routes};
pub use config::{DashboardConfig, ResolutionStrategy};
pub use domain::model::{RequestContext, RequestIdentity, Role, RoleBindings, RoleConfig};
pub use domain::service::DashboardService;
