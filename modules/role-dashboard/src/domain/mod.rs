//! Domain layer: role model, roles file loading and resolution.

pub mod error;
pub mod loader;
pub mod model;
pub mod resolver;
pub mod service;

pub use error::RoleConfigError;
pub use service::DashboardService;
