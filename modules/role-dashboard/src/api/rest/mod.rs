//! HTTP surface: `GET /` and `GET /admin`.

pub mod context;
pub mod handlers;
pub mod routes;
pub mod views;
