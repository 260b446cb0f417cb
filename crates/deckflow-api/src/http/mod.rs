//! HTTP handlers and routes.

pub mod handlers;
pub mod routes;
