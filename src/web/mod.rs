//! HTTP layer: routing, the user controller, views, sessions and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod views;
