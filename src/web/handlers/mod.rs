//! Request handlers.
//!
//! - `users` - HTML controller actions
//! - `users_api` - JSON listing under `api/users`

pub mod users;
pub mod users_api;
