//! Persistence gateway.
//!
//! Async PostgreSQL pooling using diesel_async with bb8, plus the embedded
//! schema migrations.

mod migrations;
mod pool;

pub use migrations::{MIGRATIONS, pending_migrations, revert_migrations, run_pending_migrations};
pub use pool::{AsyncDbPool, establish_async_connection_pool};
