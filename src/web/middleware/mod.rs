//! Middleware and error-to-response mapping.

mod error_handler;
mod logging;
mod panic;
mod request_id;

pub use error_handler::{error_response, render_error_page};
pub use logging::logging_middleware;
pub use panic::PanicPage;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
