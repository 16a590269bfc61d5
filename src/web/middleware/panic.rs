//! Panic responder for tower-http's `CatchPanicLayer`.

use std::any::Any;

use axum::body::Body;
use axum::http::{Response, StatusCode};
use tower_http::catch_panic::ResponseForPanic;

use crate::config::WebConfig;
use crate::web::views::{ErrorDetail, PageContext, ServerErrorView, respond};

/// Turns a handler panic into the 500 page instead of a dropped connection.
#[derive(Clone)]
pub struct PanicPage {
    web: WebConfig,
}

impl PanicPage {
    pub fn new(web: WebConfig) -> Self {
        Self { web }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

impl ResponseForPanic for PanicPage {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let message = panic_message(err.as_ref());
        tracing::error!(panic = %message, "Request handler panicked");

        let detail = self.web.debug.then(|| ErrorDetail {
            message: format!("panic: {}", message),
            chain: Vec::new(),
        });
        let page = PageContext::new(&self.web, false);

        respond(
            StatusCode::INTERNAL_SERVER_ERROR,
            &ServerErrorView { detail },
            &page,
        )
    }
}
