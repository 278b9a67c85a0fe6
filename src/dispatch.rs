//! Request dispatch: base-URI stripping, CORS, lookup, handler invocation.
//!
//! [`Dispatcher::new`] is where construction ends. It takes ownership of the
//! finished [`Router`] and configuration, and from then on both are only
//! read, so one dispatcher can serve any number of concurrent requests.
//!
//! Every call produces exactly one response:
//!
//! | Outcome | Status | Body |
//! |---|---|---|
//! | handler ran | whatever it returned | whatever it returned |
//! | CORS rejected | 403 | `{"error":"Forbidden","message":"Origin or method not allowed."}` |
//! | no route | 404 | `{"error":"Not Found","message":"No route matches the provided URI."}` |
//! | handler failed or panicked | 500 | `{"error":"Internal Server Error","message":"<detail>"}` |

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use http::StatusCode;
use tracing::{Instrument, error, info_span, warn};

use crate::config::Config;
use crate::cors::CorsDecision;
use crate::method::Method;
use crate::path;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// Routes requests through a finished route table.
#[derive(Debug)]
pub struct Dispatcher {
    router: Router,
    config: Config,
}

impl Dispatcher {
    pub fn new(router: Router, config: Config) -> Self {
        Self { router, config }
    }

    pub fn config(&self) -> &Config { &self.config }

    /// Every registered `(method, template)` pair.
    pub fn routes(&self) -> impl Iterator<Item = (&Method, &str)> {
        self.router.routes()
    }

    /// Routes one request and produces one response. Never fails.
    pub async fn dispatch(&self, req: Request) -> Response {
        let span = info_span!("dispatch", method = %req.method(), path = req.path());
        self.route(req).instrument(span).await
    }

    async fn route(&self, req: Request) -> Response {
        let target = req.uri().to_string();
        let path = path::strip_base(path::extract_path(&target), &self.config.base_uri).to_owned();

        let cors = match self.config.allowed_origins.authorize(req.origin(), req.method().as_str()) {
            CorsDecision::Denied => {
                warn!(origin = req.origin(), "origin or method not allowed");
                return forbidden();
            }
            CorsDecision::Allowed(headers) => Some(headers),
            CorsDecision::Disabled => None,
        };

        let found = req.method().as_str().parse::<Method>().ok()
            .and_then(|method| self.router.lookup(&method, &path));

        let mut res = match found {
            Some((handler, params)) => {
                // The call itself sits inside the future so a handler that
                // panics before returning its future is caught too.
                let invocation = async move { handler.call(req, params).await };
                match AssertUnwindSafe(invocation).catch_unwind().await {
                    Ok(Ok(res)) => res,
                    Ok(Err(e)) => {
                        error!(error = %e, "handler failed");
                        internal_error(&e.to_string())
                    }
                    Err(panic) => {
                        let message = panic_message(panic.as_ref());
                        error!(error = %message, "handler panicked");
                        internal_error(&message)
                    }
                }
            }
            None => not_found(),
        };

        if let Some(headers) = cors {
            headers.apply(&mut res);
        }
        res
    }
}

pub(crate) fn forbidden() -> Response {
    Response::error(StatusCode::FORBIDDEN, "Forbidden", "Origin or method not allowed.")
}

pub(crate) fn not_found() -> Response {
    Response::error(StatusCode::NOT_FOUND, "Not Found", "No route matches the provided URI.")
}

pub(crate) fn internal_error(message: &str) -> Response {
    Response::error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", message)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_owned()
    }
}
