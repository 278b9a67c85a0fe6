//! # portico
//!
//! A small HTTP request router: method + path in, handler out, with an
//! origin allow-list checked on the way.
//!
//! ## The contract
//!
//! - Routes are `{name}` templates. A placeholder matches one path segment's
//!   worth of `[A-Za-z0-9_]`; its value reaches the handler by position.
//! - Each method's routes are tried in registration order and the **first
//!   match wins**. Declare specific routes before general ones.
//! - A non-empty CORS policy is checked before lookup. Rejected requests get
//!   a 403 and never reach the route table.
//! - Dispatch never fails: no route is a 404, a failing or panicking handler
//!   is a 500 with the failure's message.
//!
//! No middleware, no extractors, no sessions. The route table is built once,
//! then shared read-only by every connection.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use portico::{Config, Dispatcher, HandlerError, Method, Params, Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), portico::Error> {
//!     let router = Router::new().scope("/api", |r| {
//!         r.get("/users/{id}", get_user)
//!          .post("/users", create_user)
//!     });
//!
//!     let config = Config::new().allow_origin("https://app.example", [Method::Get, Method::Post]);
//!
//!     Server::bind("0.0.0.0:3000").serve(Dispatcher::new(router, config)).await
//! }
//!
//! async fn get_user(_req: Request, params: Params) -> Result<Response, HandlerError> {
//!     let id = &params[0];
//!     Ok(Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes()))
//! }
//!
//! async fn create_user(req: Request, _params: Params) -> Result<Response, HandlerError> {
//!     let name = std::str::from_utf8(req.body())?;
//!     Ok(Response::builder()
//!         .status(http::StatusCode::CREATED)
//!         .text(name))
//! }
//! ```

mod config;
mod cors;
mod dispatch;
mod error;
mod handler;
mod method;
mod params;
mod pattern;
mod request;
mod response;
mod router;
mod server;

pub mod path;

pub use config::Config;
pub use cors::{ALLOW_HEADERS, ALLOW_METHODS, CorsDecision, CorsHeaders, CorsPolicy};
pub use dispatch::Dispatcher;
pub use error::{ConfigError, Error, MethodError, PatternError};
pub use handler::{Handler, HandlerError};
pub use method::Method;
pub use params::Params;
pub use pattern::PathPattern;
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::{RouteGroup, Router};
pub use server::Server;
