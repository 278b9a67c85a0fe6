//! Minimal portico demo: a user resource, a health check, and an origin
//! allow-list read from `demos/portico.toml`.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl -H 'origin: https://app.example' http://localhost:3000/api/users/42
//!   curl -X POST -H 'origin: https://app.example' http://localhost:3000/api/users -d alice
//!   curl -X DELETE -H 'origin: https://app.example' http://localhost:3000/api/users/42   # 403
//!   curl -H 'origin: https://app.example' http://localhost:3000/api/users/42/x           # 404

use http::StatusCode;
use portico::{Config, Dispatcher, HandlerError, Params, Request, Response, RouteGroup, Router, Server};

#[tokio::main]
async fn main() -> Result<(), portico::Error> {
    tracing_subscriber::fmt::init();

    let config = Config::load(concat!(env!("CARGO_MANIFEST_DIR"), "/demos/portico.toml"))?;

    let mut router = Router::new().get("/healthz", healthz);
    router.mount(users())?;

    Server::bind("0.0.0.0:3000")
        .serve(Dispatcher::new(router, config))
        .await
}

/// The user resource's declarations. `/users/me` comes first so the
/// placeholder route does not shadow it.
fn users() -> RouteGroup {
    RouteGroup::prefixed("/users")
        .get("/me", current_user)
        .get("/{id}", get_user)
        .post("/", create_user)
        .delete("/{id}", delete_user)
}

async fn healthz(_req: Request, _params: Params) -> Result<&'static str, HandlerError> {
    Ok("ok")
}

async fn current_user(_req: Request, _params: Params) -> Result<Response, HandlerError> {
    Ok(Response::json(br#"{"id":"1","name":"alice"}"#.to_vec()))
}

// GET /users/{id}
async fn get_user(_req: Request, params: Params) -> Result<Response, HandlerError> {
    let id = &params[0];
    Ok(Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#).into_bytes()))
}

// POST /users
async fn create_user(req: Request, _params: Params) -> Result<Response, HandlerError> {
    if req.body().is_empty() {
        return Ok(Response::status(StatusCode::BAD_REQUEST));
    }
    let name = std::str::from_utf8(req.body())?;
    Ok(Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/users/99")
        .json(format!(r#"{{"id":"99","name":"{name}"}}"#).into_bytes()))
}

// DELETE /users/{id}
async fn delete_user(_req: Request, _params: Params) -> Result<StatusCode, HandlerError> {
    Ok(StatusCode::NO_CONTENT)
}
