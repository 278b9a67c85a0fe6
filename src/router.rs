//! Ordered, per-method route table.
//!
//! One list per HTTP method, scanned in registration order. The first
//! pattern that accepts the path wins, regardless of how specific a later
//! route might be, so **declaration order is part of the routing contract**:
//! declare `/users/me` before `/users/{id}` if both should be reachable.
//!
//! Build the table once at startup, then hand it to
//! [`Dispatcher::new`](crate::Dispatcher::new). Nothing mutates it afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::params::Params;
use crate::path;
use crate::pattern::PathPattern;

struct RouteEntry {
    pattern: PathPattern,
    handler: BoxedHandler,
}

#[derive(Default)]
struct MethodTable {
    entries: Vec<RouteEntry>,
    // Placeholder-free templates → index into `entries`.
    literals: HashMap<String, usize>,
}

impl MethodTable {
    fn insert(&mut self, pattern: PathPattern, handler: BoxedHandler) {
        if pattern.is_literal() {
            if let Some(&idx) = self.literals.get(pattern.template()) {
                self.entries[idx].handler = handler;
                return;
            }
            self.literals.insert(pattern.template().to_owned(), self.entries.len());
        }
        self.entries.push(RouteEntry { pattern, handler });
    }

    fn lookup(&self, path: &str) -> Option<(&RouteEntry, Params)> {
        for entry in &self.entries {
            trace!(route = entry.pattern.template(), "checking route");
            if let Some(params) = entry.pattern.captures(path) {
                return Some((entry, params));
            }
        }
        // Literal entries were already tried by the scan above; the exact
        // lookup stays as a second chance for any path the matcher rejects.
        let &idx = self.literals.get(path)?;
        Some((&self.entries[idx], Params::default()))
    }
}

/// Generates per-method shorthands that forward to `$target`.
macro_rules! method_shortcuts {
    ($target:ident: $($name:ident => $variant:ident),* $(,)?) => {
        $(
            #[doc = concat!("Shorthand for [`", stringify!($target), "`](Self::", stringify!($target), ") with `Method::", stringify!($variant), "`.")]
            pub fn $name(self, path: &str, handler: impl Handler) -> Self {
                self.$target(Method::$variant, path, handler)
            }
        )*
    };
}

/// The application route table.
///
/// ```rust
/// use portico::{HandlerError, Params, Request, Response, Router};
///
/// async fn show(_req: Request, params: Params) -> Result<Response, HandlerError> {
///     Ok(Response::text(format!("user {}", &params[0])))
/// }
/// # async fn list(_req: Request, _params: Params) -> Result<Response, HandlerError> {
/// #     Ok(Response::text(""))
/// # }
///
/// let router = Router::new().scope("/api", |r| {
///     r.get("/users", list)
///      .get("/users/{id}", show)
/// });
/// ```
pub struct Router {
    routes: HashMap<Method, MethodTable>,
    prefix: String,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), prefix: String::new() }
    }

    /// Register a handler for a method + path pair, under the current group
    /// prefix.
    ///
    /// Registering the same placeholder-free path twice replaces the first
    /// handler in place. Templates with placeholders always append.
    pub fn register(
        &mut self,
        method: Method,
        path: &str,
        handler: impl Handler,
    ) -> Result<&mut Self, ConfigError> {
        self.insert(method, path, handler.into_boxed_handler())
    }

    fn insert(
        &mut self,
        method: Method,
        path: &str,
        handler: BoxedHandler,
    ) -> Result<&mut Self, ConfigError> {
        let method = method.canonical();
        let full = path::join(&self.prefix, path);
        let pattern = PathPattern::compile(&full)
            .map_err(|source| ConfigError::Pattern { template: full.clone(), source })?;
        debug!(%method, route = %full, placeholders = pattern.placeholder_count(), "route registered");
        self.routes.entry(method).or_default().insert(pattern, handler);
        Ok(self)
    }

    /// Chaining form of [`register`](Self::register).
    ///
    /// # Panics
    ///
    /// Panics if the resulting path template is malformed. Route tables are
    /// built at startup, where a bad template should stop the process.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        if let Err(e) = self.register(method, path, handler) {
            panic!("{e}");
        }
        self
    }

    method_shortcuts! { on:
        get     => Get,
        post    => Post,
        put     => Put,
        delete  => Delete,
        patch   => Patch,
        options => Options,
        head    => Head,
        trace   => Trace,
        connect => Connect,
        pri     => Pri,
    }

    /// Registers everything `f` adds with `prefix` prepended. Scopes nest, and
    /// the previous prefix is back in effect once `f` returns.
    ///
    /// # Panics
    ///
    /// Panics if `prefix` is malformed, or if `f` registers a malformed route.
    pub fn scope(mut self, prefix: &str, f: impl FnOnce(Self) -> Self) -> Self {
        let saved = match self.enter(prefix) {
            Ok(saved) => saved,
            Err(e) => panic!("{e}"),
        };
        let mut router = f(self);
        router.prefix = saved;
        router
    }

    /// Registers a batch of declarations, such as a resource's route list.
    ///
    /// The group's prefix applies to this batch only.
    pub fn mount(&mut self, group: RouteGroup) -> Result<&mut Self, ConfigError> {
        let saved = match &group.prefix {
            Some(prefix) => Some(self.enter(prefix)?),
            None => None,
        };
        let result = group.routes.into_iter().try_for_each(|decl| {
            self.insert(decl.method, &decl.path, decl.handler).map(|_| ())
        });
        if let Some(saved) = saved {
            self.prefix = saved;
        }
        result.map(|()| self)
    }

    /// Extends the current prefix, returning the one it replaced.
    fn enter(&mut self, prefix: &str) -> Result<String, ConfigError> {
        let joined = path::join(&self.prefix, prefix);
        PathPattern::compile(&joined)
            .map_err(|source| ConfigError::Prefix { prefix: prefix.to_owned(), source })?;
        Ok(std::mem::replace(&mut self.prefix, joined))
    }

    /// Finds the handler for `method` + `path` and the values its
    /// placeholders captured.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<(BoxedHandler, Params)> {
        let table = self.routes.get(method)?;
        let (entry, params) = table.lookup(path)?;
        debug!(%method, path, route = entry.pattern.template(), "route matched");
        Some((Arc::clone(&entry.handler), params))
    }

    /// Every registered `(method, template)` pair. Templates of one method
    /// come out in match order; the order across methods is unspecified.
    pub fn routes(&self) -> impl Iterator<Item = (&Method, &str)> {
        self.routes.iter().flat_map(|(method, table)| {
            table.entries.iter().map(move |e| (method, e.pattern.template()))
        })
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.routes().map(|(m, t)| format!("{m} {t}")))
            .finish()
    }
}

// ── RouteGroup ────────────────────────────────────────────────────────────────

struct RouteDecl {
    method: Method,
    path: String,
    handler: BoxedHandler,
}

/// A batch of route declarations sharing an optional prefix.
///
/// This is what a resource hands the router: a list of
/// `(method, path, handler)` tuples, mounted with [`Router::mount`].
///
/// ```rust
/// use portico::{HandlerError, Params, Request, Response, RouteGroup, Router};
///
/// async fn list(_req: Request, _params: Params) -> Result<Response, HandlerError> {
///     Ok(Response::text("widgets"))
/// }
///
/// let mut router = Router::new();
/// router.mount(RouteGroup::prefixed("/api").get("/widgets", list)).unwrap();
/// ```
#[derive(Default)]
pub struct RouteGroup {
    prefix: Option<String>,
    routes: Vec<RouteDecl>,
}

impl RouteGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self { prefix: Some(prefix.into()), routes: Vec::new() }
    }

    /// Adds one declaration. Paths are validated when the group is mounted.
    pub fn route(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes.push(RouteDecl {
            method,
            path: path.to_owned(),
            handler: handler.into_boxed_handler(),
        });
        self
    }

    method_shortcuts! { route:
        get     => Get,
        post    => Post,
        put     => Put,
        delete  => Delete,
        patch   => Patch,
        options => Options,
        head    => Head,
        trace   => Trace,
        connect => Connect,
        pri     => Pri,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::HandlerError;
    use crate::request::Request;
    use crate::response::Response;

    // Each handler answers with its own tag so lookups can be told apart.
    fn tagged(tag: &'static str) -> impl Handler {
        move |_req: Request, _params: Params| async move {
            Ok::<_, HandlerError>(Response::text(tag))
        }
    }

    async fn resolve(router: &Router, method: Method, path: &str) -> Option<(String, Vec<String>)> {
        let (handler, params) = router.lookup(&method, path)?;
        let req: Request = http::Request::new(bytes::Bytes::new()).into();
        let res = handler.call(req, params.clone()).await.ok()?;
        Some((String::from_utf8(res.body).ok()?, params.into_vec()))
    }

    #[tokio::test]
    async fn placeholders_are_extracted_positionally() {
        let router = Router::new().get("/users/{id}", tagged("show"));
        let (tag, params) = resolve(&router, Method::Get, "/users/42").await.unwrap();
        assert_eq!(tag, "show");
        assert_eq!(params, ["42"]);
        assert!(resolve(&router, Method::Get, "/users/42/x").await.is_none());
        assert!(resolve(&router, Method::Post, "/users/42").await.is_none());
    }

    #[tokio::test]
    async fn first_registered_match_wins() {
        let router = Router::new()
            .get("/users/{id}", tagged("by-id"))
            .get("/users/me", tagged("me"));
        let (tag, params) = resolve(&router, Method::Get, "/users/me").await.unwrap();
        assert_eq!(tag, "by-id");
        assert_eq!(params, ["me"]);
    }

    #[tokio::test]
    async fn duplicate_literals_overwrite_in_place() {
        let router = Router::new()
            .get("/health", tagged("first"))
            .get("/{page}", tagged("page"))
            .get("/health/", tagged("second"));
        assert_eq!(router.routes().count(), 2);
        let (tag, _) = resolve(&router, Method::Get, "/health").await.unwrap();
        assert_eq!(tag, "second");
    }

    #[tokio::test]
    async fn duplicate_patterns_accumulate() {
        let router = Router::new()
            .get("/items/{id}", tagged("first"))
            .get("/items/{id}", tagged("second"));
        assert_eq!(router.routes().count(), 2);
        let (tag, _) = resolve(&router, Method::Get, "/items/1").await.unwrap();
        assert_eq!(tag, "first");
    }

    #[tokio::test]
    async fn scopes_prefix_and_restore() {
        let router = Router::new()
            .scope("/api/", |r| {
                r.get("/widgets", tagged("widgets"))
                    .scope("v2", |r| r.get("gadgets/", tagged("gadgets")))
                    .get("//parts", tagged("parts"))
            })
            .get("/root", tagged("root"));

        let mut templates: Vec<&str> = router.routes().map(|(_, t)| t).collect();
        templates.sort_unstable();
        assert_eq!(templates, ["/api/parts", "/api/v2/gadgets", "/api/widgets", "/root"]);
        assert_eq!(resolve(&router, Method::Get, "/api/widgets").await.unwrap().0, "widgets");
    }

    #[tokio::test]
    async fn mount_applies_group_prefix_to_one_batch_only() {
        let mut router = Router::new();
        router.mount(RouteGroup::prefixed("/api").get("/widgets", tagged("w"))).unwrap();
        router.mount(RouteGroup::new().post("/widgets", tagged("p"))).unwrap();

        assert!(resolve(&router, Method::Get, "/api/widgets").await.is_some());
        assert!(resolve(&router, Method::Post, "/widgets").await.is_some());
        assert!(resolve(&router, Method::Post, "/api/widgets").await.is_none());
    }

    #[tokio::test]
    async fn extension_spelling_a_known_method_shares_its_table() {
        let router = Router::new().on(Method::Extension("GET".to_owned()), "/items", tagged("items"));
        assert_eq!(router.routes().map(|(m, _)| m.clone()).collect::<Vec<_>>(), [Method::Get]);
        assert_eq!(resolve(&router, Method::Get, "/items").await.unwrap().0, "items");
    }

    #[test]
    fn malformed_templates_fail_registration() {
        let mut router = Router::new();
        let err = router.register(Method::Get, "/users/{id", tagged("x")).unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { ref template, .. } if template == "/users/{id"));
    }

    #[test]
    fn failed_mount_restores_prefix() {
        let mut router = Router::new();
        let group = RouteGroup::prefixed("/api").get("/{}", tagged("bad"));
        assert!(router.mount(group).is_err());
        router.register(Method::Get, "/ok", tagged("ok")).unwrap();
        assert_eq!(router.routes().map(|(_, t)| t).collect::<Vec<_>>(), ["/ok"]);
    }

    #[test]
    fn invalid_prefix_is_a_configuration_error() {
        let mut router = Router::new();
        let err = router.mount(RouteGroup::prefixed("/api{").get("/x", tagged("x"))).unwrap_err();
        assert!(matches!(err, ConfigError::Prefix { .. }));
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn chaining_builder_panics_on_bad_template() {
        let _ = Router::new().get("/users/}", tagged("x"));
    }
}
