//! Origin allow-list checked before any route lookup.
//!
//! The policy maps an origin (`*` or an exact origin string) to the methods
//! that origin may use. An empty policy disables enforcement: every request
//! proceeds and no CORS headers are added.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::method::Method;
use crate::response::Response;

/// `Access-Control-Allow-Methods` value: the whole canonical method set.
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, PATCH, OPTIONS, HEAD, TRACE, CONNECT, PRI";

/// `Access-Control-Allow-Headers` value.
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

const WILDCARD: &str = "*";

/// Allowed origins and, for each, the methods it may use.
///
/// Deserializes from a map of origin → method list:
///
/// ```toml
/// [allowed_origins]
/// "https://a.example" = ["GET", "POST"]
/// "*" = ["GET"]
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct CorsPolicy {
    origins: HashMap<String, HashSet<Method>>,
}

impl CorsPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows `origin` to use `methods`, in addition to anything already
    /// allowed for it. Pass `"*"` to match every origin.
    pub fn allow(mut self, origin: impl Into<String>, methods: impl IntoIterator<Item = Method>) -> Self {
        self.origins.entry(origin.into()).or_default().extend(methods.into_iter().map(Method::canonical));
        self
    }

    /// `false` when no origin is configured, meaning enforcement is off.
    pub fn is_enabled(&self) -> bool {
        !self.origins.is_empty()
    }

    /// Whether some entry keyed `*` or `origin` lists `method`.
    pub fn is_allowed(&self, origin: &str, method: &Method) -> bool {
        self.origins.iter().any(|(allowed, methods)| {
            (allowed == WILDCARD || allowed == origin) && methods.contains(method)
        })
    }

    /// Decides whether a request may proceed, given its `Origin` header
    /// (`""` when absent) and raw method token.
    pub fn authorize(&self, origin: &str, method: &str) -> CorsDecision {
        if !self.is_enabled() {
            return CorsDecision::Disabled;
        }
        let allowed = method.parse::<Method>()
            .is_ok_and(|m| self.is_allowed(origin, &m));
        if !allowed {
            return CorsDecision::Denied;
        }
        let echoed = if origin.is_empty() { WILDCARD } else { origin };
        CorsDecision::Allowed(CorsHeaders { origin: echoed.to_owned() })
    }
}

/// Outcome of [`CorsPolicy::authorize`].
#[derive(Debug, PartialEq, Eq)]
pub enum CorsDecision {
    /// No policy configured; nothing to add.
    Disabled,
    Allowed(CorsHeaders),
    Denied,
}

/// Headers granted to an authorized request.
#[derive(Debug, PartialEq, Eq)]
pub struct CorsHeaders {
    origin: String,
}

impl CorsHeaders {
    pub fn origin(&self) -> &str { &self.origin }

    pub fn apply(&self, res: &mut Response) {
        res.push_header("access-control-allow-origin", &self.origin);
        res.push_header("access-control-allow-methods", ALLOW_METHODS);
        res.push_header("access-control-allow-headers", ALLOW_HEADERS);
    }
}
