//! HTTP method as a typed enum.
//!
//! The ten methods a route can be declared for get their own variants. Any
//! other uppercase token (`PROPFIND`, `PURGE`, …) is carried as
//! [`Method::Extension`] so the method set stays open.
//!
//! Parsing is case-sensitive per RFC 9110 §9.1: `get` is not `GET`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::MethodError;

/// An HTTP request method.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
    Connect,
    /// The HTTP/2 connection preface method.
    Pri,
    /// Any other uppercase token. An `Extension` holding a canonical token
    /// (`Extension("GET")`) is folded into its variant by the router.
    Extension(String),
}

impl Method {
    /// The canonical set, in the order advertised by
    /// `Access-Control-Allow-Methods`.
    pub const CANONICAL: [Method; 10] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Delete,
        Method::Patch,
        Method::Options,
        Method::Head,
        Method::Trace,
        Method::Connect,
        Method::Pri,
    ];

    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get          => "GET",
            Self::Post         => "POST",
            Self::Put          => "PUT",
            Self::Delete       => "DELETE",
            Self::Patch        => "PATCH",
            Self::Options      => "OPTIONS",
            Self::Head         => "HEAD",
            Self::Trace        => "TRACE",
            Self::Connect      => "CONNECT",
            Self::Pri          => "PRI",
            Self::Extension(s) => s,
        }
    }

    /// Maps `Extension` values that spell a canonical token onto the
    /// matching variant, so `Extension("GET")` and `Get` key the same routes.
    pub fn canonical(self) -> Self {
        match self {
            Self::Extension(token) => token.parse().unwrap_or(Self::Extension(token)),
            other => other,
        }
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

impl FromStr for Method {
    type Err = MethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET"     => Ok(Self::Get),
            "POST"    => Ok(Self::Post),
            "PUT"     => Ok(Self::Put),
            "DELETE"  => Ok(Self::Delete),
            "PATCH"   => Ok(Self::Patch),
            "OPTIONS" => Ok(Self::Options),
            "HEAD"    => Ok(Self::Head),
            "TRACE"   => Ok(Self::Trace),
            "CONNECT" => Ok(Self::Connect),
            "PRI"     => Ok(Self::Pri),
            other if is_token(other) => Ok(Self::Extension(other.to_owned())),
            other => Err(MethodError(other.to_owned())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Method {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_methods_round_trip_through_their_tokens() {
        for method in Method::CANONICAL {
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn unknown_uppercase_tokens_are_extensions() {
        assert_eq!(
            "PROPFIND".parse::<Method>().unwrap(),
            Method::Extension("PROPFIND".to_owned())
        );
    }

    #[test]
    fn canonical_folds_extensions_spelling_known_methods() {
        assert_eq!(Method::Extension("GET".to_owned()).canonical(), Method::Get);
        assert_eq!(Method::Extension("PRI".to_owned()).canonical(), Method::Pri);
        assert_eq!(
            Method::Extension("PURGE".to_owned()).canonical(),
            Method::Extension("PURGE".to_owned())
        );
        assert_eq!(
            Method::Extension("bad token".to_owned()).canonical(),
            Method::Extension("bad token".to_owned())
        );
    }

    #[test]
    fn lowercase_and_empty_tokens_are_rejected() {
        assert!("get".parse::<Method>().is_err());
        assert!("".parse::<Method>().is_err());
        assert!("GE T".parse::<Method>().is_err());
    }
}
