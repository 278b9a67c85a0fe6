//! Error types.
//!
//! Request-level failures (403, 404, 500) are never `Error`s: the dispatcher
//! turns them into [`Response`](crate::Response) values. The types here cover
//! what can go wrong before the first request is served: a malformed route
//! template, a bad configuration file, or a socket that will not bind.

use std::path::PathBuf;

use thiserror::Error;

/// The error type returned by portico's fallible startup operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Route table or configuration rejected at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid route `{template}`: {source}")]
    Pattern {
        template: String,
        #[source]
        source: PatternError,
    },

    #[error("invalid group prefix `{prefix}`: {source}")]
    Prefix {
        prefix: String,
        #[source]
        source: PatternError,
    },

    #[error("invalid base uri `{0}`: must be empty or start with `/`")]
    BaseUri(String),

    #[error(transparent)]
    Method(#[from] MethodError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A path template that cannot be compiled.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum PatternError {
    #[error("placeholder opened at byte {0} is never closed")]
    Unclosed(usize),

    #[error("unmatched `}}` at byte {0}")]
    Unmatched(usize),

    #[error("empty placeholder at byte {0}")]
    EmptyName(usize),

    #[error("placeholder `{{{name}}}` must match [A-Za-z0-9_]+")]
    InvalidName { name: String },

    #[error("character {0:?} is not allowed in a route path")]
    InvalidChar(char),

    #[error("compiled route exceeds the matcher size limit: {0}")]
    TooLarge(String),
}

/// A method token that is not an uppercase HTTP token.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("invalid http method `{0}`")]
pub struct MethodError(pub String);
