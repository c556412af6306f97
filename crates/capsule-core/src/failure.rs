use http::StatusCode;
use indexmap::IndexMap;
use thiserror::Error;

/// A request-handling failure
///
/// Closed set: every failure a handler can raise lands in exactly one of
/// these categories, and [`classify`](crate::classify) maps each to a fixed
/// status code and envelope shape. The variants are matched in declaration
/// order, first match wins; anything unrecognized must be constructed as
/// [`Failure::Internal`] so classification stays total.
#[derive(Debug, Error)]
pub enum Failure {
    /// Input failed request validation; carries field name to messages
    #[error("validation failed")]
    Validation { errors: IndexMap<String, Vec<String>> },

    /// Caller is authenticated but forbidden from the action
    #[error("forbidden: {detail}")]
    Authorization {
        detail: String,
        /// Overrides the default "Unauthorized" envelope message
        message: Option<String>,
    },

    /// Caller is not authenticated, or the token is missing or invalid
    #[error("unauthenticated: {detail}")]
    Authentication {
        detail: String,
        /// Overrides the default "Authentication required" envelope message
        message: Option<String>,
    },

    /// An entity identifier did not resolve; carries the entity type name
    #[error("{entity} not found")]
    NotFound { entity: String },

    /// No handler matches the request path
    #[error("route not found")]
    RouteNotFound,

    /// The path matches but the HTTP verb does not
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Caller exceeded a request quota
    #[error("too many requests")]
    RateLimited,

    /// A failure that already carries its own status code and message
    #[error("{message}")]
    Http { status: StatusCode, message: String },

    /// Catch-all for anything the other variants don't cover
    #[error("internal fault: {description}")]
    Internal {
        description: String,
        /// Source location where the failure was raised
        location: Option<String>,
        /// Debug-formatted error chain, when available
        trace: Option<String>,
    },
}

impl Failure {
    /// Validation failure from a field-to-messages map
    pub fn validation(errors: IndexMap<String, Vec<String>>) -> Self {
        Self::Validation { errors }
    }

    /// Authorization failure with the default envelope message
    pub fn authorization(detail: impl Into<String>) -> Self {
        Self::Authorization {
            detail: detail.into(),
            message: None,
        }
    }

    /// Authentication failure with the default envelope message
    pub fn authentication(detail: impl Into<String>) -> Self {
        Self::Authentication {
            detail: detail.into(),
            message: None,
        }
    }

    /// Lookup failure for the named entity type
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound { entity: entity.into() }
    }

    /// Passthrough failure with an explicit status and message
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Internal fault recording the caller's source location
    #[track_caller]
    pub fn internal(description: impl Into<String>) -> Self {
        let caller = std::panic::Location::caller();
        Self::Internal {
            description: description.into(),
            location: Some(format!("{}:{}", caller.file(), caller.line())),
            trace: None,
        }
    }

    /// Category name, stable across message changes (used for logging)
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Authorization { .. } => "authorization",
            Self::Authentication { .. } => "authentication",
            Self::NotFound { .. } => "not_found",
            Self::RouteNotFound => "route_not_found",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::RateLimited => "rate_limited",
            Self::Http { .. } => "http",
            Self::Internal { .. } => "internal",
        }
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            description: err.to_string(),
            location: None,
            trace: Some(format!("{err:?}")),
        }
    }
}
