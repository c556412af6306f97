use http::StatusCode;
use serde_json::Value;

use crate::envelope::{Envelope, ErrorDetails, Reply};
use crate::failure::Failure;
use crate::verbosity::Verbosity;

/// Fixed message shown for internal faults when detail is withheld
const INTERNAL_FAULT_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Map a failure to its response envelope and status code
///
/// Total: every failure matches exactly one arm, with [`Failure::Internal`]
/// as the catch-all. Verbosity only affects the internal-fault arm; every
/// other category discloses the same detail in every deployment mode.
///
/// The failure is logged (category, description, source location) before
/// the envelope is produced, regardless of what is disclosed to the caller.
pub fn classify(failure: Failure, verbosity: Verbosity) -> Reply {
    log_failure(&failure);

    match failure {
        Failure::Validation { errors } => {
            let details: ErrorDetails = errors
                .into_iter()
                .map(|(field, messages)| (field, Value::from(messages)))
                .collect();
            Envelope::error("Validation failed", StatusCode::UNPROCESSABLE_ENTITY, Some(details))
        }
        Failure::Authorization { detail, message } => Envelope::error(
            message.unwrap_or_else(|| "Unauthorized".to_owned()),
            StatusCode::FORBIDDEN,
            Some(detail_map("authorization", detail)),
        ),
        Failure::Authentication { detail, message } => Envelope::error(
            message.unwrap_or_else(|| "Authentication required".to_owned()),
            StatusCode::UNAUTHORIZED,
            Some(detail_map("authorization", detail)),
        ),
        Failure::NotFound { entity } => Envelope::error(
            format!("{} with given id not found", entity.to_lowercase()),
            StatusCode::NOT_FOUND,
            Some(detail_map("error", "DATA_NOT_FOUND")),
        ),
        Failure::RouteNotFound => Envelope::error(
            "Route not found",
            StatusCode::NOT_FOUND,
            Some(detail_map("error", "ROUTE_NOT_FOUND")),
        ),
        Failure::MethodNotAllowed => Envelope::error(
            "Method not allowed",
            StatusCode::METHOD_NOT_ALLOWED,
            Some(detail_map("method", "Invalid HTTP method")),
        ),
        Failure::RateLimited => Envelope::error(
            "Too many requests",
            StatusCode::TOO_MANY_REQUESTS,
            Some(detail_map("throttle", "Account locked for some time")),
        ),
        Failure::Http { status, message } => Envelope::error(message, status, None),
        Failure::Internal {
            description,
            location,
            trace,
        } => {
            if verbosity.is_verbose() {
                let mut details = detail_map("error", description.clone());
                if let Some(location) = location {
                    details.insert("location".to_owned(), Value::from(location));
                }
                if let Some(trace) = trace {
                    details.insert("trace".to_owned(), Value::from(trace));
                }
                Envelope::error(description, StatusCode::INTERNAL_SERVER_ERROR, Some(details))
            } else {
                Envelope::error(INTERNAL_FAULT_MESSAGE, StatusCode::INTERNAL_SERVER_ERROR, None)
            }
        }
    }
}

fn detail_map(key: &str, value: impl Into<String>) -> ErrorDetails {
    let mut map = ErrorDetails::new();
    map.insert(key.to_owned(), Value::from(value.into()));
    map
}

fn log_failure(failure: &Failure) {
    if let Failure::Internal {
        description, location, ..
    } = failure
    {
        tracing::error!(
            kind = failure.kind(),
            %description,
            location = location.as_deref().unwrap_or("unknown"),
            "request failed"
        );
    } else {
        tracing::error!(kind = failure.kind(), error = %failure, "request failed");
    }
}
