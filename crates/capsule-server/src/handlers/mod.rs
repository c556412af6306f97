pub mod auth;
pub mod posts;
pub mod profile;

use capsule_core::Envelope;
use serde_json::Value;

use crate::reply::ApiReply;

/// Liveness probe for the API prefix
pub async fn root() -> ApiReply {
    Envelope::success(Value::Null, "API is up and running").into()
}

/// Pull a validated string field out of a validation result
///
/// Only call for fields the rule set guarantees to be strings.
pub(crate) fn str_field(validated: &serde_json::Map<String, Value>, name: &str) -> String {
    validated.get(name).and_then(Value::as_str).unwrap_or_default().to_owned()
}

/// Parse a request body leniently
///
/// Anything that is not JSON comes back as `null`, which validation
/// treats as an empty body. A malformed payload reports missing fields
/// instead of escaping the envelope as a transport-level rejection.
pub(crate) fn parse_body(bytes: &axum::body::Bytes) -> Value {
    serde_json::from_slice(bytes).unwrap_or(Value::Null)
}
