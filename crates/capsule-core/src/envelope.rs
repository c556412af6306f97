use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Detail map attached to error envelopes
///
/// Always a JSON object on the wire. Error envelopes carry `{}` rather
/// than `null` when no detail applies, so consumers can iterate it safely.
pub type ErrorDetails = serde_json::Map<String, Value>;

/// The canonical response shape wrapping all API output
///
/// All four keys are always present. `errors` is `null` exactly when the
/// response is a success; `data` is `null` exactly when it is an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
    pub data: Value,
    pub errors: Option<ErrorDetails>,
}

/// A finished response: envelope plus the status code it ships with
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub envelope: Envelope,
    pub status: StatusCode,
}

/// Pagination metadata nested under `data.meta`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u64,
    pub last_page: u64,
    pub per_page: u64,
    pub total: u64,
}

impl Envelope {
    /// Build a success envelope with status 200
    ///
    /// Accepts any JSON value as payload, including `null`.
    pub fn success(data: Value, message: impl Into<String>) -> Reply {
        Self::success_with_status(data, message, StatusCode::OK)
    }

    /// Build a success envelope with an explicit 2xx status
    pub fn success_with_status(data: Value, message: impl Into<String>, status: StatusCode) -> Reply {
        Reply {
            envelope: Self {
                success: true,
                message: message.into(),
                data,
                errors: None,
            },
            status,
        }
    }

    /// Build an error envelope
    ///
    /// `errors` defaults to an empty map when `None` is given, never to
    /// `null`.
    pub fn error(message: impl Into<String>, status: StatusCode, errors: Option<ErrorDetails>) -> Reply {
        Reply {
            envelope: Self {
                success: false,
                message: message.into(),
                data: Value::Null,
                errors: Some(errors.unwrap_or_default()),
            },
            status,
        }
    }

    /// Wrap a page of items with pagination metadata
    ///
    /// The payload becomes `{ items: [...], meta: { current_page,
    /// last_page, per_page, total } }` under `data`.
    pub fn paginated(items: Vec<Value>, meta: PageMeta, message: impl Into<String>) -> Reply {
        let data = serde_json::json!({
            "items": items,
            "meta": meta,
        });
        Self::success(data, message)
    }
}
