use std::future::Future;

use serde_json::Value;

use crate::classify::classify;
use crate::envelope::{Envelope, Reply};
use crate::failure::Failure;
use crate::verbosity::Verbosity;

/// What a wrapped handler hands back on the success path
///
/// [`Outcome::Reply`] is the structural opt-out marker: a handler that
/// needs a non-default status code or a custom envelope builds the reply
/// itself and it passes through [`execute`] unchanged. Plain values are
/// wrapped in the standard success envelope.
#[derive(Debug)]
pub enum Outcome {
    /// A finished reply, passed through as-is
    Reply(Reply),
    /// A plain payload to wrap in a success envelope
    Value(Value),
}

impl From<Reply> for Outcome {
    fn from(reply: Reply) -> Self {
        Self::Reply(reply)
    }
}

impl From<Value> for Outcome {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Run a unit of request-handling logic and produce a reply, always
///
/// On normal return a plain value is wrapped via
/// [`Envelope::success`] with `fallback_message`; an already-finished
/// reply passes through untouched. A raised failure is terminal for the
/// request: it is classified, never retried. A `null` payload stays
/// `data: null` in the envelope.
pub async fn execute<F>(logic: F, fallback_message: &str, verbosity: Verbosity) -> Reply
where
    F: Future<Output = Result<Outcome, Failure>>,
{
    match logic.await {
        Ok(Outcome::Reply(reply)) => reply,
        Ok(Outcome::Value(value)) => Envelope::success(value, fallback_message),
        Err(failure) => classify(failure, verbosity),
    }
}
