//! Canonical API envelopes and failure classification
//!
//! Every response leaving a capsule service is one JSON shape:
//! `{ success, message, data, errors }`. This crate builds that shape for
//! success, error, and paginated payloads, classifies runtime failures into
//! a closed set of categories with fixed status codes, and decides how much
//! internal detail an error response may disclose.
//!
//! The crate is transport-free: it speaks `http::StatusCode` and
//! `serde_json::Value`, never axum. The server layer converts a [`Reply`]
//! into an actual HTTP response.

#![allow(clippy::must_use_candidate)]

mod classify;
mod envelope;
mod execute;
mod failure;
mod verbosity;

pub use classify::classify;
pub use envelope::{Envelope, ErrorDetails, PageMeta, Reply};
pub use execute::{Outcome, execute};
pub use failure::Failure;
pub use verbosity::Verbosity;
