use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use capsule_core::{Failure, classify};

use crate::reply::ApiReply;
use crate::state::{AppState, CurrentUser};

/// Require a valid Bearer token on protected routes
///
/// A verified token inserts [`CurrentUser`] into request extensions for
/// handlers to extract. A missing or rejected token is classified as an
/// authentication failure and answered with the 401 envelope.
pub async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let failure = match token {
        None => Failure::authentication("Authentication token is missing"),
        Some(raw) => match state.tokens.verify(raw) {
            Ok(user_id) => {
                request.extensions_mut().insert(CurrentUser { id: user_id });
                return next.run(request).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "token rejected");
                Failure::authentication("Invalid or expired token")
            }
        },
    };

    ApiReply::from(classify(failure, state.verbosity)).into_response()
}
