use axum::Extension;
use axum::extract::State;
use capsule_core::{Failure, Outcome, execute};
use serde_json::json;

use crate::reply::ApiReply;
use crate::state::{AppState, CurrentUser};

/// Return the authenticated caller's profile
pub async fn index(State(state): State<AppState>, Extension(user): Extension<CurrentUser>) -> ApiReply {
    let verbosity = state.verbosity;

    execute(
        async move {
            let user = state.store.user(user.id)?;
            let value = serde_json::to_value(&user)
                .map_err(|e| Failure::internal(format!("user serialization failed: {e}")))?;
            Ok(Outcome::Value(json!({"user": value})))
        },
        "Profile fetched successfully",
        verbosity,
    )
    .await
    .into()
}
