use axum::extract::State;
use capsule_core::{Failure, classify};

use crate::reply::ApiReply;
use crate::state::AppState;

/// No handler matches the request path
pub async fn route_not_found(State(state): State<AppState>) -> ApiReply {
    classify(Failure::RouteNotFound, state.verbosity).into()
}

/// The path matches but the HTTP verb does not
pub async fn method_not_allowed(State(state): State<AppState>) -> ApiReply {
    classify(Failure::MethodNotAllowed, state.verbosity).into()
}
