use axum::Json;
use axum::response::{IntoResponse, Response};
use capsule_core::Reply;

/// Bridge from a transport-free [`Reply`] to an axum response
pub struct ApiReply(pub Reply);

impl From<Reply> for ApiReply {
    fn from(reply: Reply) -> Self {
        Self(reply)
    }
}

impl IntoResponse for ApiReply {
    fn into_response(self) -> Response {
        let Reply { envelope, status } = self.0;
        (status, Json(envelope)).into_response()
    }
}
