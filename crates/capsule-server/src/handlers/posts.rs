use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Extension;
use capsule_core::{Envelope, ErrorDetails, Failure, Outcome, execute};
use http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::handlers::{parse_body, str_field};
use crate::reply::ApiReply;
use crate::state::{AppState, CurrentUser};
use crate::store::Post;
use crate::validation::{Rule, Rules};

const PER_PAGE: u64 = 10;

fn post_rules() -> Rules {
    Rules::new()
        .field("title", &[Rule::Required, Rule::Str, Rule::MaxLen(255)])
        .field("content", &[Rule::Required, Rule::Str])
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    page: u64,
}

const fn default_page() -> u64 {
    1
}

/// List the caller's posts, paginated
pub async fn index(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> ApiReply {
    let verbosity = state.verbosity;

    execute(
        async move {
            let (posts, meta) = state.store.posts_for(user.id, query.page, PER_PAGE);
            let items = posts.into_iter().map(to_json).collect::<Result<Vec<_>, _>>()?;
            Ok(Outcome::Reply(Envelope::paginated(
                items,
                meta,
                "Posts fetched successfully",
            )))
        },
        "Posts fetched successfully",
        verbosity,
    )
    .await
    .into()
}

/// Create a post owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    body: Bytes,
) -> ApiReply {
    let verbosity = state.verbosity;
    let body = parse_body(&body);

    execute(
        async move {
            let input = post_rules().check(&body)?;
            let post = state
                .store
                .create_post(user.id, str_field(&input, "title"), str_field(&input, "content"));
            Ok(Outcome::Value(to_json(post)?))
        },
        "Post created successfully",
        verbosity,
    )
    .await
    .into()
}

/// Update one of the caller's posts
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiReply {
    let verbosity = state.verbosity;
    let body = parse_body(&body);

    execute(
        async move {
            let id = parse_post_id(&id)?;
            let post = state.store.post(id)?;
            if post.user_id != user.id {
                return Ok(Outcome::Reply(not_the_owner()));
            }

            let input = post_rules().check(&body)?;
            let updated = state
                .store
                .update_post(id, str_field(&input, "title"), str_field(&input, "content"))?;
            Ok(Outcome::Value(to_json(updated)?))
        },
        "Post updated successfully",
        verbosity,
    )
    .await
    .into()
}

/// Delete one of the caller's posts
pub async fn destroy(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiReply {
    let verbosity = state.verbosity;

    execute(
        async move {
            let id = parse_post_id(&id)?;
            let post = state.store.post(id)?;
            if post.user_id != user.id {
                return Ok(Outcome::Reply(not_the_owner()));
            }

            state.store.delete_post(id)?;
            Ok(Outcome::Value(Value::Null))
        },
        "Post deleted successfully",
        verbosity,
    )
    .await
    .into()
}

/// An unparseable id can't resolve to a post, so it reads as a lookup miss
fn parse_post_id(raw: &str) -> Result<Uuid, Failure> {
    Uuid::parse_str(raw).map_err(|_| Failure::not_found("post"))
}

/// Direct 403 reply; logged here because it never reaches the classifier
fn not_the_owner() -> capsule_core::Reply {
    tracing::warn!("post ownership check rejected the caller");
    let mut errors = ErrorDetails::new();
    errors.insert(
        "invalid_owner".to_owned(),
        Value::from("You are not the owner of this post"),
    );
    Envelope::error("Unauthorized", StatusCode::FORBIDDEN, Some(errors))
}

fn to_json(post: Post) -> Result<Value, Failure> {
    serde_json::to_value(post).map_err(|e| Failure::internal(format!("post serialization failed: {e}")))
}
