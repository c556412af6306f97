use axum::body::Bytes;
use axum::extract::State;
use capsule_core::{Envelope, Failure, Outcome, execute};
use http::StatusCode;
use indexmap::IndexMap;
use serde_json::json;

use crate::handlers::{parse_body, str_field};
use crate::password;
use crate::reply::ApiReply;
use crate::state::AppState;
use crate::validation::{Rule, Rules};

fn register_rules() -> Rules {
    Rules::new()
        .field("name", &[Rule::Required, Rule::Str, Rule::MaxLen(255)])
        .field("email", &[Rule::Required, Rule::Email])
        .field("password", &[Rule::Required, Rule::Str, Rule::MinLen(8)])
}

fn login_rules() -> Rules {
    Rules::new()
        .field("email", &[Rule::Required, Rule::Email])
        .field("password", &[Rule::Required, Rule::Str])
}

/// Register a new account and hand back the user with an access token
pub async fn register(State(state): State<AppState>, body: Bytes) -> ApiReply {
    let verbosity = state.verbosity;
    let body = parse_body(&body);

    execute(
        async move {
            let input = register_rules().check(&body)?;
            let email = str_field(&input, "email");

            let password_hash = password::hash(&str_field(&input, "password"))?;
            let Some(user) = state.store.create_user(str_field(&input, "name"), email, password_hash) else {
                let mut errors = IndexMap::new();
                errors.insert("email".to_owned(), vec!["The email has already been taken.".to_owned()]);
                return Err(Failure::validation(errors));
            };

            let token = state.tokens.issue(user.id)?;
            Ok(Outcome::Value(json!({"user": user, "token": token})))
        },
        "User registered successfully",
        verbosity,
    )
    .await
    .into()
}

/// Exchange credentials for an access token
///
/// The token is returned as the plain `data` payload; bad credentials
/// answer with an explicit 401 error reply rather than a classified
/// authentication failure, matching the distinction between "you are not
/// logged in" and "this login attempt failed".
pub async fn login(State(state): State<AppState>, body: Bytes) -> ApiReply {
    let verbosity = state.verbosity;
    let body = parse_body(&body);

    execute(
        async move {
            let input = login_rules().check(&body)?;

            let user = state.store.user_by_email(&str_field(&input, "email"));
            let Some(user) = user.filter(|user| password::verify(&str_field(&input, "password"), &user.password_hash))
            else {
                return Ok(Outcome::Reply(Envelope::error(
                    "Invalid credentials",
                    StatusCode::UNAUTHORIZED,
                    None,
                )));
            };

            let token = state.tokens.issue(user.id)?;
            Ok(Outcome::Value(json!(token)))
        },
        "Login successful",
        verbosity,
    )
    .await
    .into()
}
