use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use murmur_core::{MessageRules, NewMessage};
use murmur_types::Message;
use murmur_types::api::{CreateMessageRequest, UpdateMessageRequest};

use crate::auth::AppState;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::run_blocking;

pub async fn create_message(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateMessageRequest>,
) -> ApiResult<Json<Message>> {
    let message = run_blocking(&state, move |s| {
        MessageRules::new(&s.db).create(NewMessage {
            posted_by: req.posted_by,
            message_text: req.message_text,
            time_posted_epoch: req.time_posted_epoch,
        })
    })
    .await?;

    Ok(Json(message))
}

pub async fn get_all_messages(State(state): State<AppState>) -> ApiResult<Json<Vec<Message>>> {
    let messages = run_blocking(&state, |s| MessageRules::new(&s.db).get_all()).await?;
    Ok(Json(messages))
}

/// A missing message is a 200 with an empty body.
pub async fn get_message(
    State(state): State<AppState>,
    ApiPath(message_id): ApiPath<i64>,
) -> ApiResult<Response> {
    let message = run_blocking(&state, move |s| MessageRules::new(&s.db).get_by_id(message_id)).await?;

    Ok(match message {
        Some(m) => Json(m).into_response(),
        None => StatusCode::OK.into_response(),
    })
}

/// Responds `1` when a row was deleted, an empty 200 otherwise.
pub async fn delete_message(
    State(state): State<AppState>,
    ApiPath(message_id): ApiPath<i64>,
) -> ApiResult<Response> {
    let deleted =
        run_blocking(&state, move |s| MessageRules::new(&s.db).delete_by_id(message_id)).await?;

    Ok(if deleted {
        Json(1).into_response()
    } else {
        StatusCode::OK.into_response()
    })
}

/// Responds `1` on success. A missing message is 404, kept apart from the
/// 400 used for bad text.
pub async fn update_message(
    State(state): State<AppState>,
    ApiPath(message_id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateMessageRequest>,
) -> ApiResult<Response> {
    let updated = run_blocking(&state, move |s| {
        MessageRules::new(&s.db).update(message_id, req.message_text)
    })
    .await?;

    Ok(match updated {
        Some(_) => Json(1).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    })
}

pub async fn get_messages_by_account(
    State(state): State<AppState>,
    ApiPath(account_id): ApiPath<i64>,
) -> ApiResult<Json<Vec<Message>>> {
    let messages =
        run_blocking(&state, move |s| MessageRules::new(&s.db).get_by_author(account_id)).await?;
    Ok(Json(messages))
}
