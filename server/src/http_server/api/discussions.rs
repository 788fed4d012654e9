use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use db::discussions::{Comment, Discussion};
use forms::{NewComment, NewDiscussion};
use serde_json::json;
use uuid::Uuid;

use super::ensure_author;
use crate::{
    http_server::{
        errors::{ServerError, WithStatus as _},
        ResponseResult,
    },
    AppState,
};

const NOT_FOUND: &str = "Discussion not found";

pub(crate) async fn list(State(state): State<AppState>) -> ResponseResult<impl IntoResponse> {
    Ok(Json(Discussion::list_full(&state.db).await?))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    Json(discussion): Json<NewDiscussion>,
) -> ResponseResult<impl IntoResponse> {
    discussion.validate().with_status(StatusCode::BAD_REQUEST)?;
    ensure_author(&state, discussion.author_id).await?;

    let created = Discussion::create(&state.db, discussion).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ResponseResult<impl IntoResponse> {
    let discussion = Discussion::get_full(&state.db, id)
        .await?
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;

    Ok(Json(discussion))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(discussion): Json<NewDiscussion>,
) -> ResponseResult<impl IntoResponse> {
    discussion.validate().with_status(StatusCode::BAD_REQUEST)?;

    let updated = Discussion::update(&state.db, id, discussion)
        .await?
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;

    Ok(Json(updated))
}

pub(crate) async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ResponseResult<impl IntoResponse> {
    if !Discussion::delete(&state.db, id).await? {
        return Err(ServerError::not_found(NOT_FOUND));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn like(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ResponseResult<impl IntoResponse> {
    let likes = Discussion::like(&state.db, id)
        .await?
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;

    Ok(Json(json!({ "id": id, "likes": likes })))
}

pub(crate) async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(comment): Json<NewComment>,
) -> ResponseResult<impl IntoResponse> {
    if comment.content.trim().is_empty() {
        return Err(ServerError::bad_request("Comment cannot be empty"));
    }
    ensure_author(&state, Some(comment.author_id)).await?;

    let created = Comment::create(&state.db, id, comment)
        .await?
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;

    Ok((StatusCode::CREATED, Json(created)))
}
