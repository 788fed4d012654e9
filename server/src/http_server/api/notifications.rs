use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use db::notifications::Notification;
use uuid::Uuid;

use crate::{
    http_server::{errors::ServerError, ResponseResult},
    AppState,
};

const NOT_FOUND: &str = "Notification not found";

pub(crate) async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ResponseResult<impl IntoResponse> {
    Ok(Json(Notification::list_for_user(&state.db, user_id).await?))
}

pub(crate) async fn mark_as_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ResponseResult<impl IntoResponse> {
    let notification = Notification::mark_as_read(&state.db, id)
        .await?
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;

    Ok(Json(notification))
}

pub(crate) async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ResponseResult<impl IntoResponse> {
    if !Notification::delete(&state.db, id).await? {
        return Err(ServerError::not_found(NOT_FOUND));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod test {
    use axum::http::{Method, StatusCode};
    use db::{authors::Author, notifications::Notification, PgPool};
    use serde_json::Value;

    use crate::http_server::test_helpers::{create_test_app, json_request, response_body_json};

    #[sqlx::test(migrations = "../db/migrations")]
    async fn read_then_delete(pool: PgPool) -> color_eyre::Result<()> {
        let author = Author::find_or_create_by_username(&pool, "chef_sophia").await?;
        let notification =
            Notification::create(&pool, author.author_id, "Someone liked your pizza").await?;
        let app = create_test_app(pool);

        let response = json_request(
            &app,
            Method::PUT,
            &format!("/notifications/{}/markAsRead", notification.notification_id),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let read: Value = response_body_json(response).await;
        assert_eq!(read["read"], true);

        let path = format!("/notifications/{}", notification.notification_id);
        let response = json_request(&app, Method::DELETE, &path, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let response = json_request(&app, Method::DELETE, &path, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = json_request(
            &app,
            Method::GET,
            &format!("/notifications/{}", author.author_id),
            None,
        )
        .await;
        let remaining: Vec<Value> = response_body_json(response).await;
        assert!(remaining.is_empty());

        Ok(())
    }
}
