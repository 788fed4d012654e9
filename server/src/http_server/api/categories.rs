use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use db::categories::Category;
use forms::NewCategory;
use uuid::Uuid;

use crate::{
    http_server::{errors::ServerError, ResponseResult},
    AppState,
};

const NOT_FOUND: &str = "Category not found";
const TAKEN: &str = "Category already exists";

pub(crate) async fn create(
    State(state): State<AppState>,
    Json(category): Json<NewCategory>,
) -> ResponseResult<impl IntoResponse> {
    if category.name.trim().is_empty() {
        return Err(ServerError::bad_request("Name is required"));
    }

    let created = Category::create(&state.db, category)
        .await?
        .ok_or_else(|| ServerError::new(StatusCode::CONFLICT, TAKEN))?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(category): Json<NewCategory>,
) -> ResponseResult<impl IntoResponse> {
    if category.name.trim().is_empty() {
        return Err(ServerError::bad_request("Name is required"));
    }
    if Category::name_taken(&state.db, &category.name, Some(id)).await? {
        return Err(ServerError::new(StatusCode::CONFLICT, TAKEN));
    }

    let updated = Category::update(&state.db, id, category)
        .await?
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;

    Ok(Json(updated))
}

pub(crate) async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ResponseResult<impl IntoResponse> {
    if !Category::delete(&state.db, id).await? {
        return Err(ServerError::not_found(NOT_FOUND));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod test {
    use axum::http::{Method, StatusCode};
    use db::PgPool;
    use serde_json::{json, Value};

    use crate::http_server::test_helpers::{create_test_app, json_request, response_body_json};

    #[sqlx::test(migrations = "../db/migrations")]
    async fn names_are_unique(pool: PgPool) {
        let app = create_test_app(pool);

        let response = json_request(
            &app,
            Method::POST,
            "/categories",
            Some(json!({ "name": "Breakfast" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let breakfast: Value = response_body_json(response).await;

        let response = json_request(
            &app,
            Method::POST,
            "/categories",
            Some(json!({ "name": "Breakfast" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = json_request(
            &app,
            Method::POST,
            "/categories",
            Some(json!({ "name": "Brunch" })),
        )
        .await;
        let brunch: Value = response_body_json(response).await;

        let response = json_request(
            &app,
            Method::PUT,
            &format!("/categories/{}", brunch["id"].as_str().unwrap()),
            Some(json!({ "name": "Breakfast" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        // Keeping your own name is not a conflict.
        let response = json_request(
            &app,
            Method::PUT,
            &format!("/categories/{}", breakfast["id"].as_str().unwrap()),
            Some(json!({ "name": "Breakfast", "description": "Mornings" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated: Value = response_body_json(response).await;
        assert_eq!(updated["description"], "Mornings");
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn missing_categories(pool: PgPool) {
        let app = create_test_app(pool);
        let id = uuid::Uuid::new_v4();

        let response = json_request(
            &app,
            Method::PUT,
            &format!("/categories/{id}"),
            Some(json!({ "name": "Ghost" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = json_request(&app, Method::DELETE, &format!("/categories/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = json_request(&app, Method::POST, "/categories", Some(json!({}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
