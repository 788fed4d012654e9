use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use db::learning_plans::{LearningPlan, LearningStep};
use forms::NewLearningPlan;
use serde::Deserialize;
use uuid::Uuid;

use super::ensure_author;
use crate::{
    http_server::{
        errors::{ServerError, WithStatus as _},
        ResponseResult,
    },
    AppState,
};

const NOT_FOUND: &str = "Learning plan not found";

pub(crate) async fn list(State(state): State<AppState>) -> ResponseResult<impl IntoResponse> {
    Ok(Json(LearningPlan::list_full(&state.db).await?))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    Json(plan): Json<NewLearningPlan>,
) -> ResponseResult<impl IntoResponse> {
    plan.validate().with_status(StatusCode::BAD_REQUEST)?;
    ensure_author(&state, plan.author_id).await?;

    let created = LearningPlan::create(&state.db, plan).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ResponseResult<impl IntoResponse> {
    let plan = LearningPlan::get_full(&state.db, id)
        .await?
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;

    Ok(Json(plan))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(plan): Json<NewLearningPlan>,
) -> ResponseResult<impl IntoResponse> {
    plan.validate().with_status(StatusCode::BAD_REQUEST)?;

    let updated = LearningPlan::update(&state.db, id, plan)
        .await?
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;

    Ok(Json(updated))
}

pub(crate) async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ResponseResult<impl IntoResponse> {
    if !LearningPlan::delete(&state.db, id).await? {
        return Err(ServerError::not_found(NOT_FOUND));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub(crate) struct StepProgress {
    completed: bool,
}

pub(crate) async fn set_step_completed(
    State(state): State<AppState>,
    Path((id, step_id)): Path<(Uuid, Uuid)>,
    Json(progress): Json<StepProgress>,
) -> ResponseResult<impl IntoResponse> {
    let step = LearningStep::set_completed(&state.db, id, step_id, progress.completed)
        .await?
        .ok_or_else(|| ServerError::not_found("Learning step not found"))?;

    Ok(Json(step))
}

#[cfg(test)]
mod test {
    use axum::http::{Method, StatusCode};
    use db::{authors::Author, PgPool};
    use serde_json::{json, Value};

    use crate::http_server::test_helpers::{create_test_app, json_request, response_body_json};

    #[sqlx::test(migrations = "../db/migrations")]
    async fn plan_lifecycle(pool: PgPool) -> color_eyre::Result<()> {
        let author = Author::find_or_create_by_username(&pool, "baking_master").await?;
        let app = create_test_app(pool);

        let body = json!({
            "title": "Bread basics",
            "description": "From flour to loaf",
            "authorId": author.author_id,
            "difficulty": "Beginner",
            "steps": [
                {
                    "title": "Week 1",
                    "description": "Yeast",
                    "resources": [
                        { "title": "Intro", "type": "Video", "url": "https://example.com/intro" }
                    ]
                },
                { "title": "Week 2", "description": "Shaping" }
            ]
        });
        let response = json_request(&app, Method::POST, "/api/learning-plans", Some(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let created: Value = response_body_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["steps"][1]["order"], 2);
        assert_eq!(created["steps"][0]["resources"][0]["type"], "Video");
        assert!(created["createdAt"].is_string());

        let step_id = created["steps"][0]["id"].as_str().unwrap().to_string();
        let response = json_request(
            &app,
            Method::PATCH,
            &format!("/api/learning-plans/{id}/steps/{step_id}"),
            Some(json!({ "completed": true })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let step: Value = response_body_json(response).await;
        assert_eq!(step["completed"], true);

        let response = json_request(
            &app,
            Method::PATCH,
            &format!("/api/learning-plans/{id}/steps/{}", uuid::Uuid::new_v4()),
            Some(json!({ "completed": true })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = json_request(
            &app,
            Method::DELETE,
            &format!("/api/learning-plans/{id}"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response =
            json_request(&app, Method::GET, &format!("/api/learning-plans/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        Ok(())
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn title_is_required(pool: PgPool) -> color_eyre::Result<()> {
        let author = Author::find_or_create_by_username(&pool, "baking_master").await?;
        let app = create_test_app(pool);

        let response = json_request(
            &app,
            Method::POST,
            "/api/learning-plans",
            Some(json!({ "title": " ", "authorId": author.author_id })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        Ok(())
    }
}
