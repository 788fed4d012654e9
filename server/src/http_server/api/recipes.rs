use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use db::recipes::Recipe;
use forms::NewRecipe;
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

const NOT_FOUND: &str = "Recipe not found";

pub(crate) async fn list(State(state): State<AppState>) -> ResponseResult<impl IntoResponse> {
    let recipes = Recipe::list_full(&state.db).await?;

    Ok(Json(recipes))
}

#[axum_macros::debug_handler(state = AppState)]
pub(crate) async fn create(
    State(state): State<AppState>,
    Json(recipe): Json<NewRecipe>,
) -> ResponseResult<impl IntoResponse> {
    recipe.validate().with_status(StatusCode::BAD_REQUEST)?;
    ensure_author(&state, recipe.author_id).await?;

    let created = Recipe::create(&state.db, recipe).await?;
    tracing::info!(recipe_id = %created.recipe.recipe_id, "Recipe created");

    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ResponseResult<impl IntoResponse> {
    let recipe = Recipe::get_full(&state.db, id)
        .await?
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;

    Ok(Json(recipe))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(recipe): Json<NewRecipe>,
) -> ResponseResult<impl IntoResponse> {
    recipe.validate().with_status(StatusCode::BAD_REQUEST)?;

    let updated = Recipe::update(&state.db, id, recipe)
        .await?
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;

    Ok(Json(updated))
}

pub(crate) async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ResponseResult<impl IntoResponse> {
    if !Recipe::delete(&state.db, id).await? {
        return Err(ServerError::not_found(NOT_FOUND));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn like(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ResponseResult<impl IntoResponse> {
    let likes = Recipe::like(&state.db, id)
        .await?
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;

    Ok(Json(json!({ "id": id, "likes": likes })))
}

#[cfg(test)]
mod test {
    use axum::http::{Method, StatusCode};
    use db::{authors::Author, PgPool};
    use serde_json::{json, Value};

    use crate::http_server::test_helpers::{create_test_app, json_request, response_body_json};

    fn pizza(author_id: uuid::Uuid) -> Value {
        json!({
            "title": "Margherita",
            "description": "Tomato, mozzarella and basil on a thin crust.",
            "authorId": author_id,
            "ingredients": [
                { "name": "Flour", "quantity": "500", "unit": "g" },
                { "name": "Basil", "quantity": "", "unit": "to taste" }
            ],
            "steps": [
                { "order": 2, "instruction": "Bake" },
                { "order": 1, "instruction": "Stretch the dough" }
            ]
        })
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn create_then_fetch(pool: PgPool) -> color_eyre::Result<()> {
        let author = Author::find_or_create_by_username(&pool, "chef_sophia").await?;
        let app = create_test_app(pool);

        let response =
            json_request(&app, Method::POST, "/api/recipes", Some(pizza(author.author_id))).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let created: Value = response_body_json(response).await;
        assert_eq!(created["likes"], 0);
        assert_eq!(created["servings"], 1);
        assert_eq!(created["difficulty"], "Easy");
        assert_eq!(created["steps"][0]["instruction"], "Stretch the dough");
        assert_eq!(created["steps"][1]["order"], 2);
        assert_eq!(created["author"]["username"], "chef_sophia");

        let id = created["id"].as_str().unwrap();
        let response = json_request(&app, Method::GET, &format!("/api/recipes/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = json_request(&app, Method::GET, "/api/recipes", None).await;
        let listed: Vec<Value> = response_body_json(response).await;
        assert_eq!(listed.len(), 1);

        Ok(())
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn create_requires_title_and_author(pool: PgPool) -> color_eyre::Result<()> {
        let app = create_test_app(pool);

        let response = json_request(
            &app,
            Method::POST,
            "/api/recipes",
            Some(json!({ "title": "", "description": "Something" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = response_body_json(response).await;
        assert_eq!(body["status"], 400);
        let errors = body["errors"].as_array().unwrap();
        assert!(errors.contains(&json!("Author with valid ID is required")));

        let response = json_request(
            &app,
            Method::POST,
            "/api/recipes",
            Some(pizza(uuid::Uuid::new_v4())),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        Ok(())
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn posting_a_fetched_recipe_creates_a_copy(pool: PgPool) -> color_eyre::Result<()> {
        let author = Author::find_or_create_by_username(&pool, "chef_sophia").await?;
        let app = create_test_app(pool);

        let response =
            json_request(&app, Method::POST, "/api/recipes", Some(pizza(author.author_id))).await;
        let created: Value = response_body_json(response).await;

        let response = json_request(&app, Method::POST, "/api/recipes", Some(created.clone())).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let copy: Value = response_body_json(response).await;
        assert_ne!(copy["id"], created["id"]);
        assert_ne!(copy["ingredients"][0]["id"], created["ingredients"][0]["id"]);
        assert_eq!(copy["ingredients"][0]["name"], "Flour");

        let mut repeated = pizza(author.author_id);
        let step_id = uuid::Uuid::new_v4();
        repeated["steps"] = json!([
            { "id": step_id, "instruction": "Stretch the dough" },
            { "id": step_id, "instruction": "Bake" }
        ]);
        let response = json_request(&app, Method::POST, "/api/recipes", Some(repeated)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response_body_json(response).await;
        assert_eq!(body["errors"], json!(["Step ids must be unique"]));

        Ok(())
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn numbers_out_of_range_are_rejected(pool: PgPool) -> color_eyre::Result<()> {
        let author = Author::find_or_create_by_username(&pool, "chef_sophia").await?;
        let app = create_test_app(pool);

        let mut recipe = pizza(author.author_id);
        recipe["preparationTime"] = json!(i32::MAX);
        recipe["cookingTime"] = json!(1);
        recipe["servings"] = json!(500);
        let response = json_request(&app, Method::POST, "/api/recipes", Some(recipe)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response_body_json(response).await;
        assert_eq!(
            body["errors"],
            json!([
                "Preparation time cannot exceed 24 hours (1440 minutes)",
                "Cannot serve more than 100 people"
            ])
        );

        let response = json_request(&app, Method::GET, "/api/recipes", None).await;
        let listed: Vec<Value> = response_body_json(response).await;
        assert!(listed.is_empty());

        Ok(())
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn missing_and_malformed_ids(pool: PgPool) -> color_eyre::Result<()> {
        let author = Author::find_or_create_by_username(&pool, "chef_sophia").await?;
        let app = create_test_app(pool);
        let missing = uuid::Uuid::new_v4();

        let response =
            json_request(&app, Method::GET, &format!("/api/recipes/{missing}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = response_body_json(response).await;
        assert_eq!(body["message"], "Recipe not found");

        let response = json_request(&app, Method::GET, "/api/recipes/not-a-uuid", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = json_request(
            &app,
            Method::PUT,
            &format!("/api/recipes/{missing}"),
            Some(pizza(author.author_id)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response =
            json_request(&app, Method::DELETE, &format!("/api/recipes/{missing}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        Ok(())
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn update_like_delete(pool: PgPool) -> color_eyre::Result<()> {
        let author = Author::find_or_create_by_username(&pool, "chef_sophia").await?;
        let app = create_test_app(pool);

        let response =
            json_request(&app, Method::POST, "/api/recipes", Some(pizza(author.author_id))).await;
        let created: Value = response_body_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();

        let mut edit = pizza(author.author_id);
        edit["title"] = json!("Marinara");
        edit["steps"] = json!([{ "instruction": "Only step" }]);
        let response =
            json_request(&app, Method::PUT, &format!("/api/recipes/{id}"), Some(edit)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated: Value = response_body_json(response).await;
        assert_eq!(updated["title"], "Marinara");
        assert_eq!(updated["steps"].as_array().unwrap().len(), 1);
        assert_eq!(updated["steps"][0]["order"], 1);

        let response =
            json_request(&app, Method::POST, &format!("/api/recipes/{id}/like"), None).await;
        let liked: Value = response_body_json(response).await;
        assert_eq!(liked["likes"], 1);

        let response =
            json_request(&app, Method::DELETE, &format!("/api/recipes/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = json_request(&app, Method::GET, &format!("/api/recipes/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        Ok(())
    }
}
