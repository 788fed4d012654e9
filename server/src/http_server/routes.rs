use axum::{
    http::Uri,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Router,
};

use super::{api, errors::ServerError, pages, templates::not_found_page};
use crate::AppState;

pub(crate) fn make_router() -> Router<AppState> {
    Router::new()
        .merge(api_routes())
        .merge(page_routes())
        .fallback(fallback)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/recipes",
            get(api::recipes::list).post(api::recipes::create),
        )
        .route(
            "/api/recipes/{id}",
            get(api::recipes::show)
                .put(api::recipes::update)
                .delete(api::recipes::destroy),
        )
        .route("/api/recipes/{id}/like", post(api::recipes::like))
        .route(
            "/api/learning-plans",
            get(api::learning_plans::list).post(api::learning_plans::create),
        )
        .route(
            "/api/learning-plans/{id}",
            get(api::learning_plans::show)
                .put(api::learning_plans::update)
                .delete(api::learning_plans::destroy),
        )
        .route(
            "/api/learning-plans/{id}/steps/{step_id}",
            patch(api::learning_plans::set_step_completed),
        )
        .route(
            "/api/discussions",
            get(api::discussions::list).post(api::discussions::create),
        )
        .route(
            "/api/discussions/{id}",
            get(api::discussions::show)
                .put(api::discussions::update)
                .delete(api::discussions::destroy),
        )
        .route(
            "/api/discussions/{id}/comments",
            post(api::discussions::add_comment),
        )
        .route("/api/discussions/{id}/like", post(api::discussions::like))
        .route(
            "/categories",
            get(pages::categories::categories_index).post(api::categories::create),
        )
        .route(
            "/categories/{id}",
            put(api::categories::update).delete(api::categories::destroy),
        )
        .route(
            "/admin/user",
            get(api::admin::list).post(api::admin::signup),
        )
        .route(
            "/admin/user/{id}",
            get(api::admin::show)
                .put(api::admin::update)
                .delete(api::admin::destroy),
        )
        .route(
            "/admin/login",
            get(pages::admin::login_get).post(api::admin::login),
        )
        .route("/admin/checkEmail", get(api::admin::check_email))
        .route(
            "/notifications/{id}",
            get(api::notifications::list_for_user).delete(api::notifications::destroy),
        )
        .route(
            "/notifications/{id}/markAsRead",
            put(api::notifications::mark_as_read),
        )
}

fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home::home_page))
        .route("/recipes", get(pages::recipes::recipes_index))
        .route(
            "/recipes/new",
            get(pages::recipes::new_recipe_get).post(pages::recipes::new_recipe_post),
        )
        .route("/recipes/{id}", get(pages::recipes::recipe_show))
        .route(
            "/recipes/{id}/edit",
            get(pages::recipes::edit_recipe_get).post(pages::recipes::edit_recipe_post),
        )
        .route("/recipes/{id}/like", post(pages::recipes::like_recipe_post))
        .route(
            "/recipes/{id}/delete",
            post(pages::recipes::delete_recipe_post),
        )
        .route(
            "/learning-plans",
            get(pages::learning_plans::learning_plans_index),
        )
        .route(
            "/learning-plans/new",
            get(pages::learning_plans::new_learning_plan_get)
                .post(pages::learning_plans::new_learning_plan_post),
        )
        .route(
            "/learning-plans/{id}",
            get(pages::learning_plans::learning_plan_show),
        )
        .route(
            "/learning-plans/{id}/edit",
            get(pages::learning_plans::edit_learning_plan_get)
                .post(pages::learning_plans::edit_learning_plan_post),
        )
        .route(
            "/learning-plans/{id}/steps/{step_id}/toggle",
            post(pages::learning_plans::toggle_step_post),
        )
        .route("/community", get(pages::community::community_page))
        .route(
            "/community/{id}/comments",
            post(pages::community::comment_post),
        )
        .route(
            "/community/{id}/like",
            post(pages::community::like_discussion_post),
        )
        .route(
            "/discussions/new",
            get(pages::community::new_discussion_get)
                .post(pages::community::new_discussion_post),
        )
        .route("/profile/{username}", get(pages::profile::profile_page))
        .route("/admin", get(pages::admin::dashboard))
        .route("/admin/session", post(pages::admin::login_post))
        .route("/admin/logout", post(pages::admin::logout_post))
        .route(
            "/admin/categories",
            get(pages::admin::categories_get).post(pages::admin::create_category_post),
        )
        .route(
            "/admin/categories/{id}",
            post(pages::admin::update_category_post),
        )
        .route(
            "/admin/categories/{id}/delete",
            post(pages::admin::delete_category_post),
        )
}

/// JSON for unknown API paths, an HTML page for everything else.
async fn fallback(uri: Uri) -> Response {
    if uri.path().starts_with("/api/") {
        return ServerError::not_found("Not found").into_response();
    }

    (
        axum::http::StatusCode::NOT_FOUND,
        not_found_page("That page doesn't exist."),
    )
        .into_response()
}

#[cfg(test)]
mod test {
    use axum::http::{Method, StatusCode};
    use db::PgPool;
    use serde_json::Value;

    use crate::http_server::test_helpers::{
        create_test_app, get_page, json_request, response_body_json,
    };

    #[sqlx::test(migrations = "../db/migrations")]
    async fn unknown_paths_are_not_found(pool: PgPool) {
        let app = create_test_app(pool);

        let response = json_request(&app, Method::GET, "/api/nothing-here", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = response_body_json(response).await;
        assert_eq!(body["status"], 404);

        let response = get_page(&app, "/nothing-here", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn pages_render(pool: PgPool) -> color_eyre::Result<()> {
        db::mock::seed(&pool).await?;
        let app = create_test_app(pool);

        for path in [
            "/",
            "/recipes",
            "/recipes/new",
            "/learning-plans",
            "/learning-plans/new",
            "/community",
            "/discussions/new",
            "/categories",
            "/admin/login",
        ] {
            let response = get_page(&app, path, None).await;
            assert_eq!(response.status(), StatusCode::OK, "GET {path}");
        }

        Ok(())
    }
}
