//! Typed client for the Tasty Tales REST API.
//!
//! Every call is a single request: nothing is retried, cached or
//! deduplicated.

use db::{
    admin_users::AdminUser, categories::Category, discussions::FullDiscussion,
    learning_plans::FullLearningPlan, notifications::Notification, recipes::FullRecipe,
};
use forms::{LoginRequest, LoginResponse, NewCategory, NewDiscussion, NewLearningPlan, NewRecipe};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::instrument;
use uuid::Uuid;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Not found")]
    NotFound,
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: String,
}

impl ApiClientConfig {
    #[instrument(name = "ApiClientConfig::from_env")]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("TASTY_TALES_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned());

        Self { base_url }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();

        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(ApiClientConfig::from_env().base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path))
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path))
    }

    // Recipes

    pub async fn list_recipes(&self) -> Result<Vec<FullRecipe>> {
        json(self.get("/api/recipes")).await
    }

    pub async fn get_recipe(&self, id: Uuid) -> Result<FullRecipe> {
        json_or_not_found(self.get(&format!("/api/recipes/{id}"))).await
    }

    pub async fn create_recipe(&self, recipe: &NewRecipe) -> Result<FullRecipe> {
        json(self.post("/api/recipes").json(recipe)).await
    }

    pub async fn update_recipe(&self, id: Uuid, recipe: &NewRecipe) -> Result<FullRecipe> {
        json(self.put(&format!("/api/recipes/{id}")).json(recipe)).await
    }

    pub async fn delete_recipe(&self, id: Uuid) -> Result<()> {
        empty(self.delete(&format!("/api/recipes/{id}"))).await
    }

    // Learning plans

    pub async fn list_learning_plans(&self) -> Result<Vec<FullLearningPlan>> {
        json(self.get("/api/learning-plans")).await
    }

    pub async fn get_learning_plan(&self, id: Uuid) -> Result<FullLearningPlan> {
        json_or_not_found(self.get(&format!("/api/learning-plans/{id}"))).await
    }

    pub async fn create_learning_plan(&self, plan: &NewLearningPlan) -> Result<FullLearningPlan> {
        json(self.post("/api/learning-plans").json(plan)).await
    }

    pub async fn update_learning_plan(
        &self,
        id: Uuid,
        plan: &NewLearningPlan,
    ) -> Result<FullLearningPlan> {
        json(self.put(&format!("/api/learning-plans/{id}")).json(plan)).await
    }

    pub async fn delete_learning_plan(&self, id: Uuid) -> Result<()> {
        empty(self.delete(&format!("/api/learning-plans/{id}"))).await
    }

    // Discussions

    pub async fn list_discussions(&self) -> Result<Vec<FullDiscussion>> {
        json(self.get("/api/discussions")).await
    }

    pub async fn create_discussion(&self, discussion: &NewDiscussion) -> Result<FullDiscussion> {
        json(self.post("/api/discussions").json(discussion)).await
    }

    // Categories

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        json(self.get("/categories")).await
    }

    pub async fn create_category(&self, category: &NewCategory) -> Result<Category> {
        json(self.post("/categories").json(category)).await
    }

    pub async fn update_category(&self, id: Uuid, category: &NewCategory) -> Result<Category> {
        json(self.put(&format!("/categories/{id}")).json(category)).await
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<()> {
        empty(self.delete(&format!("/categories/{id}"))).await
    }

    // Admin

    pub async fn admin_login(&self, login: &LoginRequest) -> Result<LoginResponse> {
        json(self.post("/admin/login").json(login)).await
    }

    pub async fn list_admin_users(&self) -> Result<Vec<AdminUser>> {
        json(self.get("/admin/user")).await
    }

    // Notifications

    pub async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        json(self.get(&format!("/notifications/{user_id}"))).await
    }
}

#[instrument(skip_all, err)]
async fn send(request: RequestBuilder) -> Result<reqwest::Response> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response body".to_string());
        return Err(ApiError::Status { status, body });
    }

    Ok(response)
}

async fn json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    Ok(send(request).await?.json::<T>().await?)
}

async fn json_or_not_found<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    match json(request).await {
        Err(ApiError::Status {
            status: StatusCode::NOT_FOUND,
            ..
        }) => Err(ApiError::NotFound),
        other => other,
    }
}

async fn empty(request: RequestBuilder) -> Result<()> {
    send(request).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::Path,
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };

    use super::*;

    /// Serves `router` on an ephemeral port and returns a client for it.
    async fn stub(router: Router) -> ApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        ApiClient::new(format!("http://{addr}/"))
    }

    fn sample_recipe() -> FullRecipe {
        db::mock::recipes().remove(0)
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.url("/api/recipes"), "http://localhost:3000/api/recipes");
    }

    #[tokio::test]
    async fn lists_and_fetches_recipes() {
        let known = sample_recipe().recipe.recipe_id;
        let client = stub(
            Router::new()
                .route("/api/recipes", get(|| async { Json(db::mock::recipes()) }))
                .route(
                    "/api/recipes/{id}",
                    get(move |Path(id): Path<Uuid>| async move {
                        if id == known {
                            Ok(Json(sample_recipe()))
                        } else {
                            Err((StatusCode::NOT_FOUND, "Recipe not found"))
                        }
                    }),
                ),
        )
        .await;

        let recipes = client.list_recipes().await.unwrap();
        assert_eq!(recipes.len(), db::mock::recipes().len());

        let recipe = client.get_recipe(known).await.unwrap();
        assert_eq!(recipe.recipe.title, "Classic Margherita Pizza");
        assert_eq!(recipe.steps.len(), sample_recipe().steps.len());

        let missing = client.get_recipe(Uuid::new_v4()).await;
        assert!(matches!(missing, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn validation_errors_keep_status_and_body() {
        let client = stub(Router::new().route(
            "/api/recipes",
            post(|| async { (StatusCode::BAD_REQUEST, "Title is required") }),
        ))
        .await;

        let err = client
            .create_recipe(&NewRecipe::default())
            .await
            .unwrap_err();

        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
                assert_eq!(body, "Title is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_accepts_no_content() {
        let client = stub(Router::new().route(
            "/categories/{id}",
            axum::routing::delete(|| async { StatusCode::NO_CONTENT }),
        ))
        .await;

        client.delete_category(Uuid::new_v4()).await.unwrap();
    }

    #[tokio::test]
    async fn admin_login_reads_camel_case_response() {
        let client = stub(Router::new().route(
            "/admin/login",
            post(|Json(login): Json<LoginRequest>| async move {
                Json(serde_json::json!({
                    "message": "Login successful",
                    "id": Uuid::nil(),
                    "fullName": login.email,
                }))
            }),
        ))
        .await;

        let response = client
            .admin_login(&LoginRequest {
                email: "ada@example.com".into(),
                password: "hunter2".into(),
            })
            .await
            .unwrap();

        assert_eq!(response.message, "Login successful");
        assert_eq!(response.full_name, "ada@example.com");
    }

    #[tokio::test]
    async fn unreachable_server_is_an_http_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(format!("http://{addr}"));
        let err = client.list_categories().await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }
}
