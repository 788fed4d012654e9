use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use db::admin_users::AdminUser;
use forms::{LoginRequest, LoginResponse, NewAdminUser};
use serde::Deserialize;
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{
    http_server::{
        auth::{
            password::{hash_password, verify_password},
            session::start_session,
        },
        errors::ServerError,
        ResponseResult,
    },
    AppState,
};

const NOT_FOUND: &str = "Admin user not found";
const EMAIL_TAKEN: &str = "Email already registered";

/// Blank strings count as missing.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) async fn signup(
    State(state): State<AppState>,
    Json(user): Json<NewAdminUser>,
) -> ResponseResult<impl IntoResponse> {
    let (Some(fullname), Some(email), Some(password)) = (
        present(user.fullname.as_deref()),
        present(user.email.as_deref()),
        present(user.password.as_deref()),
    ) else {
        return Err(ServerError::bad_request(
            "Full name, email and password are required",
        ));
    };

    if AdminUser::email_exists(&state.db, email).await? {
        return Err(ServerError::new(StatusCode::CONFLICT, EMAIL_TAKEN));
    }

    let password_hash = hash_password(password)?;
    let created = AdminUser::create(&state.db, fullname, email, &password_hash)
        .await?
        .ok_or_else(|| ServerError::new(StatusCode::CONFLICT, EMAIL_TAKEN))?;
    tracing::info!(admin_user_id = %created.admin_user_id, "Admin user registered");

    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(login): Json<LoginRequest>,
) -> ResponseResult<impl IntoResponse> {
    let user = AdminUser::get_by_email(&state.db, login.email.trim())
        .await?
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;

    if !verify_password(&login.password, &user.password_hash)? {
        return Err(ServerError::new(StatusCode::UNAUTHORIZED, "Invalid password"));
    }

    start_session(&state, &cookies, user.admin_user_id).await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        id: user.admin_user_id,
        full_name: user.fullname,
    }))
}

pub(crate) async fn list(State(state): State<AppState>) -> ResponseResult<impl IntoResponse> {
    Ok(Json(AdminUser::list_all(&state.db).await?))
}

pub(crate) async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ResponseResult<impl IntoResponse> {
    let user = AdminUser::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;

    Ok(Json(user))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(user): Json<NewAdminUser>,
) -> ResponseResult<impl IntoResponse> {
    let existing = AdminUser::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;

    let email = present(user.email.as_deref());
    if let Some(email) = email {
        if email != existing.email && AdminUser::email_exists(&state.db, email).await? {
            return Err(ServerError::new(StatusCode::CONFLICT, EMAIL_TAKEN));
        }
    }

    let password_hash = present(user.password.as_deref())
        .map(hash_password)
        .transpose()?;

    let updated = AdminUser::update(
        &state.db,
        id,
        present(user.fullname.as_deref()),
        email,
        password_hash.as_deref(),
    )
    .await?
    .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;

    Ok(Json(updated))
}

pub(crate) async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ResponseResult<impl IntoResponse> {
    if !AdminUser::delete(&state.db, id).await? {
        return Err(ServerError::not_found(NOT_FOUND));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmailQuery {
    email: String,
}

pub(crate) async fn check_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> ResponseResult<impl IntoResponse> {
    Ok(Json(
        AdminUser::email_exists(&state.db, query.email.trim()).await?,
    ))
}
