use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use db::admin_users::{AdminSession, AdminUser, SESSION_MAX_AGE_DAYS};
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

use crate::AppState;

pub(crate) const SESSION_COOKIE: &str = "admin_session_id";

#[derive(Debug, Clone)]
pub struct SessionRedirect {
    location: String,
}

impl SessionRedirect {
    pub fn to_login(return_to: &str) -> Self {
        Self {
            location: format!(
                "/admin/login?return_to={}",
                url::form_urlencoded::byte_serialize(return_to.as_bytes()).collect::<String>()
            ),
        }
    }
}

impl IntoResponse for SessionRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&self.location).into_response()
    }
}

/// A signed-in admin. Pages that take this extractor bounce anonymous
/// visitors to the login form.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub session: AdminSession,
    pub user: AdminUser,
}

impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = SessionRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let return_to = parts
            .uri
            .path_and_query()
            .map_or("/admin", axum::http::uri::PathAndQuery::as_str)
            .to_string();
        let redirect = || SessionRedirect::to_login(&return_to);

        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| {
                tracing::error!("Failed to get cookies: {msg}");

                redirect()
            })?;

        let Some(session_id) = session_id(&cookies, state) else {
            return Err(redirect());
        };

        let session = AdminSession::get_by_id(&state.db, session_id).await;
        let session = match session {
            Ok(Some(session)) => session,
            Ok(None) => return Err(redirect()),
            Err(e) => {
                tracing::error!("Failed to fetch session: {e}");
                return Err(redirect());
            }
        };

        match AdminUser::get_by_id(&state.db, session.admin_user_id).await {
            Ok(Some(user)) => Ok(CurrentAdmin { session, user }),
            Ok(None) => Err(redirect()),
            Err(e) => {
                tracing::error!("Failed to fetch admin user: {e}");
                Err(redirect())
            }
        }
    }
}

fn session_id(cookies: &Cookies, state: &AppState) -> Option<Uuid> {
    let cookie = cookies.private(&state.cookie_key).get(SESSION_COOKIE)?;

    match Uuid::parse_str(cookie.value()) {
        Ok(id) => Some(id),
        Err(_) => {
            tracing::warn!("Ignoring unparsable session cookie");
            None
        }
    }
}

/// Stores a new session and hands its id to the browser in a private cookie.
pub(crate) async fn start_session(
    state: &AppState,
    cookies: &Cookies,
    admin_user_id: Uuid,
) -> crate::Result<AdminSession> {
    let session = AdminSession::create(&state.db, admin_user_id).await?;

    let cookie = Cookie::build((SESSION_COOKIE, session.session_id.to_string()))
        .path("/")
        .http_only(true)
        .secure(state.app.is_https())
        .max_age(tower_cookies::cookie::time::Duration::days(i64::from(
            SESSION_MAX_AGE_DAYS,
        )))
        .same_site(tower_cookies::cookie::SameSite::Lax);
    cookies.private(&state.cookie_key).add(cookie.into());

    Ok(session)
}

pub(crate) async fn end_session(state: &AppState, cookies: &Cookies) -> crate::Result<()> {
    if let Some(session_id) = session_id(cookies, state) {
        AdminSession::delete(&state.db, session_id).await?;
    }

    cookies
        .private(&state.cookie_key)
        .remove(Cookie::build(SESSION_COOKIE).path("/").into());

    Ok(())
}
