use axum::{extract::FromRequestParts, http::request::Parts};
use db::authors::Author;

use crate::{http_server::errors::ServerError, AppState};

/// Stand-in for real sign-in: every visitor acts as this author.
pub(crate) const CURRENT_USERNAME: &str = "current-user";

#[derive(Debug, Clone)]
pub struct CurrentAuthor(pub Author);

impl FromRequestParts<AppState> for CurrentAuthor {
    type Rejection = ServerError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let author = Author::find_or_create_by_username(&state.db, CURRENT_USERNAME).await?;

        Ok(Self(author))
    }
}
