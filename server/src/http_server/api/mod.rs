use db::authors::Author;
use uuid::Uuid;

use super::{errors::ServerError, ResponseResult};
use crate::AppState;

pub(crate) mod admin;
pub(crate) mod categories;
pub(crate) mod discussions;
pub(crate) mod learning_plans;
pub(crate) mod notifications;
pub(crate) mod recipes;

/// Rejects bodies that point at an author we don't have, before the insert
/// trips over the foreign key.
async fn ensure_author(state: &AppState, author_id: Option<Uuid>) -> ResponseResult<Uuid> {
    let Some(author_id) = author_id else {
        return Err(ServerError::bad_request("Author with valid ID is required"));
    };

    match Author::get_by_id(&state.db, author_id).await? {
        Some(_) => Ok(author_id),
        None => Err(ServerError::bad_request("Author with valid ID is required")),
    }
}
