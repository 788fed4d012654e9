use axum::response::Response;

pub(crate) mod api;
pub(crate) mod auth;
pub(crate) mod cmd;
pub(crate) mod cookies;
pub(crate) mod current_author;
pub mod errors;
pub(crate) mod pages;
pub(crate) mod routes;
mod templates;
mod trace;

#[cfg(test)]
pub(crate) mod test_helpers;

use errors::ServerError;

pub(crate) type ResponseResult<T = Response> = Result<T, ServerError>;
