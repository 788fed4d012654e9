use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use db::categories::Category;
use maud::{html, Markup};

use crate::{
    http_server::{
        templates::{base, cards::category_card},
        ResponseResult,
    },
    AppState,
};

/// `/categories` is shared by the JSON API and the browsable page.
fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|accept| accept.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

pub(crate) async fn categories_index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ResponseResult<Response> {
    let categories = Category::list_all(&state.db).await?;

    if wants_html(&headers) {
        Ok(categories_page(&categories).into_response())
    } else {
        Ok(Json(categories).into_response())
    }
}

fn categories_page(categories: &[Category]) -> Markup {
    base(
        "Categories",
        html! {
          h1 class="text-3xl font-bold mb-8" { "Categories" }

          @if categories.is_empty() {
            p class="text-gray-500" { "No categories yet." }
          } @else {
            div class="grid md:grid-cols-3 gap-6" {
              @for category in categories {
                (category_card(category))
              }
            }
          }
        },
    )
}
