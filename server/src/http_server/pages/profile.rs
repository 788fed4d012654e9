use axum::{
    extract::Path,
    response::{IntoResponse, Response},
};
use db::mock;
use maud::html;

use super::not_found;
use crate::http_server::templates::{
    base,
    cards::{learning_plan_card, recipe_card},
};

/// Profiles are served from the bundled sample data.
pub(crate) async fn profile_page(Path(username): Path<String>) -> Response {
    let Some(author) = mock::author(&username) else {
        return not_found("We couldn't find that cook.");
    };

    let recipes: Vec<_> = mock::recipes()
        .into_iter()
        .filter(|r| r.recipe.author_id == author.author_id)
        .collect();
    let plans: Vec<_> = mock::learning_plans()
        .into_iter()
        .filter(|p| p.plan.author_id == author.author_id)
        .collect();

    base(
        author.display_name(),
        html! {
          section class="flex items-center gap-6 mb-12" {
            @if let Some(image) = &author.profile_image_url {
              img src=(image) alt=(author.display_name()) class="w-24 h-24 rounded-full object-cover";
            }
            div {
              h1 class="text-3xl font-bold" { (author.display_name()) }
              p class="text-gray-500" { "@" (author.username) }
              @if let Some(bio) = &author.bio {
                p class="mt-2" { (bio) }
              }
              ul class="flex gap-6 mt-2 text-sm" {
                li { strong { (author.followers) } " followers" }
                li { strong { (author.following) } " following" }
                li { strong { (author.recipes) } " recipes" }
                li { strong { (author.learning_plans) } " learning plans" }
              }
            }
          }

          section class="mb-12" {
            h2 class="text-2xl mb-4" { "Recipes" }
            div class="grid md:grid-cols-3 gap-6" {
              @for recipe in &recipes {
                (recipe_card(&recipe.recipe))
              }
            }
          }

          section {
            h2 class="text-2xl mb-4" { "Learning Plans" }
            div class="grid md:grid-cols-3 gap-6" {
              @for plan in &plans {
                (learning_plan_card(plan))
              }
            }
          }
        },
    )
    .into_response()
}
