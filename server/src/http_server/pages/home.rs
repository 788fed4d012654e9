use axum::extract::State;
use db::{categories::Category, learning_plans::LearningPlan, recipes::Recipe};
use maud::{html, Markup};

use crate::{
    http_server::{
        templates::{
            base,
            buttons::LinkButton,
            cards::{category_card, learning_plan_card, recipe_card},
        },
        ResponseResult,
    },
    AppState,
};

const FEATURED_RECIPES: usize = 6;
const FEATURED_PLANS: usize = 3;

pub(crate) async fn home_page(State(state): State<AppState>) -> ResponseResult<Markup> {
    let mut recipes = Recipe::search(&state.db, None, None).await?;
    recipes.truncate(FEATURED_RECIPES);

    let mut plans = LearningPlan::list_full(&state.db).await?;
    plans.truncate(FEATURED_PLANS);

    let categories = Category::list_all(&state.db).await?;

    Ok(base(
        "Home",
        html! {
          section class="mb-16 text-center py-12" {
            h1 class="text-4xl font-bold leading-tight pb-4" {
              "Cook, share and learn with Tasty Tales"
            }
            p class="text-lg text-gray-600 mb-8" {
              "Discover recipes from home cooks and follow learning plans to build your skills."
            }
            div class="flex justify-center space-x-4" {
              (LinkButton::primary(html!("Browse recipes"), "/recipes"))
              (LinkButton::secondary(html!("Share a recipe"), "/recipes/new"))
            }
          }

          section class="mb-16" {
            h2 class="text-3xl mb-4" { a href="/recipes" { "Featured Recipes" } }
            @if recipes.is_empty() {
              p class="text-gray-500" { "No recipes yet. Be the first to share one!" }
            } @else {
              div class="grid md:grid-cols-3 gap-6" {
                @for recipe in &recipes {
                  (recipe_card(recipe))
                }
              }
            }
          }

          section class="mb-16" {
            h2 class="text-3xl mb-4" { a href="/learning-plans" { "Learning Plans" } }
            div class="grid md:grid-cols-3 gap-6" {
              @for plan in &plans {
                (learning_plan_card(plan))
              }
            }
          }

          @if !categories.is_empty() {
            section class="mb-16" {
              h2 class="text-3xl mb-4" { a href="/categories" { "Categories" } }
              div class="grid md:grid-cols-3 gap-6" {
                @for category in &categories {
                  (category_card(category))
                }
              }
            }
          }
        },
    ))
}
