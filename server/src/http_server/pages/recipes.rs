use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use db::{
    categories::Category,
    recipes::{FullRecipe, Recipe},
};
use forms::{
    inputs::input_name,
    recipe::{IngredientField, StepField},
    Difficulty, FormAction, Inputs, RecipeDraft, ValidationErrors,
};
use maud::{html, Markup};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::{not_found, read_posted, NoticeQuery, Posted};
use crate::{
    http_server::{
        current_author::CurrentAuthor,
        templates::{
            base,
            buttons::{ActionButton, LinkButton},
            cards::recipe_card,
            form::{error_list, hidden_draft, select, text_input, textarea},
        },
        ResponseResult,
    },
    AppState,
};

const SIMILAR_RECIPES: i64 = 3;
const NOT_FOUND: &str = "We couldn't find that recipe.";

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

pub(crate) async fn recipes_index(
    State(state): State<AppState>,
    Query(search): Query<SearchQuery>,
    Query(notice): Query<NoticeQuery>,
) -> ResponseResult<Markup> {
    let recipes =
        Recipe::search(&state.db, search.q.as_deref(), search.category.as_deref()).await?;
    let categories = Category::list_all(&state.db).await?;
    let selected = search.category.as_deref().unwrap_or_default();

    Ok(base(
        "Recipes",
        html! {
          @if let Some(banner) = notice.banner("Recipe") {
            (banner)
          }

          div class="flex justify-between items-center mb-8" {
            h1 class="text-3xl font-bold" { "Recipes" }
            (LinkButton::primary(html!("Add recipe"), "/recipes/new"))
          }

          form method="get" action="/recipes" class="flex gap-2 mb-8" {
            input type="search" name="q" value=(search.q.as_deref().unwrap_or_default())
              placeholder="Search recipes" class="flex-grow border rounded px-3 py-2";
            select name="category" class="border rounded px-3 py-2" {
              option value="" { "All categories" }
              @for category in &categories {
                option value=(category.name) selected[category.name == selected] { (category.name) }
              }
            }
            button type="submit" class="px-4 py-2 rounded bg-orange-600 text-white" { "Search" }
          }

          @if recipes.is_empty() {
            p class="text-gray-500" { "No recipes match your search." }
          } @else {
            div class="grid md:grid-cols-3 gap-6" {
              @for recipe in &recipes {
                (recipe_card(recipe))
              }
            }
          }
        },
    ))
}

pub(crate) async fn recipe_show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(notice): Query<NoticeQuery>,
) -> ResponseResult<Response> {
    let Some(recipe) = Recipe::get_full(&state.db, id).await? else {
        return Ok(not_found(NOT_FOUND));
    };

    let similar = similar_or_empty(&state.db, id, SIMILAR_RECIPES).await;

    Ok(recipe_page(&recipe, &similar, &notice).into_response())
}

/// Suggestions are optional, so a failure here only empties the list.
async fn similar_or_empty(pool: &PgPool, id: Uuid, limit: i64) -> Vec<Recipe> {
    match Recipe::similar(pool, id, limit).await {
        Ok(similar) => similar,
        Err(e) => {
            tracing::warn!(error = ?e, recipe_id = %id, "Failed to load similar recipes");
            vec![]
        }
    }
}

fn recipe_page(recipe: &FullRecipe, similar: &[Recipe], notice: &NoticeQuery) -> Markup {
    base(
        &recipe.recipe.title,
        html! {
          @if let Some(banner) = notice.banner("Recipe") {
            (banner)
          }
          (recipe_detail(recipe))

          @if !similar.is_empty() {
            section class="mt-16" {
              h2 class="text-2xl mb-4" { "You might also like" }
              div class="grid md:grid-cols-3 gap-6" {
                @for recipe in similar {
                  (recipe_card(recipe))
                }
              }
            }
          }
        },
    )
}

fn recipe_detail(full: &FullRecipe) -> Markup {
    let recipe = &full.recipe;

    html! {
      article {
        h1 class="text-4xl font-bold mb-2" { (recipe.title) }
        @if let Some(author) = &full.author {
          p class="text-gray-500 mb-4" {
            "by " a href={"/profile/" (author.username)} class="underline" { (author.display_name()) }
          }
        }

        div class="grid md:grid-cols-3 gap-4 mb-6" {
          @for image in &recipe.image_urls {
            img src=(image) alt=(recipe.title) class="w-full h-56 object-cover rounded";
          }
        }

        p class="text-lg mb-6" { (recipe.description) }

        dl class="grid grid-cols-4 gap-4 mb-8 text-center" {
          div { dt class="text-sm text-gray-500" { "Prep" } dd { (recipe.preparation_time) " min" } }
          div { dt class="text-sm text-gray-500" { "Cook" } dd { (recipe.cooking_time) " min" } }
          div { dt class="text-sm text-gray-500" { "Servings" } dd { (recipe.servings) } }
          div { dt class="text-sm text-gray-500" { "Difficulty" } dd { (recipe.difficulty) } }
        }

        @if let Some(video) = &recipe.video_url {
          p class="mb-6" { a href=(video) class="underline" target="_blank" rel="noopener noreferrer" { "Watch the video" } }
        }

        div class="grid md:grid-cols-3 gap-8" {
          section {
            h2 class="text-2xl mb-4" { "Ingredients" }
            ul class="list-disc ml-6 space-y-1" {
              @for ingredient in &full.ingredients {
                li { (ingredient.quantity) " " (ingredient.unit) " " (ingredient.name) }
              }
            }
          }

          section class="md:col-span-2" {
            h2 class="text-2xl mb-4" { "Steps" }
            ol class="space-y-4" {
              @for step in &full.steps {
                li class="flex gap-4" {
                  span class="font-bold text-orange-600" { (step.step_order) "." }
                  div {
                    p { (step.instruction) }
                    @if let Some(image) = &step.image_url {
                      img src=(image) alt="" class="mt-2 max-h-48 rounded";
                    }
                  }
                }
              }
            }
          }
        }

        div class="flex gap-4 items-center mt-8" {
          form method="post" action={"/recipes/" (recipe.recipe_id) "/like"} {
            button type="submit" class="px-4 py-2 rounded border" { "♥ " (recipe.likes) }
          }
          (LinkButton::secondary(html!("Edit"), format!("/recipes/{}/edit", recipe.recipe_id)))
          form method="post" action={"/recipes/" (recipe.recipe_id) "/delete"} {
            button type="submit" class="px-4 py-2 rounded border border-red-300 text-red-700" { "Delete" }
          }
        }
      }
    }
}

fn recipe_form(
    heading: &str,
    post_to: &str,
    draft: &RecipeDraft,
    errors: Option<&ValidationErrors>,
) -> crate::Result<Markup> {
    let images = draft.image_urls.join("\n");

    Ok(base(
        heading,
        html! {
          h1 class="text-3xl font-bold mb-8" { (heading) }
          (error_list(errors))

          form method="post" action=(post_to) class="bg-white rounded-lg shadow p-6" {
            (hidden_draft(draft)?)

            (text_input("Title", "title", &draft.title, errors))
            (textarea("Description", "description", &draft.description, errors))
            (textarea("Image URLs (one per line, up to 3)", "image_urls", &images, errors))
            (text_input("Video URL", "video_url", &draft.video_url, errors))

            div class="grid md:grid-cols-3 gap-4" {
              (text_input("Preparation time (minutes)", "preparation_time", &draft.preparation_time, errors))
              (text_input("Cooking time (minutes)", "cooking_time", &draft.cooking_time, errors))
              (text_input("Servings", "servings", &draft.servings, errors))
            }

            (select("Difficulty", "difficulty", Difficulty::ALL, &draft.difficulty))
            (text_input("Categories (comma separated)", "categories", &draft.categories, errors))
            (text_input("Tags (comma separated)", "tags", &draft.tags, errors))

            fieldset class="mb-6" {
              legend class="text-xl font-semibold mb-2" { "Ingredients" }
              @for ingredient in draft.ingredients.iter() {
                div class="grid grid-cols-12 gap-2 items-center" {
                  input type="text" placeholder="Name" class="col-span-5 border rounded px-2 py-1"
                    name=(input_name("ingredient", &[ingredient.id], IngredientField::Name.key()))
                    value=(ingredient.name);
                  input type="text" placeholder="Quantity" class="col-span-2 border rounded px-2 py-1"
                    name=(input_name("ingredient", &[ingredient.id], IngredientField::Quantity.key()))
                    value=(ingredient.quantity);
                  input type="text" placeholder="Unit" class="col-span-3 border rounded px-2 py-1"
                    name=(input_name("ingredient", &[ingredient.id], IngredientField::Unit.key()))
                    value=(ingredient.unit);
                  div class="col-span-2" {
                    (ActionButton::danger("Remove", FormAction::RemoveIngredient(ingredient.id)))
                  }
                }
              }
              (ActionButton::new("Add ingredient", FormAction::AddIngredient))
            }

            fieldset class="mb-6" {
              legend class="text-xl font-semibold mb-2" { "Steps" }
              @for step in draft.steps.iter() {
                div class="border rounded p-3 mb-2" {
                  p class="font-semibold" { "Step " (step.order) }
                  textarea class="w-full border rounded px-2 py-1" rows="2"
                    name=(input_name("step", &[step.id], StepField::Instruction.key())) {
                    (step.instruction)
                  }
                  input type="text" placeholder="Image URL (optional)" class="w-full border rounded px-2 py-1 mt-1"
                    name=(input_name("step", &[step.id], StepField::ImageUrl.key()))
                    value=(step.image_url);
                  div class="flex gap-2" {
                    (ActionButton::new("Move up", FormAction::MoveStepUp(step.id)))
                    (ActionButton::new("Move down", FormAction::MoveStepDown(step.id)))
                    (ActionButton::danger("Remove", FormAction::RemoveStep(step.id)))
                  }
                }
              }
              (ActionButton::new("Add step", FormAction::AddStep))
            }

            (ActionButton::primary("Save recipe", FormAction::Submit))
          }
        },
    ))
}

pub(crate) async fn new_recipe_get() -> ResponseResult<Markup> {
    Ok(recipe_form("Add a recipe", "/recipes/new", &RecipeDraft::new(), None)?)
}

pub(crate) async fn new_recipe_post(
    State(state): State<AppState>,
    CurrentAuthor(author): CurrentAuthor,
    Form(inputs): Form<Inputs>,
) -> ResponseResult<Response> {
    let draft = match read_posted::<RecipeDraft>(&inputs) {
        Posted::Edited(draft) => {
            return Ok(recipe_form("Add a recipe", "/recipes/new", &draft, None)?.into_response())
        }
        Posted::Invalid(draft, errors) => {
            return Ok(
                recipe_form("Add a recipe", "/recipes/new", &draft, Some(&errors))?.into_response(),
            )
        }
        Posted::Ready(draft) => draft,
    };

    let created = Recipe::create(&state.db, draft.into_new_recipe(author.author_id)).await?;
    tracing::info!(recipe_id = %created.recipe.recipe_id, "Recipe created from form");

    Ok(Redirect::to(&format!("/recipes/{}?notice=created", created.recipe.recipe_id)).into_response())
}

pub(crate) async fn edit_recipe_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ResponseResult<Response> {
    let Some(recipe) = Recipe::get_full(&state.db, id).await? else {
        return Ok(not_found(NOT_FOUND));
    };

    let draft = RecipeDraft::from_recipe(recipe.to_new_recipe());
    let post_to = format!("/recipes/{id}/edit");

    Ok(recipe_form("Edit recipe", &post_to, &draft, None)?.into_response())
}

pub(crate) async fn edit_recipe_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(inputs): Form<Inputs>,
) -> ResponseResult<Response> {
    let Some(existing) = Recipe::get_by_id(&state.db, id).await? else {
        return Ok(not_found(NOT_FOUND));
    };
    let post_to = format!("/recipes/{id}/edit");

    let draft = match read_posted::<RecipeDraft>(&inputs) {
        Posted::Edited(draft) => {
            return Ok(recipe_form("Edit recipe", &post_to, &draft, None)?.into_response())
        }
        Posted::Invalid(draft, errors) => {
            return Ok(recipe_form("Edit recipe", &post_to, &draft, Some(&errors))?.into_response())
        }
        Posted::Ready(draft) => draft,
    };

    let recipe = draft.into_new_recipe(existing.author_id);
    if Recipe::update(&state.db, id, recipe).await?.is_none() {
        return Ok(not_found(NOT_FOUND));
    }

    Ok(Redirect::to(&format!("/recipes/{id}?notice=updated")).into_response())
}

pub(crate) async fn like_recipe_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ResponseResult<Response> {
    if Recipe::like(&state.db, id).await?.is_none() {
        return Ok(not_found(NOT_FOUND));
    }

    Ok(Redirect::to(&format!("/recipes/{id}")).into_response())
}

pub(crate) async fn delete_recipe_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ResponseResult<Response> {
    if !Recipe::delete(&state.db, id).await? {
        return Ok(not_found(NOT_FOUND));
    }

    Ok(Redirect::to("/recipes?notice=deleted").into_response())
}
