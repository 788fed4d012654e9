use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use db::learning_plans::{FullLearningPlan, LearningPlan, LearningStep};
use forms::{
    inputs::input_name,
    learning_plan::{LearningStepField, ResourceField},
    FormAction, Inputs, LearningPlanDraft, PlanDifficulty, ResourceType, ValidationErrors,
};
use maud::{html, Markup};
use serde::Deserialize;
use uuid::Uuid;

use super::{not_found, read_posted, recipes::SearchQuery, NoticeQuery, Posted};
use crate::{
    http_server::{
        current_author::CurrentAuthor,
        templates::{
            base,
            buttons::{ActionButton, LinkButton},
            cards::learning_plan_card,
            form::{error_list, hidden_draft, select, text_input, textarea},
        },
        ResponseResult,
    },
    AppState,
};

const NOT_FOUND: &str = "We couldn't find that learning plan.";

pub(crate) async fn learning_plans_index(
    State(state): State<AppState>,
    Query(search): Query<SearchQuery>,
) -> ResponseResult<Markup> {
    let found =
        LearningPlan::search(&state.db, search.q.as_deref(), search.category.as_deref()).await?;

    let mut plans = Vec::with_capacity(found.len());
    for plan in found {
        plans.push(plan.with_details(&state.db).await?);
    }

    Ok(base(
        "Learning Plans",
        html! {
          div class="flex justify-between items-center mb-8" {
            h1 class="text-3xl font-bold" { "Learning Plans" }
            (LinkButton::primary(html!("Create plan"), "/learning-plans/new"))
          }

          form method="get" action="/learning-plans" class="flex gap-2 mb-8" {
            input type="search" name="q" value=(search.q.as_deref().unwrap_or_default())
              placeholder="Search learning plans" class="flex-grow border rounded px-3 py-2";
            button type="submit" class="px-4 py-2 rounded bg-orange-600 text-white" { "Search" }
          }

          @if plans.is_empty() {
            p class="text-gray-500" { "No learning plans match your search." }
          } @else {
            div class="grid md:grid-cols-3 gap-6" {
              @for plan in &plans {
                (learning_plan_card(plan))
              }
            }
          }
        },
    ))
}

pub(crate) async fn learning_plan_show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(notice): Query<NoticeQuery>,
) -> ResponseResult<Response> {
    let Some(plan) = LearningPlan::get_full(&state.db, id).await? else {
        return Ok(not_found(NOT_FOUND));
    };

    Ok(base(
        &plan.plan.title,
        html! {
          @if let Some(banner) = notice.banner("Learning plan") {
            (banner)
          }
          (learning_plan_detail(&plan))
        },
    )
    .into_response())
}

fn learning_plan_detail(full: &FullLearningPlan) -> Markup {
    let plan = &full.plan;

    html! {
      article {
        @if let Some(image) = &plan.image_url {
          img src=(image) alt=(plan.title) class="w-full h-64 object-cover rounded mb-6";
        }
        h1 class="text-4xl font-bold mb-2" { (plan.title) }
        p class="text-gray-500 mb-4" {
          (plan.difficulty)
          @if let Some(duration) = &plan.estimated_duration {
            " · " (duration)
          }
          @if let Some(author) = &full.author {
            " · by " a href={"/profile/" (author.username)} class="underline" { (author.display_name()) }
          }
        }
        p class="text-lg mb-6" { (plan.description) }
        (LinkButton::secondary(html!("Edit"), format!("/learning-plans/{}/edit", plan.learning_plan_id)))

        p class="mb-4 font-semibold" {
          (full.completed_steps()) " of " (full.steps.len()) " steps completed"
        }

        ol class="space-y-4" {
          @for step in &full.steps {
            li class="bg-white rounded-lg shadow p-4" {
              div class="flex justify-between items-start" {
                div {
                  h3 class="text-lg font-semibold" {
                    (step.step.step_order) ". " (step.step.title)
                    @if step.step.completed {
                      span class="ml-2 text-green-700 text-sm" { "✓ Completed" }
                    }
                  }
                  @if let Some(description) = &step.step.description {
                    p class="text-gray-700" { (description) }
                  }
                }
                form method="post"
                  action={"/learning-plans/" (plan.learning_plan_id) "/steps/" (step.step.learning_step_id) "/toggle"} {
                  input type="hidden" name="completed" value=(!step.step.completed);
                  button type="submit" class="px-3 py-1 rounded border text-sm" {
                    @if step.step.completed { "Mark incomplete" } @else { "Mark complete" }
                  }
                }
              }
              @if !step.resources.is_empty() {
                ul class="mt-2 ml-4 list-disc text-sm" {
                  @for resource in &step.resources {
                    li {
                      a href=(resource.url) class="underline" target="_blank" rel="noopener noreferrer" { (resource.title) }
                      " (" (resource.resource_type) ")"
                    }
                  }
                }
              }
            }
          }
        }
      }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StepToggle {
    completed: bool,
}

pub(crate) async fn toggle_step_post(
    State(state): State<AppState>,
    Path((id, step_id)): Path<(Uuid, Uuid)>,
    Form(toggle): Form<StepToggle>,
) -> ResponseResult<Response> {
    if LearningStep::set_completed(&state.db, id, step_id, toggle.completed)
        .await?
        .is_none()
    {
        return Ok(not_found(NOT_FOUND));
    }

    Ok(Redirect::to(&format!("/learning-plans/{id}")).into_response())
}

/// Where a plan form posts to, and how it labels itself.
struct PlanForm<'a> {
    heading: &'a str,
    post_to: &'a str,
    submit: &'a str,
}

const NEW_PLAN: PlanForm<'static> = PlanForm {
    heading: "Create a learning plan",
    post_to: "/learning-plans/new",
    submit: "Create plan",
};

fn learning_plan_form(
    form: &PlanForm<'_>,
    draft: &LearningPlanDraft,
    errors: Option<&ValidationErrors>,
) -> crate::Result<Markup> {
    let heading = form.heading;

    Ok(base(
        heading,
        html! {
          h1 class="text-3xl font-bold mb-8" { (heading) }
          (error_list(errors))

          form method="post" action=(form.post_to) class="bg-white rounded-lg shadow p-6" {
            (hidden_draft(draft)?)

            (text_input("Title", "title", &draft.title, errors))
            (textarea("Description", "description", &draft.description, errors))
            (text_input("Image URL", "image_url", &draft.image_url, errors))

            div class="grid md:grid-cols-2 gap-4" {
              (select("Difficulty", "difficulty", PlanDifficulty::ALL, &draft.difficulty))
              (text_input("Estimated duration", "estimated_duration", &draft.estimated_duration, errors))
            }
            (text_input("Categories (comma separated)", "categories", &draft.categories, errors))

            fieldset class="mb-6" {
              legend class="text-xl font-semibold mb-2" { "Steps" }
              @for step in draft.steps.iter() {
                div class="border rounded p-3 mb-4" {
                  p class="font-semibold" { "Step " (step.order) }
                  input type="text" placeholder="Step title" class="w-full border rounded px-2 py-1"
                    name=(input_name("step", &[step.id], LearningStepField::Title.key()))
                    value=(step.title);
                  textarea placeholder="What will you learn?" class="w-full border rounded px-2 py-1 mt-1" rows="2"
                    name=(input_name("step", &[step.id], LearningStepField::Description.key())) {
                    (step.description)
                  }

                  p class="text-sm font-semibold mt-2" { "Resources" }
                  @for resource in step.resources.iter() {
                    div class="grid grid-cols-12 gap-2 items-center" {
                      input type="text" placeholder="Title" class="col-span-4 border rounded px-2 py-1"
                        name=(input_name("resource", &[step.id, resource.id], ResourceField::Title.key()))
                        value=(resource.title);
                      select class="col-span-2 border rounded px-2 py-1"
                        name=(input_name("resource", &[step.id, resource.id], ResourceField::Type.key())) {
                        @for kind in ResourceType::ALL {
                          option value=(kind) selected[*kind == resource.resource_type] { (kind) }
                        }
                      }
                      input type="url" placeholder="https://" class="col-span-4 border rounded px-2 py-1"
                        name=(input_name("resource", &[step.id, resource.id], ResourceField::Url.key()))
                        value=(resource.url);
                      div class="col-span-2" {
                        (ActionButton::danger("Remove", FormAction::RemoveResource(step.id, resource.id)))
                      }
                    }
                  }

                  div class="flex gap-2" {
                    (ActionButton::new("Add resource", FormAction::AddResource(step.id)))
                    (ActionButton::new("Move up", FormAction::MoveStepUp(step.id)))
                    (ActionButton::new("Move down", FormAction::MoveStepDown(step.id)))
                    (ActionButton::danger("Remove step", FormAction::RemoveStep(step.id)))
                  }
                }
              }
              (ActionButton::new("Add step", FormAction::AddStep))
            }

            (ActionButton::primary(form.submit, FormAction::Submit))
          }
        },
    ))
}

pub(crate) async fn new_learning_plan_get() -> ResponseResult<Markup> {
    Ok(learning_plan_form(&NEW_PLAN, &LearningPlanDraft::new(), None)?)
}

pub(crate) async fn new_learning_plan_post(
    State(state): State<AppState>,
    CurrentAuthor(author): CurrentAuthor,
    Form(inputs): Form<Inputs>,
) -> ResponseResult<Response> {
    let draft = match read_posted::<LearningPlanDraft>(&inputs) {
        Posted::Edited(draft) => {
            return Ok(learning_plan_form(&NEW_PLAN, &draft, None)?.into_response())
        }
        Posted::Invalid(draft, errors) => {
            return Ok(learning_plan_form(&NEW_PLAN, &draft, Some(&errors))?.into_response())
        }
        Posted::Ready(draft) => draft,
    };

    let created =
        LearningPlan::create(&state.db, draft.into_new_learning_plan(author.author_id)).await?;
    tracing::info!(learning_plan_id = %created.plan.learning_plan_id, "Learning plan created from form");

    Ok(Redirect::to(&format!(
        "/learning-plans/{}?notice=created",
        created.plan.learning_plan_id
    ))
    .into_response())
}

pub(crate) async fn edit_learning_plan_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ResponseResult<Response> {
    let Some(plan) = LearningPlan::get_full(&state.db, id).await? else {
        return Ok(not_found(NOT_FOUND));
    };

    let draft = LearningPlanDraft::from_learning_plan(plan.to_new_learning_plan());
    let post_to = format!("/learning-plans/{id}/edit");

    Ok(learning_plan_form(&edit_form(&post_to), &draft, None)?.into_response())
}

pub(crate) async fn edit_learning_plan_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(inputs): Form<Inputs>,
) -> ResponseResult<Response> {
    let Some(existing) = LearningPlan::get_by_id(&state.db, id).await? else {
        return Ok(not_found(NOT_FOUND));
    };
    let post_to = format!("/learning-plans/{id}/edit");
    let form = edit_form(&post_to);

    let draft = match read_posted::<LearningPlanDraft>(&inputs) {
        Posted::Edited(draft) => {
            return Ok(learning_plan_form(&form, &draft, None)?.into_response())
        }
        Posted::Invalid(draft, errors) => {
            return Ok(learning_plan_form(&form, &draft, Some(&errors))?.into_response())
        }
        Posted::Ready(draft) => draft,
    };

    let plan = draft.into_new_learning_plan(existing.author_id);
    if LearningPlan::update(&state.db, id, plan).await?.is_none() {
        return Ok(not_found(NOT_FOUND));
    }

    Ok(Redirect::to(&format!("/learning-plans/{id}?notice=updated")).into_response())
}

fn edit_form(post_to: &str) -> PlanForm<'_> {
    PlanForm {
        heading: "Edit learning plan",
        post_to,
        submit: "Save plan",
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use db::{
        learning_plans::{LearningPlan, LearningStep},
        mock, PgPool,
    };
    use forms::{FormAction, LearningPlanDraft};

    use crate::http_server::test_helpers::{
        create_test_app, get_page, location, post_form, response_body_text,
    };

    #[sqlx::test(migrations = "../db/migrations")]
    async fn steps_can_be_toggled(pool: PgPool) -> color_eyre::Result<()> {
        mock::seed(&pool).await?;
        let plan = LearningPlan::search(&pool, Some("baking"), None).await?.remove(0);
        let full = LearningPlan::get_full(&pool, plan.learning_plan_id).await?.unwrap();
        let step = &full.steps[0].step;
        let app = create_test_app(pool.clone());

        let response = post_form(
            &app,
            &format!(
                "/learning-plans/{}/steps/{}/toggle",
                plan.learning_plan_id, step.learning_step_id
            ),
            &[("completed", "true")],
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let body = response_body_text(
            get_page(&app, &format!("/learning-plans/{}", plan.learning_plan_id), None).await,
        )
        .await;
        assert!(body.contains(&format!("1 of {} steps completed", full.steps.len())));

        Ok(())
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn create_plan_from_the_form(pool: PgPool) -> color_eyre::Result<()> {
        let app = create_test_app(pool.clone());

        let mut draft = LearningPlanDraft::new();
        let step = draft.steps.as_slice()[0].id;
        let resource = draft.steps.as_slice()[0].resources.as_slice()[0].id;
        draft.apply(FormAction::AddResource(step));
        let extra = draft.steps.as_slice()[0].resources.as_slice()[1].id;
        draft.apply(FormAction::RemoveResource(step, extra));
        let encoded = serde_json::to_string(&draft)?;

        let step_title = format!("step.{step}.title");
        let step_description = format!("step.{step}.description");
        let resource_title = format!("resource.{step}.{resource}.title");
        let resource_url = format!("resource.{step}.{resource}.url");
        let response = post_form(
            &app,
            "/learning-plans/new",
            &[
                ("draft", encoded.as_str()),
                ("title", "Knife skills"),
                ("description", "Dice, julienne and chiffonade"),
                ("difficulty", "Advanced"),
                (step_title.as_str(), "The claw grip"),
                (step_description.as_str(), "Keep your fingertips tucked"),
                (resource_title.as_str(), "Knife basics"),
                (resource_url.as_str(), "https://example.com/knives"),
                ("action", "submit"),
            ],
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(location(&response).starts_with("/learning-plans/"));

        let plans = LearningPlan::list_full(&pool).await?;
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].plan.title, "Knife skills");
        assert_eq!(plans[0].steps[0].resources.len(), 1);
        assert_eq!(plans[0].author.as_ref().unwrap().username, "current-user");

        Ok(())
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn edit_form_saves_changes(pool: PgPool) -> color_eyre::Result<()> {
        mock::seed(&pool).await?;
        let plan = LearningPlan::search(&pool, Some("baking"), None).await?.remove(0);
        let id = plan.learning_plan_id;
        let before = LearningPlan::get_full(&pool, id).await?.unwrap();
        let first_step = before.steps[0].step.learning_step_id;
        LearningStep::set_completed(&pool, id, first_step, true).await?;
        let app = create_test_app(pool.clone());

        let edit_path = format!("/learning-plans/{id}/edit");
        let response = get_page(&app, &edit_path, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_body_text(response).await;
        assert!(body.contains("Edit learning plan"));
        assert!(body.contains(&plan.title));
        let draft = body
            .split(r#"name="draft" value=""#)
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .unwrap()
            .replace("&quot;", "\"")
            .replace("&amp;", "&");

        let response = post_form(
            &app,
            &edit_path,
            &[
                ("draft", draft.as_str()),
                ("title", "Baking, the long way round"),
                ("action", "submit"),
            ],
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location(&response),
            format!("/learning-plans/{id}?notice=updated")
        );

        let after = LearningPlan::get_full(&pool, id).await?.unwrap();
        assert_eq!(after.plan.title, "Baking, the long way round");
        assert_eq!(after.plan.author_id, plan.author_id);
        assert_eq!(after.steps.len(), before.steps.len());
        assert_eq!(after.steps[0].step.learning_step_id, first_step);
        assert!(after.steps[0].step.completed);

        let missing = format!("/learning-plans/{}/edit", uuid::Uuid::new_v4());
        assert_eq!(
            get_page(&app, &missing, None).await.status(),
            StatusCode::NOT_FOUND
        );

        Ok(())
    }
}
