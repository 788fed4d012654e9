use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use db::{
    admin_users::AdminUser, categories::Category, discussions::Discussion,
    learning_plans::LearningPlan, recipes::Recipe,
};
use forms::NewCategory;
use maud::{html, Markup};
use serde::Deserialize;
use tower_cookies::Cookies;
use uuid::Uuid;

use super::NoticeQuery;
use crate::{
    http_server::{
        auth::{
            password::verify_password,
            session::{end_session, start_session, CurrentAdmin},
        },
        templates::{
            base,
            form::{flash, FlashKind},
        },
        ResponseResult,
    },
    AppState,
};

const DASHBOARD: &str = "/admin";

/// Only same-site paths are followed after login.
fn safe_return_to(return_to: Option<&str>) -> &str {
    match return_to {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => DASHBOARD,
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LoginQuery {
    return_to: Option<String>,
}

fn login_page(return_to: &str, email: &str, error: Option<&str>) -> Markup {
    base(
        "Admin login",
        html! {
          div class="max-w-md mx-auto bg-white rounded-lg shadow p-6" {
            h1 class="text-2xl font-bold mb-6" { "Admin login" }
            @if let Some(error) = error {
              (flash(FlashKind::Error, error))
            }
            form method="post" action="/admin/session" {
              input type="hidden" name="return_to" value=(return_to);
              label class="block mb-4" {
                span class="font-medium" { "Email" }
                input type="email" name="email" value=(email) required class="w-full border rounded px-3 py-2 mt-1";
              }
              label class="block mb-6" {
                span class="font-medium" { "Password" }
                input type="password" name="password" required class="w-full border rounded px-3 py-2 mt-1";
              }
              button type="submit" class="w-full px-4 py-2 rounded bg-orange-600 text-white font-semibold" { "Log in" }
            }
          }
        },
    )
}

pub(crate) async fn login_get(Query(query): Query<LoginQuery>) -> Markup {
    login_page(safe_return_to(query.return_to.as_deref()), "", None)
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginForm {
    email: String,
    password: String,
    return_to: Option<String>,
}

pub(crate) async fn login_post(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> ResponseResult<Response> {
    let return_to = safe_return_to(form.return_to.as_deref());

    let user = AdminUser::get_by_email(&state.db, form.email.trim()).await?;
    let user = match user {
        Some(user) if verify_password(&form.password, &user.password_hash)? => user,
        _ => {
            tracing::info!("Rejected admin login");
            let page = login_page(return_to, &form.email, Some("Invalid email or password"));
            return Ok((StatusCode::UNAUTHORIZED, page).into_response());
        }
    };

    start_session(&state, &cookies, user.admin_user_id).await?;
    tracing::info!(admin_user_id = %user.admin_user_id, "Admin logged in");

    Ok(Redirect::to(return_to).into_response())
}

pub(crate) async fn logout_post(
    State(state): State<AppState>,
    cookies: Cookies,
) -> ResponseResult<Response> {
    end_session(&state, &cookies).await?;

    Ok(Redirect::to("/admin/login").into_response())
}

fn admin_nav(admin: &CurrentAdmin) -> Markup {
    html! {
      div class="flex justify-between items-center mb-8" {
        nav class="flex gap-4" {
          a href="/admin" class="font-semibold" { "Dashboard" }
          a href="/admin/categories" class="font-semibold" { "Categories" }
        }
        div class="flex gap-4 items-center text-sm" {
          span { "Signed in as " (admin.user.fullname) }
          form method="post" action="/admin/logout" {
            button type="submit" class="underline" { "Log out" }
          }
        }
      }
    }
}

pub(crate) async fn dashboard(
    State(state): State<AppState>,
    admin: CurrentAdmin,
) -> ResponseResult<Markup> {
    let stats = [
        ("Recipes", Recipe::count(&state.db).await?),
        ("Learning plans", LearningPlan::count(&state.db).await?),
        ("Discussions", Discussion::count(&state.db).await?),
        (
            "Categories",
            i64::try_from(Category::list_all(&state.db).await?.len())?,
        ),
    ];

    Ok(base(
        "Admin",
        html! {
          (admin_nav(&admin))
          h1 class="text-3xl font-bold mb-8" { "Dashboard" }
          div class="grid md:grid-cols-4 gap-6" {
            @for (label, count) in stats {
              div class="bg-white rounded-lg shadow p-6 text-center" {
                p class="text-3xl font-bold" { (count) }
                p class="text-gray-500" { (label) }
              }
            }
          }
        },
    ))
}

fn categories_admin_page(
    admin: &CurrentAdmin,
    categories: &[Category],
    banner: Option<Markup>,
) -> Markup {
    let input_classes = "border rounded px-2 py-1";

    base(
        "Manage categories",
        html! {
          (admin_nav(admin))
          h1 class="text-3xl font-bold mb-8" { "Categories" }
          @if let Some(banner) = banner {
            (banner)
          }

          form method="post" action="/admin/categories" class="bg-white rounded-lg shadow p-4 mb-8 flex gap-2" {
            input type="text" name="name" placeholder="Name" required class=(input_classes);
            input type="text" name="description" placeholder="Description" class={"flex-grow " (input_classes)};
            input type="url" name="image_url" placeholder="Image URL" class=(input_classes);
            button type="submit" class="px-4 py-1 rounded bg-orange-600 text-white" { "Add category" }
          }

          table class="w-full bg-white rounded-lg shadow" {
            thead {
              tr class="text-left border-b" {
                th class="p-2" { "Name" }
                th class="p-2" { "Description" }
                th class="p-2" {}
              }
            }
            tbody {
              @for category in categories {
                tr class="border-b" {
                  td class="p-2" colspan="2" {
                    form method="post" action={"/admin/categories/" (category.category_id)} class="flex gap-2" {
                      input type="text" name="name" value=(category.name) required class=(input_classes);
                      input type="text" name="description" value=(category.description.as_deref().unwrap_or_default()) class={"flex-grow " (input_classes)};
                      button type="submit" class="px-3 py-1 rounded border" { "Save" }
                    }
                  }
                  td class="p-2" {
                    form method="post" action={"/admin/categories/" (category.category_id) "/delete"} {
                      button type="submit" class="px-3 py-1 rounded border border-red-300 text-red-700" { "Delete" }
                    }
                  }
                }
              }
            }
          }
        },
    )
}

pub(crate) async fn categories_get(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Query(notice): Query<NoticeQuery>,
) -> ResponseResult<Markup> {
    let categories = Category::list_all(&state.db).await?;

    Ok(categories_admin_page(
        &admin,
        &categories,
        notice.banner("Category"),
    ))
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image_url: String,
}

impl From<CategoryForm> for NewCategory {
    fn from(form: CategoryForm) -> Self {
        let optional = |value: String| Some(value.trim().to_string()).filter(|v| !v.is_empty());

        NewCategory {
            name: form.name.trim().to_string(),
            description: optional(form.description),
            image_url: optional(form.image_url),
        }
    }
}

async fn rejected(
    state: &AppState,
    admin: &CurrentAdmin,
    status: StatusCode,
    message: &str,
) -> ResponseResult<Response> {
    let categories = Category::list_all(&state.db).await?;
    let page = categories_admin_page(admin, &categories, Some(flash(FlashKind::Error, message)));

    Ok((status, page).into_response())
}

pub(crate) async fn create_category_post(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Form(form): Form<CategoryForm>,
) -> ResponseResult<Response> {
    let category = NewCategory::from(form);
    if category.name.is_empty() {
        return rejected(&state, &admin, StatusCode::BAD_REQUEST, "Name is required").await;
    }

    if Category::create(&state.db, category).await?.is_none() {
        return rejected(&state, &admin, StatusCode::CONFLICT, "Category already exists").await;
    }

    Ok(Redirect::to("/admin/categories?notice=created").into_response())
}

pub(crate) async fn update_category_post(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(id): Path<Uuid>,
    Form(form): Form<CategoryForm>,
) -> ResponseResult<Response> {
    let category = NewCategory::from(form);
    if category.name.is_empty() {
        return rejected(&state, &admin, StatusCode::BAD_REQUEST, "Name is required").await;
    }
    if Category::name_taken(&state.db, &category.name, Some(id)).await? {
        return rejected(&state, &admin, StatusCode::CONFLICT, "Category already exists").await;
    }

    if Category::update(&state.db, id, category).await?.is_none() {
        return rejected(&state, &admin, StatusCode::NOT_FOUND, "Category not found").await;
    }

    Ok(Redirect::to("/admin/categories?notice=updated").into_response())
}

pub(crate) async fn delete_category_post(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(id): Path<Uuid>,
) -> ResponseResult<Response> {
    if !Category::delete(&state.db, id).await? {
        return rejected(&state, &admin, StatusCode::NOT_FOUND, "Category not found").await;
    }

    Ok(Redirect::to("/admin/categories?notice=deleted").into_response())
}
