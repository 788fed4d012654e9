use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use db::discussions::{Comment, Discussion};
use forms::{DiscussionDraft, FormAction, Inputs, NewComment, ValidationErrors};
use maud::{html, Markup};
use serde::Deserialize;
use uuid::Uuid;

use super::{not_found, read_posted, NoticeQuery, Posted};
use crate::{
    http_server::{
        current_author::CurrentAuthor,
        templates::{
            base,
            buttons::{ActionButton, LinkButton},
            cards::discussion_card,
            form::{error_list, hidden_draft, text_input, textarea},
        },
        ResponseResult,
    },
    AppState,
};

const NOT_FOUND: &str = "We couldn't find that discussion.";

pub(crate) async fn community_page(
    State(state): State<AppState>,
    Query(notice): Query<NoticeQuery>,
) -> ResponseResult<Markup> {
    let discussions = Discussion::list_full(&state.db).await?;

    Ok(base(
        "Community",
        html! {
          @if let Some(banner) = notice.banner("Discussion") {
            (banner)
          }

          div class="flex justify-between items-center mb-8" {
            h1 class="text-3xl font-bold" { "Community" }
            (LinkButton::primary(html!("Start a discussion"), "/discussions/new"))
          }

          @if discussions.is_empty() {
            p class="text-gray-500" { "No discussions yet. Ask the first question!" }
          } @else {
            div class="space-y-6" {
              @for discussion in &discussions {
                (discussion_card(discussion))
              }
            }
          }
        },
    ))
}

fn discussion_form(
    draft: &DiscussionDraft,
    errors: Option<&ValidationErrors>,
) -> crate::Result<Markup> {
    let images = draft.images.join("\n");

    Ok(base(
        "Start a discussion",
        html! {
          h1 class="text-3xl font-bold mb-8" { "Start a discussion" }
          (error_list(errors))

          form method="post" action="/discussions/new" class="bg-white rounded-lg shadow p-6" {
            (hidden_draft(draft)?)
            (text_input("Title", "title", &draft.title, errors))
            (textarea("What's on your mind?", "content", &draft.content, errors))
            (textarea("Image URLs (one per line, up to 3)", "images", &images, errors))
            (text_input("Tags (comma separated)", "tags", &draft.tags, errors))
            (ActionButton::primary("Post discussion", FormAction::Submit))
          }
        },
    ))
}

pub(crate) async fn new_discussion_get() -> ResponseResult<Markup> {
    Ok(discussion_form(&DiscussionDraft::new(), None)?)
}

pub(crate) async fn new_discussion_post(
    State(state): State<AppState>,
    CurrentAuthor(author): CurrentAuthor,
    Form(inputs): Form<Inputs>,
) -> ResponseResult<Response> {
    let draft = match read_posted::<DiscussionDraft>(&inputs) {
        Posted::Edited(draft) => return Ok(discussion_form(&draft, None)?.into_response()),
        Posted::Invalid(draft, errors) => {
            return Ok(discussion_form(&draft, Some(&errors))?.into_response())
        }
        Posted::Ready(draft) => draft,
    };

    Discussion::create(&state.db, draft.into_new_discussion(author.author_id)).await?;

    Ok(Redirect::to("/community?notice=created").into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentForm {
    #[serde(default)]
    content: String,
}

pub(crate) async fn comment_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    CurrentAuthor(author): CurrentAuthor,
    Form(form): Form<CommentForm>,
) -> ResponseResult<Response> {
    let back = Redirect::to(&format!("/community#discussion-{id}"));

    // Blank comments are dropped without a round trip to the database.
    if form.content.trim().is_empty() {
        return Ok(back.into_response());
    }

    let comment = NewComment {
        content: form.content.trim().to_string(),
        author_id: author.author_id,
    };
    if Comment::create(&state.db, id, comment).await?.is_none() {
        return Ok(not_found(NOT_FOUND));
    }

    Ok(back.into_response())
}

pub(crate) async fn like_discussion_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ResponseResult<Response> {
    if Discussion::like(&state.db, id).await?.is_none() {
        return Ok(not_found(NOT_FOUND));
    }

    Ok(Redirect::to(&format!("/community#discussion-{id}")).into_response())
}
