use db::{
    categories::Category, discussions::FullDiscussion, learning_plans::FullLearningPlan,
    recipes::Recipe,
};
use maud::{html, Markup};

const CARD_CLASSES: &str = "block bg-white rounded-lg shadow hover:shadow-md transition overflow-hidden";

fn tag_list(tags: &[String]) -> Markup {
    html! {
      @if !tags.is_empty() {
        ul class="flex flex-wrap gap-2 mt-2" {
          @for tag in tags {
            li class="text-xs bg-orange-50 text-orange-800 rounded-full px-2 py-1" { (tag) }
          }
        }
      }
    }
}

pub fn recipe_card(recipe: &Recipe) -> Markup {
    html! {
      a href={"/recipes/" (recipe.recipe_id)} class=(CARD_CLASSES) data-recipe-id=(recipe.recipe_id) {
        @if let Some(image) = recipe.image_urls.first() {
          img src=(image) alt=(recipe.title) class="w-full h-48 object-cover";
        }
        div class="p-4" {
          h3 class="text-lg font-semibold" { (recipe.title) }
          p class="text-sm text-gray-600 line-clamp-2" { (recipe.description) }
          div class="flex justify-between text-sm text-gray-500 mt-2" {
            span { (recipe.total_time()) " min" }
            span { (recipe.difficulty) }
            span { (recipe.likes) " likes" }
          }
          (tag_list(&recipe.categories))
        }
      }
    }
}

pub fn learning_plan_card(plan: &FullLearningPlan) -> Markup {
    let total = plan.steps.len();
    let completed = plan.completed_steps();

    html! {
      a href={"/learning-plans/" (plan.plan.learning_plan_id)} class=(CARD_CLASSES) {
        @if let Some(image) = &plan.plan.image_url {
          img src=(image) alt=(plan.plan.title) class="w-full h-40 object-cover";
        }
        div class="p-4" {
          h3 class="text-lg font-semibold" { (plan.plan.title) }
          p class="text-sm text-gray-600 line-clamp-2" { (plan.plan.description) }
          div class="flex justify-between text-sm text-gray-500 mt-2" {
            span { (plan.plan.difficulty) }
            @if let Some(duration) = &plan.plan.estimated_duration {
              span { (duration) }
            }
            span { (completed) "/" (total) " steps" }
          }
          @if let Some(author) = &plan.author {
            p class="text-xs text-gray-500 mt-2" { "by " (author.display_name()) }
          }
        }
      }
    }
}

pub fn category_card(category: &Category) -> Markup {
    let filter: String = url::form_urlencoded::byte_serialize(category.name.as_bytes()).collect();

    html! {
      a href={"/recipes?category=" (filter)} class=(CARD_CLASSES) {
        @if let Some(image) = &category.image_url {
          img src=(image) alt=(category.name) class="w-full h-32 object-cover";
        }
        div class="p-4" {
          h3 class="text-lg font-semibold" { (category.name) }
          @if let Some(description) = &category.description {
            p class="text-sm text-gray-600" { (description) }
          }
        }
      }
    }
}

pub fn discussion_card(discussion: &FullDiscussion) -> Markup {
    let d = &discussion.discussion;

    html! {
      article class="bg-white rounded-lg shadow p-4" id={"discussion-" (d.discussion_id)} {
        h3 class="text-lg font-semibold" { (d.title) }
        p class="text-xs text-gray-500" {
          @if let Some(author) = &discussion.author {
            "by " (author.display_name()) " · "
          }
          (d.created_at.format("%b %-d, %Y"))
        }
        p class="mt-2 whitespace-pre-line" { (d.content) }
        @for image in &d.images {
          img src=(image) alt="" class="mt-2 max-h-64 rounded";
        }
        (tag_list(&d.tags))

        div class="flex items-center gap-4 mt-4 text-sm" {
          form method="post" action={"/community/" (d.discussion_id) "/like"} {
            button type="submit" class="text-orange-700" { "♥ " (d.likes) }
          }
          span class="text-gray-500" { (discussion.comments.len()) " comments" }
        }

        @if !discussion.comments.is_empty() {
          ul class="mt-4 space-y-2 border-t pt-2" {
            @for comment in &discussion.comments {
              li class="text-sm" {
                span class="font-semibold" { (comment.author_username) }
                " "
                (comment.content)
              }
            }
          }
        }

        form method="post" action={"/community/" (d.discussion_id) "/comments"} class="flex gap-2 mt-4" {
          input type="text" name="content" placeholder="Add a comment" required class="flex-grow border rounded px-3 py-1";
          button type="submit" class="px-4 py-1 rounded bg-orange-600 text-white" { "Comment" }
        }
      }
    }
}
