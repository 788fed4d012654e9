use maud::{html, Markup};

use super::MAX_WIDTH_CONTAINER_CLASSES;

pub fn footer() -> Markup {
    html! {
      footer ."min-h-[100px] bg-gray-900 text-gray-200 mt-16" {
        div ."flex flex-col sm:flex-row items-center py-8 gap-4 ".(MAX_WIDTH_CONTAINER_CLASSES) {
          div class="flex-grow" {
            p class="font-semibold" { "Tasty Tales" }
            p class="text-sm text-gray-400" { "Share recipes. Learn to cook. Eat well." }
          }

          ul class="flex flex-row space-x-6 text-sm" {
            li { a href="/recipes/new" { "Share a recipe" } }
            li { a href="/learning-plans/new" { "Create a plan" } }
            li { a href="/discussions/new" { "Start a discussion" } }
          }
        }
      }
    }
}
