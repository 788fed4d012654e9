use maud::{html, Markup, DOCTYPE};

pub(crate) mod buttons;
pub(crate) mod cards;
pub(crate) mod footer;
pub(crate) mod form;
pub(crate) mod header;

pub(crate) const MAX_WIDTH_CONTAINER_CLASSES: &str = "max-w-5xl mx-auto px-4";

pub fn base(title: &str, inner: Markup) -> Markup {
    html! {
      (DOCTYPE)
      html lang="en" {
        (header::head(title))

        body class="bg-background text-text font-sans min-h-screen flex flex-col" {
          (header::header())

          main class={"flex-grow w-full py-8 " (MAX_WIDTH_CONTAINER_CLASSES)} {
            (inner)
          }

          (footer::footer())
        }
      }
    }
}

/// Fallback when nothing else matched.
pub fn not_found_page(message: &str) -> Markup {
    base(
        "Not found",
        html! {
          div class="text-center py-24" {
            h1 class="text-3xl font-bold mb-4" { "Not found" }
            p class="mb-8" { (message) }
            (buttons::LinkButton::primary(html! { "Back to the kitchen" }, "/"))
          }
        },
    )
}
