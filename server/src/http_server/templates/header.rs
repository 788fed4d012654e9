use maud::{html, Markup, Render};

pub fn head(title: &str) -> Markup {
    html! {
      head {
        meta charset="utf-8";
        meta name="viewport" content="width=device-width, initial-scale=1";
        title { (title) " | Tasty Tales" }

        script src="https://cdn.tailwindcss.com" {}

        link rel="preconnect" href="https://fonts.googleapis.com" {}
        link rel="preconnect" href="https://fonts.gstatic.com" crossorigin {}
        link href="https://fonts.googleapis.com/css2?family=Quicksand:wght@300;400;500;600;700&display=swap" rel="stylesheet" {}
      }
    }
}

struct HeaderLink {
    href: &'static str,
    text: &'static str,
}

impl Render for HeaderLink {
    fn render(&self) -> Markup {
        html! {
          li ."mx-4" {
            a href=(self.href) class="hover:text-orange-600" { (self.text) }
          }
        }
    }
}

pub fn header() -> Markup {
    html! {
      header class="border-b bg-white" {
        div class="max-w-5xl mx-auto px-4 flex flex-col md:flex-row items-center justify-between py-4" {
          a href="/" class="text-2xl font-bold text-orange-600" { "Tasty Tales" }

          nav {
            ul class="flex flex-row items-center" {
              (HeaderLink { href: "/recipes", text: "Recipes" })
              (HeaderLink { href: "/learning-plans", text: "Learning Plans" })
              (HeaderLink { href: "/community", text: "Community" })
              (HeaderLink { href: "/categories", text: "Categories" })
              (HeaderLink { href: "/admin", text: "Admin" })
            }
          }
        }
      }
    }
}
