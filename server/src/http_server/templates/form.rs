use forms::ValidationErrors;
use maud::{html, Markup};
use serde::{de::DeserializeOwned, Serialize};

/// Name of the hidden field that carries a form's draft between requests.
pub(crate) const DRAFT_FIELD: &str = "draft";

const INPUT_CLASSES: &str = "w-full border rounded px-3 py-2 mt-1";

pub(crate) fn hidden_draft<T: Serialize>(draft: &T) -> crate::Result<Markup> {
    let encoded = serde_json::to_string(draft)?;

    Ok(html! {
      input type="hidden" name=(DRAFT_FIELD) value=(encoded);
    })
}

/// The posted draft, or `None` when it is missing or unreadable.
pub(crate) fn read_draft<T: DeserializeOwned>(raw: Option<&str>) -> Option<T> {
    let raw = raw?;

    match serde_json::from_str(raw) {
        Ok(draft) => Some(draft),
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable form draft");
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FlashKind {
    Success,
    Error,
}

pub(crate) fn flash(kind: FlashKind, message: &str) -> Markup {
    let classes = match kind {
        FlashKind::Success => "bg-green-50 border-green-300 text-green-800",
        FlashKind::Error => "bg-red-50 border-red-300 text-red-800",
    };

    html! {
      div role="alert" class={"border rounded px-4 py-3 mb-6 " (classes)} {
        (message)
      }
    }
}

pub(crate) fn error_list(errors: Option<&ValidationErrors>) -> Markup {
    html! {
      @if let Some(errors) = errors.filter(|e| !e.is_empty()) {
        div role="alert" class="border rounded px-4 py-3 mb-6 bg-red-50 border-red-300 text-red-800" {
          p class="font-semibold" { "Please fix the following:" }
          ul class="list-disc ml-6" {
            @for error in errors.iter() {
              li { (error.message) }
            }
          }
        }
      }
    }
}

fn field_error(errors: Option<&ValidationErrors>, name: &str) -> Markup {
    html! {
      @if let Some(message) = errors.and_then(|e| e.for_field(name)) {
        p class="text-sm text-red-700 mt-1" { (message) }
      }
    }
}

pub(crate) fn text_input(
    label: &str,
    name: &str,
    value: &str,
    errors: Option<&ValidationErrors>,
) -> Markup {
    html! {
      label class="block mb-4" {
        span class="font-medium" { (label) }
        input type="text" name=(name) value=(value) class=(INPUT_CLASSES);
        (field_error(errors, name))
      }
    }
}

pub(crate) fn textarea(
    label: &str,
    name: &str,
    value: &str,
    errors: Option<&ValidationErrors>,
) -> Markup {
    html! {
      label class="block mb-4" {
        span class="font-medium" { (label) }
        textarea name=(name) rows="4" class=(INPUT_CLASSES) { (value) }
        (field_error(errors, name))
      }
    }
}

/// A `<select>` over every variant, with `selected` preselected.
pub(crate) fn select<T: std::fmt::Display + PartialEq>(
    label: &str,
    name: &str,
    options: &[T],
    selected: &T,
) -> Markup {
    html! {
      label class="block mb-4" {
        span class="font-medium" { (label) }
        select name=(name) class=(INPUT_CLASSES) {
          @for option in options {
            option value=(option) selected[option == selected] { (option) }
          }
        }
      }
    }
}
