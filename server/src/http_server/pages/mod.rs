use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use forms::{
    DiscussionDraft, FormAction, Inputs, LearningPlanDraft, RecipeDraft, ValidationErrors,
};
use maud::Markup;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::templates::{
    form::{flash, read_draft, FlashKind, DRAFT_FIELD},
    not_found_page,
};

pub(crate) mod admin;
pub(crate) mod categories;
pub(crate) mod community;
pub(crate) mod home;
pub(crate) mod learning_plans;
pub(crate) mod profile;
pub(crate) mod recipes;

/// A draft that a page round-trips through its hidden field.
pub(crate) trait Draft: Default + Serialize + DeserializeOwned {
    fn apply_inputs(&mut self, inputs: &Inputs);

    /// List editor actions. Forms without one ignore them.
    fn apply(&mut self, _action: FormAction) -> bool {
        false
    }

    fn validate(&self) -> Result<(), ValidationErrors>;
}

impl Draft for RecipeDraft {
    fn apply_inputs(&mut self, inputs: &Inputs) {
        RecipeDraft::apply_inputs(self, inputs);
    }

    fn apply(&mut self, action: FormAction) -> bool {
        RecipeDraft::apply(self, action)
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        RecipeDraft::validate(self)
    }
}

impl Draft for LearningPlanDraft {
    fn apply_inputs(&mut self, inputs: &Inputs) {
        LearningPlanDraft::apply_inputs(self, inputs);
    }

    fn apply(&mut self, action: FormAction) -> bool {
        LearningPlanDraft::apply(self, action)
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        LearningPlanDraft::validate(self)
    }
}

impl Draft for DiscussionDraft {
    fn apply_inputs(&mut self, inputs: &Inputs) {
        DiscussionDraft::apply_inputs(self, inputs);
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        DiscussionDraft::validate(self)
    }
}

/// What a posted form asks for next.
#[derive(Debug)]
pub(crate) enum Posted<D> {
    /// A list editor button was pressed; show the form again.
    Edited(D),
    Invalid(D, ValidationErrors),
    Ready(D),
}

/// Rebuilds the draft from the hidden field and the visible inputs, then
/// applies the pressed button. A missing `action` is a plain submit.
pub(crate) fn read_posted<D: Draft>(inputs: &Inputs) -> Posted<D> {
    let mut draft: D = read_draft(inputs.get(DRAFT_FIELD).map(String::as_str)).unwrap_or_default();
    draft.apply_inputs(inputs);

    let action = match inputs.get("action").map(|a| a.parse::<FormAction>()) {
        None => FormAction::Submit,
        Some(Ok(action)) => action,
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Ignoring unknown form action");
            return Posted::Edited(draft);
        }
    };

    if action != FormAction::Submit {
        draft.apply(action);
        return Posted::Edited(draft);
    }

    match draft.validate() {
        Ok(()) => Posted::Ready(draft),
        Err(errors) => Posted::Invalid(draft, errors),
    }
}

/// Set on redirects after a successful write so the next page can say so.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Notice {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NoticeQuery {
    pub notice: Option<Notice>,
}

impl NoticeQuery {
    pub fn banner(&self, noun: &str) -> Option<Markup> {
        let verb = match self.notice? {
            Notice::Created => "created",
            Notice::Updated => "updated",
            Notice::Deleted => "deleted",
        };

        Some(flash(FlashKind::Success, &format!("{noun} {verb} successfully!")))
    }
}

pub(crate) fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, not_found_page(message)).into_response()
}
