//! Form state for the recipe, learning plan and discussion pages, and the
//! request bodies those forms produce.
//!
//! Nothing in here does I/O: drafts are plain data that round-trip through a
//! hidden form field between requests.

pub mod action;
pub mod discussion;
pub mod dto;
pub mod inputs;
pub mod learning_plan;
pub mod model;
pub mod ordered_list;
pub mod recipe;
pub mod validation;

pub use action::FormAction;
pub use discussion::DiscussionDraft;
pub use dto::{
    LoginRequest, LoginResponse, NewAdminUser, NewCategory, NewComment, NewDiscussion,
    NewIngredient, NewLearningPlan, NewLearningStep, NewRecipe, NewResource, NewStep,
};
pub use inputs::Inputs;
pub use learning_plan::LearningPlanDraft;
pub use model::{Difficulty, PlanDifficulty, ResourceType};
pub use ordered_list::{ListItem, OrderedList};
pub use recipe::RecipeDraft;
pub use validation::{FieldError, ValidationErrors};
