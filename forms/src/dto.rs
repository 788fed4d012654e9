//! Request bodies accepted by the REST API and produced by the drafts on
//! submit. Optional fields are defaulted by the persistence layer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    model::{Difficulty, PlanDifficulty, ResourceType},
    validation::ValidationErrors,
};

/// Upper bound for preparation and cooking times: one day.
pub const MAX_MINUTES: i32 = 1440;
pub const MAX_SERVINGS: i32 = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub video_url: Option<String>,
    pub preparation_time: Option<i32>,
    pub cooking_time: Option<i32>,
    pub servings: Option<i32>,
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub ingredients: Vec<NewIngredient>,
    #[serde(default)]
    pub steps: Vec<NewStep>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author_id: Option<Uuid>,
    pub likes: Option<i32>,
}

impl NewRecipe {
    /// The checks the API applies before anything is written.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_required("title", "Title", &self.title);
        errors.check_required("description", "Description", &self.description);
        if self.author_id.is_none() {
            errors.add("authorId", "Author with valid ID is required");
        }

        errors.check_range(
            "preparationTime",
            self.preparation_time,
            (0, "Preparation time cannot be negative"),
            (MAX_MINUTES, "Preparation time cannot exceed 24 hours (1440 minutes)"),
        );
        errors.check_range(
            "cookingTime",
            self.cooking_time,
            (0, "Cooking time cannot be negative"),
            (MAX_MINUTES, "Cooking time cannot exceed 24 hours (1440 minutes)"),
        );
        errors.check_range(
            "servings",
            self.servings,
            (1, "Must serve at least 1 person"),
            (MAX_SERVINGS, "Cannot serve more than 100 people"),
        );
        if self.likes.is_some_and(|likes| likes < 0) {
            errors.add("likes", "Likes cannot be negative");
        }

        errors.check_unique_ids("ingredients", "Ingredient", self.ingredients.iter().map(|i| i.id));
        errors.check_unique_ids("steps", "Step", self.steps.iter().map(|s| s.id));

        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIngredient {
    pub id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStep {
    pub id: Option<Uuid>,
    pub order: Option<i32>,
    #[serde(default)]
    pub instruction: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLearningPlan {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
    pub author_id: Option<Uuid>,
    #[serde(default)]
    pub steps: Vec<NewLearningStep>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub difficulty: Option<PlanDifficulty>,
    pub estimated_duration: Option<String>,
}

impl NewLearningPlan {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_required("title", "Title", &self.title);
        if self.author_id.is_none() {
            errors.add("authorId", "Author with valid ID is required");
        }

        errors.check_unique_ids("steps", "Step", self.steps.iter().map(|s| s.id));
        errors.check_unique_ids(
            "resources",
            "Resource",
            self.steps
                .iter()
                .flat_map(|s| s.resources.iter().map(|r| r.id)),
        );

        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLearningStep {
    pub id: Option<Uuid>,
    pub order: Option<i32>,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub resources: Vec<NewResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResource {
    pub id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub resource_type: ResourceType,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDiscussion {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author_id: Option<Uuid>,
    pub likes: Option<i32>,
}

impl NewDiscussion {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_required("title", "Title", &self.title);
        errors.check_required("content", "Content", &self.content);
        if self.author_id.is_none() {
            errors.add("authorId", "Author is required");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub content: String,
    pub author_id: Uuid,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Admin signup and profile update body. Every field is optional on the
/// wire so that a missing one can be reported as a 400 instead of a
/// deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewAdminUser {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub id: Uuid,
    pub full_name: String,
}
