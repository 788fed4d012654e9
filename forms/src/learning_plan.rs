use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    action::FormAction,
    dto::{NewLearningPlan, NewLearningStep, NewResource},
    inputs::{record_inputs, Inputs},
    model::{PlanDifficulty, ResourceType},
    ordered_list::{ListItem, OrderedList},
    validation::{split_list, ValidationErrors},
};

pub const DEFAULT_DURATION: &str = "2 weeks";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDraft {
    pub id: Uuid,
    pub title: String,
    pub resource_type: ResourceType,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceField {
    Title,
    Type,
    Url,
}

impl ResourceField {
    pub fn key(self) -> &'static str {
        match self {
            ResourceField::Title => "title",
            ResourceField::Type => "type",
            ResourceField::Url => "url",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        [ResourceField::Title, ResourceField::Type, ResourceField::Url]
            .into_iter()
            .find(|f| f.key() == key)
    }
}

impl ListItem for ResourceDraft {
    type Field = ResourceField;

    fn id(&self) -> Uuid {
        self.id
    }

    fn blank(id: Uuid, _order: u32) -> Self {
        ResourceDraft {
            id,
            title: String::new(),
            resource_type: ResourceType::Video,
            url: String::new(),
        }
    }

    fn set_order(&mut self, _order: u32) {}

    fn set_field(&mut self, field: ResourceField, value: &str) -> bool {
        match field {
            ResourceField::Title => self.title = value.to_string(),
            ResourceField::Url => self.url = value.trim().to_string(),
            ResourceField::Type => match value.parse() {
                Ok(resource_type) => self.resource_type = resource_type,
                Err(_) => return false,
            },
        }
        true
    }
}

impl From<ResourceDraft> for NewResource {
    fn from(resource: ResourceDraft) -> Self {
        NewResource {
            id: Some(resource.id),
            title: resource.title.trim().to_string(),
            resource_type: resource.resource_type,
            url: resource.url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningStepDraft {
    pub id: Uuid,
    pub order: u32,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub resources: OrderedList<ResourceDraft>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningStepField {
    Title,
    Description,
}

impl LearningStepField {
    pub fn key(self) -> &'static str {
        match self {
            LearningStepField::Title => "title",
            LearningStepField::Description => "description",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        [LearningStepField::Title, LearningStepField::Description]
            .into_iter()
            .find(|f| f.key() == key)
    }
}

impl ListItem for LearningStepDraft {
    type Field = LearningStepField;

    fn id(&self) -> Uuid {
        self.id
    }

    fn blank(id: Uuid, order: u32) -> Self {
        LearningStepDraft {
            id,
            order,
            title: String::new(),
            description: String::new(),
            completed: false,
            resources: OrderedList::with_minimum(1),
        }
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }

    fn set_field(&mut self, field: LearningStepField, value: &str) -> bool {
        match field {
            LearningStepField::Title => self.title = value.to_string(),
            LearningStepField::Description => self.description = value.to_string(),
        }
        true
    }
}

impl From<LearningStepDraft> for NewLearningStep {
    fn from(step: LearningStepDraft) -> Self {
        NewLearningStep {
            id: Some(step.id),
            order: Some(i32::try_from(step.order).unwrap_or(i32::MAX)),
            title: step.title.trim().to_string(),
            description: Some(step.description.trim().to_string()),
            completed: step.completed,
            resources: step.resources.into_dto(),
        }
    }
}

/// The add / edit learning plan form. A plan always keeps at least one step,
/// and every step at least one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPlanDraft {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub difficulty: PlanDifficulty,
    pub estimated_duration: String,
    pub categories: String,
    pub steps: OrderedList<LearningStepDraft>,
}

impl Default for LearningPlanDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl LearningPlanDraft {
    pub fn new() -> Self {
        LearningPlanDraft {
            title: String::new(),
            description: String::new(),
            image_url: String::new(),
            difficulty: PlanDifficulty::Beginner,
            estimated_duration: DEFAULT_DURATION.to_string(),
            categories: String::new(),
            steps: OrderedList::with_minimum(1),
        }
    }

    pub fn from_learning_plan(plan: NewLearningPlan) -> Self {
        let mut steps = plan.steps;
        steps.sort_by_key(|s| s.order.unwrap_or(i32::MAX));
        let steps = steps
            .into_iter()
            .map(|step| {
                let resources = step
                    .resources
                    .into_iter()
                    .map(|r| ResourceDraft {
                        id: r.id.unwrap_or_else(Uuid::new_v4),
                        title: r.title,
                        resource_type: r.resource_type,
                        url: r.url,
                    })
                    .collect();

                LearningStepDraft {
                    id: step.id.unwrap_or_else(Uuid::new_v4),
                    order: 0,
                    title: step.title,
                    description: step.description.unwrap_or_default(),
                    completed: step.completed,
                    resources: OrderedList::from_items(resources, 1),
                }
            })
            .collect();

        LearningPlanDraft {
            title: plan.title,
            description: plan.description,
            image_url: plan.image_url.unwrap_or_default(),
            difficulty: plan.difficulty.unwrap_or_default(),
            estimated_duration: plan
                .estimated_duration
                .unwrap_or_else(|| DEFAULT_DURATION.to_string()),
            categories: plan.categories.join(", "),
            steps: OrderedList::from_items(steps, 1),
        }
    }

    pub fn apply(&mut self, action: FormAction) -> bool {
        match action {
            FormAction::AddStep => {
                self.steps.add();
                true
            }
            FormAction::RemoveStep(id) => self.steps.remove(id),
            FormAction::MoveStepUp(id) => self.steps.move_up(id),
            FormAction::MoveStepDown(id) => self.steps.move_down(id),
            FormAction::AddResource(step_id) => match self.steps.get_mut(step_id) {
                Some(step) => {
                    step.resources.add();
                    true
                }
                None => false,
            },
            FormAction::RemoveResource(step_id, resource_id) => self
                .steps
                .get_mut(step_id)
                .is_some_and(|step| step.resources.remove(resource_id)),
            FormAction::AddIngredient | FormAction::RemoveIngredient(_) | FormAction::Submit => {
                false
            }
        }
    }

    pub fn update_step(&mut self, id: Uuid, field: LearningStepField, value: &str) -> bool {
        self.steps.update(id, field, value)
    }

    /// Routed through the step's own resource list, so the same checks apply.
    pub fn update_resource(
        &mut self,
        step_id: Uuid,
        resource_id: Uuid,
        field: ResourceField,
        value: &str,
    ) -> bool {
        self.steps
            .get_mut(step_id)
            .is_some_and(|step| step.resources.update(resource_id, field, value))
    }

    pub fn apply_inputs(&mut self, inputs: &Inputs) {
        let scalars: [(&str, &mut String); 5] = [
            ("title", &mut self.title),
            ("description", &mut self.description),
            ("image_url", &mut self.image_url),
            ("estimated_duration", &mut self.estimated_duration),
            ("categories", &mut self.categories),
        ];
        for (name, field) in scalars {
            if let Some(value) = inputs.get(name) {
                field.clone_from(value);
            }
        }

        if let Some(difficulty) = inputs.get("difficulty").and_then(|d| d.parse().ok()) {
            self.difficulty = difficulty;
        }

        for (name, value) in record_inputs(inputs) {
            match (name.prefix, name.ids.as_slice()) {
                ("step", [id]) => {
                    if let Some(field) = LearningStepField::from_key(name.key) {
                        self.update_step(*id, field, value);
                    }
                }
                ("resource", [step_id, resource_id]) => {
                    if let Some(field) = ResourceField::from_key(name.key) {
                        self.update_resource(*step_id, *resource_id, field, value);
                    }
                }
                _ => {}
            }
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.check_required("title", "Title", &self.title);
        errors.check_required("description", "Description", &self.description);

        if self
            .steps
            .iter()
            .any(|s| s.title.trim().is_empty() || s.description.trim().is_empty())
        {
            errors.add("steps", "Please fill in all step titles and descriptions");
        }

        if self
            .steps
            .iter()
            .flat_map(|s| s.resources.iter())
            .any(|r| r.title.trim().is_empty() || r.url.trim().is_empty())
        {
            errors.add("resources", "Please fill in all resource titles and URLs");
        }

        errors.into_result()
    }

    pub fn into_new_learning_plan(self, author_id: Uuid) -> NewLearningPlan {
        NewLearningPlan {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            image_url: Some(self.image_url.trim().to_string()).filter(|url| !url.is_empty()),
            author_id: Some(author_id),
            steps: self.steps.into_dto(),
            categories: split_list(&self.categories),
            difficulty: Some(self.difficulty),
            estimated_duration: Some(self.estimated_duration.trim().to_string())
                .filter(|d| !d.is_empty()),
        }
    }
}
