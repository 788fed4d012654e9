use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    action::FormAction,
    dto::{NewIngredient, NewRecipe, NewStep, MAX_MINUTES, MAX_SERVINGS},
    inputs::{record_inputs, Inputs},
    model::Difficulty,
    ordered_list::{ListItem, OrderedList},
    validation::{
        is_ingredient_name, is_letters_and_spaces, is_quantity, parse_or, split_list,
        ValidationErrors,
    },
};

pub const MAX_IMAGES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientDraft {
    pub id: Uuid,
    pub name: String,
    pub quantity: String,
    pub unit: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientField {
    Name,
    Quantity,
    Unit,
}

impl IngredientField {
    pub const ALL: [IngredientField; 3] = [Self::Name, Self::Quantity, Self::Unit];

    pub fn key(self) -> &'static str {
        match self {
            IngredientField::Name => "name",
            IngredientField::Quantity => "quantity",
            IngredientField::Unit => "unit",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl ListItem for IngredientDraft {
    type Field = IngredientField;

    fn id(&self) -> Uuid {
        self.id
    }

    fn blank(id: Uuid, _order: u32) -> Self {
        IngredientDraft {
            id,
            name: String::new(),
            quantity: String::new(),
            unit: String::new(),
        }
    }

    // Ingredients are ordered by position alone.
    fn set_order(&mut self, _order: u32) {}

    fn set_field(&mut self, field: IngredientField, value: &str) -> bool {
        match field {
            IngredientField::Name if is_ingredient_name(value) => self.name = value.to_string(),
            IngredientField::Quantity if is_quantity(value) => self.quantity = value.to_string(),
            IngredientField::Unit if is_letters_and_spaces(value) => self.unit = value.to_string(),
            _ => return false,
        }
        true
    }
}

impl From<IngredientDraft> for NewIngredient {
    fn from(ingredient: IngredientDraft) -> Self {
        NewIngredient {
            id: Some(ingredient.id),
            name: ingredient.name.trim().to_string(),
            quantity: ingredient.quantity.trim().to_string(),
            unit: ingredient.unit.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDraft {
    pub id: Uuid,
    pub order: u32,
    pub instruction: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepField {
    Instruction,
    ImageUrl,
}

impl StepField {
    pub fn key(self) -> &'static str {
        match self {
            StepField::Instruction => "instruction",
            StepField::ImageUrl => "image_url",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        [StepField::Instruction, StepField::ImageUrl]
            .into_iter()
            .find(|f| f.key() == key)
    }
}

impl ListItem for StepDraft {
    type Field = StepField;

    fn id(&self) -> Uuid {
        self.id
    }

    fn blank(id: Uuid, order: u32) -> Self {
        StepDraft {
            id,
            order,
            instruction: String::new(),
            image_url: String::new(),
        }
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }

    fn set_field(&mut self, field: StepField, value: &str) -> bool {
        match field {
            StepField::Instruction => self.instruction = value.to_string(),
            StepField::ImageUrl => self.image_url = value.trim().to_string(),
        }
        true
    }
}

impl From<StepDraft> for NewStep {
    fn from(step: StepDraft) -> Self {
        NewStep {
            id: Some(step.id),
            order: Some(i32::try_from(step.order).unwrap_or(i32::MAX)),
            instruction: step.instruction.trim().to_string(),
            image_url: Some(step.image_url).filter(|url| !url.is_empty()),
        }
    }
}

/// The add / edit recipe form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub image_urls: Vec<String>,
    pub video_url: String,
    pub preparation_time: String,
    pub cooking_time: String,
    pub servings: String,
    pub difficulty: Difficulty,
    pub categories: String,
    pub tags: String,
    pub ingredients: OrderedList<IngredientDraft>,
    pub steps: OrderedList<StepDraft>,
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeDraft {
    pub fn new() -> Self {
        RecipeDraft {
            title: String::new(),
            description: String::new(),
            image_urls: Vec::new(),
            video_url: String::new(),
            preparation_time: String::new(),
            cooking_time: String::new(),
            servings: String::new(),
            difficulty: Difficulty::Easy,
            categories: String::new(),
            tags: String::new(),
            ingredients: OrderedList::new(),
            steps: OrderedList::new(),
        }
    }

    /// Prefills the edit form from a stored recipe.
    pub fn from_recipe(recipe: NewRecipe) -> Self {
        let ingredients = recipe
            .ingredients
            .into_iter()
            .map(|i| IngredientDraft {
                id: i.id.unwrap_or_else(Uuid::new_v4),
                name: i.name,
                quantity: i.quantity,
                unit: i.unit,
            })
            .collect();

        let mut steps = recipe.steps;
        steps.sort_by_key(|s| s.order.unwrap_or(i32::MAX));
        let steps = steps
            .into_iter()
            .map(|s| StepDraft {
                id: s.id.unwrap_or_else(Uuid::new_v4),
                order: 0,
                instruction: s.instruction,
                image_url: s.image_url.unwrap_or_default(),
            })
            .collect();

        RecipeDraft {
            title: recipe.title,
            description: recipe.description,
            image_urls: recipe.image_urls,
            video_url: recipe.video_url.unwrap_or_default(),
            preparation_time: recipe.preparation_time.map(|n| n.to_string()).unwrap_or_default(),
            cooking_time: recipe.cooking_time.map(|n| n.to_string()).unwrap_or_default(),
            servings: recipe.servings.map(|n| n.to_string()).unwrap_or_default(),
            difficulty: recipe.difficulty.unwrap_or_default(),
            categories: recipe.categories.join(", "),
            tags: recipe.tags.join(", "),
            ingredients: OrderedList::from_items(ingredients, 0),
            steps: OrderedList::from_items(steps, 0),
        }
    }

    /// Returns whether the draft changed. Actions that belong to other forms
    /// are ignored.
    pub fn apply(&mut self, action: FormAction) -> bool {
        match action {
            FormAction::AddIngredient => {
                self.ingredients.add();
                true
            }
            FormAction::RemoveIngredient(id) => self.ingredients.remove(id),
            FormAction::AddStep => {
                self.steps.add();
                true
            }
            FormAction::RemoveStep(id) => self.steps.remove(id),
            FormAction::MoveStepUp(id) => self.steps.move_up(id),
            FormAction::MoveStepDown(id) => self.steps.move_down(id),
            FormAction::AddResource(_) | FormAction::RemoveResource(..) | FormAction::Submit => {
                false
            }
        }
    }

    pub fn update_ingredient(&mut self, id: Uuid, field: IngredientField, value: &str) -> bool {
        self.ingredients.update(id, field, value)
    }

    pub fn update_step(&mut self, id: Uuid, field: StepField, value: &str) -> bool {
        self.steps.update(id, field, value)
    }

    /// Copies posted input values into the draft. Scalar fields are taken as
    /// typed; record fields go through the list editor's checks.
    pub fn apply_inputs(&mut self, inputs: &Inputs) {
        let scalars: [(&str, &mut String); 8] = [
            ("title", &mut self.title),
            ("description", &mut self.description),
            ("video_url", &mut self.video_url),
            ("preparation_time", &mut self.preparation_time),
            ("cooking_time", &mut self.cooking_time),
            ("servings", &mut self.servings),
            ("categories", &mut self.categories),
            ("tags", &mut self.tags),
        ];
        for (name, field) in scalars {
            if let Some(value) = inputs.get(name) {
                field.clone_from(value);
            }
        }

        if let Some(difficulty) = inputs.get("difficulty").and_then(|d| d.parse().ok()) {
            self.difficulty = difficulty;
        }
        if let Some(images) = inputs.get("image_urls") {
            self.image_urls = images
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(ToString::to_string)
                .collect();
        }

        for (name, value) in record_inputs(inputs) {
            match (name.prefix, name.ids.as_slice()) {
                ("ingredient", [id]) => {
                    if let Some(field) = IngredientField::from_key(name.key) {
                        self.update_ingredient(*id, field, value);
                    }
                }
                ("step", [id]) => {
                    if let Some(field) = StepField::from_key(name.key) {
                        self.update_step(*id, field, value);
                    }
                }
                _ => {}
            }
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.check_length("title", "Title", &self.title, 2, 100);
        errors.check_min_words("description", "Description", &self.description, 10);
        errors.check_number(
            "preparation_time",
            "Preparation time",
            &self.preparation_time,
            (1, "Preparation time must be at least 1 minute"),
            (MAX_MINUTES, "Preparation time cannot exceed 24 hours (1440 minutes)"),
        );
        errors.check_number(
            "cooking_time",
            "Cooking time",
            &self.cooking_time,
            (0, "Cooking time cannot be negative"),
            (MAX_MINUTES, "Cooking time cannot exceed 24 hours (1440 minutes)"),
        );
        errors.check_number(
            "servings",
            "Servings",
            &self.servings,
            (1, "Must serve at least 1 person"),
            (MAX_SERVINGS, "Cannot serve more than 100 people"),
        );

        if self.image_urls.len() > MAX_IMAGES {
            errors.add("image_urls", "You can only upload up to 3 images.");
        }
        if self.ingredients.is_empty() {
            errors.add("ingredients", "Please add at least one ingredient.");
        }
        if self.steps.is_empty() {
            errors.add("steps", "Please add at least one step.");
        }

        errors.into_result()
    }

    /// The body sent on submit. Numbers that don't parse fall back to the
    /// backend defaults.
    pub fn into_new_recipe(self, author_id: Uuid) -> NewRecipe {
        NewRecipe {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            image_urls: self.image_urls,
            video_url: Some(self.video_url.trim().to_string()).filter(|url| !url.is_empty()),
            preparation_time: Some(parse_or(&self.preparation_time, 0)),
            cooking_time: Some(parse_or(&self.cooking_time, 0)),
            servings: Some(parse_or(&self.servings, 1)),
            difficulty: Some(self.difficulty),
            ingredients: self.ingredients.into_dto(),
            steps: self.steps.into_dto(),
            categories: split_list(&self.categories),
            tags: split_list(&self.tags),
            author_id: Some(author_id),
            likes: Some(0),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::inputs::input_name;

    fn filled_draft() -> RecipeDraft {
        let mut draft = RecipeDraft::new();
        draft.title = "Weeknight Pasta".into();
        draft.description =
            "A quick tomato pasta that comes together in the time it takes to boil water.".into();
        draft.preparation_time = "10".into();
        draft.cooking_time = "15".into();
        draft.servings = "4".into();
        draft.apply(FormAction::AddIngredient);
        draft.apply(FormAction::AddStep);
        draft
    }

    #[test]
    fn removing_a_step_reindexes_the_rest() {
        let mut draft = RecipeDraft::new();
        let ids: Vec<Uuid> = (0..3)
            .map(|_| {
                draft.apply(FormAction::AddStep);
                draft.steps.as_slice().last().unwrap().id
            })
            .collect();

        assert!(draft.apply(FormAction::RemoveStep(ids[0])));

        let orders: Vec<u32> = draft.steps.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2]);
        assert_eq!(draft.steps.as_slice()[0].id, ids[1]);
    }

    #[test]
    fn ingredient_updates_are_checked() {
        let mut draft = RecipeDraft::new();
        draft.apply(FormAction::AddIngredient);
        let id = draft.ingredients.as_slice()[0].id;

        assert!(draft.update_ingredient(id, IngredientField::Quantity, "1/2"));
        assert!(!draft.update_ingredient(id, IngredientField::Quantity, "half"));
        assert!(!draft.update_ingredient(id, IngredientField::Unit, "tbsp."));

        let ingredient = draft.ingredients.get(id).unwrap();
        assert_eq!(ingredient.quantity, "1/2");
        assert_eq!(ingredient.unit, "");
    }

    #[test]
    fn inputs_fill_scalars_and_records() {
        let mut draft = RecipeDraft::new();
        draft.apply(FormAction::AddIngredient);
        let id = draft.ingredients.as_slice()[0].id;

        let inputs: Inputs = [
            ("title", "Shakshuka"),
            ("difficulty", "Medium"),
            ("image_urls", "https://img/1.jpg\n\n https://img/2.jpg "),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .chain([
            (input_name("ingredient", &[id], "name"), "Eggs".to_string()),
            (input_name("ingredient", &[id], "unit"), "2 large".to_string()),
        ])
        .collect();

        draft.apply_inputs(&inputs);

        assert_eq!(draft.title, "Shakshuka");
        assert_eq!(draft.difficulty, Difficulty::Medium);
        assert_eq!(draft.image_urls.len(), 2);
        assert_eq!(draft.ingredients.get(id).unwrap().name, "Eggs");
        assert_eq!(draft.ingredients.get(id).unwrap().unit, "");
    }

    #[test]
    fn a_filled_draft_validates() {
        assert_eq!(filled_draft().validate(), Ok(()));
    }

    #[test]
    fn validation_reports_each_rule() {
        let mut draft = RecipeDraft::new();
        draft.title = "A".into();
        draft.description = "Too short".into();
        draft.preparation_time = "0".into();
        draft.cooking_time = "-5".into();
        draft.servings = "101".into();
        draft.image_urls = vec!["a".into(), "b".into(), "c".into(), "d".into()];

        let errors = draft.validate().unwrap_err();

        assert_eq!(
            errors.for_field("title"),
            Some("Title must be at least 2 characters")
        );
        assert_eq!(
            errors.for_field("description"),
            Some("Description must have at least 10 words")
        );
        assert_eq!(
            errors.for_field("preparation_time"),
            Some("Preparation time must be at least 1 minute")
        );
        assert_eq!(
            errors.for_field("cooking_time"),
            Some("Cooking time cannot be negative")
        );
        assert_eq!(
            errors.for_field("servings"),
            Some("Cannot serve more than 100 people")
        );
        assert_eq!(
            errors.for_field("image_urls"),
            Some("You can only upload up to 3 images.")
        );
        assert_eq!(
            errors.for_field("ingredients"),
            Some("Please add at least one ingredient.")
        );
        assert_eq!(
            errors.for_field("steps"),
            Some("Please add at least one step.")
        );
    }

    #[test]
    fn title_over_a_hundred_characters_is_rejected() {
        let mut draft = filled_draft();
        draft.title = "x".repeat(101);

        let errors = draft.validate().unwrap_err();
        assert_eq!(
            errors.for_field("title"),
            Some("Title cannot exceed 100 characters")
        );
    }

    #[test]
    fn dto_assembly_splits_lists_and_defaults_numbers() {
        let mut draft = filled_draft();
        draft.preparation_time = "soon".into();
        draft.cooking_time = String::new();
        draft.servings = "many".into();
        draft.categories = " Italian, ,Quick Meals ".into();
        draft.tags = "pasta,tomato,".into();
        let author = Uuid::new_v4();

        let recipe = draft.into_new_recipe(author);

        assert_eq!(recipe.preparation_time, Some(0));
        assert_eq!(recipe.cooking_time, Some(0));
        assert_eq!(recipe.servings, Some(1));
        assert_eq!(recipe.difficulty, Some(Difficulty::Easy));
        assert_eq!(recipe.categories, vec!["Italian", "Quick Meals"]);
        assert_eq!(recipe.tags, vec!["pasta", "tomato"]);
        assert_eq!(recipe.author_id, Some(author));
        assert_eq!(recipe.video_url, None);
        assert_eq!(recipe.steps[0].order, Some(1));
        assert_eq!(recipe.ingredients.len(), 1);
    }

    #[test]
    fn from_recipe_orders_steps() {
        let recipe = NewRecipe {
            title: "Soup".into(),
            servings: Some(2),
            steps: vec![
                NewStep {
                    order: Some(2),
                    instruction: "Simmer".into(),
                    ..Default::default()
                },
                NewStep {
                    order: Some(1),
                    instruction: "Chop".into(),
                    ..Default::default()
                },
            ],
            categories: vec!["Soups".into(), "Winter".into()],
            ..Default::default()
        };

        let draft = RecipeDraft::from_recipe(recipe);

        let instructions: Vec<&str> = draft.steps.iter().map(|s| s.instruction.as_str()).collect();
        assert_eq!(instructions, vec!["Chop", "Simmer"]);
        assert_eq!(draft.steps.as_slice()[1].order, 2);
        assert_eq!(draft.servings, "2");
        assert_eq!(draft.categories, "Soups, Winter");
    }
}
