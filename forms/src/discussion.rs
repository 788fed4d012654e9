use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    dto::NewDiscussion,
    inputs::Inputs,
    recipe::MAX_IMAGES,
    validation::{split_list, ValidationErrors},
};

/// The start-a-discussion form. It has no list editor of its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscussionDraft {
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
    pub tags: String,
}

impl DiscussionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_inputs(&mut self, inputs: &Inputs) {
        if let Some(title) = inputs.get("title") {
            self.title.clone_from(title);
        }
        if let Some(content) = inputs.get("content") {
            self.content.clone_from(content);
        }
        if let Some(tags) = inputs.get("tags") {
            self.tags.clone_from(tags);
        }
        if let Some(images) = inputs.get("images") {
            self.images = images
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(ToString::to_string)
                .collect();
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_required("title", "Title", &self.title);
        errors.check_required("content", "Content", &self.content);
        if self.images.len() > MAX_IMAGES {
            errors.add("images", "You can only upload up to 3 images");
        }
        errors.into_result()
    }

    pub fn into_new_discussion(self, author_id: Uuid) -> NewDiscussion {
        NewDiscussion {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            images: self.images,
            tags: split_list(&self.tags),
            author_id: Some(author_id),
            likes: Some(0),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn title_and_content_are_required() {
        let errors = DiscussionDraft::new().validate().unwrap_err();

        assert_eq!(errors.for_field("title"), Some("Title is required"));
        assert_eq!(errors.for_field("content"), Some("Content is required"));
    }

    #[test]
    fn at_most_three_images() {
        let draft = DiscussionDraft {
            title: "Cast iron care".into(),
            content: "How often do you re-season?".into(),
            images: vec!["1".into(), "2".into(), "3".into(), "4".into()],
            tags: String::new(),
        };

        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.for_field("images"),
            Some("You can only upload up to 3 images")
        );
    }

    #[test]
    fn tags_are_split_on_submit() {
        let inputs: Inputs = [
            ("title", " Sourdough help "),
            ("content", "My starter smells like nail polish"),
            ("tags", "bread, sourdough , "),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let mut draft = DiscussionDraft::new();
        draft.apply_inputs(&inputs);

        let discussion = draft.into_new_discussion(Uuid::nil());

        assert_eq!(discussion.title, "Sourdough help");
        assert_eq!(discussion.tags, vec!["bread", "sourdough"]);
        assert_eq!(discussion.likes, Some(0));
    }
}
