use forms::FormAction;
use maud::{html, Markup, Render};

pub struct LinkButton {
    inner: Markup,
    href: String,
    button_type: ButtonType,
    additional_classes: Option<String>,
}

impl LinkButton {
    pub fn primary(inner: Markup, href: impl Into<String>) -> Self {
        Self {
            inner,
            href: href.into(),
            button_type: ButtonType::Primary,
            additional_classes: None,
        }
    }

    pub fn secondary(inner: Markup, href: impl Into<String>) -> Self {
        Self {
            inner,
            href: href.into(),
            button_type: ButtonType::Secondary,
            additional_classes: None,
        }
    }

    pub fn with_classes(mut self, classes: &str) -> Self {
        self.additional_classes = Some(classes.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ButtonType {
    Primary,
    Secondary,
    Danger,
}

impl ButtonType {
    fn classes(self) -> &'static str {
        match self {
            ButtonType::Primary => "bg-orange-600 text-white hover:bg-orange-700",
            ButtonType::Secondary => "bg-white border hover:bg-gray-50",
            ButtonType::Danger => "bg-white border border-red-300 text-red-700 hover:bg-red-50",
        }
    }
}

fn classes(button_type: ButtonType, additional: Option<&str>) -> String {
    let mut classes = vec![
        "px-6",
        "py-2",
        "rounded",
        "font-semibold",
        "my-2",
        "inline-block",
        button_type.classes(),
    ];

    if let Some(additional) = additional {
        classes.push(additional);
    }

    classes.join(" ")
}

impl Render for LinkButton {
    fn render(&self) -> Markup {
        let classes = classes(self.button_type, self.additional_classes.as_deref());

        html! {
          a href=(self.href) class=(classes) {
            (self.inner)
          }
        }
    }
}

/// A submit button that posts `action=<FormAction>` with the rest of its form.
pub struct ActionButton {
    label: String,
    action: FormAction,
    button_type: ButtonType,
}

impl ActionButton {
    pub fn new(label: impl Into<String>, action: FormAction) -> Self {
        Self {
            label: label.into(),
            action,
            button_type: ButtonType::Secondary,
        }
    }

    pub fn primary(label: impl Into<String>, action: FormAction) -> Self {
        Self {
            button_type: ButtonType::Primary,
            ..Self::new(label, action)
        }
    }

    pub fn danger(label: impl Into<String>, action: FormAction) -> Self {
        Self {
            button_type: ButtonType::Danger,
            ..Self::new(label, action)
        }
    }
}

impl Render for ActionButton {
    fn render(&self) -> Markup {
        let classes = classes(self.button_type, Some("text-sm"));

        html! {
          button type="submit" name="action" value=(self.action) class=(classes) {
            (self.label)
          }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn action_buttons_post_their_action() {
        let id = uuid::Uuid::nil();
        let markup = ActionButton::danger("Remove", FormAction::RemoveStep(id))
            .render()
            .into_string();

        assert!(markup.contains(r#"name="action""#));
        assert!(markup.contains(&format!(r#"value="remove_step:{id}""#)));
        assert!(markup.contains("text-red-700"));
    }
}
