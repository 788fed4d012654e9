use std::{fmt, str::FromStr};

use uuid::Uuid;

/// A button press on a form page. Encoded as the `action` value of the
/// submit button, e.g. `remove_step:<uuid>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    AddStep,
    RemoveStep(Uuid),
    AddIngredient,
    RemoveIngredient(Uuid),
    AddResource(Uuid),
    RemoveResource(Uuid, Uuid),
    MoveStepUp(Uuid),
    MoveStepDown(Uuid),
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid form action: {0}")]
pub struct InvalidAction(pub String);

impl fmt::Display for FormAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormAction::AddStep => write!(f, "add_step"),
            FormAction::RemoveStep(id) => write!(f, "remove_step:{id}"),
            FormAction::AddIngredient => write!(f, "add_ingredient"),
            FormAction::RemoveIngredient(id) => write!(f, "remove_ingredient:{id}"),
            FormAction::AddResource(step) => write!(f, "add_resource:{step}"),
            FormAction::RemoveResource(step, resource) => {
                write!(f, "remove_resource:{step}:{resource}")
            }
            FormAction::MoveStepUp(id) => write!(f, "move_step_up:{id}"),
            FormAction::MoveStepDown(id) => write!(f, "move_step_down:{id}"),
            FormAction::Submit => write!(f, "submit"),
        }
    }
}

impl FromStr for FormAction {
    type Err = InvalidAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidAction(s.to_string());
        let mut parts = s.split(':');
        let name = parts.next().ok_or_else(invalid)?;
        let ids = parts
            .map(Uuid::parse_str)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;

        let action = match (name, ids.as_slice()) {
            ("add_step", []) => FormAction::AddStep,
            ("remove_step", [id]) => FormAction::RemoveStep(*id),
            ("add_ingredient", []) => FormAction::AddIngredient,
            ("remove_ingredient", [id]) => FormAction::RemoveIngredient(*id),
            ("add_resource", [step]) => FormAction::AddResource(*step),
            ("remove_resource", [step, resource]) => FormAction::RemoveResource(*step, *resource),
            ("move_step_up", [id]) => FormAction::MoveStepUp(*id),
            ("move_step_down", [id]) => FormAction::MoveStepDown(*id),
            ("submit", []) => FormAction::Submit,
            _ => return Err(invalid()),
        };

        Ok(action)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_what_it_displays() {
        let step = Uuid::new_v4();
        let resource = Uuid::new_v4();

        for action in [
            FormAction::AddStep,
            FormAction::RemoveStep(step),
            FormAction::RemoveResource(step, resource),
            FormAction::MoveStepDown(step),
            FormAction::Submit,
        ] {
            assert_eq!(action.to_string().parse::<FormAction>(), Ok(action));
        }
    }

    #[test]
    fn rejects_missing_or_extra_ids() {
        assert!("remove_step".parse::<FormAction>().is_err());
        assert!("add_step:nope".parse::<FormAction>().is_err());
        assert!(format!("submit:{}", Uuid::new_v4())
            .parse::<FormAction>()
            .is_err());
        assert!("launch".parse::<FormAction>().is_err());
    }
}
