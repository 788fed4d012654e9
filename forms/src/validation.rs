use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every rule that failed for a form, in the order the rules were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("{}", join_messages(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// First message recorded against `field`.
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Checks that `value` is present and within `min..=max` characters.
    pub fn check_length(&mut self, field: &str, label: &str, value: &str, min: usize, max: usize) {
        let length = value.trim().chars().count();
        if length == 0 {
            self.add(field, format!("{label} is required"));
        } else if length < min {
            self.add(
                field,
                format!("{label} must be at least {min} characters"),
            );
        } else if length > max {
            self.add(field, format!("{label} cannot exceed {max} characters"));
        }
    }

    pub fn check_required(&mut self, field: &str, label: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, format!("{label} is required"));
        }
    }

    pub fn check_min_words(&mut self, field: &str, label: &str, value: &str, min: usize) {
        if value.trim().is_empty() {
            self.add(field, format!("{label} is required"));
        } else if word_count(value) < min {
            self.add(field, format!("{label} must have at least {min} words"));
        }
    }

    /// Checks a required whole-number field. `too_low` and `too_high` are
    /// the messages for values outside `min..=max`.
    pub fn check_number(
        &mut self,
        field: &str,
        label: &str,
        value: &str,
        (min, too_low): (i32, &str),
        (max, too_high): (i32, &str),
    ) {
        let value = value.trim();
        if value.is_empty() {
            self.add(field, format!("{label} is required"));
            return;
        }

        match value.parse::<i32>() {
            Ok(n) if n < min => self.add(field, too_low),
            Ok(n) if n > max => self.add(field, too_high),
            Ok(_) => {}
            Err(_) => self.add(field, format!("{label} must be a whole number")),
        }
    }

    /// Like `check_number` for a field that is already numeric and may be
    /// left out.
    pub fn check_range(
        &mut self,
        field: &str,
        value: Option<i32>,
        (min, too_low): (i32, &str),
        (max, too_high): (i32, &str),
    ) {
        match value {
            Some(n) if n < min => self.add(field, too_low),
            Some(n) if n > max => self.add(field, too_high),
            _ => {}
        }
    }

    /// Client-supplied ids must not repeat within one body.
    pub fn check_unique_ids(
        &mut self,
        field: &str,
        label: &str,
        ids: impl IntoIterator<Item = Option<Uuid>>,
    ) {
        let mut seen = HashSet::new();
        if ids.into_iter().flatten().any(|id| !seen.insert(id)) {
            self.add(field, format!("{label} ids must be unique"));
        }
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

pub fn word_count(value: &str) -> usize {
    value.split_whitespace().count()
}

pub fn is_letters_and_spaces(value: &str) -> bool {
    value.chars().all(|c| c.is_alphabetic() || c == ' ')
}

/// Ingredient names: letters and spaces, plus the hyphens and apostrophes
/// that show up in names like "all-purpose flour".
pub fn is_ingredient_name(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_alphabetic() || matches!(c, ' ' | '-' | '\''))
}

/// Quantities are kept as text so that "1/2" and "1.5" both survive.
pub fn is_quantity(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '/' | '.'))
}

/// Splits a comma-separated form field, trimming entries and dropping
/// empty ones.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

pub fn parse_or(value: &str, default: i32) -> i32 {
    value.trim().parse().unwrap_or(default)
}
