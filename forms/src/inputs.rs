//! Names of the HTML inputs that edit list records.
//!
//! A record field is posted as `<prefix>.<id>[.<id>].<key>`, for example
//! `ingredient.5f0c...e1.quantity` or `resource.<step id>.<resource id>.url`.

use std::collections::HashMap;

use uuid::Uuid;

/// Raw form fields as posted by the browser.
pub type Inputs = HashMap<String, String>;

pub fn input_name(prefix: &str, ids: &[Uuid], key: &str) -> String {
    let mut name = String::from(prefix);
    for id in ids {
        name.push('.');
        name.push_str(&id.to_string());
    }
    name.push('.');
    name.push_str(key);
    name
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputName<'a> {
    pub prefix: &'a str,
    pub ids: Vec<Uuid>,
    pub key: &'a str,
}

pub fn parse_input_name(name: &str) -> Option<InputName<'_>> {
    let mut parts: Vec<&str> = name.split('.').collect();
    if parts.len() < 3 {
        return None;
    }

    let key = parts.pop()?;
    let prefix = parts.remove(0);
    let ids = parts
        .into_iter()
        .map(Uuid::parse_str)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;

    Some(InputName { prefix, ids, key })
}

/// Every record-field input in `inputs`, parsed, paired with its value.
pub(crate) fn record_inputs(inputs: &Inputs) -> impl Iterator<Item = (InputName<'_>, &str)> {
    inputs
        .iter()
        .filter_map(|(name, value)| Some((parse_input_name(name)?, value.as_str())))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names_parse_back() {
        let step = Uuid::new_v4();
        let resource = Uuid::new_v4();
        let name = input_name("resource", &[step, resource], "url");

        assert_eq!(
            parse_input_name(&name),
            Some(InputName {
                prefix: "resource",
                ids: vec![step, resource],
                key: "url",
            })
        );
    }

    #[test]
    fn scalar_fields_are_not_record_inputs() {
        assert_eq!(parse_input_name("title"), None);
        assert_eq!(parse_input_name("ingredient.not-an-id.name"), None);
    }
}
