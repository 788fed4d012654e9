use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a fieldless enum stored as text: `Display`, `FromStr` and
/// `TryFrom<String>` all use the variant name verbatim.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, [$first:ident $(, $variant:ident)* $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $first,
            $($variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$name::$first $(, $name::$variant)*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $name::$first => stringify!($first),
                    $($name::$variant => stringify!($variant),)*
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$first
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .find(|v| v.as_str() == s)
                    .copied()
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

text_enum!(
    /// How hard a recipe is to cook.
    Difficulty,
    "difficulty",
    [Easy, Medium, Hard]
);

text_enum!(
    /// The level a learning plan is aimed at.
    PlanDifficulty,
    "plan difficulty",
    [Beginner, Intermediate, Advanced]
);

text_enum!(ResourceType, "resource type", [Video, Blog, Book, Other]);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_and_displays_variant_names() {
        assert_eq!("Medium".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert_eq!(PlanDifficulty::Advanced.to_string(), "Advanced");
        assert_eq!(
            ResourceType::try_from("Book".to_string()),
            Ok(ResourceType::Book)
        );
    }

    #[test]
    fn rejects_unknown_variants() {
        let err = "medium".parse::<Difficulty>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown difficulty: medium");
    }

    #[test]
    fn defaults_to_the_first_variant() {
        assert_eq!(Difficulty::default(), Difficulty::Easy);
        assert_eq!(PlanDifficulty::default(), PlanDifficulty::Beginner);
    }
}
