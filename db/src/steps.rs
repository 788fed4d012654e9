use color_eyre::Result;
use forms::NewStep;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecipeStep {
    #[serde(rename = "id")]
    pub step_id: Uuid,
    #[serde(skip)]
    pub recipe_id: Uuid,
    #[serde(rename = "order")]
    pub step_order: i32,
    pub instruction: String,
    pub image_url: Option<String>,
}

impl From<RecipeStep> for NewStep {
    fn from(step: RecipeStep) -> Self {
        NewStep {
            id: Some(step.step_id),
            order: Some(step.step_order),
            instruction: step.instruction,
            image_url: step.image_url,
        }
    }
}

/// Sorts by the client's `order` where given (unnumbered items keep their
/// relative position at the end) and pairs each item with its stored
/// 1-based number.
pub(crate) fn renumber<T>(items: Vec<T>, order: impl Fn(&T) -> Option<i32>) -> Vec<(i32, T)> {
    let mut items: Vec<(usize, T)> = items.into_iter().enumerate().collect();
    items.sort_by_key(|(index, item)| (order(item).unwrap_or(i32::MAX), *index));
    (1..).zip(items.into_iter().map(|(_, item)| item)).collect()
}

impl RecipeStep {
    pub async fn save_all_for_recipe(
        conn: &mut PgConnection,
        recipe_id: Uuid,
        steps: Vec<NewStep>,
    ) -> Result<Vec<Self>> {
        sqlx::query("DELETE FROM recipe_steps WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *conn)
            .await?;

        let mut saved = Vec::with_capacity(steps.len());
        for (step_order, step) in renumber(steps, |s| s.order) {
            let row = sqlx::query_as::<_, RecipeStep>(
                r"
                INSERT INTO recipe_steps (step_id, recipe_id, step_order, instruction, image_url)
                VALUES (
                    CASE
                        WHEN $1::UUID IS NULL
                          OR EXISTS (SELECT 1 FROM recipe_steps WHERE step_id = $1)
                        THEN gen_random_uuid()
                        ELSE $1
                    END,
                    $2, $3, $4, $5
                )
                RETURNING step_id, recipe_id, step_order, instruction, image_url
                ",
            )
            .bind(step.id)
            .bind(recipe_id)
            .bind(step_order)
            .bind(step.instruction)
            .bind(step.image_url.filter(|url| !url.is_empty()))
            .fetch_one(&mut *conn)
            .await?;

            saved.push(row);
        }

        Ok(saved)
    }

    pub async fn get_by_recipe(pool: &PgPool, recipe_id: Uuid) -> Result<Vec<Self>> {
        let steps = sqlx::query_as::<_, RecipeStep>(
            r"
            SELECT step_id, recipe_id, step_order, instruction, image_url
            FROM recipe_steps
            WHERE recipe_id = $1
            ORDER BY step_order
            ",
        )
        .bind(recipe_id)
        .fetch_all(pool)
        .await?;

        Ok(steps)
    }
}
