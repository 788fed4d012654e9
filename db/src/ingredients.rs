use color_eyre::Result;
use forms::NewIngredient;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    #[serde(rename = "id")]
    pub ingredient_id: Uuid,
    #[serde(skip)]
    pub recipe_id: Uuid,
    #[serde(skip)]
    pub position: i32,
    pub name: String,
    pub quantity: String,
    pub unit: String,
}

impl From<RecipeIngredient> for NewIngredient {
    fn from(ingredient: RecipeIngredient) -> Self {
        NewIngredient {
            id: Some(ingredient.ingredient_id),
            name: ingredient.name,
            quantity: ingredient.quantity,
            unit: ingredient.unit,
        }
    }
}

impl RecipeIngredient {
    /// Replaces every ingredient of a recipe, keeping the given order. Runs on
    /// the caller's connection so it can share the recipe's transaction.
    ///
    /// A client id is kept only while no other recipe owns it; otherwise the
    /// row gets a fresh one.
    pub async fn save_all_for_recipe(
        conn: &mut PgConnection,
        recipe_id: Uuid,
        ingredients: Vec<NewIngredient>,
    ) -> Result<Vec<Self>> {
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *conn)
            .await?;

        let mut saved = Vec::with_capacity(ingredients.len());
        for (position, ingredient) in (1..).zip(ingredients) {
            let row = sqlx::query_as::<_, RecipeIngredient>(
                r"
                INSERT INTO recipe_ingredients (ingredient_id, recipe_id, position, name, quantity, unit)
                VALUES (
                    CASE
                        WHEN $1::UUID IS NULL
                          OR EXISTS (SELECT 1 FROM recipe_ingredients WHERE ingredient_id = $1)
                        THEN gen_random_uuid()
                        ELSE $1
                    END,
                    $2, $3, $4, $5, $6
                )
                RETURNING ingredient_id, recipe_id, position, name, quantity, unit
                ",
            )
            .bind(ingredient.id)
            .bind(recipe_id)
            .bind(position)
            .bind(ingredient.name)
            .bind(ingredient.quantity)
            .bind(ingredient.unit)
            .fetch_one(&mut *conn)
            .await?;

            saved.push(row);
        }

        Ok(saved)
    }

    pub async fn get_by_recipe(pool: &PgPool, recipe_id: Uuid) -> Result<Vec<Self>> {
        let ingredients = sqlx::query_as::<_, RecipeIngredient>(
            r"
            SELECT ingredient_id, recipe_id, position, name, quantity, unit
            FROM recipe_ingredients
            WHERE recipe_id = $1
            ORDER BY position
            ",
        )
        .bind(recipe_id)
        .fetch_all(pool)
        .await?;

        Ok(ingredients)
    }
}
