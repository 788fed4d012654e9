use chrono::{DateTime, Utc};
use color_eyre::Result;
use forms::{Difficulty, NewRecipe};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    authors::Author, contains_pattern, ingredients::RecipeIngredient, non_blank,
    steps::RecipeStep,
};

const RECIPE_COLUMNS: &str = r"
    recipe_id,
    title,
    description,
    image_urls,
    video_url,
    preparation_time,
    cooking_time,
    servings,
    difficulty,
    categories,
    tags,
    author_id,
    likes,
    created_at,
    updated_at
";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(rename = "id")]
    pub recipe_id: Uuid,
    pub title: String,
    pub description: String,
    pub image_urls: Vec<String>,
    pub video_url: Option<String>,
    pub preparation_time: i32, // minutes
    pub cooking_time: i32,     // minutes
    pub servings: i32,
    #[sqlx(try_from = "String")]
    pub difficulty: Difficulty,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub author_id: Uuid,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A recipe with its author and ordered children, as served by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub author: Option<Author>,
    pub ingredients: Vec<RecipeIngredient>,
    pub steps: Vec<RecipeStep>,
}

impl FullRecipe {
    /// The recipe as an editable request body.
    pub fn to_new_recipe(&self) -> NewRecipe {
        NewRecipe {
            title: self.recipe.title.clone(),
            description: self.recipe.description.clone(),
            image_urls: self.recipe.image_urls.clone(),
            video_url: self.recipe.video_url.clone(),
            preparation_time: Some(self.recipe.preparation_time),
            cooking_time: Some(self.recipe.cooking_time),
            servings: Some(self.recipe.servings),
            difficulty: Some(self.recipe.difficulty),
            ingredients: self.ingredients.iter().cloned().map(Into::into).collect(),
            steps: self.steps.iter().cloned().map(Into::into).collect(),
            categories: self.recipe.categories.clone(),
            tags: self.recipe.tags.clone(),
            author_id: Some(self.recipe.author_id),
            likes: Some(self.recipe.likes),
        }
    }
}

impl Recipe {
    pub fn total_time(&self) -> i32 {
        self.preparation_time.saturating_add(self.cooking_time)
    }

    /// Inserts the recipe and its children in one transaction. Missing
    /// optional fields take the column defaults.
    #[tracing::instrument(skip_all, err)]
    pub async fn create(pool: &PgPool, recipe: NewRecipe) -> Result<FullRecipe> {
        let author_id = recipe
            .author_id
            .ok_or_else(|| color_eyre::eyre::eyre!("Recipe has no author"))?;

        let mut transaction = pool.begin().await?;

        let created = sqlx::query_as::<_, Recipe>(&format!(
            r"
            INSERT INTO recipes (
                title, description, image_urls, video_url, preparation_time,
                cooking_time, servings, difficulty, categories, tags, author_id, likes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {RECIPE_COLUMNS}
            "
        ))
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(&recipe.image_urls)
        .bind(recipe.video_url.as_deref().filter(|url| !url.is_empty()))
        .bind(recipe.preparation_time.unwrap_or(0))
        .bind(recipe.cooking_time.unwrap_or(0))
        .bind(recipe.servings.unwrap_or(1))
        .bind(recipe.difficulty.unwrap_or_default().as_str())
        .bind(&recipe.categories)
        .bind(&recipe.tags)
        .bind(author_id)
        .bind(recipe.likes.unwrap_or(0))
        .fetch_one(&mut *transaction)
        .await?;

        let ingredients = RecipeIngredient::save_all_for_recipe(
            &mut transaction,
            created.recipe_id,
            recipe.ingredients,
        )
        .await?;
        let steps =
            RecipeStep::save_all_for_recipe(&mut transaction, created.recipe_id, recipe.steps)
                .await?;

        transaction.commit().await?;

        let author = Author::get_by_id(pool, author_id).await?;
        Ok(FullRecipe {
            recipe: created,
            author,
            ingredients,
            steps,
        })
    }

    pub async fn get_by_id(pool: &PgPool, recipe_id: Uuid) -> Result<Option<Self>> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE recipe_id = $1"
        ))
        .bind(recipe_id)
        .fetch_optional(pool)
        .await?;

        Ok(recipe)
    }

    pub async fn get_full(pool: &PgPool, recipe_id: Uuid) -> Result<Option<FullRecipe>> {
        let Some(recipe) = Self::get_by_id(pool, recipe_id).await? else {
            return Ok(None);
        };

        Ok(Some(recipe.with_details(pool).await?))
    }

    pub async fn with_details(self, pool: &PgPool) -> Result<FullRecipe> {
        let author = Author::get_by_id(pool, self.author_id).await?;
        let ingredients = RecipeIngredient::get_by_recipe(pool, self.recipe_id).await?;
        let steps = RecipeStep::get_by_recipe(pool, self.recipe_id).await?;

        Ok(FullRecipe {
            recipe: self,
            author,
            ingredients,
            steps,
        })
    }

    /// Newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>> {
        let recipes = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(recipes)
    }

    pub async fn list_full(pool: &PgPool) -> Result<Vec<FullRecipe>> {
        let recipes = Self::list_all(pool).await?;

        let mut full = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            full.push(recipe.with_details(pool).await?);
        }

        Ok(full)
    }

    pub async fn list_by_author(pool: &PgPool, author_id: Uuid) -> Result<Vec<Self>> {
        let recipes = sqlx::query_as::<_, Recipe>(&format!(
            r"
            SELECT {RECIPE_COLUMNS}
            FROM recipes
            WHERE author_id = $1
            ORDER BY created_at DESC
            "
        ))
        .bind(author_id)
        .fetch_all(pool)
        .await?;

        Ok(recipes)
    }

    /// Replaces every field and child list. `None` when the recipe doesn't
    /// exist. The author and like count are kept as stored.
    #[tracing::instrument(skip(pool, recipe), err)]
    pub async fn update(
        pool: &PgPool,
        recipe_id: Uuid,
        recipe: NewRecipe,
    ) -> Result<Option<FullRecipe>> {
        let mut transaction = pool.begin().await?;

        let updated = sqlx::query_as::<_, Recipe>(&format!(
            r"
            UPDATE recipes
            SET title = $2,
                description = $3,
                image_urls = $4,
                video_url = $5,
                preparation_time = $6,
                cooking_time = $7,
                servings = $8,
                difficulty = $9,
                categories = $10,
                tags = $11,
                updated_at = NOW()
            WHERE recipe_id = $1
            RETURNING {RECIPE_COLUMNS}
            "
        ))
        .bind(recipe_id)
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(&recipe.image_urls)
        .bind(recipe.video_url.as_deref().filter(|url| !url.is_empty()))
        .bind(recipe.preparation_time.unwrap_or(0))
        .bind(recipe.cooking_time.unwrap_or(0))
        .bind(recipe.servings.unwrap_or(1))
        .bind(recipe.difficulty.unwrap_or_default().as_str())
        .bind(&recipe.categories)
        .bind(&recipe.tags)
        .fetch_optional(&mut *transaction)
        .await?;

        let Some(updated) = updated else {
            return Ok(None);
        };

        let ingredients =
            RecipeIngredient::save_all_for_recipe(&mut transaction, recipe_id, recipe.ingredients)
                .await?;
        let steps = RecipeStep::save_all_for_recipe(&mut transaction, recipe_id, recipe.steps).await?;

        transaction.commit().await?;

        let author = Author::get_by_id(pool, updated.author_id).await?;
        Ok(Some(FullRecipe {
            recipe: updated,
            author,
            ingredients,
            steps,
        }))
    }

    /// Returns whether a recipe was deleted. Children go with it.
    pub async fn delete(pool: &PgPool, recipe_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// The new like count, or `None` for an unknown recipe.
    pub async fn like(pool: &PgPool, recipe_id: Uuid) -> Result<Option<i32>> {
        let likes = sqlx::query_scalar(
            "UPDATE recipes SET likes = likes + 1 WHERE recipe_id = $1 RETURNING likes",
        )
        .bind(recipe_id)
        .fetch_optional(pool)
        .await?;

        Ok(likes)
    }

    /// Case-insensitive title search, optionally limited to one category.
    /// Blank arguments don't filter.
    pub async fn search(
        pool: &PgPool,
        query: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<Self>> {
        let pattern = non_blank(query).map(contains_pattern);

        let recipes = sqlx::query_as::<_, Recipe>(&format!(
            r"
            SELECT {RECIPE_COLUMNS}
            FROM recipes
            WHERE ($1::TEXT IS NULL OR title ILIKE $1)
              AND ($2::TEXT IS NULL OR EXISTS (
                    SELECT 1 FROM unnest(categories) AS c WHERE lower(c) = lower($2)
                  ))
            ORDER BY created_at DESC
            "
        ))
        .bind(pattern)
        .bind(non_blank(category))
        .fetch_all(pool)
        .await?;

        Ok(recipes)
    }

    /// Other recipes to suggest next to `recipe_id`, newest first.
    pub async fn similar(pool: &PgPool, recipe_id: Uuid, limit: i64) -> Result<Vec<Self>> {
        let recipes = sqlx::query_as::<_, Recipe>(&format!(
            r"
            SELECT {RECIPE_COLUMNS}
            FROM recipes
            WHERE recipe_id <> $1
            ORDER BY created_at DESC
            LIMIT $2
            "
        ))
        .bind(recipe_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(recipes)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM recipes")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
