use chrono::{DateTime, Utc};
use color_eyre::Result;
use forms::{NewLearningPlan, NewLearningStep, NewResource, PlanDifficulty, ResourceType};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::{authors::Author, contains_pattern, non_blank, steps::renumber};

const PLAN_COLUMNS: &str = r"
    learning_plan_id,
    title,
    description,
    image_url,
    author_id,
    categories,
    difficulty,
    estimated_duration,
    created_at,
    updated_at
";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LearningPlan {
    #[serde(rename = "id")]
    pub learning_plan_id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub author_id: Uuid,
    pub categories: Vec<String>,
    #[sqlx(try_from = "String")]
    pub difficulty: PlanDifficulty,
    pub estimated_duration: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LearningStep {
    #[serde(rename = "id")]
    pub learning_step_id: Uuid,
    #[serde(skip)]
    pub learning_plan_id: Uuid,
    #[serde(rename = "order")]
    pub step_order: i32,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LearningResource {
    #[serde(rename = "id")]
    pub resource_id: Uuid,
    #[serde(skip)]
    pub learning_step_id: Uuid,
    #[serde(skip)]
    pub position: i32,
    pub title: String,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub resource_type: ResourceType,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullLearningStep {
    #[serde(flatten)]
    pub step: LearningStep,
    pub resources: Vec<LearningResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullLearningPlan {
    #[serde(flatten)]
    pub plan: LearningPlan,
    pub author: Option<Author>,
    pub steps: Vec<FullLearningStep>,
}

impl FullLearningPlan {
    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.step.completed).count()
    }

    pub fn to_new_learning_plan(&self) -> NewLearningPlan {
        NewLearningPlan {
            title: self.plan.title.clone(),
            description: self.plan.description.clone(),
            image_url: self.plan.image_url.clone(),
            author_id: Some(self.plan.author_id),
            steps: self
                .steps
                .iter()
                .map(|s| NewLearningStep {
                    id: Some(s.step.learning_step_id),
                    order: Some(s.step.step_order),
                    title: s.step.title.clone(),
                    description: s.step.description.clone(),
                    completed: s.step.completed,
                    resources: s
                        .resources
                        .iter()
                        .map(|r| NewResource {
                            id: Some(r.resource_id),
                            title: r.title.clone(),
                            resource_type: r.resource_type,
                            url: r.url.clone(),
                        })
                        .collect(),
                })
                .collect(),
            categories: self.plan.categories.clone(),
            difficulty: Some(self.plan.difficulty),
            estimated_duration: self.plan.estimated_duration.clone(),
        }
    }
}

impl LearningStep {
    /// Replaces every step (and so every resource) of a plan. Steps are
    /// stored in the order received and numbered from 1. Ids already owned by
    /// another plan are swapped for fresh ones.
    pub async fn save_all_for_plan(
        conn: &mut PgConnection,
        learning_plan_id: Uuid,
        steps: Vec<NewLearningStep>,
    ) -> Result<Vec<FullLearningStep>> {
        sqlx::query("DELETE FROM learning_steps WHERE learning_plan_id = $1")
            .bind(learning_plan_id)
            .execute(&mut *conn)
            .await?;

        let mut saved = Vec::with_capacity(steps.len());
        for (step_order, step) in renumber(steps, |s| s.order) {
            let row = sqlx::query_as::<_, LearningStep>(
                r"
                INSERT INTO learning_steps (
                    learning_step_id, learning_plan_id, step_order, title, description, completed
                )
                VALUES (
                    CASE
                        WHEN $1::UUID IS NULL
                          OR EXISTS (SELECT 1 FROM learning_steps WHERE learning_step_id = $1)
                        THEN gen_random_uuid()
                        ELSE $1
                    END,
                    $2, $3, $4, $5, $6
                )
                RETURNING learning_step_id, learning_plan_id, step_order, title, description, completed
                ",
            )
            .bind(step.id)
            .bind(learning_plan_id)
            .bind(step_order)
            .bind(step.title)
            .bind(step.description)
            .bind(step.completed)
            .fetch_one(&mut *conn)
            .await?;

            let resources =
                LearningResource::save_all_for_step(conn, row.learning_step_id, step.resources)
                    .await?;

            saved.push(FullLearningStep {
                step: row,
                resources,
            });
        }

        Ok(saved)
    }

    pub async fn get_by_plan(pool: &PgPool, learning_plan_id: Uuid) -> Result<Vec<FullLearningStep>> {
        let steps = sqlx::query_as::<_, LearningStep>(
            r"
            SELECT learning_step_id, learning_plan_id, step_order, title, description, completed
            FROM learning_steps
            WHERE learning_plan_id = $1
            ORDER BY step_order
            ",
        )
        .bind(learning_plan_id)
        .fetch_all(pool)
        .await?;

        let mut full = Vec::with_capacity(steps.len());
        for step in steps {
            let resources = LearningResource::get_by_step(pool, step.learning_step_id).await?;
            full.push(FullLearningStep { step, resources });
        }

        Ok(full)
    }

    /// `None` when the step doesn't belong to the plan.
    pub async fn set_completed(
        pool: &PgPool,
        learning_plan_id: Uuid,
        learning_step_id: Uuid,
        completed: bool,
    ) -> Result<Option<Self>> {
        let step = sqlx::query_as::<_, LearningStep>(
            r"
            UPDATE learning_steps
            SET completed = $3
            WHERE learning_plan_id = $1 AND learning_step_id = $2
            RETURNING learning_step_id, learning_plan_id, step_order, title, description, completed
            ",
        )
        .bind(learning_plan_id)
        .bind(learning_step_id)
        .bind(completed)
        .fetch_optional(pool)
        .await?;

        Ok(step)
    }
}

impl LearningResource {
    async fn save_all_for_step(
        conn: &mut PgConnection,
        learning_step_id: Uuid,
        resources: Vec<NewResource>,
    ) -> Result<Vec<Self>> {
        let mut saved = Vec::with_capacity(resources.len());
        for (position, resource) in (1..).zip(resources) {
            let row = sqlx::query_as::<_, LearningResource>(
                r"
                INSERT INTO learning_resources (
                    resource_id, learning_step_id, position, title, resource_type, url
                )
                VALUES (
                    CASE
                        WHEN $1::UUID IS NULL
                          OR EXISTS (SELECT 1 FROM learning_resources WHERE resource_id = $1)
                        THEN gen_random_uuid()
                        ELSE $1
                    END,
                    $2, $3, $4, $5, $6
                )
                RETURNING resource_id, learning_step_id, position, title, resource_type, url
                ",
            )
            .bind(resource.id)
            .bind(learning_step_id)
            .bind(position)
            .bind(resource.title)
            .bind(resource.resource_type.as_str())
            .bind(resource.url)
            .fetch_one(&mut *conn)
            .await?;

            saved.push(row);
        }

        Ok(saved)
    }

    pub async fn get_by_step(pool: &PgPool, learning_step_id: Uuid) -> Result<Vec<Self>> {
        let resources = sqlx::query_as::<_, LearningResource>(
            r"
            SELECT resource_id, learning_step_id, position, title, resource_type, url
            FROM learning_resources
            WHERE learning_step_id = $1
            ORDER BY position
            ",
        )
        .bind(learning_step_id)
        .fetch_all(pool)
        .await?;

        Ok(resources)
    }
}

impl LearningPlan {
    #[tracing::instrument(skip_all, err)]
    pub async fn create(pool: &PgPool, plan: NewLearningPlan) -> Result<FullLearningPlan> {
        let author_id = plan
            .author_id
            .ok_or_else(|| color_eyre::eyre::eyre!("Learning plan has no author"))?;

        let mut transaction = pool.begin().await?;

        let created = sqlx::query_as::<_, LearningPlan>(&format!(
            r"
            INSERT INTO learning_plans (
                title, description, image_url, author_id, categories, difficulty, estimated_duration
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PLAN_COLUMNS}
            "
        ))
        .bind(&plan.title)
        .bind(&plan.description)
        .bind(plan.image_url.as_deref().filter(|url| !url.is_empty()))
        .bind(author_id)
        .bind(&plan.categories)
        .bind(plan.difficulty.unwrap_or_default().as_str())
        .bind(&plan.estimated_duration)
        .fetch_one(&mut *transaction)
        .await?;

        let steps =
            LearningStep::save_all_for_plan(&mut transaction, created.learning_plan_id, plan.steps)
                .await?;

        transaction.commit().await?;

        let author = Author::get_by_id(pool, author_id).await?;
        Ok(FullLearningPlan {
            plan: created,
            author,
            steps,
        })
    }

    pub async fn get_by_id(pool: &PgPool, learning_plan_id: Uuid) -> Result<Option<Self>> {
        let plan = sqlx::query_as::<_, LearningPlan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM learning_plans WHERE learning_plan_id = $1"
        ))
        .bind(learning_plan_id)
        .fetch_optional(pool)
        .await?;

        Ok(plan)
    }

    pub async fn get_full(pool: &PgPool, learning_plan_id: Uuid) -> Result<Option<FullLearningPlan>> {
        let Some(plan) = Self::get_by_id(pool, learning_plan_id).await? else {
            return Ok(None);
        };

        Ok(Some(plan.with_details(pool).await?))
    }

    pub async fn with_details(self, pool: &PgPool) -> Result<FullLearningPlan> {
        let author = Author::get_by_id(pool, self.author_id).await?;
        let steps = LearningStep::get_by_plan(pool, self.learning_plan_id).await?;

        Ok(FullLearningPlan {
            plan: self,
            author,
            steps,
        })
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>> {
        let plans = sqlx::query_as::<_, LearningPlan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM learning_plans ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(plans)
    }

    pub async fn list_full(pool: &PgPool) -> Result<Vec<FullLearningPlan>> {
        let plans = Self::list_all(pool).await?;

        let mut full = Vec::with_capacity(plans.len());
        for plan in plans {
            full.push(plan.with_details(pool).await?);
        }

        Ok(full)
    }

    pub async fn list_by_author(pool: &PgPool, author_id: Uuid) -> Result<Vec<Self>> {
        let plans = sqlx::query_as::<_, LearningPlan>(&format!(
            r"
            SELECT {PLAN_COLUMNS}
            FROM learning_plans
            WHERE author_id = $1
            ORDER BY created_at DESC
            "
        ))
        .bind(author_id)
        .fetch_all(pool)
        .await?;

        Ok(plans)
    }

    #[tracing::instrument(skip(pool, plan), err)]
    pub async fn update(
        pool: &PgPool,
        learning_plan_id: Uuid,
        plan: NewLearningPlan,
    ) -> Result<Option<FullLearningPlan>> {
        let mut transaction = pool.begin().await?;

        let updated = sqlx::query_as::<_, LearningPlan>(&format!(
            r"
            UPDATE learning_plans
            SET title = $2,
                description = $3,
                image_url = $4,
                categories = $5,
                difficulty = $6,
                estimated_duration = $7,
                updated_at = NOW()
            WHERE learning_plan_id = $1
            RETURNING {PLAN_COLUMNS}
            "
        ))
        .bind(learning_plan_id)
        .bind(&plan.title)
        .bind(&plan.description)
        .bind(plan.image_url.as_deref().filter(|url| !url.is_empty()))
        .bind(&plan.categories)
        .bind(plan.difficulty.unwrap_or_default().as_str())
        .bind(&plan.estimated_duration)
        .fetch_optional(&mut *transaction)
        .await?;

        let Some(updated) = updated else {
            return Ok(None);
        };

        let steps =
            LearningStep::save_all_for_plan(&mut transaction, learning_plan_id, plan.steps).await?;

        transaction.commit().await?;

        let author = Author::get_by_id(pool, updated.author_id).await?;
        Ok(Some(FullLearningPlan {
            plan: updated,
            author,
            steps,
        }))
    }

    pub async fn delete(pool: &PgPool, learning_plan_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM learning_plans WHERE learning_plan_id = $1")
            .bind(learning_plan_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn search(
        pool: &PgPool,
        query: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<Self>> {
        let pattern = non_blank(query).map(contains_pattern);

        let plans = sqlx::query_as::<_, LearningPlan>(&format!(
            r"
            SELECT {PLAN_COLUMNS}
            FROM learning_plans
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

        Ok(plans)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM learning_plans")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn baking_plan(author_id: Uuid) -> NewLearningPlan {
        let resource = |title: &str| NewResource {
            title: title.into(),
            resource_type: ResourceType::Video,
            url: format!("https://example.com/{}", title.to_lowercase()),
            ..Default::default()
        };

        NewLearningPlan {
            title: "Master Baking".into(),
            description: "From cookies to croissants".into(),
            author_id: Some(author_id),
            categories: vec!["Baking".into()],
            steps: vec![
                NewLearningStep {
                    order: Some(3),
                    title: "Pastry".into(),
                    resources: vec![resource("Lamination"), resource("Butter")],
                    ..Default::default()
                },
                NewLearningStep {
                    order: Some(1),
                    title: "Basics".into(),
                    resources: vec![resource("Measuring")],
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    async fn author(pool: &PgPool) -> Result<Uuid> {
        Ok(Author::find_or_create_by_username(pool, "baking_master")
            .await?
            .author_id)
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn create_renumbers_steps_and_keeps_resources(pool: PgPool) -> Result<()> {
        let author_id = author(&pool).await?;

        let created = LearningPlan::create(&pool, baking_plan(author_id)).await?;
        assert_eq!(created.plan.difficulty, PlanDifficulty::Beginner);

        let fetched = LearningPlan::get_full(&pool, created.plan.learning_plan_id)
            .await?
            .unwrap();

        let steps: Vec<(i32, &str, usize)> = fetched
            .steps
            .iter()
            .map(|s| (s.step.step_order, s.step.title.as_str(), s.resources.len()))
            .collect();
        assert_eq!(steps, vec![(1, "Basics", 1), (2, "Pastry", 2)]);
        assert_eq!(fetched.steps[1].resources[0].title, "Lamination");
        assert_eq!(fetched.author.unwrap().learning_plans, 1);

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn steps_can_be_marked_complete(pool: PgPool) -> Result<()> {
        let author_id = author(&pool).await?;
        let created = LearningPlan::create(&pool, baking_plan(author_id)).await?;
        let plan_id = created.plan.learning_plan_id;
        let step_id = created.steps[0].step.learning_step_id;

        let step = LearningStep::set_completed(&pool, plan_id, step_id, true)
            .await?
            .unwrap();
        assert!(step.completed);

        let other_plan = Uuid::new_v4();
        assert!(LearningStep::set_completed(&pool, other_plan, step_id, false)
            .await?
            .is_none());

        let fetched = LearningPlan::get_full(&pool, plan_id).await?.unwrap();
        assert_eq!(fetched.completed_steps(), 1);

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn update_replaces_steps(pool: PgPool) -> Result<()> {
        let author_id = author(&pool).await?;
        let created = LearningPlan::create(&pool, baking_plan(author_id)).await?;

        let mut edit = created.to_new_learning_plan();
        edit.steps.remove(0);
        edit.difficulty = Some(PlanDifficulty::Advanced);
        edit.estimated_duration = Some("6 weeks".into());

        let updated = LearningPlan::update(&pool, created.plan.learning_plan_id, edit)
            .await?
            .unwrap();

        assert_eq!(updated.plan.difficulty, PlanDifficulty::Advanced);
        assert_eq!(updated.plan.estimated_duration.as_deref(), Some("6 weeks"));
        assert_eq!(updated.steps.len(), 1);
        assert_eq!(updated.steps[0].step.step_order, 1);
        assert_eq!(updated.steps[0].step.title, "Pastry");

        assert!(LearningPlan::update(&pool, Uuid::new_v4(), baking_plan(author_id))
            .await?
            .is_none());

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn copying_a_plan_gets_fresh_child_ids(pool: PgPool) -> Result<()> {
        let author_id = author(&pool).await?;
        let original = LearningPlan::create(&pool, baking_plan(author_id)).await?;

        let copy = LearningPlan::create(&pool, original.to_new_learning_plan()).await?;

        assert_eq!(copy.steps.len(), 2);
        for (copied, kept) in copy.steps.iter().zip(&original.steps) {
            assert_ne!(copied.step.learning_step_id, kept.step.learning_step_id);
            assert_eq!(copied.resources.len(), kept.resources.len());
            for (copied, kept) in copied.resources.iter().zip(&kept.resources) {
                assert_ne!(copied.resource_id, kept.resource_id);
            }
        }

        let original_id = original.plan.learning_plan_id;
        let fetched = LearningPlan::get_full(&pool, original_id).await?.unwrap();
        assert_eq!(fetched.steps, original.steps);

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn search_and_delete(pool: PgPool) -> Result<()> {
        let author_id = author(&pool).await?;
        let created = LearningPlan::create(&pool, baking_plan(author_id)).await?;

        assert_eq!(LearningPlan::search(&pool, Some("baking"), None).await?.len(), 1);
        assert_eq!(LearningPlan::search(&pool, None, Some("BAKING")).await?.len(), 1);
        assert!(LearningPlan::search(&pool, Some("sushi"), None).await?.is_empty());

        assert!(LearningPlan::delete(&pool, created.plan.learning_plan_id).await?);
        assert!(!LearningPlan::delete(&pool, created.plan.learning_plan_id).await?);
        assert_eq!(LearningPlan::count(&pool).await?, 0);

        Ok(())
    }
}
