//! Static sample content. The profile page renders straight from here and
//! `seed` copies it into an empty database.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use color_eyre::Result;
use forms::{Difficulty, NewCategory, PlanDifficulty, ResourceType};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    authors::{Author, NewAuthor},
    categories::Category,
    ingredients::RecipeIngredient,
    learning_plans::{
        FullLearningPlan, FullLearningStep, LearningPlan, LearningResource, LearningStep,
    },
    recipes::{FullRecipe, Recipe},
    steps::RecipeStep,
};

const UNSPLASH: &str = "https://images.unsplash.com";

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn photo(id: &str) -> String {
    format!("{UNSPLASH}/photo-{id}?q=80&w=2940&auto=format&fit=crop")
}

fn author_id(n: u128) -> Uuid {
    Uuid::from_u128(0xA000 + n)
}

fn recipe_id(n: u128) -> Uuid {
    Uuid::from_u128(0xB000 + n)
}

fn plan_id(n: u128) -> Uuid {
    Uuid::from_u128(0xC000 + n)
}

fn child_id(parent: Uuid, n: i32) -> Uuid {
    Uuid::from_u128((parent.as_u128() << 8) + u128::from(n.unsigned_abs()))
}

fn sample_author(
    n: u128,
    username: &str,
    name: &str,
    bio: &str,
    image: &str,
    (followers, following): (i32, i32),
    (recipes, learning_plans): (i32, i32),
) -> Author {
    Author {
        author_id: author_id(n),
        username: username.to_owned(),
        name: Some(name.to_owned()),
        bio: Some(bio.to_owned()),
        profile_image_url: Some(photo(image)),
        followers,
        following,
        recipes,
        learning_plans,
        created_at: at(2023, 1, 1, 9, 0),
    }
}

pub fn authors() -> Vec<Author> {
    vec![
        sample_author(
            1,
            "chef_sophia",
            "Sophia Martinez",
            "Professional chef specializing in Italian cuisine",
            "1494790108377-be9c29b29330",
            (1280, 354),
            (47, 5),
        ),
        sample_author(
            2,
            "baking_master",
            "Daniel Johnson",
            "Pastry chef with 10+ years of experience",
            "1539571696357-5a69c17a67c6",
            (876, 230),
            (32, 3),
        ),
        sample_author(
            3,
            "vegan_cook",
            "Emily Wilson",
            "Plant-based cooking enthusiast",
            "1580489944761-15a19d654956",
            (590, 280),
            (21, 2),
        ),
    ]
}

pub fn author(username: &str) -> Option<Author> {
    authors().into_iter().find(|a| a.username == username)
}

pub fn categories() -> Vec<Category> {
    [
        ("Italian", "Authentic Italian recipes", "1627042633145-b780d842ba25"),
        ("Desserts", "Sweet treats for any occasion", "1586985289688-ca3cf47d3e6e"),
        ("Vegan", "Plant-based recipes", "1540189549336-e6e99c3679fe"),
        ("Quick Meals", "Recipes ready in 30 minutes or less", "1596560548464-f010549e45d8"),
        ("Asian", "Recipes from across Asia", "1563245372-f21724e3856d"),
        ("Baking", "Bread, pastries, and more", "1509440159596-0249088772ff"),
    ]
    .into_iter()
    .zip(1..)
    .map(|((name, description, image), n)| Category {
        category_id: Uuid::from_u128(0xD000 + n),
        name: name.to_owned(),
        description: Some(description.to_owned()),
        image_url: Some(photo(image)),
        created_at: at(2023, 1, 1, 9, 0),
    })
    .collect()
}

struct SampleRecipe {
    n: u128,
    author: u128,
    title: &'static str,
    description: &'static str,
    images: [&'static str; 2],
    times: (i32, i32),
    servings: i32,
    difficulty: Difficulty,
    ingredients: &'static [(&'static str, &'static str, &'static str)],
    steps: &'static [&'static str],
    categories: &'static [&'static str],
    tags: &'static [&'static str],
    likes: i32,
    created_at: DateTime<Utc>,
}

impl From<SampleRecipe> for FullRecipe {
    fn from(sample: SampleRecipe) -> Self {
        let id = recipe_id(sample.n);
        let owned = |items: &[&str]| items.iter().map(|s| (*s).to_owned()).collect::<Vec<_>>();

        FullRecipe {
            recipe: Recipe {
                recipe_id: id,
                title: sample.title.to_owned(),
                description: sample.description.to_owned(),
                image_urls: sample.images.iter().map(|i| photo(i)).collect(),
                video_url: None,
                preparation_time: sample.times.0,
                cooking_time: sample.times.1,
                servings: sample.servings,
                difficulty: sample.difficulty,
                categories: owned(sample.categories),
                tags: owned(sample.tags),
                author_id: author_id(sample.author),
                likes: sample.likes,
                created_at: sample.created_at,
                updated_at: sample.created_at,
            },
            author: authors()
                .into_iter()
                .find(|a| a.author_id == author_id(sample.author)),
            ingredients: (1..)
                .zip(sample.ingredients)
                .map(|(position, (name, quantity, unit))| RecipeIngredient {
                    ingredient_id: child_id(id, position),
                    recipe_id: id,
                    position,
                    name: (*name).to_owned(),
                    quantity: (*quantity).to_owned(),
                    unit: (*unit).to_owned(),
                })
                .collect(),
            steps: (1..)
                .zip(sample.steps)
                .map(|(order, instruction)| RecipeStep {
                    step_id: child_id(id, order + 0x80),
                    recipe_id: id,
                    step_order: order,
                    instruction: (*instruction).to_owned(),
                    image_url: None,
                })
                .collect(),
        }
    }
}

pub fn recipes() -> Vec<FullRecipe> {
    vec![
        SampleRecipe {
            n: 1,
            author: 1,
            title: "Classic Margherita Pizza",
            description: "A traditional Italian pizza topped with tomato sauce, fresh mozzarella, basil, and olive oil.",
            images: ["1604068549290-dea0e4a305ca", "1595854341625-f33e596b9a3c"],
            times: (30, 15),
            servings: 4,
            difficulty: Difficulty::Medium,
            ingredients: &[
                ("Pizza dough", "500", "g"),
                ("Tomato sauce", "200", "ml"),
                ("Fresh mozzarella", "250", "g"),
                ("Fresh basil leaves", "10", ""),
                ("Olive oil", "2", "tbsp"),
                ("Salt", "1", "tsp"),
            ],
            steps: &[
                "Preheat oven to 475°F (245°C).",
                "Roll out the pizza dough on a floured surface to your desired thickness.",
                "Spread tomato sauce evenly over the dough, leaving a small border for the crust.",
                "Tear mozzarella into pieces and distribute over the sauce.",
                "Bake for 12-15 minutes until the crust is golden and the cheese is bubbly.",
                "Remove from oven, top with fresh basil leaves and a drizzle of olive oil.",
            ],
            categories: &["Italian"],
            tags: &["Pizza", "Vegetarian", "Dinner"],
            likes: 256,
            created_at: at(2023, 4, 12, 15, 30),
        },
        SampleRecipe {
            n: 2,
            author: 2,
            title: "Chocolate Lava Cake",
            description: "Decadent chocolate dessert with a molten center that flows like lava when cut into.",
            images: ["1617305855058-336d24456869", "1624353365286-3f8d62daad51"],
            times: (15, 12),
            servings: 4,
            difficulty: Difficulty::Medium,
            ingredients: &[
                ("Dark chocolate", "200", "g"),
                ("Unsalted butter", "100", "g"),
                ("Eggs", "4", ""),
                ("Sugar", "100", "g"),
                ("All-purpose flour", "50", "g"),
                ("Vanilla extract", "1", "tsp"),
            ],
            steps: &[
                "Preheat oven to 425°F (220°C). Butter and lightly flour four ramekins.",
                "Melt the chocolate and butter together in a double boiler or microwave.",
                "In a separate bowl, whisk together eggs and sugar until light and frothy.",
                "Fold the melted chocolate into the eggs, then fold in the flour and vanilla.",
                "Divide the batter among the ramekins and bake for 10-12 minutes.",
                "Let stand for 1 minute, then invert onto plates and serve immediately.",
            ],
            categories: &["Desserts"],
            tags: &["Chocolate", "Dessert", "Baking"],
            likes: 342,
            created_at: at(2023, 5, 20, 10, 15),
        },
        SampleRecipe {
            n: 3,
            author: 3,
            title: "Vegan Buddha Bowl",
            description: "A nourishing bowl filled with colorful vegetables, grains, and plant-based protein.",
            images: ["1512621776951-a57141f2eefd", "1540914124281-342587941389"],
            times: (20, 25),
            servings: 2,
            difficulty: Difficulty::Easy,
            ingredients: &[
                ("Quinoa", "100", "g"),
                ("Sweet potato", "1", "medium"),
                ("Chickpeas", "400", "g"),
                ("Avocado", "1", ""),
                ("Kale", "100", "g"),
                ("Tahini", "2", "tbsp"),
                ("Lemon juice", "1", "tbsp"),
                ("Salt and pepper", "", "to taste"),
            ],
            steps: &[
                "Preheat oven to 400°F (200°C).",
                "Cook quinoa according to package instructions.",
                "Cube sweet potato, toss with olive oil and salt, then roast for 20-25 minutes.",
                "Roast the rinsed chickpeas with the sweet potatoes for the last 15 minutes.",
                "Whisk tahini, lemon juice and a splash of water into a smooth dressing.",
                "Assemble bowls with quinoa, roasted vegetables, avocado and kale, then drizzle with dressing.",
            ],
            categories: &["Vegan", "Quick Meals"],
            tags: &["Healthy", "Bowl", "Lunch"],
            likes: 187,
            created_at: at(2023, 6, 8, 14, 45),
        },
        SampleRecipe {
            n: 4,
            author: 1,
            title: "Thai Green Curry",
            description: "Aromatic and spicy Thai curry with coconut milk, vegetables, and your choice of protein.",
            images: ["1455619452474-d2be8b1e70cd", "1577859623802-b5e3dfa64aa2"],
            times: (20, 25),
            servings: 4,
            difficulty: Difficulty::Medium,
            ingredients: &[
                ("Green curry paste", "3", "tbsp"),
                ("Coconut milk", "400", "ml"),
                ("Chicken breast", "500", "g"),
                ("Eggplant", "1", "medium"),
                ("Thai basil leaves", "1", "handful"),
                ("Fish sauce", "2", "tbsp"),
            ],
            steps: &[
                "Heat a tablespoon of oil in a large pot over medium heat.",
                "Add curry paste and cook until fragrant, about 1-2 minutes.",
                "Add half the coconut milk and bring to a simmer.",
                "Add chicken and cook for 5 minutes.",
                "Add the eggplant, remaining coconut milk and fish sauce, then simmer for 15 minutes.",
                "Stir in Thai basil leaves just before serving with jasmine rice.",
            ],
            categories: &["Asian"],
            tags: &["Curry", "Spicy", "Dinner"],
            likes: 165,
            created_at: at(2023, 8, 3, 19, 10),
        },
    ]
    .into_iter()
    .map(FullRecipe::from)
    .collect()
}

type SampleResource = (&'static str, ResourceType, &'static str);

fn sample_plan(
    n: u128,
    author: u128,
    (title, description, image): (&str, &str, &str),
    steps: &[(&str, &str, [SampleResource; 2])],
    (categories, difficulty, duration): (&[&str], PlanDifficulty, &str),
    created_at: DateTime<Utc>,
) -> FullLearningPlan {
    let id = plan_id(n);

    FullLearningPlan {
        plan: LearningPlan {
            learning_plan_id: id,
            title: title.to_owned(),
            description: description.to_owned(),
            image_url: Some(photo(image)),
            author_id: author_id(author),
            categories: categories.iter().map(|c| (*c).to_owned()).collect(),
            difficulty,
            estimated_duration: Some(duration.to_owned()),
            created_at,
            updated_at: created_at,
        },
        author: authors()
            .into_iter()
            .find(|a| a.author_id == author_id(author)),
        steps: (1..)
            .zip(steps)
            .map(|(order, (title, description, resources))| {
                let step_id = child_id(id, order);
                FullLearningStep {
                    step: LearningStep {
                        learning_step_id: step_id,
                        learning_plan_id: id,
                        step_order: order,
                        title: (*title).to_owned(),
                        description: Some((*description).to_owned()),
                        completed: false,
                    },
                    resources: (1..)
                        .zip(resources)
                        .map(|(position, (title, resource_type, url))| LearningResource {
                            resource_id: child_id(step_id, position),
                            learning_step_id: step_id,
                            position,
                            title: (*title).to_owned(),
                            resource_type: *resource_type,
                            url: format!("https://example.com/{url}"),
                        })
                        .collect(),
                }
            })
            .collect(),
    }
}

pub fn learning_plans() -> Vec<FullLearningPlan> {
    use ResourceType::{Blog, Book, Video};

    vec![
        sample_plan(
            1,
            2,
            (
                "Master Baking in 6 Weeks",
                "A comprehensive plan to learn the fundamentals of baking, from simple cookies to complex pastries.",
                "1486427944299-d1955d23e34d",
            ),
            &[
                (
                    "Week 1: Basic Techniques",
                    "Learn about measuring ingredients, mixing methods, and basic baking equipment.",
                    [
                        ("Baking Basics Video", Video, "baking-basics"),
                        ("Equipment Guide", Blog, "equipment-guide"),
                    ],
                ),
                (
                    "Week 2: Cookies & Quick Breads",
                    "Master drop cookies, bar cookies and quick breads like muffins and scones.",
                    [
                        ("Cookie Science", Video, "cookie-science"),
                        ("Quick Bread Recipes", Blog, "quick-bread-recipes"),
                    ],
                ),
                (
                    "Week 3: Advanced Pastries",
                    "Work with laminated doughs for croissants and puff pastry.",
                    [
                        ("Laminated Dough Masterclass", Video, "laminated-dough"),
                        ("Advanced Baking Book", Book, "advanced-baking-book"),
                    ],
                ),
            ],
            (&["Baking", "Desserts"], PlanDifficulty::Intermediate, "6 weeks"),
            at(2023, 1, 15, 10, 0),
        ),
        sample_plan(
            2,
            1,
            (
                "Italian Cooking Fundamentals",
                "Learn the core techniques and recipes that form the foundation of Italian cuisine.",
                "1498579150354-977475b7ea0b",
            ),
            &[
                (
                    "Italian Pantry Essentials",
                    "Learn about key ingredients and how to source authentic Italian products.",
                    [
                        ("Italian Ingredients Guide", Blog, "italian-ingredients"),
                        ("Olive Oil Tasting", Video, "olive-oil-tasting"),
                    ],
                ),
                (
                    "Fresh Pasta Making",
                    "Make fresh egg pasta by hand and shape it into classic forms.",
                    [
                        ("Pasta Dough Basics", Video, "pasta-dough"),
                        ("Hand-Shaped Pasta Guide", Blog, "hand-shaped-pasta"),
                    ],
                ),
                (
                    "Risotto Techniques",
                    "Toast, stir and finish a creamy risotto with the right rice.",
                    [
                        ("Risotto Masterclass", Video, "risotto-masterclass"),
                        ("Rice Varieties Guide", Blog, "rice-varieties"),
                    ],
                ),
            ],
            (&["Italian"], PlanDifficulty::Beginner, "4 weeks"),
            at(2023, 3, 10, 14, 30),
        ),
    ]
}

/// Copies the sample content into the database. Does nothing (and returns
/// `false`) once any recipe or learning plan exists.
#[tracing::instrument(skip_all, err)]
pub async fn seed(pool: &PgPool) -> Result<bool> {
    if Recipe::count(pool).await? > 0 || LearningPlan::count(pool).await? > 0 {
        tracing::info!("Database already has content, skipping seed");
        return Ok(false);
    }

    let mut author_ids = HashMap::new();
    for author in authors() {
        let stored = match Author::get_by_username(pool, &author.username).await? {
            Some(existing) => existing,
            None => {
                Author::create(
                    pool,
                    NewAuthor {
                        username: author.username.clone(),
                        name: author.name.clone(),
                        bio: author.bio.clone(),
                        profile_image_url: author.profile_image_url.clone(),
                        followers: author.followers,
                        following: author.following,
                    },
                )
                .await?
            }
        };
        author_ids.insert(author.author_id, stored.author_id);
    }

    for category in categories() {
        Category::create(
            pool,
            NewCategory {
                name: category.name,
                description: category.description,
                image_url: category.image_url,
            },
        )
        .await?;
    }

    for recipe in recipes() {
        let mut new_recipe = recipe.to_new_recipe();
        new_recipe.author_id = author_ids.get(&recipe.recipe.author_id).copied();
        Recipe::create(pool, new_recipe).await?;
    }

    for plan in learning_plans() {
        let mut new_plan = plan.to_new_learning_plan();
        new_plan.author_id = author_ids.get(&plan.plan.author_id).copied();
        LearningPlan::create(pool, new_plan).await?;
    }

    tracing::info!("Seeded sample content");
    Ok(true)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sample_children_are_numbered_from_one() {
        for recipe in recipes() {
            let orders: Vec<i32> = recipe.steps.iter().map(|s| s.step_order).collect();
            let expected: Vec<i32> = (1..).take(orders.len()).collect();
            assert_eq!(orders, expected, "{}", recipe.recipe.title);
            assert!(recipe.author.is_some());
        }

        for plan in learning_plans() {
            assert_eq!(plan.steps[0].step.step_order, 1);
            assert!(plan.steps.iter().all(|s| s.resources.len() == 2));
        }
    }

    #[test]
    fn sample_recipes_pass_form_validation() {
        for recipe in recipes() {
            let draft = forms::RecipeDraft::from_recipe(recipe.to_new_recipe());
            assert!(draft.validate().is_ok(), "{}", recipe.recipe.title);
        }
    }

    #[test]
    fn sample_ids_are_unique() {
        let mut ids: Vec<Uuid> = recipes()
            .iter()
            .flat_map(|r| {
                r.ingredients
                    .iter()
                    .map(|i| i.ingredient_id)
                    .chain(r.steps.iter().map(|s| s.step_id))
            })
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn authors_are_found_by_username() {
        assert_eq!(
            author("baking_master").and_then(|a| a.name),
            Some("Daniel Johnson".to_owned())
        );
        assert!(author("nobody").is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn seed_runs_once(pool: PgPool) -> Result<()> {
        assert!(seed(&pool).await?);
        assert!(!seed(&pool).await?);

        assert_eq!(Recipe::count(&pool).await?, 4);
        assert_eq!(LearningPlan::count(&pool).await?, 2);
        assert_eq!(Category::list_all(&pool).await?.len(), 6);

        let sophia = Author::get_by_username(&pool, "chef_sophia").await?.unwrap();
        assert_eq!(sophia.recipes, 2);
        assert_eq!(sophia.learning_plans, 1);

        let pizza = Recipe::search(&pool, Some("margherita"), None).await?;
        assert_eq!(pizza.len(), 1);
        assert_eq!(pizza[0].author_id, sophia.author_id);

        Ok(())
    }
}
