use api_client::ApiClient;
use color_eyre::eyre::Context;

use crate::Result;

pub(crate) async fn print_info() -> Result<()> {
    let client = ApiClient::from_env();

    let recipes = client
        .list_recipes()
        .await
        .wrap_err_with(|| format!("Failed to reach {}", client.base_url()))?;
    let learning_plans = client.list_learning_plans().await?;
    let discussions = client.list_discussions().await?;
    let categories = client.list_categories().await?;

    println!("\n\n");
    println!("API: {}", client.base_url());
    println!("Recipes: {}", recipes.len());
    for recipe in &recipes {
        println!("  {} ({} likes)", recipe.recipe.title, recipe.recipe.likes);
    }
    println!("Learning Plans: {}", learning_plans.len());
    for plan in &learning_plans {
        println!(
            "  {} ({}/{} steps done)",
            plan.plan.title,
            plan.completed_steps(),
            plan.steps.len()
        );
    }
    println!("Discussions: {}", discussions.len());
    println!("Categories: {}", categories.len());

    Ok(())
}
