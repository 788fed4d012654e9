use db::setup_db_pool;

use crate::Result;

pub(crate) async fn seed() -> Result<()> {
    let pool = setup_db_pool().await?;

    if db::mock::seed(&pool).await? {
        println!("Seeded sample content");
    } else {
        println!("Database already has content, nothing to do");
    }

    Ok(())
}
