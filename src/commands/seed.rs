//! Seed command - Loads the bundled catalog.

use crate::cli::args::SeedArgs;
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;

pub async fn execute(args: SeedArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let report = db.seed(args.reset).await?;

    println!(
        "Seeded {} categories and {} products",
        report.categories, report.products
    );
    Ok(())
}
