//! Inspect command - Prints stored products, cart lines and receipts.

use crate::config::Config;
use crate::domain::ProductFilter;
use crate::errors::AppResult;
use crate::infra::{Database, Persistence, UnitOfWork};

pub async fn execute(config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let uow = Persistence::new(db.get_connection());

    let products = uow.products().list(ProductFilter::default()).await?;
    println!("Products ({})", products.len());
    for p in &products {
        println!(
            "  {:<38} {:<32} {:>10} {:<12} stock {}",
            p.id, p.name, p.price, p.category, p.stock
        );
    }

    let lines = uow.cart().list_all().await?;
    println!("\nCart lines ({})", lines.len());
    for (key, line) in &lines {
        println!(
            "  [{}] {} {} x{}",
            key,
            line.id,
            line.product_id,
            line.qty.get()
        );
    }

    let receipts = uow.receipts().list_all().await?;
    println!("\nReceipts ({})", receipts.len());
    for r in &receipts {
        println!(
            "  {} {} user {} total {} ({} lines)",
            r.created_at.format("%Y-%m-%d %H:%M:%S"),
            r.id,
            r.user_id,
            r.total,
            r.items.len()
        );
    }

    Ok(())
}
