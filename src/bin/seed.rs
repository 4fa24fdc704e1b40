//! # Seed Data
//!
//! Inserts the sample members and books into the configured database.
//! Rows that already exist are left untouched.
//!
//! ## Usage
//! ```bash
//! cargo run --bin seed
//! DATABASE_URL=postgres://... cargo run --bin seed
//! ```

use library_server::{
    config::AppConfig,
    repository::{sample, PgStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = AppConfig::load()?;
    let store = PgStore::connect(&config.database).await?;
    store.migrate().await?;

    let mut tx = store.pool().begin().await?;

    let mut members = 0;
    for member in sample::members() {
        let result = sqlx::query(
            "INSERT INTO members (code, name, penalty_until) VALUES ($1, $2, $3) ON CONFLICT (code) DO NOTHING",
        )
        .bind(&member.code)
        .bind(&member.name)
        .bind(member.penalty_until)
        .execute(&mut *tx)
        .await?;
        members += result.rows_affected();
    }

    let mut books = 0;
    for book in sample::books() {
        let result = sqlx::query(
            "INSERT INTO books (code, title, stock) VALUES ($1, $2, $3) ON CONFLICT (code) DO NOTHING",
        )
        .bind(&book.code)
        .bind(&book.title)
        .bind(book.stock)
        .execute(&mut *tx)
        .await?;
        books += result.rows_affected();
    }

    tx.commit().await?;

    tracing::info!("Seeded {} members and {} books", members, books);
    Ok(())
}
