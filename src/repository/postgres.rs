//! PostgreSQL store

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres, Transaction};

use super::{LedgerTx, LibraryStore};
use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
    models::{Book, Loan, Member, MemberWithLoans},
};

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Open a connection pool
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;

        tracing::info!("Connected to database");
        Ok(Self::new(pool))
    }

    /// Apply embedded migrations
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to run database migrations: {}", e)))?;

        tracing::info!("Database migrations completed");
        Ok(())
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

#[async_trait]
impl LibraryStore for PgStore {
    async fn list_members(&self) -> AppResult<Vec<MemberWithLoans>> {
        let members = sqlx::query_as::<_, MemberWithLoans>(
            r#"
            SELECT m.code, m.name, m.penalty_until,
                   COUNT(b.id) AS borrowed_books_count
            FROM members m
            LEFT JOIN borrowed_books b
                   ON b.member_code = m.code AND b.returned_at IS NULL
            GROUP BY m.code, m.name, m.penalty_until
            ORDER BY m.code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    async fn list_books(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT code, title, stock FROM books ORDER BY code")
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    async fn list_available_books(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT code, title, stock FROM books WHERE stock > 0 ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn count_open_loans(&self, member_code: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrowed_books WHERE member_code = $1 AND returned_at IS NULL",
        )
        .bind(member_code)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn find_open_loan(&self, member_code: &str, book_code: &str) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            SELECT id, member_code, book_code, borrowed_at, returned_at
            FROM borrowed_books
            WHERE member_code = $1 AND book_code = $2 AND returned_at IS NULL
            ORDER BY borrowed_at
            LIMIT 1
            "#,
        )
        .bind(member_code)
        .bind(book_code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(loan)
    }

    async fn begin(&self) -> AppResult<Box<dyn LedgerTx>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        Ok(Box::new(PgLedgerTx { tx: Some(tx) }))
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Serializable transaction; rows read through `lock_*` are held `FOR UPDATE`
pub struct PgLedgerTx {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgLedgerTx {
    fn conn(&mut self) -> AppResult<&mut Transaction<'static, Postgres>> {
        self.tx
            .as_mut()
            .ok_or_else(|| AppError::Internal("Transaction already committed".to_string()))
    }
}

#[async_trait]
impl LedgerTx for PgLedgerTx {
    async fn lock_member(&mut self, code: &str) -> AppResult<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(
            "SELECT code, name, penalty_until FROM members WHERE code = $1 FOR UPDATE",
        )
        .bind(code)
        .fetch_optional(&mut **self.conn()?)
        .await?;
        Ok(member)
    }

    async fn lock_book(&mut self, code: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT code, title, stock FROM books WHERE code = $1 FOR UPDATE",
        )
        .bind(code)
        .fetch_optional(&mut **self.conn()?)
        .await?;
        Ok(book)
    }

    async fn lock_open_loan(&mut self, member_code: &str, book_code: &str) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            SELECT id, member_code, book_code, borrowed_at, returned_at
            FROM borrowed_books
            WHERE member_code = $1 AND book_code = $2 AND returned_at IS NULL
            ORDER BY borrowed_at
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(member_code)
        .bind(book_code)
        .fetch_optional(&mut **self.conn()?)
        .await?;
        Ok(loan)
    }

    async fn count_open_loans(&mut self, member_code: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrowed_books WHERE member_code = $1 AND returned_at IS NULL",
        )
        .bind(member_code)
        .fetch_one(&mut **self.conn()?)
        .await?;
        Ok(count)
    }

    async fn adjust_stock(&mut self, book_code: &str, delta: i32) -> AppResult<()> {
        let result = sqlx::query("UPDATE books SET stock = stock + $1 WHERE code = $2")
            .bind(delta)
            .bind(book_code)
            .execute(&mut **self.conn()?)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::BookNotFound(book_code.to_string()));
        }
        Ok(())
    }

    async fn insert_loan(&mut self, member_code: &str, book_code: &str, borrowed_at: i64) -> AppResult<Loan> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO borrowed_books (member_code, book_code, borrowed_at)
            VALUES ($1, $2, $3)
            RETURNING id, member_code, book_code, borrowed_at, returned_at
            "#,
        )
        .bind(member_code)
        .bind(book_code)
        .bind(borrowed_at)
        .fetch_one(&mut **self.conn()?)
        .await?;
        Ok(loan)
    }

    async fn close_loan(&mut self, loan_id: i64, returned_at: i64) -> AppResult<()> {
        sqlx::query("UPDATE borrowed_books SET returned_at = $1 WHERE id = $2 AND returned_at IS NULL")
            .bind(returned_at)
            .bind(loan_id)
            .execute(&mut **self.conn()?)
            .await?;
        Ok(())
    }

    async fn set_penalty_until(&mut self, member_code: &str, until: i64) -> AppResult<()> {
        sqlx::query("UPDATE members SET penalty_until = $1 WHERE code = $2")
            .bind(until)
            .bind(member_code)
            .execute(&mut **self.conn()?)
            .await?;
        Ok(())
    }

    async fn commit(&mut self) -> AppResult<()> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
        }
        Ok(())
    }
}
