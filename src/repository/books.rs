//! Books (catalog) repository for database operations.
//!
//! Quantity here is only written by catalog create/update; lending-driven
//! adjustments go through the ledger repository so they stay inside the
//! lending transaction.

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, CreateBook, UpdateBook},
        enums::BookStatus,
        librarian::AdminId,
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID, scoped to the acting librarian
    pub async fn get_by_id(&self, admin: AdminId, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 AND admin_id = $2")
            .bind(id)
            .bind(admin.0)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// List books, optionally filtered by a title/author search term
    pub async fn list(&self, admin: AdminId, search: Option<&str>) -> AppResult<Vec<Book>> {
        let pattern = search.map(|s| format!("%{}%", s));
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE admin_id = $1
              AND ($2::text IS NULL OR title ILIKE $2 OR author ILIKE $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(admin.0)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Create a new book; status is derived from the initial quantity
    pub async fn create(&self, admin: AdminId, book: &CreateBook) -> AppResult<Book> {
        let status = BookStatus::from_quantity(book.quantity);
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (admin_id, title, author, category, quantity, borrowing_fee, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(admin.0)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.category.as_code())
        .bind(book.quantity)
        .bind(book.borrowing_fee)
        .bind(status.as_code())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update a book; status is re-derived from the new quantity
    pub async fn update(&self, admin: AdminId, id: i32, book: &UpdateBook) -> AppResult<Book> {
        let status = BookStatus::from_quantity(book.quantity);
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $1, author = $2, category = $3, quantity = $4,
                borrowing_fee = $5, status = $6, updated_at = now()
            WHERE id = $7 AND admin_id = $8
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.category.as_code())
        .bind(book.quantity)
        .bind(book.borrowing_fee)
        .bind(status.as_code())
        .bind(id)
        .bind(admin.0)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book.
    ///
    /// Refused while unreturned borrow records still reference it; returned
    /// history cascades at the schema level.
    pub async fn delete(&self, admin: AdminId, id: i32) -> AppResult<()> {
        self.get_by_id(admin, id).await?;

        let has_open_borrows: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM borrowed_books
                WHERE book_id = $1 AND admin_id = $2 AND returned = FALSE
            )
            "#,
        )
        .bind(id)
        .bind(admin.0)
        .fetch_one(&self.pool)
        .await?;

        if has_open_borrows {
            return Err(AppError::InvalidState(
                "Book has outstanding borrow records and cannot be deleted".to_string(),
            ));
        }

        sqlx::query("DELETE FROM books WHERE id = $1 AND admin_id = $2")
            .bind(id)
            .bind(admin.0)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count books for the tenant
    pub async fn count(&self, admin: AdminId) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE admin_id = $1")
            .bind(admin.0)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Most recently added books (dashboard)
    pub async fn recently_added(&self, admin: AdminId, limit: i64) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE admin_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(admin.0)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }
}
