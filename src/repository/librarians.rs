//! Librarian accounts repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::librarian::{AdminId, CreateLibrarian, Librarian},
};

#[derive(Clone)]
pub struct LibrariansRepository {
    pool: Pool<Postgres>,
}

impl LibrariansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get librarian by ID
    pub async fn get_by_id(&self, admin: AdminId) -> AppResult<Librarian> {
        sqlx::query_as::<_, Librarian>("SELECT * FROM librarians WHERE id = $1")
            .bind(admin.0)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Librarian with id {} not found", admin)))
    }

    /// Get librarian by email (primary authentication method)
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<Librarian>> {
        let librarian = sqlx::query_as::<_, Librarian>(
            "SELECT * FROM librarians WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(librarian)
    }

    /// Check if a librarian email is already registered
    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM librarians WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Create a new librarian account
    pub async fn create(&self, librarian: &CreateLibrarian) -> AppResult<Librarian> {
        let created = sqlx::query_as::<_, Librarian>(
            r#"
            INSERT INTO librarians (first_name, last_name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&librarian.first_name)
        .bind(&librarian.last_name)
        .bind(&librarian.email)
        .bind(&librarian.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
