//! Members repository for database operations

use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        librarian::AdminId,
        member::{CreateMember, Member, MemberDetails, UpdateMember},
    },
};

/// SELECT producing [`MemberDetails`] rows; `amount_due` is the derived sum
/// of fines over the member's unreturned borrow records.
const MEMBER_DETAILS: &str = r#"
    SELECT m.id, m.name, m.email, m.created_at,
           COALESCE((
               SELECT SUM(b.fine) FROM borrowed_books b
               WHERE b.member_id = m.id AND b.returned = FALSE
           ), 0) AS amount_due
    FROM members m
"#;

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Postgres>,
}

impl MembersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get member by ID, scoped to the acting librarian
    pub async fn get_by_id(&self, admin: AdminId, id: i32) -> AppResult<Member> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1 AND admin_id = $2")
            .bind(id)
            .bind(admin.0)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    /// Get member with the derived amount_due aggregate
    pub async fn get_details(&self, admin: AdminId, id: i32) -> AppResult<MemberDetails> {
        let query = format!("{} WHERE m.id = $1 AND m.admin_id = $2", MEMBER_DETAILS);
        sqlx::query_as::<_, MemberDetails>(&query)
            .bind(id)
            .bind(admin.0)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    /// List members, optionally filtered by a name search term
    pub async fn list(&self, admin: AdminId, search: Option<&str>) -> AppResult<Vec<MemberDetails>> {
        let pattern = search.map(|s| format!("%{}%", s));
        let query = format!(
            r#"{}
            WHERE m.admin_id = $1
              AND ($2::text IS NULL OR m.name ILIKE $2)
            ORDER BY m.created_at DESC
            "#,
            MEMBER_DETAILS
        );
        let members = sqlx::query_as::<_, MemberDetails>(&query)
            .bind(admin.0)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;

        Ok(members)
    }

    /// Check if a member email already exists anywhere in the system.
    ///
    /// Member emails are unique system-wide, so this probe is intentionally
    /// not tenant-scoped; it only ever yields a boolean.
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM members WHERE LOWER(email) = LOWER($1) AND id != $2)",
            )
            .bind(email)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM members WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Create a new member
    pub async fn create(&self, admin: AdminId, member: &CreateMember) -> AppResult<Member> {
        let created = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (admin_id, name, email)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(admin.0)
        .bind(&member.name)
        .bind(&member.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update a member
    pub async fn update(&self, admin: AdminId, id: i32, member: &UpdateMember) -> AppResult<Member> {
        sqlx::query_as::<_, Member>(
            r#"
            UPDATE members SET name = $1, email = $2
            WHERE id = $3 AND admin_id = $4
            RETURNING *
            "#,
        )
        .bind(&member.name)
        .bind(&member.email)
        .bind(id)
        .bind(admin.0)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    /// Delete a member.
    ///
    /// Refused while the member has unreturned borrow records; returned
    /// history and transactions cascade at the schema level.
    pub async fn delete(&self, admin: AdminId, id: i32) -> AppResult<()> {
        self.get_by_id(admin, id).await?;

        let has_open_borrows: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM borrowed_books
                WHERE member_id = $1 AND admin_id = $2 AND returned = FALSE
            )
            "#,
        )
        .bind(id)
        .bind(admin.0)
        .fetch_one(&self.pool)
        .await?;

        if has_open_borrows {
            return Err(AppError::InvalidState(
                "Member has outstanding borrow records and cannot be deleted".to_string(),
            ));
        }

        sqlx::query("DELETE FROM members WHERE id = $1 AND admin_id = $2")
            .bind(id)
            .bind(admin.0)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Outstanding fines over the member's unreturned borrow records
    pub async fn amount_due(&self, admin: AdminId, member_id: i32) -> AppResult<Decimal> {
        let due: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(fine), 0) FROM borrowed_books
            WHERE member_id = $1 AND admin_id = $2 AND returned = FALSE
            "#,
        )
        .bind(member_id)
        .bind(admin.0)
        .fetch_one(&self.pool)
        .await?;
        Ok(due)
    }

    /// Count members for the tenant
    pub async fn count(&self, admin: AdminId) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE admin_id = $1")
            .bind(admin.0)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
