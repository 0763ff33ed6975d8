//! Librarian (tenant) model and authentication claims.
//!
//! The librarian account is the tenant boundary: every member, book, borrow
//! record and transaction belongs to exactly one librarian, and every
//! repository call takes the acting [`AdminId`] as an explicit parameter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Tenant identity of the acting librarian.
///
/// Deliberately an explicit parameter rather than ambient state: a call path
/// that cannot produce an `AdminId` cannot reach the data layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdminId(pub i32);

impl std::fmt::Display for AdminId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Librarian account from the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Librarian {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Librarian {
    pub fn admin_id(&self) -> AdminId {
        AdminId(self.id)
    }
}

/// Public librarian representation (no credentials)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LibrarianInfo {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<Librarian> for LibrarianInfo {
    fn from(l: Librarian) -> Self {
        Self {
            id: l.id,
            first_name: l.first_name,
            last_name: l.last_name,
            email: l.email,
            created_at: l.created_at,
        }
    }
}

/// Registration payload for a new librarian account
#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
pub struct RegisterLibrarian {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub repeat_password: String,
}

/// New librarian account payload, already validated and hashed
#[derive(Debug)]
pub struct CreateLibrarian {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

/// JWT claims for an authenticated librarian
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub admin_id: i32,
    pub exp: i64,
    pub iat: i64,
}

impl AdminClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn admin_id(&self) -> AdminId {
        AdminId(self.admin_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_preserves_tenant_identity() {
        let claims = AdminClaims {
            sub: "desk@branch.example".into(),
            admin_id: 42,
            exp: chrono::Utc::now().timestamp() + 3600,
            iat: chrono::Utc::now().timestamp(),
        };
        let token = claims.create_token("test-secret").unwrap();
        let parsed = AdminClaims::from_token(&token, "test-secret").unwrap();
        assert_eq!(parsed.admin_id(), AdminId(42));
        assert_eq!(parsed.sub, "desk@branch.example");
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let claims = AdminClaims {
            sub: "desk@branch.example".into(),
            admin_id: 42,
            exp: chrono::Utc::now().timestamp() + 3600,
            iat: chrono::Utc::now().timestamp(),
        };
        let token = claims.create_token("test-secret").unwrap();
        assert!(AdminClaims::from_token(&token, "other-secret").is_err());
    }
}
