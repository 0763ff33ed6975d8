//! Librarian authentication service.
//!
//! The authenticated librarian is the tenant identity for everything else:
//! handlers turn the verified claims into an [`AdminId`] and pass it down
//! explicitly.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::librarian::{AdminClaims, AdminId, CreateLibrarian, Librarian, RegisterLibrarian},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new librarian account
    pub async fn register(&self, request: &RegisterLibrarian) -> AppResult<Librarian> {
        for name in [&request.first_name, &request.last_name] {
            if !name.chars().all(|c| c.is_alphabetic() || c == ' ') {
                return Err(AppError::Validation(
                    "Names should only contain letters and spaces".to_string(),
                ));
            }
        }

        if request.password != request.repeat_password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }

        if self.repository.librarians.email_exists(&request.email).await? {
            return Err(AppError::DuplicateEmail(
                "A librarian with that email already exists".to_string(),
            ));
        }

        let password_hash = self.hash_password(&request.password)?;

        let librarian = self
            .repository
            .librarians
            .create(&CreateLibrarian {
                first_name: request.first_name.clone(),
                last_name: request.last_name.clone(),
                email: request.email.clone(),
                password_hash,
            })
            .await?;

        tracing::info!("New librarian account registered: id={}", librarian.id);
        Ok(librarian)
    }

    /// Authenticate a librarian by email and return a JWT token.
    ///
    /// Unknown email and wrong password report identically.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, Librarian)> {
        let librarian = self
            .repository
            .librarians
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !self.verify_password(&librarian, password)? {
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        let token = self.create_token_for(&librarian)?;
        Ok((token, librarian))
    }

    /// Load the librarian behind a set of verified claims
    pub async fn current(&self, admin: AdminId) -> AppResult<Librarian> {
        self.repository.librarians.get_by_id(admin).await
    }

    fn create_token_for(&self, librarian: &Librarian) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = AdminClaims {
            sub: librarian.email.clone(),
            admin_id: librarian.id,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(&self, librarian: &Librarian, password: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(&librarian.password_hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
