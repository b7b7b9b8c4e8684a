//! User model and credential handling.

use anyhow::{Context, Result};
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Role: "user" or "publisher".
    pub role: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

impl User {
    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .context("failed to fetch user by id")?;

        Ok(user)
    }

    /// Find a user by email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
            .context("failed to fetch user by email")?;

        Ok(user)
    }

    /// Create a new user with a hashed password.
    pub async fn create(pool: &PgPool, input: CreateUser) -> Result<Self> {
        let id = Uuid::now_v7();
        let password = hash_password(&input.password)?;
        let role = input.role.unwrap_or_else(|| "user".to_string());

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, role, password)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&role)
        .bind(&password)
        .fetch_one(pool)
        .await
        .context("failed to create user")?;

        Ok(user)
    }

    /// Verify a password against this user's hash.
    pub fn verify_password(&self, password: &str) -> bool {
        if self.password.is_empty() {
            return false;
        }

        let Ok(parsed_hash) = PasswordHash::new(&self.password) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn password_hashing_round_trip() {
        let password = "test_password_123";
        let hash = hash_password(password).unwrap();

        // Hash should carry the Argon2 identifier
        assert!(hash.starts_with("$argon2"));

        let user = User {
            id: Uuid::nil(),
            name: "test".to_string(),
            email: "test@example.com".to_string(),
            role: "user".to_string(),
            password: hash,
            created_at: Utc::now(),
        };

        assert!(user.verify_password(password));
        assert!(!user.verify_password("wrong_password"));
    }

    #[test]
    fn empty_hash_never_verifies() {
        let user = User {
            id: Uuid::nil(),
            name: "test".to_string(),
            email: "test@example.com".to_string(),
            role: "user".to_string(),
            password: String::new(),
            created_at: Utc::now(),
        };

        assert!(!user.verify_password("anything"));
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User {
            id: Uuid::nil(),
            name: "test".to_string(),
            email: "test@example.com".to_string(),
            role: "user".to_string(),
            password: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "test@example.com");
    }
}
