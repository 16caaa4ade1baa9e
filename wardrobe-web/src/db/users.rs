//! User accounts, bearer tokens and style profiles
//!
//! Tokens are never stored; only their SHA-256 digest is, and lookups hash
//! the presented token before comparing.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use uuid::Uuid;
use wardrobe_common::profile::{Sizes, StyleProfile};
use wardrobe_common::Result;

/// Authenticated user as seen by handlers
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub guid: String,
    pub email: String,
    pub profile: StyleProfile,
}

/// SHA-256 of a bearer token as 64 hex characters
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(40)
        .map(char::from)
        .collect()
}

type UserRow = (String, String, String, String, String, String, String);

fn user_from_row(row: UserRow) -> Result<User> {
    let (guid, email, sizes, budget_band, vibes, climate, brands) = row;
    let sizes: Sizes = serde_json::from_str(&sizes)?;
    Ok(User {
        guid,
        email,
        profile: StyleProfile {
            sizes,
            budget_band,
            vibes: serde_json::from_str(&vibes)?,
            climate,
            brands: serde_json::from_str(&brands)?,
        },
    })
}

const USER_COLUMNS: &str = "guid, email, sizes, budget_band, vibes, climate, brands";

/// Create an account and return it with its freshly issued token
pub async fn create_user(pool: &SqlitePool, email: &str) -> Result<(User, String)> {
    let guid = Uuid::new_v4().to_string();
    let token = generate_token();

    sqlx::query("INSERT INTO users (guid, email, token_hash) VALUES (?, ?, ?)")
        .bind(&guid)
        .bind(email)
        .bind(hash_token(&token))
        .execute(pool)
        .await?;

    let user = User {
        guid,
        email: email.to_string(),
        profile: StyleProfile::default(),
    };
    Ok((user, token))
}

/// Resolve a bearer token to its user
pub async fn find_by_token(pool: &SqlitePool, token: &str) -> Result<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(&format!(
        "SELECT {} FROM users WHERE token_hash = ?",
        USER_COLUMNS
    ))
    .bind(hash_token(token))
    .fetch_optional(pool)
    .await?;

    row.map(user_from_row).transpose()
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row: Option<UserRow> =
        sqlx::query_as(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
            .bind(email)
            .fetch_optional(pool)
            .await?;

    row.map(user_from_row).transpose()
}

/// Issue a new token for an existing user, invalidating the old one
pub async fn rotate_token(pool: &SqlitePool, user_id: &str) -> Result<String> {
    let token = generate_token();
    sqlx::query("UPDATE users SET token_hash = ?, updated_at = CURRENT_TIMESTAMP WHERE guid = ?")
        .bind(hash_token(&token))
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(token)
}

/// Store a submitted onboarding profile
pub async fn update_profile(pool: &SqlitePool, user_id: &str, profile: &StyleProfile) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET sizes = ?, budget_band = ?, vibes = ?, climate = ?, brands = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE guid = ?
        "#,
    )
    .bind(serde_json::to_string(&profile.sizes)?)
    .bind(&profile.budget_band)
    .bind(serde_json::to_string(&profile.vibes)?)
    .bind(&profile.climate)
    .bind(serde_json::to_string(&profile.brands)?)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(wardrobe_common::Error::NotFound(format!("User {}", user_id)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wardrobe_common::db::init_database;

    async fn setup() -> (TempDir, SqlitePool) {
        let dir = TempDir::new().unwrap();
        let pool = init_database(&dir.path().join("wardrobe.db")).await.unwrap();
        (dir, pool)
    }

    #[test]
    fn test_hash_token_is_hex_sha256() {
        let hash = hash_token("secret");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash_token("secret"));
        assert_ne!(hash, hash_token("Secret"));
    }

    #[tokio::test]
    async fn test_token_resolves_to_user() {
        let (_dir, pool) = setup().await;
        let (user, token) = create_user(&pool, "ada@example.com").await.unwrap();

        let found = find_by_token(&pool, &token).await.unwrap().unwrap();
        assert_eq!(found.guid, user.guid);
        assert!(!found.profile.is_complete());

        assert!(find_by_token(&pool, "bogus").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rotate_token_invalidates_old() {
        let (_dir, pool) = setup().await;
        let (user, old) = create_user(&pool, "ada@example.com").await.unwrap();

        let new = rotate_token(&pool, &user.guid).await.unwrap();

        assert!(find_by_token(&pool, &old).await.unwrap().is_none());
        assert!(find_by_token(&pool, &new).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_profile_round_trip() {
        let (_dir, pool) = setup().await;
        let (user, token) = create_user(&pool, "ada@example.com").await.unwrap();

        let profile = StyleProfile {
            sizes: Sizes {
                top: "M".to_string(),
                bottom: "28".to_string(),
                shoe: "39".to_string(),
            },
            budget_band: "$$".to_string(),
            vibes: vec!["minimal".to_string(), "edgy".to_string()],
            climate: "cold".to_string(),
            brands: vec!["COS".to_string()],
        };
        update_profile(&pool, &user.guid, &profile).await.unwrap();

        let found = find_by_token(&pool, &token).await.unwrap().unwrap();
        assert_eq!(found.profile, profile);
        assert!(found.profile.is_complete());
    }
}
