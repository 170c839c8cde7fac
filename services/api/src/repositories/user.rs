//! User repository for database operations

use anyhow::Result;
use common::password::{hash_password, verify_password};
use sqlx::PgPool;
use tokio::task;
use tracing::info;

use crate::models::user::{NewUser, ProfileUpdate, User, UserProfile};

const PROFILE_COLUMNS: &str = r#"
    u.id, u.first_name, u.last_name, u.email, u.date_of_birth, u.institution,
    u.field_of_study, u.academic_level, u.graduation_year, u.profile_picture,
    u.total_points, u.surveys_completed, u.current_streak, u.created_at, u.updated_at
"#;

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    ///
    /// Returns `None` when the email is already registered.
    pub async fn create(&self, new_user: &NewUser) -> Result<Option<User>> {
        info!("Creating new user: {}", new_user.email);

        let password = new_user.password.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password)).await??;
        let details = &new_user.details;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash, date_of_birth,
                               institution, field_of_study, academic_level, graduation_year)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, first_name, last_name, email, password_hash
            "#,
        )
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.email)
        .bind(&password_hash)
        .bind(details.date_of_birth)
        .bind(&details.institution)
        .bind(&details.field_of_study)
        .bind(details.academic_level.map(|level| level.as_str()))
        .bind(details.graduation_year)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Verify a user's password off the async workers
    pub async fn verify_password(&self, user: &User, password: &str) -> Result<bool> {
        let password = password.to_string();
        let password_hash = user.password_hash.clone();
        let verified =
            task::spawn_blocking(move || verify_password(&password, &password_hash)).await??;

        Ok(verified)
    }

    /// Load a profile together with its leaderboard rank
    ///
    /// Rank is one more than the number of users with strictly more points,
    /// so tied users share a rank.
    pub async fn find_profile(&self, id: i64) -> Result<Option<UserProfile>> {
        let query = format!(
            r#"
            SELECT {PROFILE_COLUMNS},
                   (SELECT COUNT(*) + 1 FROM users u2 WHERE u2.total_points > u.total_points) AS rank
            FROM users u
            WHERE u.id = $1
            "#
        );

        let profile = sqlx::query_as::<_, UserProfile>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    /// Overwrite the editable profile columns
    ///
    /// Returns `false` when the user no longer exists.
    pub async fn update_profile(&self, id: i64, update: &ProfileUpdate) -> Result<bool> {
        info!("Updating profile of user {}", id);

        let details = &update.details;
        let result = sqlx::query(
            r#"
            UPDATE users
            SET first_name = $1, last_name = $2, date_of_birth = $3, institution = $4,
                field_of_study = $5, academic_level = $6, graduation_year = $7, updated_at = NOW()
            WHERE id = $8
            "#,
        )
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(details.date_of_birth)
        .bind(&details.institution)
        .bind(&details.field_of_study)
        .bind(details.academic_level.map(|level| level.as_str()))
        .bind(details.graduation_year)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
