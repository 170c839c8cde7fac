//! Schema creation and sample data for the survey database
//!
//! Every statement is idempotent so the setup can be re-run against an
//! existing database without duplicating rows.

use sqlx::PgPool;
use tracing::info;

use crate::error::{DatabaseError, DatabaseResult};
use crate::password::hash_password;

/// Password shared by every seeded account
pub const SAMPLE_PASSWORD: &str = "password123";

const CREATE_TABLES: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        first_name VARCHAR(50) NOT NULL,
        last_name VARCHAR(50) NOT NULL,
        email VARCHAR(100) UNIQUE NOT NULL,
        password_hash VARCHAR(255) NOT NULL,
        date_of_birth DATE,
        institution VARCHAR(100),
        field_of_study VARCHAR(100),
        academic_level VARCHAR(20)
            CHECK (academic_level IN ('undergraduate', 'graduate', 'postgraduate', 'phd', 'other')),
        graduation_year INTEGER,
        profile_picture VARCHAR(255),
        total_points INTEGER NOT NULL DEFAULT 0,
        surveys_completed INTEGER NOT NULL DEFAULT 0,
        current_streak INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS surveys (
        id BIGSERIAL PRIMARY KEY,
        title VARCHAR(200) NOT NULL,
        description TEXT,
        category VARCHAR(50) NOT NULL,
        estimated_time INTEGER NOT NULL DEFAULT 5,
        thumbnail VARCHAR(255),
        created_by BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        is_published BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS survey_questions (
        id BIGSERIAL PRIMARY KEY,
        survey_id BIGINT NOT NULL REFERENCES surveys(id) ON DELETE CASCADE,
        question_text TEXT NOT NULL,
        question_type VARCHAR(20) NOT NULL
            CHECK (question_type IN ('single-choice', 'multiple-choice', 'text', 'rating')),
        options JSONB NOT NULL DEFAULT '[]'::jsonb,
        is_required BOOLEAN NOT NULL DEFAULT TRUE,
        question_order INTEGER NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT unique_survey_question_order UNIQUE (survey_id, question_order)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS survey_responses (
        id BIGSERIAL PRIMARY KEY,
        survey_id BIGINT NOT NULL REFERENCES surveys(id) ON DELETE CASCADE,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        responses JSONB NOT NULL,
        time_spent INTEGER NOT NULL DEFAULT 0,
        rating INTEGER,
        points_earned INTEGER NOT NULL DEFAULT 50,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT unique_user_survey UNIQUE (user_id, survey_id)
    )
    "#,
];

/// Rows inserted by [`seed_sample_data`]; all zero on a re-run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: u64,
    pub surveys: u64,
    pub questions: u64,
}

/// Create every table the service needs
pub async fn create_schema(pool: &PgPool) -> DatabaseResult<()> {
    let mut tx = pool.begin().await.map_err(DatabaseError::Connection)?;

    for statement in CREATE_TABLES {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    }

    tx.commit()
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;

    info!("Schema created ({} tables)", CREATE_TABLES.len());
    Ok(())
}

/// Insert the sample users, surveys and questions
pub async fn seed_sample_data(pool: &PgPool) -> DatabaseResult<SeedSummary> {
    let password_hash =
        hash_password(SAMPLE_PASSWORD).map_err(|e| DatabaseError::Migration(e.to_string()))?;

    let mut tx = pool.begin().await.map_err(DatabaseError::Connection)?;
    let mut summary = SeedSummary::default();

    summary.users = sqlx::query(
        r#"
        INSERT INTO users (id, first_name, last_name, email, password_hash, institution,
                           field_of_study, academic_level, total_points, surveys_completed)
        VALUES
            (1, 'John', 'Doe', 'john.doe@example.com', $1, 'Local University', 'Computer Science', 'undergraduate', 1250, 23),
            (2, 'Sarah', 'Chen', 'sarah.chen@example.com', $1, 'MIT', 'Data Science', 'graduate', 2850, 47),
            (3, 'Alex', 'Rodriguez', 'alex.rodriguez@example.com', $1, 'Stanford', 'Engineering', 'undergraduate', 2720, 43)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(&password_hash)
    .execute(&mut *tx)
    .await
    .map_err(DatabaseError::Query)?
    .rows_affected();

    summary.surveys = sqlx::query(
        r#"
        INSERT INTO surveys (id, title, description, category, estimated_time, created_by, is_published)
        VALUES
            (1, 'Student Learning Preferences', 'Help us understand how students prefer to learn in modern educational environments.', 'Education', 5, 2, TRUE),
            (2, 'Technology Usage Survey', 'Share your thoughts on how technology impacts daily productivity and work-life balance.', 'Technology', 8, 2, TRUE),
            (3, 'Environmental Awareness', 'Help us understand public awareness and attitudes towards environmental conservation.', 'Environment', 6, 3, TRUE)
        ON CONFLICT DO NOTHING
        "#,
    )
    .execute(&mut *tx)
    .await
    .map_err(DatabaseError::Query)?
    .rows_affected();

    summary.questions = sqlx::query(
        r#"
        INSERT INTO survey_questions (survey_id, question_text, question_type, options, question_order)
        VALUES
            (1, 'What is your preferred learning style?', 'single-choice',
             '["Visual (diagrams, charts)", "Auditory (lectures, discussions)", "Kinesthetic (hands-on activities)", "Reading/Writing"]'::jsonb, 1),
            (1, 'Which digital tools do you find most helpful for learning?', 'multiple-choice',
             '["Video tutorials", "Interactive simulations", "Online quizzes", "Discussion forums", "Mobile apps"]'::jsonb, 2),
            (1, 'How would you rate the effectiveness of online learning?', 'rating', '[]'::jsonb, 3)
        ON CONFLICT (survey_id, question_order) DO NOTHING
        "#,
    )
    .execute(&mut *tx)
    .await
    .map_err(DatabaseError::Query)?
    .rows_affected();

    // Explicit ids above do not advance the BIGSERIAL sequences.
    for table in ["users", "surveys"] {
        let statement = format!(
            "SELECT setval(pg_get_serial_sequence('{table}', 'id'), GREATEST((SELECT MAX(id) FROM {table}), 1))"
        );
        sqlx::query(&statement)
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::Query)?;
    }

    tx.commit().await.map_err(DatabaseError::Query)?;

    info!(
        "Sample data inserted: {} users, {} surveys, {} questions",
        summary.users, summary.surveys, summary.questions
    );
    Ok(summary)
}
