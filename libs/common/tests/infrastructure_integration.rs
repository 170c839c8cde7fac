//! Integration tests for the database schema and sample data
//!
//! These tests need a reachable PostgreSQL database (see `DATABASE_URL`) and
//! are ignored by default. Run them with `cargo test -- --ignored`.

use common::{
    database::{DatabaseConfig, health_check, init_pool},
    password::verify_password,
    schema::{SAMPLE_PASSWORD, create_schema, seed_sample_data},
};
use sqlx::Row;

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_schema_setup_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await, "Database health check failed");

    create_schema(&pool).await?;
    seed_sample_data(&pool).await?;

    // A second run must not fail nor insert anything new.
    create_schema(&pool).await?;
    let rerun = seed_sample_data(&pool).await?;
    assert_eq!(rerun.users, 0);
    assert_eq!(rerun.surveys, 0);
    assert_eq!(rerun.questions, 0);

    let row = sqlx::query("SELECT password_hash FROM users WHERE email = $1")
        .bind("john.doe@example.com")
        .fetch_one(&pool)
        .await?;
    let hash: String = row.get("password_hash");
    assert!(verify_password(SAMPLE_PASSWORD, &hash)?);

    let orders: Vec<i32> = sqlx::query_scalar(
        "SELECT question_order FROM survey_questions WHERE survey_id = 1 ORDER BY question_order",
    )
    .fetch_all(&pool)
    .await?;
    assert_eq!(orders, vec![1, 2, 3]);

    // Sequences must have moved past the explicit seed ids.
    let next_id: i64 = sqlx::query_scalar("SELECT nextval(pg_get_serial_sequence('users', 'id'))")
        .fetch_one(&pool)
        .await?;
    assert!(next_id > 3);

    Ok(())
}
