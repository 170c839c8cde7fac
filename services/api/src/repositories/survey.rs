//! Survey repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;

use crate::models::survey::{
    NewResponse, NewSurvey, POINTS_PER_RESPONSE, Question, Survey, SurveyDetail, SurveyQuery,
    SurveySummary,
};

/// Survey repository for database operations
#[derive(Clone)]
pub struct SurveyRepository {
    pool: PgPool,
}

/// Escape `LIKE` wildcards so user input matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Append the category and search conditions of a listing query
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &SurveyQuery) {
    if let Some(category) = query.category() {
        builder.push(" AND LOWER(s.category) = LOWER(");
        builder.push_bind(category.to_string());
        builder.push(")");
    }

    if let Some(search) = query.search() {
        let pattern = format!("%{}%", escape_like(search));
        builder.push(" AND (s.title ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR s.description ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
}

impl SurveyRepository {
    /// Create a new survey repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List published surveys, newest first, with participation stats and
    /// whether `user_id` already answered each one
    pub async fn list(&self, user_id: i64, query: &SurveyQuery) -> Result<Vec<SurveySummary>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT s.id, s.title, s.description, s.category, s.estimated_time, s.thumbnail,
                   s.created_by, s.is_published, s.created_at, s.updated_at,
                   u.first_name, u.last_name,
                   COUNT(DISTINCT sr.id) AS participants,
                   AVG(sr.rating)::FLOAT8 AS average_rating,
                   COALESCE(BOOL_OR(sr.user_id = "#,
        );
        builder.push_bind(user_id);
        builder.push(
            r#"), FALSE) AS completed
            FROM surveys s
            LEFT JOIN users u ON s.created_by = u.id
            LEFT JOIN survey_responses sr ON s.id = sr.survey_id
            WHERE s.is_published = TRUE"#,
        );

        push_filters(&mut builder, query);

        builder.push(" GROUP BY s.id, u.id ORDER BY s.created_at DESC, s.id DESC");

        let surveys = builder
            .build_query_as::<SurveySummary>()
            .fetch_all(&self.pool)
            .await?;

        Ok(surveys)
    }

    /// Get a survey with its questions in display order
    pub async fn find_by_id(&self, id: i64, user_id: i64) -> Result<Option<SurveyDetail>> {
        let survey = sqlx::query_as::<_, Survey>(
            r#"
            SELECT s.id, s.title, s.description, s.category, s.estimated_time, s.thumbnail,
                   s.created_by, s.is_published, s.created_at, s.updated_at,
                   u.first_name, u.last_name
            FROM surveys s
            LEFT JOIN users u ON s.created_by = u.id
            WHERE s.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(survey) = survey else {
            return Ok(None);
        };

        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, survey_id, question_text, question_type, options, is_required,
                   question_order, created_at
            FROM survey_questions
            WHERE survey_id = $1
            ORDER BY question_order
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let completed = self.has_user_completed(id, user_id).await?;

        Ok(Some(SurveyDetail {
            survey,
            questions,
            completed,
        }))
    }

    /// Whether a survey with this id exists, published or not
    pub async fn exists(&self, id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM surveys WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Create a survey and its questions in one transaction
    pub async fn create(&self, new_survey: &NewSurvey, user_id: i64) -> Result<i64> {
        info!(
            "Creating survey '{}' with {} questions for user {}",
            new_survey.title,
            new_survey.questions.len(),
            user_id
        );

        let mut tx = self.pool.begin().await?;

        let survey_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO surveys (title, description, category, estimated_time, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&new_survey.title)
        .bind(&new_survey.description)
        .bind(&new_survey.category)
        .bind(new_survey.estimated_time)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        for (order, question) in (1_i32..).zip(&new_survey.questions) {
            sqlx::query(
                r#"
                INSERT INTO survey_questions (survey_id, question_text, question_type, options,
                                              is_required, question_order)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(survey_id)
            .bind(&question.text)
            .bind(question.question_type.as_str())
            .bind(sqlx::types::Json(&question.options))
            .bind(question.required)
            .bind(order)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(survey_id)
    }

    /// Check if user has completed survey
    pub async fn has_user_completed(&self, survey_id: i64, user_id: i64) -> Result<bool> {
        let completed: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM survey_responses WHERE survey_id = $1 AND user_id = $2)",
        )
        .bind(survey_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(completed)
    }

    /// Store a response and credit the user's points
    ///
    /// The insert and the counter update share one transaction. Returns
    /// `None` when the user already answered this survey.
    pub async fn submit_response(
        &self,
        survey_id: i64,
        user_id: i64,
        response: &NewResponse,
    ) -> Result<Option<i32>> {
        let mut tx = self.pool.begin().await?;

        let points: Option<i32> = sqlx::query_scalar(
            r#"
            INSERT INTO survey_responses (survey_id, user_id, responses, time_spent, rating, points_earned)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, survey_id) DO NOTHING
            RETURNING points_earned
            "#,
        )
        .bind(survey_id)
        .bind(user_id)
        .bind(&response.responses)
        .bind(response.time_spent)
        .bind(response.rating)
        .bind(POINTS_PER_RESPONSE)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(points) = points else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            r#"
            UPDATE users
            SET total_points = total_points + $1, surveys_completed = surveys_completed + 1,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(points)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            "User {} completed survey {} (+{} points)",
            user_id, survey_id, points
        );
        Ok(Some(points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("learning"), "learning");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
    }

    #[test]
    fn test_filters_ignore_category_case() {
        let query = SurveyQuery {
            category: Some("education".to_string()),
            search: Some("learning".to_string()),
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM surveys s WHERE TRUE");
        push_filters(&mut builder, &query);

        assert_eq!(
            builder.sql(),
            "SELECT 1 FROM surveys s WHERE TRUE AND LOWER(s.category) = LOWER($1) \
             AND (s.title ILIKE $2 OR s.description ILIKE $3)"
        );
    }
}
