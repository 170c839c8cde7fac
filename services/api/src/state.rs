//! Application state shared across handlers

use sqlx::PgPool;
use std::path::PathBuf;

use crate::{
    jwt::JwtService,
    rate_limiter::{RateLimiter, RateLimiterConfig},
    repositories::{SurveyRepository, UserRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repository: UserRepository,
    pub survey_repository: SurveyRepository,
    pub jwt_service: JwtService,
    pub login_limiter: RateLimiter,
    pub public_dir: PathBuf,
}

impl AppState {
    pub fn new(db_pool: PgPool, jwt_service: JwtService, public_dir: PathBuf) -> Self {
        Self {
            user_repository: UserRepository::new(db_pool.clone()),
            survey_repository: SurveyRepository::new(db_pool.clone()),
            login_limiter: RateLimiter::new(RateLimiterConfig::default()),
            db_pool,
            jwt_service,
            public_dir,
        }
    }
}
