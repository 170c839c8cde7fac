//! Repositories for database operations

pub mod survey;
pub mod user;

pub use survey::SurveyRepository;
pub use user::UserRepository;
