//! Common library for the Perspectiva survey platform
//!
//! This crate provides shared functionality used by the API service and the
//! setup tool: database connectivity, error types, password hashing, and the
//! schema with its sample data.
//!
//! ```rust,no_run
//! use common::{
//!     database::{DatabaseConfig, init_pool},
//!     schema::{create_schema, seed_sample_data},
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = init_pool(&DatabaseConfig::from_env()?).await?;
//!     create_schema(&pool).await?;
//!     let seeded = seed_sample_data(&pool).await?;
//!     println!("Seeded {} users", seeded.users);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod password;
pub mod schema;
