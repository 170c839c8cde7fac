//! Survey platform HTTP service
//!
//! Registration and login, survey authoring, and response submission over a
//! PostgreSQL database. The binary in `main.rs` wires configuration and
//! logging around [`routes::create_router`].

pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod rate_limiter;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;
