//! Formations catalog core.
//!
//! Loads the `config.yml` settings, owns the single MySQL connection used to
//! bootstrap the catalog database, and defines the four reference tables
//! (formations, types, courses, trainings) along with their record types.

pub mod config;
pub mod database;
pub mod errors;
pub mod models;
pub mod schema;

pub use config::{AppConfig, AppSettings, DatabaseConfig, load_config};
pub use database::{Database, InsertOutcome, SeedTarget, SqlParam};
pub use errors::{ConfigError, DatabaseError};
