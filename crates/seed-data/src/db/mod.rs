//! Database integration for seeding reference data.
//!
//! The [`Seeder`] inserts the loaded record sets through any
//! [`catalog::SeedTarget`], one pass per table, and reports per-pass counts.

mod seeder;

pub use seeder::{Pass, PassReport, SeedSummary, Seeder};
