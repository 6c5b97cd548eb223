//! Reference data seeding for the formations catalog.
//!
//! Reads the static `data_constants.json` document and inserts its four
//! record sets into the catalog tables, skipping rows that already exist.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seed_data::prelude::*;
//!
//! let mut db = Database::new(config.database);
//! db.connect().await?;
//! db.create_database().await?;
//! db.create_tables().await?;
//!
//! let summary = Seeder::from_file(&mut db, "data_constants.json")
//!     .insert_all()
//!     .await;
//! db.close().await;
//! ```

pub mod data;
pub mod db;

pub use catalog::models::{Course, CourseType, Formation, Training};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::data::{SeedData, SeedError};
    pub use crate::db::{Pass, PassReport, SeedSummary, Seeder};
    pub use crate::{Course, CourseType, Formation, Training};
    pub use catalog::{AppConfig, Database, InsertOutcome, SeedTarget, SqlParam, load_config};
}
