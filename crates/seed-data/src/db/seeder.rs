//! Database seeding passes.

use std::fmt;
use std::path::Path;

use catalog::models::{Course, CourseType, Formation, Training};
use catalog::schema::{
    COURSES, FORMATIONS, INSERT_COURSE, INSERT_FORMATION, INSERT_TRAINING, INSERT_TYPE,
    TRAININGS, TYPES,
};
use catalog::{InsertOutcome, SeedTarget, SqlParam};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::data::SeedData;

/// One insert pass over a single catalog table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Formations,
    Types,
    Courses,
    Trainings,
}

impl Pass {
    /// Order used by [`Seeder::insert_all`]. Every pass comes after its
    /// [`Pass::prerequisites`].
    pub const ORDER: [Pass; 4] = [Pass::Formations, Pass::Types, Pass::Courses, Pass::Trainings];

    pub fn table(self) -> &'static str {
        match self {
            Pass::Formations => FORMATIONS,
            Pass::Types => TYPES,
            Pass::Courses => COURSES,
            Pass::Trainings => TRAININGS,
        }
    }

    /// Passes whose rows must already exist; courses reference formations and types.
    pub fn prerequisites(self) -> &'static [Pass] {
        match self {
            Pass::Courses => &[Pass::Formations, Pass::Types],
            _ => &[],
        }
    }

    fn insert_statement(self) -> &'static str {
        match self {
            Pass::Formations => INSERT_FORMATION,
            Pass::Types => INSERT_TYPE,
            Pass::Courses => INSERT_COURSE,
            Pass::Trainings => INSERT_TRAINING,
        }
    }

    fn records(self, data: &SeedData) -> &[Value] {
        match self {
            Pass::Formations => &data.formations,
            Pass::Types => &data.types,
            Pass::Courses => &data.courses,
            Pass::Trainings => &data.trainings,
        }
    }

    /// Decodes a record and returns its display name with the positional parameters.
    fn bind(self, record: &Value) -> Result<(String, Vec<SqlParam>), serde_json::Error> {
        let bound = match self {
            Pass::Formations => {
                let formation = Formation::deserialize(record)?;
                (
                    formation.name.clone(),
                    vec![
                        formation.id.into(),
                        formation.name.into(),
                        formation.description.into(),
                    ],
                )
            }
            Pass::Types => {
                let course_type = CourseType::deserialize(record)?;
                (
                    course_type.name.clone(),
                    vec![
                        course_type.id.into(),
                        course_type.name.into(),
                        course_type.description.into(),
                    ],
                )
            }
            Pass::Courses => {
                let course = Course::deserialize(record)?;
                (
                    course.name.clone(),
                    vec![
                        course.name.into(),
                        course.formation_id.into(),
                        course.type_id.into(),
                    ],
                )
            }
            Pass::Trainings => {
                let training = Training::deserialize(record)?;
                (
                    training.name.clone(),
                    vec![
                        training.name.into(),
                        training.provider.into(),
                        training.training_type.into(),
                        training.category.into(),
                    ],
                )
            }
        };
        Ok(bound)
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// Counts for one pass.
///
/// `inserted` is the number of rows actually persisted. `attempted` counts
/// every record the pass looked at, including duplicates the server ignored
/// and records that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub pass: Pass,
    pub attempted: usize,
    pub inserted: usize,
    pub ignored: usize,
    pub failed: usize,
    /// Set when a connection-level error abandoned the rest of the pass.
    pub aborted: bool,
}

impl PassReport {
    fn new(pass: Pass) -> Self {
        Self {
            pass,
            attempted: 0,
            inserted: 0,
            ignored: 0,
            failed: 0,
            aborted: false,
        }
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} inserted ({} already present, {} failed)",
            self.inserted, self.pass, self.ignored, self.failed
        )
    }
}

/// Reports of every pass run by [`Seeder::insert_all`], in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub reports: Vec<PassReport>,
}

impl SeedSummary {
    pub fn report(&self, pass: Pass) -> Option<&PassReport> {
        self.reports.iter().find(|r| r.pass == pass)
    }

    pub fn total_inserted(&self) -> usize {
        self.reports.iter().map(|r| r.inserted).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.reports.iter().map(|r| r.failed).sum()
    }

    pub fn any_aborted(&self) -> bool {
        self.reports.iter().any(|r| r.aborted)
    }

    pub fn aborted_passes(&self) -> Vec<Pass> {
        self.reports
            .iter()
            .filter(|r| r.aborted)
            .map(|r| r.pass)
            .collect()
    }

    /// Describes failed records and aborted passes, if there were any.
    pub fn problems(&self) -> Option<String> {
        let failed = self.total_failed();
        let aborted = self.aborted_passes();
        if failed == 0 && aborted.is_empty() {
            return None;
        }

        let mut message = format!("{failed} failed records");
        if !aborted.is_empty() {
            let names: Vec<&str> = aborted.iter().map(|p| p.table()).collect();
            message.push_str(&format!("; aborted passes: {}", names.join(", ")));
        }
        Some(message)
    }
}

/// Inserts reference data through a borrowed [`SeedTarget`].
///
/// The seeder never opens or closes the connection behind the target.
pub struct Seeder<'a, T: SeedTarget + ?Sized> {
    target: &'a mut T,
    data: SeedData,
    completed: Vec<Pass>,
}

impl<'a, T: SeedTarget + ?Sized> Seeder<'a, T> {
    pub fn new(target: &'a mut T, data: SeedData) -> Self {
        Self {
            target,
            data,
            completed: Vec::new(),
        }
    }

    /// Creates a seeder with data read from `path`. A missing file yields an
    /// empty dataset.
    pub fn from_file(target: &'a mut T, path: impl AsRef<Path>) -> Self {
        Self::new(target, SeedData::load(path))
    }

    pub fn data(&self) -> &SeedData {
        &self.data
    }

    /// Runs every pass in [`Pass::ORDER`].
    pub async fn insert_all(&mut self) -> SeedSummary {
        info!("Seeding {} reference records...", self.data.len());

        let mut summary = SeedSummary::default();
        for pass in Pass::ORDER {
            summary.reports.push(self.run_pass(pass).await);
        }

        info!("Seed completed: {} rows inserted", summary.total_inserted());
        summary
    }

    pub async fn insert_formations(&mut self) -> PassReport {
        self.run_pass(Pass::Formations).await
    }

    pub async fn insert_types(&mut self) -> PassReport {
        self.run_pass(Pass::Types).await
    }

    /// Inserts courses.
    ///
    /// Formations and types must be seeded first, otherwise rows referencing
    /// them are skipped by the foreign key constraints.
    pub async fn insert_courses(&mut self) -> PassReport {
        self.run_pass(Pass::Courses).await
    }

    pub async fn insert_trainings(&mut self) -> PassReport {
        self.run_pass(Pass::Trainings).await
    }

    async fn run_pass(&mut self, pass: Pass) -> PassReport {
        for prerequisite in pass.prerequisites() {
            if !self.completed.contains(prerequisite) {
                warn!("Seeding {pass} before {prerequisite}; referencing rows will be skipped");
            }
        }

        let records = pass.records(&self.data);
        info!("Seeding {} {}...", records.len(), pass);

        let mut report = PassReport::new(pass);
        for record in records {
            report.attempted += 1;

            let (name, params) = match pass.bind(record) {
                Ok(bound) => bound,
                Err(e) => {
                    warn!("  Skipping malformed {pass} record {record}: {e}");
                    report.failed += 1;
                    continue;
                }
            };

            match self
                .target
                .execute_insert(pass.insert_statement(), &params)
                .await
            {
                Ok(InsertOutcome::Inserted) => report.inserted += 1,
                Ok(InsertOutcome::Ignored) => report.ignored += 1,
                Ok(InsertOutcome::Rejected(message)) => {
                    warn!("  Failed to insert {pass} '{name}': {message}");
                    report.failed += 1;
                }
                Err(e) => {
                    error!("  Seeding {pass} aborted at '{name}': {e}");
                    report.aborted = true;
                    break;
                }
            }
        }

        if let Err(e) = self.target.commit().await {
            error!("  Failed to commit {pass}: {e}");
            report.aborted = true;
        }

        self.completed.push(pass);
        info!("  {report}");
        report
    }
}
