//! Loading of the static reference data file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Data file {} not found", .path.display())]
    NotFound { path: PathBuf },
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed data file: {0}")]
    Json(#[from] serde_json::Error),
}

/// The four record sets of `data_constants.json`.
///
/// Records stay as raw JSON so that a single malformed entry only fails its
/// own insert instead of the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub formations: Vec<Value>,
    #[serde(default)]
    pub types: Vec<Value>,
    #[serde(default)]
    pub courses: Vec<Value>,
    #[serde(default)]
    pub trainings: Vec<Value>,
}

impl SeedData {
    /// Loads the data file, falling back to an empty dataset when it is
    /// missing or unreadable. Seeding is best-effort.
    pub fn load(path: impl AsRef<Path>) -> Self {
        match Self::try_load(path) {
            Ok(data) => data,
            Err(e) => {
                error!("{e}; continuing with an empty dataset");
                Self::default()
            }
        }
    }

    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SeedError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                SeedError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn len(&self) -> usize {
        self.formations.len() + self.types.len() + self.courses.len() + self.trainings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
