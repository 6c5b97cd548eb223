use serde::{Deserialize, Serialize};

/// Academic level, e.g. higher or lower education.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Credential classification (bachelor's, technical, technologist).
/// Stored in the `types` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseType {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Academic program combining a formation and a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    pub formation_id: i64,
    pub type_id: i64,
}

/// Standalone training record, not tied to formations or types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Training {
    pub name: String,
    pub provider: String,
    #[serde(rename = "type")]
    pub training_type: String,
    pub category: String,
}
