use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Access roles recognized by the TalentArk permission model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    SuperUser,
    Hr,
    Manager,
    Collaborator,
}

impl EmployeeRole {
    pub const fn label(self) -> &'static str {
        match self {
            EmployeeRole::SuperUser => "Super User",
            EmployeeRole::Hr => "HR",
            EmployeeRole::Manager => "Manager",
            EmployeeRole::Collaborator => "Collaborator",
        }
    }

    pub const fn ordered() -> [EmployeeRole; 4] {
        [
            EmployeeRole::SuperUser,
            EmployeeRole::Hr,
            EmployeeRole::Manager,
            EmployeeRole::Collaborator,
        ]
    }
}

/// Flattened employee snapshot as served by the record store. Analytics and
/// imports only ever read these; mutation goes through the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: EmployeeRole,
    /// Free-text job title, distinct from the access role.
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Free text, conventionally "City, Region".
    pub location: String,
    #[serde(default)]
    pub years_of_experience: u8,
    /// Performance metric on a 0-100 scale.
    pub employee_score: u8,
    /// Profile-quality rating on a 0-10 scale.
    pub company_score: u8,
    /// Share of time committed to active project work, 0-100.
    #[serde(default)]
    pub project_allocation_pct: u8,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<NaiveDate>,
}

/// Storage abstraction so analytics and imports can be exercised in isolation
/// and a SQL-backed store can be swapped in without touching either.
pub trait EmployeeRepository: Send + Sync {
    fn list_all(&self) -> Result<Vec<EmployeeRecord>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<EmployeeRecord>, RepositoryError>;
    fn insert(&self, record: EmployeeRecord) -> Result<EmployeeRecord, RepositoryError>;
    fn update(&self, record: EmployeeRecord) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures. `Unavailable` is fatal to any
/// operation touching the store; the other variants are per-record.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("directory store unavailable: {0}")]
    Unavailable(String),
}
