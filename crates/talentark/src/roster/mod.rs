mod mapping;
mod normalizer;
mod parser;
mod validate;

pub use validate::RosterRow;

use crate::directory::{EmployeeRecord, EmployeeRepository, EmployeeRole, RepositoryError};
use mapping::RosterField;
use serde::Serialize;
use serde_json::json;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Canonical template headers, in the column order the template ships with.
pub const TEMPLATE_HEADERS: [&str; 9] = [
    "Name",
    "Email",
    "Position",
    "Location",
    "Phone",
    "Department",
    "Hire Date",
    "Employee Score",
    "Company Score",
];

/// Downloadable roster template: the canonical headers plus two example rows.
pub fn template() -> String {
    let mut out = TEMPLATE_HEADERS.join(",");
    out.push('\n');
    out.push_str(
        "Ana Soto,ana.soto@example.com,Backend Developer,\"Guadalajara, Jalisco\",+52 33 1234 5678,Engineering,2026-06-15,88,9\n",
    );
    out.push_str(
        "Luis Vega,luis.vega@example.com,QA Engineer,\"Monterrey, Nuevo Leon\",,Quality,2026-07-01,75,8\n",
    );
    out
}

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Store(RepositoryError),
    NotPreviewed,
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster sheet: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster data: {}", err),
            RosterImportError::Store(err) => {
                write!(f, "directory store rejected the import run: {}", err)
            }
            RosterImportError::NotPreviewed => {
                write!(f, "import run must be previewed before it can be committed")
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::Store(err) => Some(err),
            RosterImportError::NotPreviewed => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<RepositoryError> for RosterImportError {
    fn from(err: RepositoryError) -> Self {
        Self::Store(err)
    }
}

/// Where a run currently stands. One run walks the phases strictly forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportPhase {
    Idle,
    Parsing,
    Previewing,
    Importing,
    Completed,
}

impl Default for ImportPhase {
    fn default() -> Self {
        ImportPhase::Idle
    }
}

impl ImportPhase {
    pub const fn label(self) -> &'static str {
        match self {
            ImportPhase::Idle => "idle",
            ImportPhase::Parsing => "parsing",
            ImportPhase::Previewing => "previewing",
            ImportPhase::Importing => "importing",
            ImportPhase::Completed => "completed",
        }
    }
}

/// Per-row failure, positioned by spreadsheet row number.
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    pub row: usize,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Non-fatal per-row warning (today always a duplicate email).
#[derive(Debug, Clone, Serialize)]
pub struct RowWarning {
    pub row: usize,
    pub warning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Partition of every data row in the sheet, in original row order.
#[derive(Debug, Default, Serialize)]
pub struct ImportOutcome {
    pub accepted: Vec<RosterRow>,
    pub duplicates: Vec<RowWarning>,
    pub errors: Vec<RowError>,
}

impl ImportOutcome {
    /// Total data rows the run will walk during commit.
    pub fn total_rows(&self) -> usize {
        self.accepted.len() + self.duplicates.len() + self.errors.len()
    }
}

/// Result payload after persistence: three counters plus per-row detail.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub success: usize,
    pub errors: Vec<RowError>,
    pub warnings: Vec<RowWarning>,
}

static EMPLOYEE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_employee_id() -> String {
    let id = EMPLOYEE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("emp-{id:06}")
}

/// One roster import run: `Idle -> Parsing -> Previewing -> Importing ->
/// Completed`. The outcome structure is owned by the run and only ever grows;
/// a row that fails stays failed for this run (no retry).
#[derive(Debug, Default)]
pub struct ImportRun {
    phase: ImportPhase,
    outcome: Option<ImportOutcome>,
}

impl ImportRun {
    pub fn new() -> Self {
        Self {
            phase: ImportPhase::Idle,
            outcome: None,
        }
    }

    pub fn phase(&self) -> ImportPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<&ImportOutcome> {
        self.outcome.as_ref()
    }

    /// Parse and partition a roster sheet against the set of already-stored
    /// emails (compared case-insensitively). Leaves the run in `Previewing`.
    pub fn preview<R: Read>(
        &mut self,
        reader: R,
        existing_emails: &HashSet<String>,
    ) -> Result<&ImportOutcome, RosterImportError> {
        self.phase = ImportPhase::Parsing;
        let rows = parser::parse_rows(reader)?;

        let mut outcome = ImportOutcome::default();
        let mut seen: HashSet<String> = existing_emails
            .iter()
            .map(|email| email.to_ascii_lowercase())
            .collect();

        for raw in &rows {
            match validate::validate_row(raw) {
                Ok(row) => {
                    let key = row.email.to_ascii_lowercase();
                    if seen.contains(&key) {
                        outcome.duplicates.push(RowWarning {
                            row: raw.row_number,
                            warning: format!("Email already exists: {}", row.email),
                            data: row_data(raw),
                        });
                    } else {
                        seen.insert(key);
                        outcome.accepted.push(row);
                    }
                }
                Err(failures) => outcome.errors.push(RowError {
                    row: raw.row_number,
                    error: failures.join("; "),
                    data: row_data(raw),
                }),
            }
        }

        self.phase = ImportPhase::Previewing;
        Ok(self.outcome.insert(outcome))
    }

    /// Convenience wrapper for file-based runs.
    pub fn preview_path<P: AsRef<Path>>(
        &mut self,
        path: P,
        existing_emails: &HashSet<String>,
    ) -> Result<&ImportOutcome, RosterImportError> {
        let file = std::fs::File::open(path)?;
        self.preview(file, existing_emails)
    }

    /// Persist the previewed partition: exactly one insert per accepted row,
    /// in file order. An insert failure becomes one more error entry and the
    /// loop keeps going; only a store outage aborts the run. `progress` fires
    /// after every row, accepted or not, as `(processed, total)`.
    pub fn commit<S>(
        &mut self,
        repository: &S,
        progress: &mut dyn FnMut(usize, usize),
    ) -> Result<ImportReport, RosterImportError>
    where
        S: EmployeeRepository + ?Sized,
    {
        if self.phase != ImportPhase::Previewing {
            return Err(RosterImportError::NotPreviewed);
        }
        let outcome = self.outcome.take().unwrap_or_default();
        self.phase = ImportPhase::Importing;

        let total = outcome.total_rows();
        let mut success = 0usize;
        let mut errors = outcome.errors;
        let warnings = outcome.duplicates;

        // Walk every data row in spreadsheet order so progress and row
        // numbers line up with what the user sees in the sheet.
        let mut steps: Vec<(usize, Option<&RosterRow>)> = outcome
            .accepted
            .iter()
            .map(|row| (row.row_number, Some(row)))
            .chain(warnings.iter().map(|warning| (warning.row, None)))
            .chain(errors.iter().map(|error| (error.row, None)))
            .collect();
        steps.sort_by_key(|(row, _)| *row);

        let mut insert_failures = Vec::new();
        for (processed, (row_number, row)) in steps.into_iter().enumerate() {
            if let Some(row) = row {
                match repository.insert(record_from_row(row)) {
                    Ok(_) => success += 1,
                    // A store outage is fatal to the run, not to one row.
                    Err(RepositoryError::Unavailable(reason)) => {
                        return Err(RepositoryError::Unavailable(reason).into());
                    }
                    Err(err) => insert_failures.push(RowError {
                        row: row_number,
                        error: err.to_string(),
                        data: None,
                    }),
                }
            }
            progress(processed + 1, total);
        }

        errors.extend(insert_failures);
        errors.sort_by_key(|entry| entry.row);

        self.phase = ImportPhase::Completed;
        Ok(ImportReport {
            success,
            errors,
            warnings,
        })
    }
}

fn row_data(raw: &parser::RawRow) -> Option<serde_json::Value> {
    let mut map = serde_json::Map::new();
    for field in [
        RosterField::Name,
        RosterField::Email,
        RosterField::Position,
        RosterField::Location,
        RosterField::Phone,
        RosterField::Department,
        RosterField::HireDate,
        RosterField::EmployeeScore,
        RosterField::CompanyScore,
    ] {
        if let Some(value) = raw.get(field) {
            map.insert(canonical_label(field).to_string(), json!(value));
        }
    }

    if map.is_empty() {
        None
    } else {
        Some(serde_json::Value::Object(map))
    }
}

const fn canonical_label(field: RosterField) -> &'static str {
    match field {
        RosterField::Name => "Name",
        RosterField::Email => "Email",
        RosterField::Position => "Position",
        RosterField::Location => "Location",
        RosterField::Phone => "Phone",
        RosterField::Department => "Department",
        RosterField::HireDate => "Hire Date",
        RosterField::EmployeeScore => "Employee Score",
        RosterField::CompanyScore => "Company Score",
    }
}

/// Imported employees land with the default collaborator role and no project
/// allocation; admins refine those afterwards. Absent scores are stored as
/// zero, so until someone scores the record it reads as a scored zero in the
/// analytics averages and the lowest performance bucket.
fn record_from_row(row: &RosterRow) -> EmployeeRecord {
    EmployeeRecord {
        id: next_employee_id(),
        name: row.name.clone(),
        email: row.email.clone(),
        role: EmployeeRole::Collaborator,
        position: row.position.clone(),
        phone: row.phone.clone(),
        department: row.department.clone(),
        location: row.location.clone(),
        years_of_experience: 0,
        employee_score: row.employee_score.unwrap_or(0),
        company_score: row.company_score.unwrap_or(0),
        project_allocation_pct: 0,
        technologies: Vec::new(),
        certifications: Vec::new(),
        hire_date: row.hire_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn header_aliases_resolve_case_insensitively() {
        assert_eq!(
            mapping::lookup_for_tests("  FULL   name "),
            Some(RosterField::Name)
        );
        assert_eq!(
            mapping::lookup_for_tests("\u{feff}Email Address"),
            Some(RosterField::Email)
        );
        assert_eq!(mapping::lookup_for_tests("Badge Color"), None);
    }

    #[test]
    fn normalize_header_collapses_whitespace_and_case() {
        assert_eq!(
            normalizer::normalize_for_tests("\u{feff}Hire   Date "),
            "hire date"
        );
    }

    #[test]
    fn preview_moves_run_to_previewing() {
        let mut run = ImportRun::new();
        assert_eq!(run.phase(), ImportPhase::Idle);

        let outcome = run
            .preview(
                Cursor::new("Name,Email,Position,Location\nAna,ana@arkus.mx,Dev,Remote\n"),
                &HashSet::new(),
            )
            .expect("preview succeeds");
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(run.phase(), ImportPhase::Previewing);
        assert_eq!(run.phase().label(), "previewing");
    }

    #[test]
    fn duplicate_detection_is_case_insensitive_and_in_run() {
        let csv = "Name,Email,Position,Location\n\
Ana,ana@arkus.mx,Dev,Remote\n\
Ana Again,ANA@arkus.MX,Dev,Remote\n";
        let mut run = ImportRun::new();
        let outcome = run
            .preview(Cursor::new(csv), &HashSet::new())
            .expect("preview succeeds");

        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.duplicates.len(), 1);
        assert_eq!(outcome.duplicates[0].row, 3);
    }

    #[test]
    fn commit_before_preview_is_rejected() {
        struct NoStore;
        impl EmployeeRepository for NoStore {
            fn list_all(&self) -> Result<Vec<EmployeeRecord>, RepositoryError> {
                panic!("store must not be touched")
            }
            fn find_by_email(&self, _: &str) -> Result<Option<EmployeeRecord>, RepositoryError> {
                panic!("store must not be touched")
            }
            fn insert(&self, _: EmployeeRecord) -> Result<EmployeeRecord, RepositoryError> {
                panic!("store must not be touched")
            }
            fn update(&self, _: EmployeeRecord) -> Result<(), RepositoryError> {
                panic!("store must not be touched")
            }
        }

        let mut run = ImportRun::new();
        assert_eq!(run.phase(), ImportPhase::Idle);
        let error = run
            .commit(&NoStore, &mut |_, _| {})
            .expect_err("commit rejected");
        assert!(matches!(error, RosterImportError::NotPreviewed));
    }

    #[test]
    fn preview_path_propagates_io_errors() {
        let mut run = ImportRun::new();
        let error = run
            .preview_path("./does-not-exist.csv", &HashSet::new())
            .expect_err("expected io error");
        match error {
            RosterImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn unscored_rows_become_records_scored_zero() {
        let row = RosterRow {
            row_number: 2,
            name: "Ana".to_string(),
            email: "ana@arkus.mx".to_string(),
            position: "Dev".to_string(),
            location: "Remote".to_string(),
            phone: None,
            department: None,
            hire_date: None,
            employee_score: None,
            company_score: None,
        };

        let record = record_from_row(&row);
        assert_eq!(record.employee_score, 0);
        assert_eq!(record.company_score, 0);
        assert_eq!(record.role, EmployeeRole::Collaborator);
        assert_eq!(record.project_allocation_pct, 0);
    }

    #[test]
    fn template_round_trips_through_the_importer_cleanly() {
        let mut run = ImportRun::new();
        let outcome = run
            .preview(Cursor::new(template()), &HashSet::new())
            .expect("template parses");
        assert_eq!(outcome.accepted.len(), 2);
        assert!(outcome.duplicates.is_empty());
        assert!(outcome.errors.is_empty());
    }
}
