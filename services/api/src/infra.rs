use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use talentark::directory::{EmployeeRecord, EmployeeRepository, EmployeeRole, RepositoryError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Mutex-guarded roster standing in for the real record store. Seeded in demo
/// mode; empty otherwise until a SQL-backed repository replaces it.
#[derive(Default, Clone)]
pub(crate) struct InMemoryEmployeeRepository {
    records: Arc<Mutex<Vec<EmployeeRecord>>>,
}

impl InMemoryEmployeeRepository {
    pub(crate) fn seeded() -> Self {
        Self {
            records: Arc::new(Mutex::new(demo_roster())),
        }
    }
}

impl EmployeeRepository for InMemoryEmployeeRepository {
    fn list_all(&self) -> Result<Vec<EmployeeRecord>, RepositoryError> {
        let guard = self.records.lock().expect("roster mutex poisoned");
        Ok(guard.clone())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<EmployeeRecord>, RepositoryError> {
        let guard = self.records.lock().expect("roster mutex poisoned");
        Ok(guard
            .iter()
            .find(|record| record.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn insert(&self, record: EmployeeRecord) -> Result<EmployeeRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("roster mutex poisoned");
        let clash = guard.iter().any(|existing| {
            existing.id == record.id || existing.email.eq_ignore_ascii_case(&record.email)
        });
        if clash {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: EmployeeRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("roster mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn hired(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &str,
    name: &str,
    email: &str,
    role: EmployeeRole,
    position: &str,
    department: &str,
    location: &str,
    years: u8,
    scores: (u8, u8),
    allocation: u8,
    technologies: &[&str],
    certifications: &[&str],
    hire_date: Option<NaiveDate>,
) -> EmployeeRecord {
    EmployeeRecord {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        position: position.to_string(),
        phone: None,
        department: Some(department.to_string()),
        location: location.to_string(),
        years_of_experience: years,
        employee_score: scores.0,
        company_score: scores.1,
        project_allocation_pct: allocation,
        technologies: strings(technologies),
        certifications: strings(certifications),
        hire_date,
    }
}

/// Demo-mode roster used when no real record store is configured.
pub(crate) fn demo_roster() -> Vec<EmployeeRecord> {
    vec![
        seed(
            "demo-001",
            "Ana Soto",
            "ana.soto@arkus.mx",
            EmployeeRole::Collaborator,
            "Backend Developer",
            "Engineering",
            "Guadalajara, Jalisco",
            6,
            (88, 9),
            100,
            &["Rust", "Postgres", "Kafka"],
            &["AWS SAA"],
            hired(2024, 3, 11),
        ),
        seed(
            "demo-002",
            "Luis Vega",
            "luis.vega@arkus.mx",
            EmployeeRole::Collaborator,
            "QA Engineer",
            "Quality",
            "Monterrey, Nuevo Leon",
            3,
            (75, 8),
            80,
            &["Cypress", "TypeScript"],
            &[],
            hired(2025, 1, 20),
        ),
        seed(
            "demo-003",
            "Carla Ruiz",
            "carla.ruiz@arkus.mx",
            EmployeeRole::Manager,
            "Engineering Manager",
            "Engineering",
            "Guadalajara, Jalisco",
            12,
            (93, 10),
            60,
            &["Rust", "Go"],
            &["PMP", "AWS SAA"],
            hired(2019, 8, 5),
        ),
        seed(
            "demo-004",
            "Diego Mora",
            "diego.mora@arkus.mx",
            EmployeeRole::Collaborator,
            "Frontend Developer",
            "Engineering",
            "CDMX, Ciudad de Mexico",
            2,
            (69, 6),
            0,
            &["TypeScript", "React"],
            &[],
            hired(2026, 7, 6),
        ),
        seed(
            "demo-005",
            "Elena Paz",
            "elena.paz@arkus.mx",
            EmployeeRole::Hr,
            "Talent Partner",
            "People",
            "Guadalajara, Jalisco",
            8,
            (82, 7),
            0,
            &[],
            &["SHRM-CP"],
            hired(2022, 11, 14),
        ),
        seed(
            "demo-006",
            "Hugo Lima",
            "hugo.lima@arkus.mx",
            EmployeeRole::Collaborator,
            "Data Engineer",
            "Data",
            "Queretaro, Queretaro",
            5,
            (91, 8),
            95,
            &["Python", "Postgres", "Airflow"],
            &["GCP PDE"],
            hired(2026, 8, 3),
        ),
        seed(
            "demo-007",
            "Marta Sol",
            "marta.sol@arkus.mx",
            EmployeeRole::SuperUser,
            "Platform Lead",
            "Engineering",
            "Remote",
            15,
            (96, 10),
            40,
            &["Rust", "Kubernetes", "Go"],
            &["CKA"],
            hired(2018, 2, 26),
        ),
        seed(
            "demo-008",
            "Pablo Rey",
            "pablo.rey@arkus.mx",
            EmployeeRole::Collaborator,
            "Backend Developer",
            "Engineering",
            "Monterrey, Nuevo Leon",
            4,
            (78, 7),
            85,
            &["Go", "Postgres"],
            &[],
            hired(2026, 6, 18),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_repository_enforces_email_uniqueness() {
        let repository = InMemoryEmployeeRepository::seeded();
        let mut duplicate = demo_roster().remove(0);
        duplicate.id = "demo-099".to_string();
        duplicate.email = duplicate.email.to_ascii_uppercase();

        let error = repository.insert(duplicate).expect_err("conflict expected");
        assert!(matches!(error, RepositoryError::Conflict));
    }

    #[test]
    fn update_replaces_matching_record() {
        let repository = InMemoryEmployeeRepository::seeded();
        let mut record = repository
            .find_by_email("ana.soto@arkus.mx")
            .expect("lookup works")
            .expect("ana is seeded");
        record.employee_score = 91;

        repository.update(record).expect("update succeeds");
        let refreshed = repository
            .find_by_email("ana.soto@arkus.mx")
            .expect("lookup works")
            .expect("ana still there");
        assert_eq!(refreshed.employee_score, 91);
    }
}
