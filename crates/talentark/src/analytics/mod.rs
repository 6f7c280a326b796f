mod views;

pub use views::{AnalyticsSnapshot, DistributionEntry, TechnologyEntry};

use crate::directory::{EmployeeRecord, EmployeeRole};
use chrono::{Months, NaiveDate};
use std::collections::HashMap;

const PERFORMANCE_BUCKETS: [&str; 4] = ["<70", "70-79", "80-89", "90+"];
const EXPERIENCE_BUCKETS: [&str; 4] = ["0-2 years", "3-5 years", "6-10 years", "10+ years"];
const ALLOCATION_BUCKETS: [&str; 3] = ["0%", "1-89%", "90%+"];

const UNASSIGNED_DEPARTMENT: &str = "Unassigned";
const UNKNOWN_LOCATION: &str = "Unknown";

/// How many entries the technology ranking keeps.
const TOP_TECHNOLOGY_LIMIT: usize = 10;

/// Compute the dashboard snapshot for a roster.
///
/// Total over well-typed input: no error paths, no division by zero on an
/// empty roster. `today` is injected so recency is testable; everything else
/// is deterministic for a given input order (ranking ties keep the order in
/// which a value was first seen).
pub fn snapshot(employees: &[EmployeeRecord], today: NaiveDate) -> AnalyticsSnapshot {
    let total = employees.len();

    let mut employee_score_sum: u64 = 0;
    let mut company_score_sum: u64 = 0;
    let mut experience_sum: u64 = 0;
    let mut total_certifications = 0usize;
    let mut recent_hires = 0usize;

    let mut performance_counts = [0usize; 4];
    let mut experience_counts = [0usize; 4];
    let mut allocation_counts = [0usize; 3];
    let mut role_counts: HashMap<EmployeeRole, usize> = HashMap::new();

    let mut departments = FrequencyTable::default();
    let mut locations = FrequencyTable::default();
    let mut technologies = FrequencyTable::default();

    let recency_cutoff = today.checked_sub_months(Months::new(3));

    for employee in employees {
        employee_score_sum += u64::from(employee.employee_score);
        company_score_sum += u64::from(employee.company_score);
        experience_sum += u64::from(employee.years_of_experience);
        total_certifications += employee.certifications.len();

        performance_counts[performance_bucket(employee.employee_score)] += 1;
        experience_counts[experience_bucket(employee.years_of_experience)] += 1;
        allocation_counts[allocation_bucket(employee.project_allocation_pct)] += 1;
        *role_counts.entry(employee.role).or_insert(0) += 1;

        departments.bump(department_key(employee.department.as_deref()));
        locations.bump(&region_of(&employee.location));

        for technology in &employee.technologies {
            let trimmed = technology.trim();
            if !trimmed.is_empty() {
                technologies.bump(trimmed);
            }
        }

        if let (Some(hired), Some(cutoff)) = (employee.hire_date, recency_cutoff) {
            if hired >= cutoff && hired <= today {
                recent_hires += 1;
            }
        }
    }

    let total_departments = departments.distinct_excluding(UNASSIGNED_DEPARTMENT);
    let total_locations = locations.distinct_excluding(UNKNOWN_LOCATION);

    let role_distribution = EmployeeRole::ordered()
        .into_iter()
        .map(|role| {
            let count = role_counts.get(&role).copied().unwrap_or(0);
            DistributionEntry {
                name: role.label().to_string(),
                count,
                percentage: percentage(count, total),
            }
        })
        .collect();

    AnalyticsSnapshot {
        total_employees: total,
        average_employee_score: rounded_average(employee_score_sum, total),
        average_company_score: tenths_average(company_score_sum, total),
        total_departments,
        total_locations,
        average_experience: rounded_average(experience_sum, total),
        total_certifications,
        recent_hires,
        performance_distribution: fixed_buckets(&PERFORMANCE_BUCKETS, &performance_counts, total),
        experience_distribution: fixed_buckets(&EXPERIENCE_BUCKETS, &experience_counts, total),
        allocation_stats: fixed_buckets(&ALLOCATION_BUCKETS, &allocation_counts, total),
        department_distribution: departments.ranked_entries(total),
        location_distribution: locations.ranked_entries(total),
        role_distribution,
        top_technologies: technologies.top_entries(TOP_TECHNOLOGY_LIMIT),
    }
}

/// File name used when a snapshot is exported verbatim to disk.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("talentark-analytics-{}.json", date.format("%Y-%m-%d"))
}

fn performance_bucket(score: u8) -> usize {
    match score {
        0..=69 => 0,
        70..=79 => 1,
        80..=89 => 2,
        _ => 3,
    }
}

fn experience_bucket(years: u8) -> usize {
    match years {
        0..=2 => 0,
        3..=5 => 1,
        6..=10 => 2,
        _ => 3,
    }
}

fn allocation_bucket(pct: u8) -> usize {
    match pct {
        0 => 0,
        1..=89 => 1,
        _ => 2,
    }
}

fn department_key(department: Option<&str>) -> &str {
    match department.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => UNASSIGNED_DEPARTMENT,
    }
}

/// Derive the region from a free-text "City, Region" location. Everything
/// after the first comma wins; a location without one stands for itself, and
/// a blank region falls back to the city so no bucket carries punctuation.
fn region_of(location: &str) -> String {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return UNKNOWN_LOCATION.to_string();
    }

    match trimmed.split_once(',') {
        Some((_, region)) if !region.trim().is_empty() => region.trim().to_string(),
        Some((city, _)) if !city.trim().is_empty() => city.trim().to_string(),
        Some(_) => UNKNOWN_LOCATION.to_string(),
        None => trimmed.to_string(),
    }
}

fn percentage(count: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u8
}

fn rounded_average(sum: u64, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (sum as f64 / total as f64).round() as u8
}

fn tenths_average(sum: u64, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (((sum as f64 / total as f64) * 10.0).round() / 10.0) as f32
}

fn fixed_buckets(labels: &[&str], counts: &[usize], total: usize) -> Vec<DistributionEntry> {
    labels
        .iter()
        .zip(counts)
        .map(|(label, &count)| DistributionEntry {
            name: (*label).to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect()
}

/// String-keyed counter that remembers the order keys were first seen, so
/// count ties rank deterministically for a given input order.
#[derive(Default)]
struct FrequencyTable {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl FrequencyTable {
    fn bump(&mut self, key: &str) {
        if let Some(count) = self.counts.get_mut(key) {
            *count += 1;
        } else {
            self.order.push(key.to_string());
            self.counts.insert(key.to_string(), 1);
        }
    }

    fn distinct_excluding(&self, excluded: &str) -> usize {
        self.order.iter().filter(|key| *key != excluded).count()
    }

    /// Entries sorted by descending count; stable, so ties keep first-seen order.
    fn ranked(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .order
            .iter()
            .map(|key| (key.as_str(), self.counts[key]))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    fn ranked_entries(&self, total: usize) -> Vec<DistributionEntry> {
        self.ranked()
            .into_iter()
            .map(|(name, count)| DistributionEntry {
                name: name.to_string(),
                count,
                percentage: percentage(count, total),
            })
            .collect()
    }

    fn top_entries(&self, limit: usize) -> Vec<TechnologyEntry> {
        self.ranked()
            .into_iter()
            .take(limit)
            .map(|(name, count)| TechnologyEntry {
                name: name.to_string(),
                count,
            })
            .collect()
    }
}
