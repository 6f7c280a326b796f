use serde::{Deserialize, Serialize};

/// One slice of a histogram together with its share of the workforce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub name: String,
    pub count: usize,
    /// `round(100 * count / total_employees)`; 0 for an empty roster.
    pub percentage: u8,
}

/// Frequency entry for the technology ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnologyEntry {
    pub name: String,
    pub count: usize,
}

/// Fully derived dashboard snapshot. Value object with no identity: it is
/// recomputed on every call and safe to serialize verbatim over the wire.
///
/// Every field is deterministic for a given roster and `today` except
/// `recent_hires`, which shifts when the wall-clock date passed in crosses a
/// three-month boundary between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub total_employees: usize,
    /// Mean employee score rounded to the nearest integer.
    pub average_employee_score: u8,
    /// Mean company score rounded to the nearest 0.1.
    pub average_company_score: f32,
    pub total_departments: usize,
    pub total_locations: usize,
    pub average_experience: u8,
    pub total_certifications: usize,
    /// Employees hired within the trailing three calendar months.
    pub recent_hires: usize,
    pub performance_distribution: Vec<DistributionEntry>,
    pub experience_distribution: Vec<DistributionEntry>,
    pub allocation_stats: Vec<DistributionEntry>,
    pub department_distribution: Vec<DistributionEntry>,
    pub location_distribution: Vec<DistributionEntry>,
    pub role_distribution: Vec<DistributionEntry>,
    pub top_technologies: Vec<TechnologyEntry>,
}
