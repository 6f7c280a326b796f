use super::mapping::RosterField;
use super::parser::RawRow;
use chrono::NaiveDate;
use serde::Serialize;

/// A roster row that survived strict validation. Nothing untyped crosses this
/// boundary: optional columns are parsed or absent, never raw strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterRow {
    pub row_number: usize,
    pub name: String,
    pub email: String,
    pub position: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_score: Option<u8>,
}

/// Validate one raw row, collecting every failure instead of stopping at the
/// first so the user can fix a broken row in one pass.
pub(crate) fn validate_row(raw: &RawRow) -> Result<RosterRow, Vec<String>> {
    let mut failures = Vec::new();

    let name = required(raw, RosterField::Name, "Name is required", &mut failures);
    let email = required(raw, RosterField::Email, "Email is required", &mut failures);
    if let Some(candidate) = email.as_deref() {
        if !is_valid_email(candidate) {
            failures.push("Invalid email format".to_string());
        }
    }
    let position = required(
        raw,
        RosterField::Position,
        "Position is required",
        &mut failures,
    );
    let location = required(
        raw,
        RosterField::Location,
        "Location is required",
        &mut failures,
    );

    let employee_score = bounded_score(
        raw.get(RosterField::EmployeeScore),
        100,
        "Employee score must be between 0 and 100",
        &mut failures,
    );
    let company_score = bounded_score(
        raw.get(RosterField::CompanyScore),
        10,
        "Company score must be between 0 and 10",
        &mut failures,
    );

    if !failures.is_empty() {
        return Err(failures);
    }

    Ok(RosterRow {
        row_number: raw.row_number,
        // Unwraps cannot fire: a missing required field pushed a failure above.
        name: name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        position: position.unwrap_or_default(),
        location: location.unwrap_or_default(),
        phone: raw.get(RosterField::Phone).map(str::to_string),
        department: raw.get(RosterField::Department).map(str::to_string),
        hire_date: raw.get(RosterField::HireDate).and_then(parse_hire_date),
        employee_score,
        company_score,
    })
}

fn required(
    raw: &RawRow,
    field: RosterField,
    message: &str,
    failures: &mut Vec<String>,
) -> Option<String> {
    match raw.get(field) {
        Some(value) => Some(value.to_string()),
        None => {
            failures.push(message.to_string());
            None
        }
    }
}

fn bounded_score(
    value: Option<&str>,
    max: i64,
    message: &str,
    failures: &mut Vec<String>,
) -> Option<u8> {
    let raw = value?;
    match raw.parse::<i64>() {
        Ok(score) if (0..=max).contains(&score) => Some(score as u8),
        // Out-of-range and non-numeric values surface the same range message.
        _ => {
            failures.push(message.to_string());
            None
        }
    }
}

/// Minimal `local@domain.tld` shape check: exactly one `@`, a non-empty local
/// part, and a dotted domain with a non-empty final label.
fn is_valid_email(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !host.starts_with('.') && !tld.is_empty()
}

/// Hire dates are optional metadata; values that do not parse are dropped
/// rather than failing the row, and recency counting later ignores them.
fn parse_hire_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn raw_row(fields: &[(RosterField, &str)]) -> RawRow {
        RawRow {
            row_number: 2,
            fields: fields
                .iter()
                .map(|(field, value)| (*field, value.to_string()))
                .collect(),
        }
    }

    fn complete_row() -> RawRow {
        raw_row(&[
            (RosterField::Name, "Ana Soto"),
            (RosterField::Email, "ana@arkus.mx"),
            (RosterField::Position, "Backend Developer"),
            (RosterField::Location, "Guadalajara, Jalisco"),
            (RosterField::HireDate, "2026-06-15"),
            (RosterField::EmployeeScore, "88"),
            (RosterField::CompanyScore, "9"),
        ])
    }

    #[test]
    fn valid_row_parses_every_field() {
        let row = validate_row(&complete_row()).expect("row validates");
        assert_eq!(row.name, "Ana Soto");
        assert_eq!(row.employee_score, Some(88));
        assert_eq!(row.company_score, Some(9));
        assert_eq!(
            row.hire_date,
            NaiveDate::from_ymd_opt(2026, 6, 15)
        );
    }

    #[test]
    fn empty_row_reports_all_four_required_fields() {
        let failures = validate_row(&RawRow {
            row_number: 2,
            fields: HashMap::new(),
        })
        .expect_err("row fails");

        assert_eq!(
            failures,
            vec![
                "Name is required",
                "Email is required",
                "Position is required",
                "Location is required",
            ]
        );
    }

    #[test]
    fn email_shape_is_checked_when_present() {
        let mut raw = complete_row();
        raw.fields
            .insert(RosterField::Email, "not-an-email".to_string());
        let failures = validate_row(&raw).expect_err("row fails");
        assert_eq!(failures, vec!["Invalid email format"]);

        assert!(is_valid_email("first.last@sub.example.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("two@at@example.com"));
        assert!(!is_valid_email("spaced name@example.com"));
    }

    #[test]
    fn scores_out_of_range_or_non_numeric_use_range_message() {
        let mut raw = complete_row();
        raw.fields
            .insert(RosterField::EmployeeScore, "150".to_string());
        raw.fields
            .insert(RosterField::CompanyScore, "eleven".to_string());
        let failures = validate_row(&raw).expect_err("row fails");
        assert_eq!(
            failures,
            vec![
                "Employee score must be between 0 and 100",
                "Company score must be between 0 and 10",
            ]
        );
    }

    #[test]
    fn malformed_hire_date_is_dropped_not_fatal() {
        let mut raw = complete_row();
        raw.fields
            .insert(RosterField::HireDate, "sometime in June".to_string());
        let row = validate_row(&raw).expect("row validates");
        assert!(row.hire_date.is_none());
    }
}
