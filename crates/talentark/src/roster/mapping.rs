use super::normalizer::normalize_header;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Canonical columns a roster spreadsheet can provide after header aliasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum RosterField {
    Name,
    Email,
    Position,
    Location,
    Phone,
    Department,
    HireDate,
    EmployeeScore,
    CompanyScore,
}

static HEADER_ALIAS_MAP: OnceLock<HashMap<String, RosterField>> = OnceLock::new();

/// Resolve a raw spreadsheet header to its canonical field. Unrecognized
/// headers return `None` and their column is ignored wholesale.
pub(crate) fn field_for_header(header: &str) -> Option<RosterField> {
    header_alias_map().get(&normalize_header(header)).copied()
}

fn header_alias_map() -> &'static HashMap<String, RosterField> {
    HEADER_ALIAS_MAP.get_or_init(|| {
        const ALIASES: &[(&str, RosterField)] = &[
            ("Name", RosterField::Name),
            ("Full Name", RosterField::Name),
            ("Employee Name", RosterField::Name),
            ("Email", RosterField::Email),
            ("Email Address", RosterField::Email),
            ("E-mail", RosterField::Email),
            ("Position", RosterField::Position),
            ("Role", RosterField::Position),
            ("Job Title", RosterField::Position),
            ("Title", RosterField::Position),
            ("Location", RosterField::Location),
            ("City", RosterField::Location),
            ("Office Location", RosterField::Location),
            ("Phone", RosterField::Phone),
            ("Phone Number", RosterField::Phone),
            ("Telephone", RosterField::Phone),
            ("Department", RosterField::Department),
            ("Dept", RosterField::Department),
            ("Team", RosterField::Department),
            ("Hire Date", RosterField::HireDate),
            ("Start Date", RosterField::HireDate),
            ("Hired On", RosterField::HireDate),
            ("Employee Score", RosterField::EmployeeScore),
            ("Performance Score", RosterField::EmployeeScore),
            ("Score", RosterField::EmployeeScore),
            ("Company Score", RosterField::CompanyScore),
            ("Profile Score", RosterField::CompanyScore),
        ];

        let mut map = HashMap::with_capacity(ALIASES.len());
        for (alias, field) in ALIASES {
            map.insert(normalize_header(alias), *field);
        }
        map
    })
}

#[cfg(test)]
pub(crate) fn lookup_for_tests(header: &str) -> Option<RosterField> {
    field_for_header(header)
}
