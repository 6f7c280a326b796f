use super::mapping::{self, RosterField};
use std::collections::HashMap;
use std::io::Read;

/// A data row after header aliasing but before validation. Only recognized,
/// non-empty cells survive into `fields`.
#[derive(Debug, Clone)]
pub(crate) struct RawRow {
    /// 1-based spreadsheet row number; the header is row 1, so the first data
    /// row reports as 2.
    pub(crate) row_number: usize,
    pub(crate) fields: HashMap<RosterField, String>,
}

impl RawRow {
    pub(crate) fn get(&self, field: RosterField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }
}

/// Decode a roster sheet into raw rows. Unrecognized columns are dropped and
/// entirely empty rows are skipped, though skipped rows still advance the
/// spreadsheet row count so reported positions match what the user sees.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RawRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<Option<RosterField>> = csv_reader
        .headers()?
        .iter()
        .map(mapping::field_for_header)
        .collect();

    let mut rows = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let mut fields = HashMap::new();

        for (column, value) in columns.iter().zip(record.iter()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            if let Some(field) = column {
                fields.entry(*field).or_insert_with(|| value.to_string());
            }
        }

        if fields.is_empty() {
            continue;
        }

        rows.push(RawRow {
            row_number: index + 2,
            fields,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parser_honors_aliases_and_skips_unknown_columns() {
        let csv = "Full Name,E-mail,Job Title,City,Badge Color\n\
Ana Soto,ana@arkus.mx,Backend Developer,Guadalajara,blue\n";
        let rows = parse_rows(Cursor::new(csv)).expect("parse succeeds");

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.row_number, 2);
        assert_eq!(row.get(RosterField::Name), Some("Ana Soto"));
        assert_eq!(row.get(RosterField::Email), Some("ana@arkus.mx"));
        assert_eq!(row.get(RosterField::Position), Some("Backend Developer"));
        assert_eq!(row.get(RosterField::Location), Some("Guadalajara"));
        assert_eq!(row.fields.len(), 4);
    }

    #[test]
    fn parser_skips_blank_rows_but_keeps_row_numbers() {
        let csv = "Name,Email,Position,Location\n\
,,,\n\
Luis Vega,luis@arkus.mx,QA Engineer,Monterrey\n";
        let rows = parse_rows(Cursor::new(csv)).expect("parse succeeds");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_number, 3);
    }

    #[test]
    fn parser_keeps_first_value_when_aliases_collide() {
        let csv = "Name,Full Name,Email,Position,Location\n\
Primary,Secondary,p@arkus.mx,Dev,Remote\n";
        let rows = parse_rows(Cursor::new(csv)).expect("parse succeeds");
        assert_eq!(rows[0].get(RosterField::Name), Some("Primary"));
    }
}
