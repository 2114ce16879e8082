//! Bulk editor grid.
//!
//! The bulk editor shows the whole table as a CSV grid with the same header as
//! the records file. The user may change any cell, delete rows, or append rows
//! with a blank `ID`. Parsing applies the grid's column constraints; turning
//! the rows into a new table is [`crate::RecordTable::apply_grid`].
//!
//! Column constraints:
//! - `ID`: blank (new row) or a positive integer
//! - `Name`: non-empty
//! - `Age`: whole number in `0..=120`
//! - `Gender`: Male, Female or Other
//! - `Blood Type`: one of the eight groups, `Not specified`, or blank
//! - `Phone`, `Address`, `Medical History`: free text, blank means default
//! - `Date Added`: `YYYY-MM-DD HH:MM` or blank

use crate::constants::{DEFAULT_ADDRESS, DEFAULT_MEDICAL_HISTORY, DEFAULT_PHONE};
use crate::record::{parse_date_added, text_or_default, BloodType, Gender, PatientRecord};
use crate::store::{check_header, write_records};
use crate::{RecordError, RecordResult};
use chrono::NaiveDateTime;
use hrms_types::{Age, NonEmptyText};
use serde::Deserialize;

/// One validated row of an edited grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridRow {
    /// `None` for rows added in the editor.
    pub id: Option<u64>,
    pub name: NonEmptyText,
    pub age: Age,
    pub gender: Gender,
    pub blood_type: BloodType,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub medical_history: Option<String>,
    pub date_added: Option<NaiveDateTime>,
}

impl GridRow {
    /// Build the stored record, filling defaults for blank optional cells.
    pub(crate) fn into_record(self, id: u64, date_added: Option<NaiveDateTime>) -> PatientRecord {
        PatientRecord {
            id,
            name: self.name,
            age: self.age,
            gender: self.gender,
            blood_type: self.blood_type,
            phone: text_or_default(self.phone, DEFAULT_PHONE),
            address: text_or_default(self.address, DEFAULT_ADDRESS),
            medical_history: text_or_default(self.medical_history, DEFAULT_MEDICAL_HISTORY),
            date_added,
        }
    }
}

/// Raw cells as typed by the user.
#[derive(Deserialize)]
struct RawGridRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Age")]
    age: String,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "Blood Type")]
    blood_type: String,
    #[serde(rename = "Phone")]
    phone: String,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "Medical History")]
    medical_history: String,
    #[serde(rename = "Date Added")]
    date_added: String,
}

impl RawGridRow {
    fn validate(self) -> Result<GridRow, String> {
        let id = match self.id.trim() {
            "" => None,
            raw => match raw.parse::<u64>() {
                Ok(0) | Err(_) => return Err(format!("ID must be blank or a positive integer, got {raw:?}")),
                Ok(id) => Some(id),
            },
        };

        let name = NonEmptyText::new(&self.name).map_err(|_| "Name is required".to_string())?;
        if self.age.trim().is_empty() {
            return Err("Age is required".into());
        }
        let age = self.age.parse::<Age>().map_err(|e| e.to_string())?;
        if self.gender.trim().is_empty() {
            return Err("Gender is required".into());
        }
        let gender = self.gender.parse::<Gender>().map_err(|e| e.to_string())?;
        let blood_type = self
            .blood_type
            .parse::<BloodType>()
            .map_err(|e| e.to_string())?;
        let date_added = parse_date_added(&self.date_added)?;

        Ok(GridRow {
            id,
            name,
            age,
            gender,
            blood_type,
            phone: Some(self.phone),
            address: Some(self.address),
            medical_history: Some(self.medical_history),
            date_added,
        })
    }
}

/// Render the table as an editable grid.
pub fn render_grid(records: &[PatientRecord]) -> RecordResult<String> {
    let mut buf = Vec::new();
    write_records(&mut buf, records)?;
    String::from_utf8(buf).map_err(|e| RecordError::InvalidInput(e.to_string()))
}

/// Parse an edited grid.
///
/// # Errors
///
/// - `RecordError::UnexpectedHeader` if the header row was changed
/// - `RecordError::Csv` if the text is not well-formed CSV with nine columns
/// - `RecordError::InvalidGridRow` naming the first row (1-based, header
///   excluded) that breaks a column constraint
pub fn parse_grid(text: &str) -> RecordResult<Vec<GridRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());
    check_header(rdr.headers()?)?;

    let mut rows = Vec::new();
    for (index, raw) in rdr.deserialize::<RawGridRow>().enumerate() {
        let row = raw?
            .validate()
            .map_err(|reason| RecordError::InvalidGridRow {
                row: index + 1,
                reason,
            })?;
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ID,Name,Age,Gender,Blood Type,Phone,Address,Medical History,Date Added\n";

    #[test]
    fn test_parse_grid_accepts_new_rows_with_blank_cells() {
        let text = format!("{HEADER},Eve,0,female,,,,,\n");

        let rows = parse_grid(&text).expect("grid should parse");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, None);
        assert_eq!(rows[0].name.as_str(), "Eve");
        assert!(rows[0].age.is_zero());
        assert_eq!(rows[0].gender, Gender::Female);
        assert_eq!(rows[0].blood_type, BloodType::NotSpecified);
        assert_eq!(rows[0].date_added, None);

        let record = rows[0].clone().into_record(5, None);
        assert_eq!(record.phone, "N/A");
        assert_eq!(record.address, "N/A");
        assert_eq!(record.medical_history, "None");
    }

    #[test]
    fn test_parse_grid_reports_row_of_constraint_violation() {
        let cases = [
            "1,Ann,30,Female,A+,,,,\n2,Ben,121,Male,,,,,\n",
            "1,Ann,30,Female,A+,,,,\n2,Ben,40,Robot,,,,,\n",
            "1,Ann,30,Female,A+,,,,\n2,,40,Male,,,,,\n",
            "1,Ann,30,Female,A+,,,,\n2,Ben,40,Male,Z+,,,,\n",
            "1,Ann,30,Female,A+,,,,\n0,Ben,40,Male,,,,,\n",
            "1,Ann,30,Female,A+,,,,\n2,Ben,,Male,,,,,\n",
            "1,Ann,30,Female,A+,,,,\n2,Ben,40,Male,,,,,yesterday\n",
        ];

        for body in cases {
            let err = parse_grid(&format!("{HEADER}{body}")).expect_err(body);
            assert!(
                matches!(err, RecordError::InvalidGridRow { row: 2, .. }),
                "unexpected error for {body:?}: {err}"
            );
        }
    }

    #[test]
    fn test_parse_grid_rejects_changed_header() {
        let err = parse_grid("Id,Name\n1,Ann\n").expect_err("header changed");
        assert!(matches!(err, RecordError::UnexpectedHeader { .. }));
    }

    #[test]
    fn test_parse_grid_rejects_wrong_column_count() {
        let err = parse_grid(&format!("{HEADER}1,Ann,30\n")).expect_err("short row");
        assert!(matches!(err, RecordError::Csv(_)));
    }

    #[test]
    fn test_render_grid_empty_table_is_header_only() {
        assert_eq!(render_grid(&[]).expect("render should succeed"), HEADER);
    }
}
