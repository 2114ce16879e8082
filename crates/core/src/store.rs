//! Flat-file persistence for the patient table.
//!
//! The table lives in a single CSV file with a fixed header row (see
//! [`CSV_HEADER`]). The file is read once at startup and fully overwritten on
//! every save; there is no append, patch or atomic rename.
//!
//! A missing or zero-byte file loads as an empty table. Anything else that
//! cannot be parsed is reported as an error instead of being treated as empty,
//! so an unreadable file is never silently replaced by the next save.

use crate::constants::CSV_HEADER;
use crate::record::PatientRecord;
use crate::{RecordError, RecordResult};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Reads and writes the records file at a fixed path.
#[derive(Clone, Debug)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record from the file, in file order.
    ///
    /// # Errors
    ///
    /// - `RecordError::FileRead` if the file exists but cannot be opened
    /// - `RecordError::UnexpectedHeader` if the header row differs from [`CSV_HEADER`]
    /// - `RecordError::Csv` if a row cannot be parsed
    /// - `RecordError::InvalidRecord` for a zero or duplicated ID
    pub fn load(&self) -> RecordResult<Vec<PatientRecord>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(
                    "no records file at {}, starting empty",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(e) => return Err(RecordError::FileRead(e)),
        };

        let records = read_records(file)?;
        tracing::info!(
            "loaded {} record(s) from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    /// Overwrite the file with the given records.
    ///
    /// The header row is written even when `records` is empty.
    pub fn save(&self, records: &[PatientRecord]) -> RecordResult<()> {
        let file = File::create(&self.path).map_err(RecordError::FileWrite)?;
        write_records(file, records)?;
        tracing::info!(
            "saved {} record(s) to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Check a parsed header row against [`CSV_HEADER`].
pub(crate) fn check_header(headers: &csv::StringRecord) -> RecordResult<()> {
    if headers.iter().eq(CSV_HEADER.iter().copied()) {
        Ok(())
    } else {
        Err(RecordError::UnexpectedHeader {
            found: headers.iter().collect::<Vec<_>>().join(","),
        })
    }
}

pub(crate) fn read_records<R: Read>(reader: R) -> RecordResult<Vec<PatientRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        // Zero-byte file.
        return Ok(Vec::new());
    }
    check_header(&headers)?;

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    for (index, row) in rdr.deserialize::<PatientRecord>().enumerate() {
        let record = row?;
        let row_number = index + 1;
        if record.id == 0 {
            return Err(RecordError::InvalidRecord {
                row: row_number,
                reason: "ID must be a positive integer".into(),
            });
        }
        if !seen.insert(record.id) {
            return Err(RecordError::InvalidRecord {
                row: row_number,
                reason: format!("duplicate ID {}", record.id),
            });
        }
        records.push(record);
    }

    Ok(records)
}

pub(crate) fn write_records<W: Write>(writer: W, records: &[PatientRecord]) -> RecordResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(CSV_HEADER)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(RecordError::FileWrite)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{BloodType, Gender};
    use chrono::NaiveDate;
    use hrms_types::{Age, NonEmptyText};
    use std::fs;
    use tempfile::TempDir;

    fn sample(id: u64, name: &str) -> PatientRecord {
        PatientRecord {
            id,
            name: NonEmptyText::new(name).unwrap(),
            age: Age::new(52).unwrap(),
            gender: Gender::Other,
            blood_type: BloodType::AbNegative,
            phone: "+44 20 7946 0958".into(),
            address: "12 High Street, Leeds".into(),
            medical_history: "Asthma, \"mild\"\nPenicillin allergy".into(),
            date_added: NaiveDate::from_ymd_opt(2025, 1, 2).and_then(|d| d.and_hms_opt(8, 5, 0)),
        }
    }

    #[test]
    fn test_load_missing_file_returns_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = CsvStore::new(temp_dir.path().join("health_records.csv"));

        let records = store.load().expect("missing file should load as empty");
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_zero_byte_file_returns_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("health_records.csv");
        fs::write(&path, "").expect("should write empty file");

        let records = CsvStore::new(&path).load().expect("empty file should load");
        assert!(records.is_empty());
    }

    #[test]
    fn test_save_empty_table_writes_header() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("health_records.csv");
        let store = CsvStore::new(&path);

        store.save(&[]).expect("save should succeed");

        let contents = fs::read_to_string(&path).expect("should read file");
        assert_eq!(
            contents,
            "ID,Name,Age,Gender,Blood Type,Phone,Address,Medical History,Date Added\n"
        );
        assert!(store.load().expect("should reload").is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = CsvStore::new(temp_dir.path().join("health_records.csv"));
        let mut second = sample(7, "Zoë O'Neill");
        second.date_added = None;
        second.blood_type = BloodType::NotSpecified;
        let records = vec![sample(3, "Ada Lovelace"), second];

        store.save(&records).expect("save should succeed");
        let loaded = store.load().expect("load should succeed");

        assert_eq!(loaded, records);
    }

    #[test]
    fn test_save_overwrites_previous_contents() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = CsvStore::new(temp_dir.path().join("health_records.csv"));

        store
            .save(&[sample(1, "First"), sample(2, "Second")])
            .expect("save should succeed");
        store.save(&[sample(2, "Second")]).expect("save should succeed");

        let loaded = store.load().expect("load should succeed");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 2);
    }

    #[test]
    fn test_load_reads_file_written_by_hand() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("health_records.csv");
        fs::write(
            &path,
            "ID,Name,Age,Gender,Blood Type,Phone,Address,Medical History,Date Added\n\
             1,Alice,30,Female,Not specified,N/A,N/A,None,2025-05-01 10:15\n\
             4,Bob,40,Male,O+,555-0100,\"1 Main St, Springfield\",Diabetes,2025-05-02 11:00\n",
        )
        .expect("should write file");

        let loaded = CsvStore::new(&path).load().expect("load should succeed");

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].id, 4);
        assert_eq!(loaded[1].blood_type, BloodType::OPositive);
        assert_eq!(loaded[1].address, "1 Main St, Springfield");
    }

    #[test]
    fn test_load_fills_blank_optional_cells() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("health_records.csv");
        fs::write(
            &path,
            "ID,Name,Age,Gender,Blood Type,Phone,Address,Medical History,Date Added\n\
             1,Al,30,Male,,,,,2025-01-01 10:00\n\
             2,Bea,41,Female, ab+ ,  ,N/A,None,\n",
        )
        .expect("should write file");

        let loaded = CsvStore::new(&path).load().expect("blank cells should load");

        assert_eq!(loaded[0].blood_type, BloodType::NotSpecified);
        assert_eq!(loaded[0].phone, "N/A");
        assert_eq!(loaded[0].address, "N/A");
        assert_eq!(loaded[0].medical_history, "None");
        assert_eq!(loaded[1].blood_type, BloodType::AbPositive);
        assert_eq!(loaded[1].phone, "N/A");
    }

    #[test]
    fn test_load_rejects_wrong_header() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("health_records.csv");
        fs::write(&path, "id,name\n1,Alice\n").expect("should write file");

        let err = CsvStore::new(&path)
            .load()
            .expect_err("wrong header should fail");
        assert!(matches!(err, RecordError::UnexpectedHeader { .. }));
    }

    #[test]
    fn test_load_rejects_corrupt_row() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("health_records.csv");
        fs::write(
            &path,
            "ID,Name,Age,Gender,Blood Type,Phone,Address,Medical History,Date Added\n\
             1,Alice,not-a-number,Female,A+,N/A,N/A,None,\n",
        )
        .expect("should write file");

        let err = CsvStore::new(&path)
            .load()
            .expect_err("corrupt row should fail");
        assert!(matches!(err, RecordError::Csv(_)));
    }

    #[test]
    fn test_load_rejects_duplicate_ids() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("health_records.csv");
        fs::write(
            &path,
            "ID,Name,Age,Gender,Blood Type,Phone,Address,Medical History,Date Added\n\
             2,Alice,30,Female,A+,N/A,N/A,None,\n\
             2,Bob,40,Male,A+,N/A,N/A,None,\n",
        )
        .expect("should write file");

        let err = CsvStore::new(&path)
            .load()
            .expect_err("duplicate id should fail");
        assert!(matches!(err, RecordError::InvalidRecord { row: 2, .. }));
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = CsvStore::new(temp_dir.path().join("missing").join("records.csv"));

        let err = store
            .save(&[sample(1, "Alice")])
            .expect_err("save should fail");
        assert!(matches!(err, RecordError::FileWrite(_)));
    }
}
