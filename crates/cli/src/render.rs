//! Plain-text rendering of the patient table and the dashboard.
//!
//! Rendering is pure: functions take domain data and return the text to print.

use hrms_core::{DashboardMetrics, PatientRecord, CSV_HEADER};

/// Cells longer than this are cut and end in `…`.
const MAX_CELL_WIDTH: usize = 28;

/// Render records as an aligned text table with the store's column headers.
pub fn records_table(records: &[&PatientRecord]) -> String {
    let rows: Vec<[String; 9]> = records.iter().map(|r| cells(r)).collect();

    let mut widths = CSV_HEADER.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &CSV_HEADER.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(rule.join("-+-").as_str());
    out.push('\n');
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn cells(record: &PatientRecord) -> [String; 9] {
    [
        record.id.to_string(),
        fit(record.name.as_str()),
        record.age.to_string(),
        record.gender.to_string(),
        record.blood_type.to_string(),
        fit(&record.phone),
        fit(&record.address),
        fit(&record.medical_history),
        record
            .date_added
            .map(|ts| ts.format(hrms_core::constants::DATE_ADDED_FORMAT).to_string())
            .unwrap_or_default(),
    ]
}

fn push_line(out: &mut String, cells: &[String; 9], widths: &[usize; 9]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}

/// Flatten line breaks and cut to [`MAX_CELL_WIDTH`] characters.
fn fit(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX_CELL_WIDTH {
        return flat;
    }
    let mut cut: String = flat.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}

pub fn dashboard(metrics: &DashboardMetrics) -> String {
    let lines = [
        ("Total Patients", metrics.total.to_string()),
        ("Male", metrics.male.to_string()),
        ("Female", metrics.female.to_string()),
        ("Other", metrics.other.to_string()),
        ("Avg Age", format!("{:.1}", metrics.average_age)),
    ];

    let mut out = String::from("Dashboard Overview\n");
    for (label, value) in lines {
        out.push_str(&format!("  {label:<15} {value}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrms_core::{Age, BloodType, Gender, NonEmptyText};

    fn record(id: u64, name: &str, history: &str) -> PatientRecord {
        PatientRecord {
            id,
            name: NonEmptyText::new(name).unwrap(),
            age: Age::new(30).unwrap(),
            gender: Gender::Female,
            blood_type: BloodType::NotSpecified,
            phone: "N/A".into(),
            address: "N/A".into(),
            medical_history: history.into(),
            date_added: None,
        }
    }

    #[test]
    fn test_records_table_aligns_columns() {
        let a = record(1, "Alice", "None");
        let b = record(12, "Bob", "None");
        let text = records_table(&[&a, &b]);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID | Name  | Age"));
        assert!(lines[2].starts_with("1  | Alice | 30"));
        assert!(lines[3].starts_with("12 | Bob   | 30"));
    }

    #[test]
    fn test_long_cells_are_flattened_and_cut() {
        assert_eq!(fit("line one\nline two"), "line one line two");
        let long = "x".repeat(40);
        let cut = fit(&long);
        assert_eq!(cut.chars().count(), MAX_CELL_WIDTH);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_dashboard_formats_average() {
        let text = dashboard(&DashboardMetrics {
            total: 0,
            male: 0,
            female: 0,
            other: 0,
            average_age: 0.0,
        });
        assert!(text.contains("Total Patients  0"));
        assert!(text.contains("Avg Age         0.0"));
    }
}
