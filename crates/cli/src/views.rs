//! View handlers for the five screens of the interface.
//!
//! Each handler runs one screen to completion against the session's
//! [`RecordService`] and returns a [`Status`] for the dispatcher to show.
//! Domain failures become `Status::Error` so the session carries on; only
//! terminal I/O errors are returned as `Err`.
//!
//! The `*_status` functions hold the actions themselves and are shared with
//! the one-shot subcommands.

use crate::editor::GridEditor;
use crate::prompt::Prompt;
use crate::render;
use hrms_core::{parse_grid, Age, BloodType, Gender, NewPatient, RecordError, RecordService};
use std::fmt;
use std::io::{self, BufRead, Write};

/// Outcome message of a view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Success(String),
    Error(String),
}

impl Status {
    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Info(msg) => write!(f, "[info] {msg}"),
            Status::Success(msg) => write!(f, "[ok] {msg}"),
            Status::Error(msg) => write!(f, "[error] {msg}"),
        }
    }
}

fn cancelled() -> Status {
    Status::Info("Cancelled.".into())
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Matching rows as a table, plus the "Showing X of Y" caption.
pub fn search_status(service: &RecordService, query: &str) -> (String, Status) {
    let total = service.records().len();
    if total == 0 {
        return (String::new(), Status::Info("No records yet.".into()));
    }

    let hits = service.search(query);
    let body = render::records_table(&hits);
    let caption = Status::Info(format!("Showing {} of {} records", hits.len(), total));
    (body, caption)
}

pub fn create_status(service: &mut RecordService, new: NewPatient) -> Status {
    match service.create(new) {
        Ok(record) => Status::Success(format!(
            "Patient {} added! ID: {}",
            record.name, record.id
        )),
        Err(RecordError::MissingRequired) => {
            Status::Error("Name, Age and Gender are required!".into())
        }
        Err(e) => Status::Error(format!("Could not add patient: {e}")),
    }
}

pub fn delete_status(service: &mut RecordService, id: u64) -> Status {
    match service.delete(id) {
        Ok(record) => Status::Success(format!("Deleted: {} (ID {})", record.name, record.id)),
        Err(RecordError::NotFound(_)) => Status::Error("ID not found!".into()),
        Err(e) => Status::Error(format!("Could not delete record: {e}")),
    }
}

/// Parse an edited grid and, if valid, save it as the new table.
pub fn apply_grid_status(service: &mut RecordService, grid: &str) -> Status {
    let result = parse_grid(grid).and_then(|rows| service.apply_grid(rows));
    match result {
        Ok(summary) => Status::Success(format!(
            "All changes saved successfully! ({} updated, {} added, {} removed)",
            summary.updated, summary.added, summary.removed
        )),
        Err(e) => Status::Error(format!("Changes not saved: {e}")),
    }
}

/// Run the grid through `editor`; `None` when nothing was changed.
pub fn edit_grid(service: &RecordService, editor: &dyn GridEditor) -> Result<Option<String>, Status> {
    let grid = service
        .grid()
        .map_err(|e| Status::Error(format!("Could not prepare grid: {e}")))?;
    let edited = editor
        .edit(&grid)
        .map_err(|e| Status::Error(format!("Edit abandoned: {e}")))?;

    if edited == grid {
        Ok(None)
    } else {
        Ok(Some(edited))
    }
}

// ============================================================================
// INTERACTIVE VIEWS
// ============================================================================

pub fn dashboard_view<R: BufRead, W: Write>(
    service: &RecordService,
    prompt: &mut Prompt<R, W>,
) -> io::Result<Status> {
    prompt.say("Health Record Management System")?;
    prompt.say(render::dashboard(&service.metrics()))?;
    Ok(Status::Info(format!(
        "Records file: {}",
        service.data_file().display()
    )))
}

pub fn search_view<R: BufRead, W: Write>(
    service: &RecordService,
    prompt: &mut Prompt<R, W>,
) -> io::Result<Status> {
    if service.records().is_empty() {
        return Ok(Status::Info("No records yet.".into()));
    }

    let Some(query) = prompt.ask("Search by Name / ID / Phone (blank for all)")? else {
        return Ok(cancelled());
    };
    let (body, caption) = search_status(service, &query);
    prompt.say(body)?;
    Ok(caption)
}

pub fn add_patient_view<R: BufRead, W: Write>(
    service: &mut RecordService,
    prompt: &mut Prompt<R, W>,
) -> io::Result<Status> {
    let Some(name) = prompt.ask("Full Name *")? else {
        return Ok(cancelled());
    };

    let Some(age_raw) = prompt.ask("Age * (1-120)")? else {
        return Ok(cancelled());
    };
    let age = match age_raw.trim() {
        "" => None,
        raw => match raw.parse::<Age>() {
            Ok(age) => Some(age),
            Err(e) => return Ok(Status::Error(format!("Invalid age: {e}"))),
        },
    };

    let Some(gender_raw) = prompt.ask("Gender * (Male / Female / Other)")? else {
        return Ok(cancelled());
    };
    let gender = match gender_raw.trim() {
        "" => None,
        raw => match raw.parse::<Gender>() {
            Ok(gender) => Some(gender),
            Err(e) => return Ok(Status::Error(e.to_string())),
        },
    };

    let groups: Vec<&str> = BloodType::GROUPS.iter().map(|b| b.as_str()).collect();
    let Some(blood_raw) = prompt.ask(&format!("Blood Type ({}; blank if unknown)", groups.join(", ")))?
    else {
        return Ok(cancelled());
    };
    let blood_type = match blood_raw.parse::<BloodType>() {
        Ok(blood_type) => Some(blood_type),
        Err(e) => return Ok(Status::Error(e.to_string())),
    };

    let Some(phone) = prompt.ask("Phone")? else {
        return Ok(cancelled());
    };
    let Some(address) = prompt.ask("Address")? else {
        return Ok(cancelled());
    };
    let Some(history) = prompt.ask("Medical History")? else {
        return Ok(cancelled());
    };

    let new = NewPatient {
        name,
        age,
        gender,
        blood_type,
        phone: Some(phone),
        address: Some(address),
        medical_history: Some(history),
    };
    Ok(create_status(service, new))
}

pub fn edit_records_view<R: BufRead, W: Write>(
    service: &mut RecordService,
    prompt: &mut Prompt<R, W>,
    editor: &dyn GridEditor,
) -> io::Result<Status> {
    if service.records().is_empty() {
        return Ok(Status::Info("No data yet.".into()));
    }

    prompt.say("Edit cells, add rows with a blank ID, delete rows; then save and close the editor.")?;
    let edited = match edit_grid(service, editor) {
        Ok(Some(edited)) => edited,
        Ok(None) => return Ok(Status::Info("No changes.".into())),
        Err(status) => return Ok(status),
    };

    let Some(answer) = prompt.ask("Save all changes? [y/N]")? else {
        return Ok(cancelled());
    };
    if matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
        Ok(apply_grid_status(service, &edited))
    } else {
        Ok(Status::Info("Changes discarded.".into()))
    }
}

pub fn delete_record_view<R: BufRead, W: Write>(
    service: &mut RecordService,
    prompt: &mut Prompt<R, W>,
) -> io::Result<Status> {
    if service.records().is_empty() {
        return Ok(Status::Info("No records to delete.".into()));
    }

    prompt.say("Warning: This action is permanent!")?;
    let Some(raw) = prompt.ask("Patient ID")? else {
        return Ok(cancelled());
    };
    match raw.trim().parse::<u64>() {
        Ok(id) if id >= 1 => Ok(delete_status(service, id)),
        _ => Ok(Status::Error(
            "Patient ID must be a whole number of at least 1.".into(),
        )),
    }
}
