//! # HRMS Core
//!
//! Core logic for the health record management system:
//! - the patient record model ([`record`])
//! - the in-memory table with search, create, delete and bulk edit ([`table`])
//! - the bulk editor grid format ([`editor`])
//! - flat-file CSV persistence ([`store`])
//! - the session service that ties table and store together ([`service`])
//!
//! **No interface concerns**: prompting, rendering and process configuration
//! belong in the `hrms-cli` crate.

pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod record;
pub mod service;
pub mod store;
pub mod table;

pub use config::{resolve_data_file, CoreConfig};
pub use constants::{CSV_HEADER, DEFAULT_DATA_FILE};
pub use editor::{parse_grid, render_grid, GridRow};
pub use error::{RecordError, RecordResult};
pub use record::{BloodType, Gender, NewPatient, PatientRecord};
pub use service::RecordService;
pub use store::CsvStore;
pub use table::{DashboardMetrics, EditSummary, RecordTable};

pub use hrms_types::{Age, AgeError, NonEmptyText, TextError};
