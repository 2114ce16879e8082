//! Constants used throughout the HRMS core crate.
//!
//! The persisted file layout and the defaults applied to optional fields live
//! here so that the store, the grid editor and the interface agree on them.

/// Default location of the persisted records file when nothing else is configured.
pub const DEFAULT_DATA_FILE: &str = "health_records.csv";

/// Fixed header row of the persisted file, in column order.
pub const CSV_HEADER: [&str; 9] = [
    "ID",
    "Name",
    "Age",
    "Gender",
    "Blood Type",
    "Phone",
    "Address",
    "Medical History",
    "Date Added",
];

/// Timestamp format of the `Date Added` column.
pub const DATE_ADDED_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Value stored for a missing phone number.
pub const DEFAULT_PHONE: &str = "N/A";

/// Value stored for a missing address.
pub const DEFAULT_ADDRESS: &str = "N/A";

/// Value stored for a missing medical history.
pub const DEFAULT_MEDICAL_HISTORY: &str = "None";
