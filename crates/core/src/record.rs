//! Patient record data model.
//!
//! A [`PatientRecord`] is one row of the persisted table. Field order matches
//! the fixed column order of the records file, and the serde renames are the
//! column headers, so a record serialises straight to a CSV row.

use crate::constants::{
    DATE_ADDED_FORMAT, DEFAULT_ADDRESS, DEFAULT_MEDICAL_HISTORY, DEFAULT_PHONE,
};
use crate::{RecordError, RecordResult};
use chrono::{Local, NaiveDateTime, Timelike};
use hrms_types::{Age, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Patient gender as recorded on the create form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient parse for human input: case-insensitive, surrounding whitespace ignored.
impl FromStr for Gender {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                RecordError::InvalidInput(format!(
                    "gender must be one of Male, Female, Other; got {wanted:?}"
                ))
            })
    }
}

/// ABO/Rh blood group, or `Not specified` when unknown.
///
/// Deserialises through [`FromStr`], so a blank cell reads as `NotSpecified`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
    #[default]
    #[serde(rename = "Not specified")]
    NotSpecified,
}

impl BloodType {
    /// The selectable groups, in form order. `NotSpecified` is not listed.
    pub const GROUPS: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
            BloodType::NotSpecified => "Not specified",
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Blank input parses as `NotSpecified`.
impl FromStr for BloodType {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.is_empty() || wanted.eq_ignore_ascii_case(BloodType::NotSpecified.as_str()) {
            return Ok(BloodType::NotSpecified);
        }
        BloodType::GROUPS
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                RecordError::InvalidInput(format!(
                    "blood type must be one of A+, A-, B+, B-, AB+, AB-, O+, O-; got {wanted:?}"
                ))
            })
    }
}

impl TryFrom<String> for BloodType {
    type Error = RecordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One row of the patient table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "Name")]
    pub name: NonEmptyText,
    #[serde(rename = "Age")]
    pub age: Age,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Blood Type")]
    pub blood_type: BloodType,
    #[serde(rename = "Phone", deserialize_with = "blank_as_default::phone")]
    pub phone: String,
    #[serde(rename = "Address", deserialize_with = "blank_as_default::address")]
    pub address: String,
    #[serde(
        rename = "Medical History",
        deserialize_with = "blank_as_default::medical_history"
    )]
    pub medical_history: String,
    /// Set once at creation. Blank in files written by older tools.
    #[serde(rename = "Date Added", with = "date_added_format")]
    pub date_added: Option<NaiveDateTime>,
}

/// Input of the create form.
///
/// `name`, `age` and `gender` are required but may be left blank on the form,
/// so they are checked by [`NewPatient::into_record`] rather than by the type.
#[derive(Clone, Debug, Default)]
pub struct NewPatient {
    pub name: String,
    pub age: Option<Age>,
    pub gender: Option<Gender>,
    pub blood_type: Option<BloodType>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub medical_history: Option<String>,
}

impl NewPatient {
    /// Validate the form and build the stored record.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::MissingRequired` when the name is blank, the age is
    /// missing or zero, or no gender was chosen.
    pub fn into_record(self, id: u64, date_added: NaiveDateTime) -> RecordResult<PatientRecord> {
        let name = NonEmptyText::new(&self.name).map_err(|_| RecordError::MissingRequired)?;
        let age = self
            .age
            .filter(|a| !a.is_zero())
            .ok_or(RecordError::MissingRequired)?;
        let gender = self.gender.ok_or(RecordError::MissingRequired)?;

        Ok(PatientRecord {
            id,
            name,
            age,
            gender,
            blood_type: self.blood_type.unwrap_or_default(),
            phone: text_or_default(self.phone, DEFAULT_PHONE),
            address: text_or_default(self.address, DEFAULT_ADDRESS),
            medical_history: text_or_default(self.medical_history, DEFAULT_MEDICAL_HISTORY),
            date_added: Some(date_added),
        })
    }
}

/// Use `value` unless it is missing or blank.
pub(crate) fn text_or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Current local time at the precision stored in the `Date Added` column.
pub fn now_to_minute() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.date()
        .and_hms_opt(now.hour(), now.minute(), 0)
        .unwrap_or(now)
}

pub(crate) mod date_added_format {
    use crate::constants::DATE_ADDED_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.format(DATE_ADDED_FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_date_added(&raw).map_err(serde::de::Error::custom)
    }
}

/// Free-text cells read the same way the create form fills them.
mod blank_as_default {
    use super::text_or_default;
    use crate::constants::{DEFAULT_ADDRESS, DEFAULT_MEDICAL_HISTORY, DEFAULT_PHONE};
    use serde::{Deserialize, Deserializer};

    fn read<'de, D>(deserializer: D, default: &str) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(text_or_default(Some(raw), default))
    }

    pub fn phone<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        read(deserializer, DEFAULT_PHONE)
    }

    pub fn address<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        read(deserializer, DEFAULT_ADDRESS)
    }

    pub fn medical_history<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        read(deserializer, DEFAULT_MEDICAL_HISTORY)
    }
}

/// Parse a `Date Added` cell; blank means unset.
pub(crate) fn parse_date_added(raw: &str) -> Result<Option<NaiveDateTime>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(trimmed, DATE_ADDED_FORMAT)
        .map(Some)
        .map_err(|e| format!("invalid Date Added {trimmed:?} (expected YYYY-MM-DD HH:MM): {e}"))
}
