//! Core incident types for ticketdesk.
//!
//! A [`Record`] is one IT-support incident; a [`Device`] is an entry of the
//! fixed device vocabulary records are tagged with.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fields that must be non-blank for a record to be accepted.
pub const REQUIRED_FIELDS: &[&str] = &["name", "division", "problem", "device"];

/// Zone used to place an incident on a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayZone {
    /// The machine's zone, with the offset in force at each incident's own
    /// instant.
    #[default]
    Local,
    /// A fixed UTC offset.
    Fixed(FixedOffset),
}

impl DayZone {
    /// Calendar day of `instant` in this zone.
    #[must_use]
    pub fn day_of(self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Local => instant.with_timezone(&Local).date_naive(),
            Self::Fixed(offset) => instant.with_timezone(&offset).date_naive(),
        }
    }
}

/// One incident entry.
///
/// The JSON form uses the field names as-is and an RFC 3339 `date`, which is
/// what browsers produce when serializing a `Date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Client-assigned identifier.
    pub id: i64,
    /// Person who reported the incident.
    pub name: String,
    /// Division the reporter belongs to.
    pub division: String,
    /// Description of the problem.
    pub problem: String,
    /// How the problem was solved.
    pub solving: String,
    /// When the incident happened.
    pub date: DateTime<Utc>,
    /// Device name, drawn from the device list.
    pub device: String,
}

/// An entry of the device lookup list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Device {
    /// 1-based identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
}

impl Device {
    /// Build a device list from names, numbering from 1.
    #[must_use]
    pub fn numbered<S: AsRef<str>>(names: &[S]) -> Vec<Device> {
        names
            .iter()
            .zip(1..)
            .map(|(name, id)| Device {
                id,
                name: name.as_ref().to_string(),
            })
            .collect()
    }
}

impl Record {
    /// An empty draft dated `now`, as shown in a fresh form.
    #[must_use]
    pub fn blank(now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            name: String::new(),
            division: String::new(),
            problem: String::new(),
            solving: String::new(),
            date: now,
            device: String::new(),
        }
    }

    /// The first required field that is blank, if any.
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        REQUIRED_FIELDS
            .iter()
            .copied()
            .find(|field| self.field(field).is_some_and(|v| v.trim().is_empty()))
    }

    /// Read a text field by its JSON name.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "division" => Some(&self.division),
            "problem" => Some(&self.problem),
            "solving" => Some(&self.solving),
            "device" => Some(&self.device),
            _ => None,
        }
    }

    /// Set a text field by its JSON name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] if `field` is not a text field.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        let slot = match field {
            "name" => &mut self.name,
            "division" => &mut self.division,
            "problem" => &mut self.problem,
            "solving" => &mut self.solving,
            "device" => &mut self.device,
            other => return Err(Error::UnknownField(other.to_string())),
        };
        *slot = value.into();
        Ok(())
    }

    /// Calendar day of the incident as seen in `zone`.
    #[must_use]
    pub fn local_date(&self, zone: DayZone) -> NaiveDate {
        zone.day_of(self.date)
    }
}

/// Check every record for blank required fields.
///
/// # Errors
///
/// Returns [`Error::MissingField`] for the first offending record.
pub fn validate_all(records: &[Record]) -> Result<()> {
    for (index, record) in records.iter().enumerate() {
        if let Some(field) = record.missing_field() {
            return Err(Error::MissingField { index, field });
        }
    }
    Ok(())
}
