//! Core domain types.
//!
//! A [`Record`] is one managed user as served by the remote collection.
//! The client only ever holds cached copies; the remote system owns them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique, immutable key of a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// One managed user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Key; never changes after creation.
    pub id: RecordId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact address. Not validated client-side.
    pub email: String,
    /// Avatar URL, display only.
    #[serde(default)]
    pub avatar: String,
}

impl Record {
    /// Returns "first last", trimmed when either part is blank.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Extracts the editable fields as an update body.
    pub fn patch(&self) -> RecordPatch {
        RecordPatch {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }

    /// Sets one editable field.
    pub fn set_field(&mut self, field: EditableField, value: impl Into<String>) {
        let value = value.into();
        match field {
            EditableField::FirstName => self.first_name = value,
            EditableField::LastName => self.last_name = value,
            EditableField::Email => self.email = value,
        }
    }

    /// Returns one editable field.
    pub fn field(&self, field: EditableField) -> &str {
        match field {
            EditableField::FirstName => &self.first_name,
            EditableField::LastName => &self.last_name,
            EditableField::Email => &self.email,
        }
    }
}

/// Body of an update call. The id travels in the path, never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPatch {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Fields of a [`Record`] that may be edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditableField {
    FirstName,
    LastName,
    Email,
}

impl EditableField {
    /// All editable fields, in display order.
    pub const ALL: [EditableField; 3] = [
        EditableField::FirstName,
        EditableField::LastName,
        EditableField::Email,
    ];

    /// Returns the wire/field name.
    pub fn name(&self) -> &'static str {
        match self {
            EditableField::FirstName => "first_name",
            EditableField::LastName => "last_name",
            EditableField::Email => "email",
        }
    }

    /// Returns the human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            EditableField::FirstName => "First Name",
            EditableField::LastName => "Last Name",
            EditableField::Email => "Email",
        }
    }

    /// Parses a field name, accepting a few short aliases.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "first_name" | "first" | "firstname" => Some(EditableField::FirstName),
            "last_name" | "last" | "lastname" => Some(EditableField::LastName),
            "email" | "mail" => Some(EditableField::Email),
            _ => None,
        }
    }
}

impl fmt::Display for EditableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One fetch window of records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    /// Records in server order.
    pub items: Vec<Record>,
    /// Server-reported page count.
    pub total_pages: u32,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(id: u64, first: &str, last: &str, email: &str) -> Record {
        Record {
            id: RecordId(id),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            avatar: format!("https://reqres.in/img/faces/{}-image.jpg", id),
        }
    }

    pub fn sample_items() -> Vec<Record> {
        vec![
            record(1, "George", "Bluth", "george.bluth@reqres.in"),
            record(2, "Janet", "Weaver", "janet.weaver@reqres.in"),
            record(3, "Emma", "Wong", "emma.wong@reqres.in"),
        ]
    }
}
