//! Contact form field validation.
//!
//! Validation is a pure function from a [`FormRecord`] to a
//! [`ValidationResult`]. Errors are values, never `Err`: a record with blank
//! fields is an ordinary, user-correctable outcome that the page renders
//! inline next to each field.
//!
//! ## Rules
//!
//! | Field | Rule | Message |
//! |-------|------|---------|
//! | `name` | non-empty after trim | `Name is required` |
//! | `email` | non-empty after trim | `Email is required` |
//! | `email` | matches [`EMAIL_PATTERN`] | `Invalid email address` |
//! | `subject` | non-empty after trim | `Subject is required` |
//! | `message` | non-empty after trim | `Message is required` |
//!
//! The pattern is exported so the generated contact page validates with the
//! exact same expression in the browser.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Address pattern shared by the Rust validator and the generated page.
///
/// Matched case-insensitively: `local@domain.tld` where the TLD has at least
/// two letters.
pub const EMAIL_PATTERN: &str = r"^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?i){EMAIL_PATTERN}")).expect("email pattern must compile")
});

/// A field of the contact form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Subject, Field::Message];

    /// Form control name (`name="..."` in the generated markup).
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Subject => "subject",
            Field::Message => "message",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Subject => "Subject",
            Field::Message => "Message",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Name => "Your Name",
            Field::Email => "Your Email",
            Field::Subject => "Subject",
            Field::Message => "Your Message",
        }
    }

    fn required_message(self) -> String {
        format!("{} is required", self.label())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The values of a single submit attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRecord {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl FormRecord {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Subject => self.subject = value,
            Field::Message => self.message = value,
        }
    }

    /// True when every field is empty (the state after a successful send).
    pub fn is_blank(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_empty())
    }
}

/// Per-field error messages. A field without an entry is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    errors: BTreeMap<Field, String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Errors in form display order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validate a record. Deterministic and side-effect free.
pub fn validate(record: &FormRecord) -> ValidationResult {
    let mut errors = BTreeMap::new();

    for field in Field::ALL {
        let value = record.get(field).trim();
        if value.is_empty() {
            errors.insert(field, field.required_message());
        } else if field == Field::Email && !is_valid_email(value) {
            errors.insert(field, "Invalid email address".to_string());
        }
    }

    ValidationResult { errors }
}
