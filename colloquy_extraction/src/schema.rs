//! Field schema and per-field validation for extracted values.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[expect(clippy::expect_used, reason = "Static regex is known to be valid")]
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("email regex is valid")
});

#[expect(clippy::expect_used, reason = "Static regex is known to be valid")]
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ().\-]+$").expect("phone regex is valid"));

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;
const MAX_AGE: u32 = 150;
const MAX_TEXT_CHARS: usize = 200;

/// Why a value failed its field validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid phone number")]
    InvalidPhone,

    #[error("age must be a whole number")]
    AgeNotNumber,

    #[error("age must be between 0 and 150")]
    AgeOutOfRange,

    #[error("value longer than 200 characters")]
    TooLong,
}

/// Value type of an extracted field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Phone,
    Age,
}

impl FieldKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Age => "age",
        }
    }

    /// Check a non-empty value against this kind.
    pub fn validate(self, value: &str) -> Result<(), FieldError> {
        let value = value.trim();
        match self {
            Self::Text => {
                if value.chars().count() > MAX_TEXT_CHARS {
                    return Err(FieldError::TooLong);
                }
            }
            Self::Email => {
                if !EMAIL_RE.is_match(value) {
                    return Err(FieldError::InvalidEmail);
                }
            }
            Self::Phone => {
                let digits = value.chars().filter(char::is_ascii_digit).count();
                if !PHONE_RE.is_match(value)
                    || !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
                {
                    return Err(FieldError::InvalidPhone);
                }
            }
            Self::Age => {
                let age: u32 = value.parse().map_err(|_| FieldError::AgeNotNumber)?;
                if age > MAX_AGE {
                    return Err(FieldError::AgeOutOfRange);
                }
            }
        }
        Ok(())
    }
}

/// One field of the schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub kind: FieldKind,
}

impl FieldSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered set of fields an extractor asks for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    /// Schema from explicit fields; later duplicates of a name are dropped.
    #[must_use]
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        let mut unique: Vec<FieldSpec> = Vec::with_capacity(fields.len());
        for field in fields {
            if !unique.iter().any(|f| f.name == field.name) {
                unique.push(field);
            }
        }
        Self { fields: unique }
    }

    /// Name, email, phone, age and location.
    #[must_use]
    pub fn contact_details() -> Self {
        Self::new(vec![
            FieldSpec::new("name", FieldKind::Text),
            FieldSpec::new("email", FieldKind::Email),
            FieldSpec::new("phone", FieldKind::Phone),
            FieldSpec::new("age", FieldKind::Age),
            FieldSpec::new("location", FieldKind::Text),
        ])
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate one value, formatting a failure for `validation_errors`.
    ///
    /// Fields outside the schema are accepted.
    pub fn validate_field(&self, name: &str, value: &str) -> Result<(), String> {
        let Some(field) = self.get(name) else {
            return Ok(());
        };
        field
            .kind
            .validate(value)
            .map_err(|e| format!("{name}: {e} ('{value}')"))
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::contact_details()
    }
}
