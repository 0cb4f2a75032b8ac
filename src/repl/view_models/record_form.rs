//! # Record Form
//!
//! One form for both creating and editing a profile. It keeps the raw text
//! of every field, validates it and normalizes it into a [`ProfileRecord`].
//!
//! Submission has two halves so the save can run in the background:
//! [`RecordForm::begin_submit`] hands out the record and marks the form as
//! submitting until [`RecordForm::finish_submit`] receives the outcome.

use crate::repl::models::{Gender, ProfileRecord, UserAccount};
use crate::repl::services::ApiError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
            .unwrap_or_else(|e| panic!("email pattern must compile: {e}"))
    })
}

/// Fields rendered by the form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Username,
    Email,
    Age,
    Hometown,
    Gender,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Username,
        FormField::Email,
        FormField::Age,
        FormField::Hometown,
        FormField::Gender,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FormField::Username => "username",
            FormField::Email => "email",
            FormField::Age => "age",
            FormField::Hometown => "hometown",
            FormField::Gender => "gender",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Username => "Username",
            FormField::Email => "Email",
            FormField::Age => "Age",
            FormField::Hometown => "Hometown",
            FormField::Gender => "Gender",
        }
    }

    fn required_message(&self) -> &'static str {
        match self {
            FormField::Username => "Please input username!",
            FormField::Email => "Please input email!",
            FormField::Age => "Please input age!",
            FormField::Hometown => "Please input hometown!",
            FormField::Gender => "Please select gender!",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when text does not name a form field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for FormField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "username" | "user" | "name" => Ok(FormField::Username),
            "email" => Ok(FormField::Email),
            "age" => Ok(FormField::Age),
            "hometown" => Ok(FormField::Hometown),
            "gender" => Ok(FormField::Gender),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Raw field values as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub username: String,
    pub email: String,
    pub age: String,
    pub hometown: String,
    pub gender: String,
}

impl FormValues {
    pub fn from_record(record: &ProfileRecord) -> Self {
        Self {
            username: record.user.username.clone(),
            email: record.user.email.clone(),
            age: record.age.to_string(),
            hometown: record.hometown.clone(),
            gender: record.gender.code().to_string(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Username => &self.username,
            FormField::Email => &self.email,
            FormField::Age => &self.age,
            FormField::Hometown => &self.hometown,
            FormField::Gender => &self.gender,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Username => self.username = value,
            FormField::Email => self.email = value,
            FormField::Age => self.age = value,
            FormField::Hometown => self.hometown = value,
            FormField::Gender => self.gender = value,
        }
    }
}

/// A validation failure on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.label(), self.message)
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Why a submission did not go through
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("{}", join_errors(.0))]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Persist(#[from] ApiError),

    #[error("No form is open")]
    NotOpen,

    #[error("The form is already being saved")]
    AlreadySubmitting,
}

/// Whether the form creates a new record or edits a persisted one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Form state for the create/edit modal
#[derive(Debug, Clone)]
pub struct RecordForm {
    mode: FormMode,
    initial: Option<ProfileRecord>,
    values: FormValues,
    errors: Vec<FieldError>,
    submitting: bool,
}

impl RecordForm {
    /// Empty form for a new record
    pub fn for_create() -> Self {
        Self {
            mode: FormMode::Create,
            initial: None,
            values: FormValues::default(),
            errors: Vec::new(),
            submitting: false,
        }
    }

    /// Form prefilled from a persisted record
    pub fn for_edit(record: ProfileRecord) -> Self {
        Self {
            mode: FormMode::Edit,
            values: FormValues::from_record(&record),
            initial: Some(record),
            errors: Vec::new(),
            submitting: false,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add user",
            FormMode::Edit => "Edit user",
        }
    }

    pub fn initial(&self) -> Option<&ProfileRecord> {
        self.initial.as_ref()
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.values.set(field, value);
        self.errors.retain(|e| e.field != field);
    }

    /// Restore the initial values (empty for a new record)
    pub fn reset(&mut self) {
        self.values = self
            .initial
            .as_ref()
            .map(FormValues::from_record)
            .unwrap_or_default();
        self.errors.clear();
    }

    /// Check every field, collecting all failures in field order
    pub fn validate(&mut self) -> Result<(), FormError> {
        self.errors = Self::check(&self.values);
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(FormError::Validation(self.errors.clone()))
        }
    }

    fn check(values: &FormValues) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for field in FormField::ALL {
            let raw = values.get(field).trim();
            if raw.is_empty() {
                errors.push(FieldError {
                    field,
                    message: field.required_message(),
                });
                continue;
            }
            let message = match field {
                FormField::Email if !email_pattern().is_match(raw) => Some("Invalid email address"),
                FormField::Age if parse_age(raw).is_none() => Some("Age must be a number"),
                FormField::Gender if raw.parse::<Gender>().is_err() => {
                    Some("Gender must be M or F")
                }
                _ => None,
            };
            if let Some(message) = message {
                errors.push(FieldError { field, message });
            }
        }
        errors
    }

    /// Validate and build the canonical record, keeping any backend ids
    pub fn normalize(&mut self) -> Result<ProfileRecord, FormError> {
        self.validate()?;
        let invalid = |field| {
            FormError::Validation(vec![FieldError {
                field,
                message: "Invalid value",
            }])
        };
        let age = parse_age(&self.values.age).ok_or_else(|| invalid(FormField::Age))?;
        let gender = self
            .values
            .gender
            .parse::<Gender>()
            .map_err(|_| invalid(FormField::Gender))?;

        Ok(ProfileRecord {
            user: UserAccount {
                username: self.values.username.trim().to_string(),
                email: self.values.email.trim().to_string(),
                id: self.initial.as_ref().map(|r| r.user.id).unwrap_or(0),
            },
            hometown: self.values.hometown.trim().to_string(),
            age,
            gender,
            id: self.initial.as_ref().map(|r| r.id).unwrap_or(0),
        })
    }

    /// Validate and normalize, then mark the form as submitting.
    ///
    /// The returned record is what the caller persists; the form stays
    /// submitting until [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(&mut self) -> Result<ProfileRecord, FormError> {
        if self.submitting {
            return Err(FormError::AlreadySubmitting);
        }
        let record = self.normalize()?;
        self.submitting = true;
        Ok(record)
    }

    /// Apply the persistence outcome of a submission.
    ///
    /// On success the fields are reset; on failure they are left untouched.
    pub fn finish_submit(
        &mut self,
        result: Result<ProfileRecord, ApiError>,
    ) -> Result<ProfileRecord, FormError> {
        self.submitting = false;
        match result {
            Ok(saved) => {
                self.reset();
                Ok(saved)
            }
            Err(e) => {
                tracing::error!("Failed to submit form: {e}");
                Err(FormError::Persist(e))
            }
        }
    }
}

/// Non-negative whole number of years
fn parse_age(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|age| *age >= 0)
}
