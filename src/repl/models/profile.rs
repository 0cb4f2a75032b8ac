//! # Profile Record Model
//!
//! The single entity managed by the client: a profile with a nested user
//! account. Identifiers are assigned by the backend; the client only ever
//! carries them back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Account sub-object nested inside every profile
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub id: i64,
}

/// Closed set of genders accepted by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    /// Wire code (`M` / `F`)
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }

    /// Human readable label used by the table view
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when text does not name a gender
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown gender '{0}'")]
pub struct UnknownGender(pub String);

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Gender::Male),
            "f" | "female" => Ok(Gender::Female),
            _ => Err(UnknownGender(s.to_string())),
        }
    }
}

/// A profile record as exchanged with the backend.
///
/// Field order matches the JSON bodies the backend expects:
/// `user`, `hometown`, `age`, `gender`, `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub user: UserAccount,
    pub hometown: String,
    pub age: i64,
    pub gender: Gender,
    #[serde(default)]
    pub id: i64,
}

impl ProfileRecord {
    /// A record that has been stored by the backend
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// A record still being composed on the client
    pub fn is_draft(&self) -> bool {
        !self.is_persisted()
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn email(&self) -> &str {
        &self.user.email
    }
}
