//! Configuration constants and profile loading for rosterline
//!
//! Connection settings live in an INI file with one section per profile:
//!
//! ```ini
//! [default]
//! base_url = http://localhost:8000
//! page_size = 6
//! timeout_secs = 30
//! stale_secs = 30
//! ```

use crate::repl::view_models::DEFAULT_PAGE_SIZE;
use anyhow::{bail, Context, Result};
use ini::Ini;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Default profile file path for rosterline
pub const DEFAULT_PROFILE_PATH: &str = "~/.rosterline/profile";

/// Environment variable name for overriding the profile path
pub const PROFILE_PATH_ENV_VAR: &str = "ROSTERLINE_PROFILE_PATH";

/// Backend used when no profile names one
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_STALE_SECS: u64 = 30;

const BASE_URL_KEY: &str = "base_url";
const PAGE_SIZE_KEY: &str = "page_size";
const TIMEOUT_KEY: &str = "timeout_secs";
const STALE_KEY: &str = "stale_secs";

/// Get the profile file path, checking environment variable first, then falling back to default
pub fn get_profile_path() -> String {
    std::env::var_os(PROFILE_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}

/// Settings for one backend connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppProfile {
    pub base_url: String,
    pub page_size: u32,
    /// Per-request HTTP timeout and cap for any list fetch
    pub timeout: Duration,
    /// How long a loaded page is served without refetching
    pub stale_time: Duration,
}

impl Default for AppProfile {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            stale_time: Duration::from_secs(DEFAULT_STALE_SECS),
        }
    }
}

impl AppProfile {
    /// Apply command line overrides on top of the file values
    pub fn with_overrides(mut self, base_url: Option<&str>, page_size: Option<u32>) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = base_url.to_string();
        }
        if let Some(page_size) = page_size {
            self.page_size = page_size.max(1);
        }
        self
    }
}

/// Reads profiles from an INI file
#[derive(Debug, Clone)]
pub struct IniProfileStore {
    path: String,
}

impl IniProfileStore {
    /// `path` may start with `~`, which is expanded to the home directory
    pub fn new(path: &str) -> Self {
        Self {
            path: shellexpand::tilde(path).into_owned(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Load the profile named `name`.
    ///
    /// A missing file or section is `Ok(None)`; a malformed file or value is
    /// an error.
    pub fn get_profile(&self, name: &str) -> Result<Option<AppProfile>> {
        if !Path::new(&self.path).exists() {
            tracing::debug!("Profile file '{}' does not exist", self.path);
            return Ok(None);
        }

        let ini = Ini::load_from_file(&self.path)
            .with_context(|| format!("Failed to read profile file '{}'", self.path))?;
        let Some(section) = ini.section(Some(name)) else {
            return Ok(None);
        };

        let mut profile = AppProfile::default();
        if let Some(base_url) = section.get(BASE_URL_KEY) {
            let base_url = base_url.trim();
            if base_url.is_empty() {
                bail!("Profile '{name}': {BASE_URL_KEY} must not be empty");
            }
            profile.base_url = base_url.to_string();
        }
        if let Some(value) = section.get(PAGE_SIZE_KEY) {
            profile.page_size = parse_value::<u32>(name, PAGE_SIZE_KEY, value)?.max(1);
        }
        if let Some(value) = section.get(TIMEOUT_KEY) {
            profile.timeout = Duration::from_secs(parse_value(name, TIMEOUT_KEY, value)?);
        }
        if let Some(value) = section.get(STALE_KEY) {
            profile.stale_time = Duration::from_secs(parse_value(name, STALE_KEY, value)?);
        }

        Ok(Some(profile))
    }
}

fn parse_value<T>(profile: &str, key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse::<T>()
        .with_context(|| format!("Profile '{profile}': invalid {key} '{value}'"))
}

/// Blank profile used when the requested one is not configured
pub fn get_blank_profile() -> AppProfile {
    AppProfile::default()
}
