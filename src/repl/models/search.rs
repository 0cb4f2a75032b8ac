//! # Search Criteria
//!
//! Which field the list filter applies to. Pure query-shaping state.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Filter dimension for the list search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchCriteria {
    #[default]
    Username,
    Age,
    Hometown,
}

impl SearchCriteria {
    pub const ALL: [SearchCriteria; 3] = [
        SearchCriteria::Username,
        SearchCriteria::Age,
        SearchCriteria::Hometown,
    ];

    /// Query parameter name sent to the backend
    pub fn as_param(&self) -> &'static str {
        match self {
            SearchCriteria::Username => "username",
            SearchCriteria::Age => "age",
            SearchCriteria::Hometown => "hometown",
        }
    }

    /// Label shown in the status line
    pub fn label(&self) -> &'static str {
        match self {
            SearchCriteria::Username => "Name",
            SearchCriteria::Age => "Age",
            SearchCriteria::Hometown => "Hometown",
        }
    }
}

impl fmt::Display for SearchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Error returned when text does not name a search criteria
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown search criteria '{0}' (expected username, age or hometown)")]
pub struct UnknownCriteria(pub String);

impl FromStr for SearchCriteria {
    type Err = UnknownCriteria;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "username" | "name" => Ok(SearchCriteria::Username),
            "age" => Ok(SearchCriteria::Age),
            "hometown" => Ok(SearchCriteria::Hometown),
            other => Err(UnknownCriteria(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_criteria_should_be_username() {
        assert_eq!(SearchCriteria::default(), SearchCriteria::Username);
    }

    #[test]
    fn criteria_should_parse_param_names_and_alias() {
        assert_eq!("age".parse(), Ok(SearchCriteria::Age));
        assert_eq!("HOMETOWN".parse(), Ok(SearchCriteria::Hometown));
        assert_eq!("name".parse(), Ok(SearchCriteria::Username));
        assert_eq!(
            "Email".parse::<SearchCriteria>(),
            Err(UnknownCriteria("email".to_string()))
        );
    }

    #[test]
    fn every_criteria_should_round_trip_through_its_param() {
        for criteria in SearchCriteria::ALL {
            assert_eq!(criteria.as_param().parse(), Ok(criteria));
        }
    }
}
