//! City name normalization for the search input

use std::fmt;

use crate::{DashboardError, Result};

/// Shown when the search input is empty after trimming
pub const EMPTY_CITY_MESSAGE: &str = "Enter city name";

/// A trimmed, capitalized city name ready to be sent to the API.
///
/// The name is not checked against any gazetteer; any non-empty input is
/// accepted and the API decides whether it knows the city.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CityName(String);

impl CityName {
    /// Normalize raw search input: trim, upper-case the first character and
    /// lower-case the remainder.
    ///
    /// Returns a validation error carrying [`EMPTY_CITY_MESSAGE`] when the
    /// input is empty or whitespace only.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        let mut chars = input.chars();
        let Some(first) = chars.next() else {
            return Err(DashboardError::validation(EMPTY_CITY_MESSAGE));
        };

        let mut normalized = String::with_capacity(input.len());
        normalized.extend(first.to_uppercase());
        normalized.extend(chars.flat_map(char::to_lowercase));

        Ok(Self(normalized))
    }

    /// Wrap a city name exactly as returned by the API, without normalizing it.
    #[must_use]
    pub fn from_api(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
