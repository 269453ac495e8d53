//! Status filter for the todo list view.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Todo;

/// Which todos the list view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoFilter {
    /// Every todo.
    #[default]
    All,
    /// Todos not yet completed.
    Active,
    /// Completed todos.
    Completed,
}

/// Error returned when a filter name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown todo filter: {value}")]
pub struct ParseTodoFilterError {
    value: String,
}

impl TodoFilter {
    /// Filters in the order the tabs are shown.
    pub const VARIANTS: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Lowercase name used in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Whether `todo` is visible under this filter.
    #[must_use]
    pub const fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }

    /// Read the `filter` query parameter, falling back to [`TodoFilter::All`]
    /// when it is missing or unknown.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::todos::TodoFilter;
    ///
    /// assert_eq!(TodoFilter::from_query(Some("active")), TodoFilter::Active);
    /// assert_eq!(TodoFilter::from_query(Some("bogus")), TodoFilter::All);
    /// assert_eq!(TodoFilter::from_query(None), TodoFilter::All);
    /// ```
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        value
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for TodoFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoFilter {
    type Err = ParseTodoFilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::VARIANTS
            .into_iter()
            .find(|filter| filter.as_str() == value)
            .ok_or_else(|| ParseTodoFilterError {
                value: value.to_owned(),
            })
    }
}
