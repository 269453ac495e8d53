//! Port for todo persistence.
//!
//! The [`TodoRepository`] trait is the only way services reach stored todos.
//! Adapters own identifiers and timestamps; the domain hands them values that
//! already passed validation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::todos::{Todo, ValidatedTodo};

use super::define_port_error;

define_port_error! {
    /// Errors raised by todo repository adapters.
    pub enum TodoRepositoryError {
        /// Repository connection could not be established.
        Connection {
            /// Adapter-supplied detail.
            message: String,
        } => "todo repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query {
            /// Adapter-supplied detail.
            message: String,
        } => "todo repository query failed: {message}",
    }
}

/// Field changes applied by [`TodoRepository::update`].
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    /// Replacement title, already validated.
    pub title: Option<String>,
    /// Replacement description, already validated.
    pub description: Option<String>,
    /// Replacement completion flag.
    pub completed: Option<bool>,
}

impl TodoChanges {
    /// Changes that only set the completion flag.
    #[must_use]
    pub const fn completed(completed: bool) -> Self {
        Self {
            title: None,
            description: None,
            completed: Some(completed),
        }
    }

    /// Changes that replace title and description.
    #[must_use]
    pub fn content(todo: ValidatedTodo) -> Self {
        Self {
            title: Some(todo.title),
            description: Some(todo.description),
            completed: None,
        }
    }
}

/// Port for todo storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Every stored todo, oldest first.
    async fn list(&self) -> Result<Vec<Todo>, TodoRepositoryError>;

    /// Fetch a single todo. Returns `None` when the id is unknown.
    async fn find_by_id(&self, id: &str) -> Result<Option<Todo>, TodoRepositoryError>;

    /// Store a new, incomplete todo created at `now`.
    async fn create(
        &self,
        todo: &ValidatedTodo,
        now: DateTime<Utc>,
    ) -> Result<Todo, TodoRepositoryError>;

    /// Apply `changes` to an existing todo and stamp `updated_at = now`.
    ///
    /// Returns `false` when the id is unknown.
    async fn update(
        &self,
        id: &str,
        changes: &TodoChanges,
        now: DateTime<Utc>,
    ) -> Result<bool, TodoRepositoryError>;

    /// Remove a todo. Unknown ids are not an error.
    async fn delete(&self, id: &str) -> Result<(), TodoRepositoryError>;

    /// Remove every completed todo and report how many were removed.
    async fn delete_completed(&self) -> Result<usize, TodoRepositoryError>;
}
