//! Todo list rules.
//!
//! Title and description validation, completion toggling, and the status
//! filtering and counting behind the list view. The persistence layer owns
//! todo records; this module only shapes and validates plain values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{ValidationCode, input_length, trim_input, validation_codes};

mod filter;

pub use filter::{ParseTodoFilterError, TodoFilter};

/// Maximum title length in UTF-16 code units.
pub const MAX_TITLE_LENGTH: usize = 200;
/// Maximum description length in UTF-16 code units.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

validation_codes! {
    /// Validation failures raised by the create and edit forms.
    pub enum TodoValidationError {
        /// Title was missing or blank once trimmed.
        TitleEmpty => ("TITLE_EMPTY", "validation.titleRequired", "title must not be empty"),
        /// Title exceeded [`MAX_TITLE_LENGTH`] characters.
        TitleTooLong => ("TITLE_TOO_LONG", "validation.titleTooLong", "title must be at most 200 characters"),
        /// Description exceeded [`MAX_DESCRIPTION_LENGTH`] characters.
        DescriptionTooLong => (
            "DESCRIPTION_TOO_LONG",
            "validation.descriptionTooLong",
            "description must be at most 1000 characters"
        ),
    }
}

/// A todo item as handed over by the persistence layer.
///
/// ## Invariants
/// - `id` identifies the record; equality of records is not identity.
/// - `title` and `description` were accepted by [`validate_new_todo`] when
///   the record was created or last edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Stable identifier assigned by storage.
    pub id: String,
    /// Short summary shown in the list.
    pub title: String,
    /// Optional details; empty when not provided.
    pub description: String,
    /// Whether the todo has been done.
    pub completed: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Title and description that passed validation, already trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedTodo {
    /// Trimmed, non-empty title.
    pub title: String,
    /// Trimmed description, possibly empty.
    pub description: String,
}

/// Number of todos in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoCounts {
    /// Todos not yet completed.
    pub active: usize,
    /// Todos marked completed.
    pub completed: usize,
    /// All todos.
    pub total: usize,
}

/// Trim a title and enforce its length bounds.
pub fn validate_todo_title(raw: &str) -> Result<String, TodoValidationError> {
    let trimmed = trim_input(raw);
    if trimmed.is_empty() {
        return Err(TodoValidationError::TitleEmpty);
    }
    if input_length(trimmed) > MAX_TITLE_LENGTH {
        return Err(TodoValidationError::TitleTooLong);
    }
    Ok(trimmed.to_owned())
}

/// Trim a description and enforce its length bound. Empty is allowed.
pub fn validate_todo_description(raw: &str) -> Result<String, TodoValidationError> {
    let trimmed = trim_input(raw);
    if input_length(trimmed) > MAX_DESCRIPTION_LENGTH {
        return Err(TodoValidationError::DescriptionTooLong);
    }
    Ok(trimmed.to_owned())
}

/// Validate the title, then the description.
///
/// The first failure is returned as is; the description is not examined
/// when the title is rejected.
///
/// # Examples
/// ```
/// use backend::domain::todos::{TodoValidationError, validate_new_todo};
///
/// let err = validate_new_todo("  ", &"a".repeat(1001)).unwrap_err();
/// assert_eq!(err, TodoValidationError::TitleEmpty);
///
/// let todo = validate_new_todo(" Buy milk ", "").unwrap();
/// assert_eq!(todo.title, "Buy milk");
/// ```
pub fn validate_new_todo(
    title: &str,
    description: &str,
) -> Result<ValidatedTodo, TodoValidationError> {
    let title = validate_todo_title(title)?;
    let description = validate_todo_description(description)?;
    Ok(ValidatedTodo { title, description })
}

/// Flip a completion flag.
#[must_use]
pub const fn toggle_completed(completed: bool) -> bool {
    !completed
}

/// Todos visible under `filter`, in their original order.
#[must_use]
pub fn filter_todos(todos: &[Todo], filter: TodoFilter) -> Vec<&Todo> {
    todos.iter().filter(|todo| filter.matches(todo)).collect()
}

/// Count todos by completion status.
#[must_use]
pub fn count_by_status(todos: &[Todo]) -> TodoCounts {
    let total = todos.len();
    let completed = todos.iter().filter(|todo| todo.completed).count();
    TodoCounts {
        active: total - completed,
        completed,
        total,
    }
}

/// Display-message key for a todo validation failure.
#[must_use]
pub fn validation_error_to_i18n_key(error: TodoValidationError) -> &'static str {
    error.i18n_key()
}

/// Whether `value` is exactly one of the todo validation wire codes.
#[must_use]
pub fn is_todo_validation_error(value: &str) -> bool {
    TodoValidationError::is_known_code(value)
}
