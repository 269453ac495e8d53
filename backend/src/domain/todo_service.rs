//! Todo list domain service.
//!
//! Backs the todo page: the loader reads the list through
//! [`TodoService::load`] and the form action dispatches a [`TodoCommand`]
//! through [`TodoService::execute`]. Validation runs before any repository
//! call, so rejected input never reaches storage.

use std::sync::Arc;

use mockable::Clock;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::Error;
use crate::domain::ports::{TodoChanges, TodoRepository, TodoRepositoryError};
use crate::domain::todos::{
    Todo, TodoCounts, TodoFilter, count_by_status, filter_todos, toggle_completed,
    validate_new_todo,
};

/// Message returned when a command names a todo that does not exist.
pub const TODO_NOT_FOUND: &str = "Todo not found";

/// Mutations accepted by the todo page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoCommand {
    /// Add a todo from raw form input.
    Create {
        /// Raw title.
        title: String,
        /// Raw description.
        description: String,
    },
    /// Flip the completion flag of a todo.
    Toggle {
        /// Target todo.
        id: String,
    },
    /// Replace the title and description of a todo.
    Edit {
        /// Target todo.
        id: String,
        /// Raw title.
        title: String,
        /// Raw description.
        description: String,
    },
    /// Remove a todo.
    Delete {
        /// Target todo.
        id: String,
    },
    /// Remove every completed todo.
    ClearCompleted,
}

/// Data rendered by the todo page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoListing {
    /// Filter the list was narrowed with.
    pub filter: TodoFilter,
    /// Todos visible under `filter`, oldest first.
    pub todos: Vec<Todo>,
    /// Counts over the whole list, regardless of `filter`.
    pub counts: TodoCounts,
}

/// Todo service implementing the page loader and form action.
#[derive(Clone)]
pub struct TodoService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> TodoService<R> {
    /// Create a new service over the given repository and clock.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

impl<R> TodoService<R>
where
    R: TodoRepository,
{
    fn map_repository_error(error: TodoRepositoryError) -> Error {
        match error {
            TodoRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("todo repository unavailable: {message}"))
            }
            TodoRepositoryError::Query { message } => {
                Error::internal(format!("todo repository error: {message}"))
            }
        }
    }

    /// Read the list for the page, narrowed by `filter`.
    pub async fn load(&self, filter: TodoFilter) -> Result<TodoListing, Error> {
        let all = self
            .repository
            .list()
            .await
            .map_err(Self::map_repository_error)?;
        let counts = count_by_status(&all);
        let todos = filter_todos(&all, filter).into_iter().cloned().collect();
        Ok(TodoListing {
            filter,
            todos,
            counts,
        })
    }

    /// Apply a command from the todo form.
    pub async fn execute(&self, command: TodoCommand) -> Result<(), Error> {
        match command {
            TodoCommand::Create { title, description } => self.create(&title, &description).await,
            TodoCommand::Toggle { id } => self.toggle(&id).await,
            TodoCommand::Edit {
                id,
                title,
                description,
            } => self.edit(&id, &title, &description).await,
            TodoCommand::Delete { id } => self.delete(&id).await,
            TodoCommand::ClearCompleted => self.clear_completed().await,
        }
    }

    async fn create(&self, title: &str, description: &str) -> Result<(), Error> {
        let validated = validate_new_todo(title, description).map_err(Error::validation)?;
        let todo = self
            .repository
            .create(&validated, self.clock.utc())
            .await
            .map_err(Self::map_repository_error)?;
        info!(todo_id = %todo.id, "todo created");
        Ok(())
    }

    async fn find_existing(&self, id: &str) -> Result<Todo, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(TODO_NOT_FOUND))
    }

    async fn toggle(&self, id: &str) -> Result<(), Error> {
        let todo = self.find_existing(id).await?;
        let completed = toggle_completed(todo.completed);
        self.apply(id, &TodoChanges::completed(completed)).await?;
        debug!(todo_id = %id, completed, "todo toggled");
        Ok(())
    }

    async fn edit(&self, id: &str, title: &str, description: &str) -> Result<(), Error> {
        self.find_existing(id).await?;
        let validated = validate_new_todo(title, description).map_err(Error::validation)?;
        self.apply(id, &TodoChanges::content(validated)).await?;
        debug!(todo_id = %id, "todo edited");
        Ok(())
    }

    async fn apply(&self, id: &str, changes: &TodoChanges) -> Result<(), Error> {
        let updated = self
            .repository
            .update(id, changes, self.clock.utc())
            .await
            .map_err(Self::map_repository_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::not_found(TODO_NOT_FOUND))
        }
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.repository
            .delete(id)
            .await
            .map_err(Self::map_repository_error)?;
        debug!(todo_id = %id, "todo deleted");
        Ok(())
    }

    async fn clear_completed(&self) -> Result<(), Error> {
        let removed = self
            .repository
            .delete_completed()
            .await
            .map_err(Self::map_repository_error)?;
        info!(removed, "completed todos cleared");
        Ok(())
    }
}

#[cfg(test)]
#[path = "todo_service_tests.rs"]
mod tests;
