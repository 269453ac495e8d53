//! Domain primitives, validation rules and services.
//!
//! Purpose: hold every rule the todo and login pages enforce, independent of
//! the web framework and storage in front of and behind them. Validation
//! functions are pure; services reach the outside world only through the
//! traits in [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`) — service error payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - TodoService / AuthService — the page loaders and form actions.

pub mod auth;
mod auth_service;
pub mod error;
pub mod intents;
pub mod ports;
mod todo_service;
pub mod todos;
pub mod validation;

pub use self::auth_service::AuthService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::todo_service::{TODO_NOT_FOUND, TodoCommand, TodoListing, TodoService};
pub use self::validation::{UnknownValidationCode, ValidationCode};

/// Convenient service result alias.
///
/// # Examples
/// ```
/// use backend::domain::{DomainResult, Error};
///
/// fn lookup() -> DomainResult<()> {
///     Err(Error::not_found("Todo not found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
