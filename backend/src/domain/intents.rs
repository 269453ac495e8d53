//! Values submitted in the `intent` field of page forms.
//!
//! Each form posts exactly one of these so a single action handler can tell
//! the buttons apart.

/// Add a todo.
pub const CREATE_TODO: &str = "createTodo";
/// Flip a todo between active and completed.
pub const TOGGLE_TODO: &str = "toggleTodo";
/// Change a todo's title and description.
pub const EDIT_TODO: &str = "editTodo";
/// Remove a todo.
pub const DELETE_TODO: &str = "deleteTodo";
/// Remove every completed todo.
pub const CLEAR_COMPLETED: &str = "clearCompleted";

/// Request a magic link for an email address.
pub const SEND_MAGIC_LINK: &str = "sendMagicLink";
/// Redeem a code typed in by hand.
pub const VERIFY_CODE: &str = "verifyCode";
