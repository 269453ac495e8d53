//! Form action envelope shared by the todo and login pages.
//!
//! Each page posts its fields as flat string pairs with an `intent` field
//! naming the button pressed. The handlers here parse those pairs, run the
//! matching service call and answer with an [`ActionResponse`] the page
//! renders as `{ "error": ..., "success": ... }`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::domain::auth::{AuthValidationError, SessionGrant, VerificationError, VerificationType};
use crate::domain::ports::{
    MagicLinkSender, TodoRepository, VerificationCodeGenerator, VerificationRepository,
};
use crate::domain::todos::TodoValidationError;
use crate::domain::{AuthService, Error, ErrorCode, TodoCommand, TodoService, ValidationCode};

/// Error reported when the submitted fields do not match any intent.
pub const INVALID_FORM_DATA: &str = "Invalid form data";

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
const SERVICE_UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable";

/// Fields accepted by the todo page form, keyed by `intent`.
///
/// Tags mirror the constants in [`crate::domain::intents`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent")]
pub enum TodoActionForm {
    /// `createTodo`.
    #[serde(rename = "createTodo")]
    Create {
        /// Raw title field.
        title: String,
        /// Raw description field; absent means empty.
        #[serde(default)]
        description: String,
    },
    /// `toggleTodo`.
    #[serde(rename = "toggleTodo")]
    Toggle {
        /// Target todo.
        id: String,
    },
    /// `editTodo`.
    #[serde(rename = "editTodo")]
    Edit {
        /// Target todo.
        id: String,
        /// Raw title field.
        title: String,
        /// Raw description field; absent means empty.
        #[serde(default)]
        description: String,
    },
    /// `deleteTodo`.
    #[serde(rename = "deleteTodo")]
    Delete {
        /// Target todo.
        id: String,
    },
    /// `clearCompleted`.
    #[serde(rename = "clearCompleted")]
    ClearCompleted,
}

impl From<TodoActionForm> for TodoCommand {
    fn from(form: TodoActionForm) -> Self {
        match form {
            TodoActionForm::Create { title, description } => Self::Create { title, description },
            TodoActionForm::Toggle { id } => Self::Toggle { id },
            TodoActionForm::Edit {
                id,
                title,
                description,
            } => Self::Edit {
                id,
                title,
                description,
            },
            TodoActionForm::Delete { id } => Self::Delete { id },
            TodoActionForm::ClearCompleted => Self::ClearCompleted,
        }
    }
}

/// Fields accepted by the login and verify pages, keyed by `intent`.
///
/// Tags mirror the constants in [`crate::domain::intents`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent")]
pub enum AuthActionForm {
    /// `sendMagicLink`.
    #[serde(rename = "sendMagicLink")]
    SendMagicLink {
        /// Raw email field.
        email: String,
    },
    /// `verifyCode`.
    #[serde(rename = "verifyCode")]
    VerifyCode {
        /// Hidden `type` field copied from the magic link.
        #[serde(rename = "type")]
        link_type: VerificationType,
        /// Hidden `target` field copied from the magic link.
        target: String,
        /// Code typed by the user.
        code: String,
    },
}

/// Body returned by every form action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionData {
    /// Validation code or message describing the failure; `null` on success.
    pub error: Option<String>,
    /// Whether the action took effect.
    pub success: bool,
}

impl ActionData {
    /// Successful outcome.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            error: None,
            success: true,
        }
    }

    /// Failed outcome carrying `error`.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            success: false,
        }
    }
}

/// Status code and body produced by a form action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// HTTP status the transport should answer with.
    pub status: u16,
    /// Serialised response body.
    pub data: ActionData,
}

impl ActionResponse {
    /// `200` with a successful body.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            status: 200,
            data: ActionData::ok(),
        }
    }

    /// `400` for fields that match no intent.
    #[must_use]
    pub fn invalid_form() -> Self {
        Self {
            status: 400,
            data: ActionData::failure(INVALID_FORM_DATA),
        }
    }
}

impl From<&Error> for ActionResponse {
    fn from(error: &Error) -> Self {
        let message = match error.code() {
            ErrorCode::InternalError => INTERNAL_ERROR_MESSAGE,
            ErrorCode::ServiceUnavailable => SERVICE_UNAVAILABLE_MESSAGE,
            _ => error.validation_code().unwrap_or_else(|| error.message()),
        };
        Self {
            status: status_for(error.code()),
            data: ActionData::failure(message),
        }
    }
}

/// Result of a login form action.
///
/// `session` is only set when a code was redeemed; the transport persists it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthActionOutcome {
    /// Response for the page.
    pub response: ActionResponse,
    /// Grant to persist as the user's session.
    pub session: Option<SessionGrant>,
}

const fn status_for(code: ErrorCode) -> u16 {
    match code {
        ErrorCode::InvalidRequest => 400,
        ErrorCode::NotFound => 404,
        ErrorCode::ServiceUnavailable => 503,
        ErrorCode::InternalError => 500,
    }
}

fn failure(error: &Error) -> ActionResponse {
    if matches!(
        error.code(),
        ErrorCode::InternalError | ErrorCode::ServiceUnavailable
    ) {
        error!(code = ?error.code(), message = %error.message(), "form action failed");
    } else {
        debug!(code = ?error.code(), message = %error.message(), "form action rejected");
    }
    ActionResponse::from(error)
}

/// Decode submitted `(name, value)` pairs into a form enum.
///
/// Later duplicates of a field win.
///
/// # Errors
///
/// Returns the underlying serde error when the `intent` is unknown or a
/// required field is missing.
///
/// # Examples
/// ```
/// use backend::inbound::forms::{TodoActionForm, parse_form};
///
/// let form: TodoActionForm = parse_form([("intent", "toggleTodo"), ("id", "42")]).unwrap();
/// assert_eq!(form, TodoActionForm::Toggle { id: "42".into() });
/// ```
pub fn parse_form<T, I, K, V>(fields: I) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let object: Map<String, Value> = fields
        .into_iter()
        .map(|(key, value)| (key.into(), Value::String(value.into())))
        .collect();
    serde_json::from_value(Value::Object(object))
}

/// Run the todo page action for the submitted fields.
pub async fn handle_todo_action<R, I, K, V>(service: &TodoService<R>, fields: I) -> ActionResponse
where
    R: TodoRepository,
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let form: TodoActionForm = match parse_form(fields) {
        Ok(form) => form,
        Err(err) => {
            warn!(error = %err, "todo form rejected");
            return ActionResponse::invalid_form();
        }
    };
    match service.execute(form.into()).await {
        Ok(()) => ActionResponse::ok(),
        Err(err) => failure(&err),
    }
}

/// Run the login or verify page action for the submitted fields.
pub async fn handle_auth_action<A, S, G, I, K, V>(
    service: &AuthService<A, S, G>,
    fields: I,
) -> AuthActionOutcome
where
    A: VerificationRepository,
    S: MagicLinkSender,
    G: VerificationCodeGenerator,
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let form: AuthActionForm = match parse_form(fields) {
        Ok(form) => form,
        Err(err) => {
            warn!(error = %err, "auth form rejected");
            return AuthActionOutcome {
                response: ActionResponse::invalid_form(),
                session: None,
            };
        }
    };
    let result = match form {
        AuthActionForm::SendMagicLink { email } => {
            service.send_magic_link(&email).await.map(|_| None)
        }
        AuthActionForm::VerifyCode {
            link_type,
            target,
            code,
        } => service
            .verify_code(link_type, &target, &code)
            .await
            .map(Some),
    };
    match result {
        Ok(session) => AuthActionOutcome {
            response: ActionResponse::ok(),
            session,
        },
        Err(err) => AuthActionOutcome {
            response: failure(&err),
            session: None,
        },
    }
}

/// Translation key for an `error` value returned by a form action.
///
/// Known validation codes map to their own key; anything else is shown as
/// `validation.<raw>`.
///
/// # Examples
/// ```
/// use backend::inbound::forms::error_message_key;
///
/// assert_eq!(error_message_key("TITLE_TOO_LONG"), "validation.titleTooLong");
/// assert_eq!(error_message_key("Todo not found"), "validation.Todo not found");
/// ```
#[must_use]
pub fn error_message_key(raw: &str) -> String {
    AuthValidationError::from_code(raw)
        .map(ValidationCode::i18n_key)
        .or_else(|| TodoValidationError::from_code(raw).map(ValidationCode::i18n_key))
        .or_else(|| VerificationError::from_code(raw).map(ValidationCode::i18n_key))
        .map_or_else(|| format!("validation.{raw}"), str::to_owned)
}

#[cfg(test)]
#[path = "forms_tests.rs"]
mod tests;
