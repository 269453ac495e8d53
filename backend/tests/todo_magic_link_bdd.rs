//! Behaviour tests for the todo and login form actions.
//!
//! Scenarios drive the form handlers end to end over the in-memory adapters,
//! with a clock the steps can move forward to expire codes.

use std::sync::Arc;

use backend::domain::auth::{AuthSettings, SessionGrant};
use backend::domain::intents;
use backend::domain::ports::RandomVerificationCodeGenerator;
use backend::domain::todos::TodoFilter;
use backend::domain::{AuthService, TodoService};
use backend::inbound::forms::{
    ActionResponse, error_message_key, handle_auth_action, handle_todo_action,
};
use backend::outbound::memory::{
    InMemoryTodoRepository, InMemoryVerificationRepository, OutboxMagicLinkSender,
};
use backend::test_support::MutableClock;
use chrono::{TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;

type LoginService = AuthService<
    InMemoryVerificationRepository,
    OutboxMagicLinkSender,
    RandomVerificationCodeGenerator,
>;

struct FormsWorld {
    runtime: Runtime,
    clock: Arc<MutableClock>,
    todos: TodoService<InMemoryTodoRepository>,
    auth: LoginService,
    outbox: Arc<OutboxMagicLinkSender>,
    last_response: Option<ActionResponse>,
    session: Option<SessionGrant>,
}

impl FormsWorld {
    fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("tokio runtime");
        let start = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid start time");
        let clock = Arc::new(MutableClock::new(start));
        let outbox = Arc::new(OutboxMagicLinkSender::new());
        let todos = TodoService::new(
            Arc::new(InMemoryTodoRepository::new()),
            Arc::clone(&clock) as Arc<dyn Clock>,
        );
        let auth = AuthService::new(
            Arc::new(InMemoryVerificationRepository::new()),
            Arc::clone(&outbox),
            Arc::new(RandomVerificationCodeGenerator),
            Arc::clone(&clock) as Arc<dyn Clock>,
            AuthSettings::default(),
        );
        Self {
            runtime,
            clock,
            todos,
            auth,
            outbox,
            last_response: None,
            session: None,
        }
    }

    fn submit_todo_form(&mut self, fields: Vec<(&str, String)>) {
        let response = self
            .runtime
            .block_on(handle_todo_action(&self.todos, fields));
        self.last_response = Some(response);
    }

    fn submit_auth_form(&mut self, fields: Vec<(&str, String)>) {
        let outcome = self
            .runtime
            .block_on(handle_auth_action(&self.auth, fields));
        self.last_response = Some(outcome.response);
        if outcome.session.is_some() {
            self.session = outcome.session;
        }
    }

    fn count(&self, filter: TodoFilter) -> usize {
        self.runtime
            .block_on(self.todos.load(filter))
            .expect("todo list loads")
            .todos
            .len()
    }

    fn id_of(&self, title: &str) -> String {
        self.runtime
            .block_on(self.todos.load(TodoFilter::All))
            .expect("todo list loads")
            .todos
            .into_iter()
            .find(|todo| todo.title == title)
            .map(|todo| todo.id)
            .unwrap_or_else(|| panic!("no todo titled {title}"))
    }

    fn response(&self) -> &ActionResponse {
        self.last_response.as_ref().expect("an action was submitted")
    }
}

#[fixture]
fn world() -> FormsWorld {
    FormsWorld::new()
}

#[given("an empty todo list")]
fn an_empty_todo_list(world: &mut FormsWorld) {
    assert_eq!(world.count(TodoFilter::All), 0);
}

#[given("the login page")]
fn the_login_page(world: &mut FormsWorld) {
    assert!(world.outbox.sent().is_empty());
}

#[when("the createTodo form is submitted with title \"{title}\"")]
fn create_todo_with_title(world: &mut FormsWorld, title: String) {
    world.submit_todo_form(vec![
        ("intent", intents::CREATE_TODO.to_owned()),
        ("title", title),
    ]);
}

#[when("the createTodo form is submitted with a blank title")]
fn create_todo_with_blank_title(world: &mut FormsWorld) {
    world.submit_todo_form(vec![
        ("intent", intents::CREATE_TODO.to_owned()),
        ("title", "   ".to_owned()),
        ("description", "ignored".to_owned()),
    ]);
}

#[when("the todo titled \"{title}\" is toggled")]
fn toggle_todo_titled(world: &mut FormsWorld, title: String) {
    let id = world.id_of(&title);
    world.submit_todo_form(vec![("intent", intents::TOGGLE_TODO.to_owned()), ("id", id)]);
}

#[when("the toggleTodo form is submitted for id \"{id}\"")]
fn toggle_todo_by_id(world: &mut FormsWorld, id: String) {
    world.submit_todo_form(vec![("intent", intents::TOGGLE_TODO.to_owned()), ("id", id)]);
}

#[when("the clearCompleted form is submitted")]
fn clear_completed(world: &mut FormsWorld) {
    world.submit_todo_form(vec![("intent", intents::CLEAR_COMPLETED.to_owned())]);
}

#[when("a magic link is requested for \"{email}\"")]
fn request_magic_link(world: &mut FormsWorld, email: String) {
    world.submit_auth_form(vec![
        ("intent", intents::SEND_MAGIC_LINK.to_owned()),
        ("email", email),
    ]);
}

#[when("the emailed code for \"{email}\" is submitted")]
fn submit_emailed_code(world: &mut FormsWorld, email: String) {
    let message = world
        .outbox
        .latest_for(&email)
        .expect("a magic link was sent");
    assert!(message.url.contains(&format!("code={}", message.code)));
    world.submit_auth_form(vec![
        ("intent", intents::VERIFY_CODE.to_owned()),
        ("type", "login".to_owned()),
        ("target", message.target),
        ("code", message.code),
    ]);
}

#[when("the clock advances by {minutes} minutes")]
fn the_clock_advances(world: &mut FormsWorld, minutes: i64) {
    world.clock.advance_minutes(minutes);
}

#[then("the action succeeds")]
fn the_action_succeeds(world: &mut FormsWorld) {
    assert_eq!(world.response(), &ActionResponse::ok());
}

#[then("the action fails with status {status} and error \"{error}\"")]
fn the_action_fails(world: &mut FormsWorld, status: u16, error: String) {
    let response = world.response();
    assert_eq!(response.status, status);
    assert!(!response.data.success);
    assert_eq!(response.data.error.as_deref(), Some(error.as_str()));
}

#[then("the error translates to \"{key}\"")]
fn the_error_translates_to(world: &mut FormsWorld, key: String) {
    let raw = world.response().data.error.clone().expect("error present");
    assert_eq!(error_message_key(&raw), key);
}

#[then("the {filter} filter shows {count} todo")]
fn the_filter_shows(world: &mut FormsWorld, filter: String, count: usize) {
    let filter: TodoFilter = filter.parse().expect("known filter");
    assert_eq!(world.count(filter), count);
}

#[then("the list holds {count} todos in total")]
fn the_list_holds(world: &mut FormsWorld, count: usize) {
    let listing = world
        .runtime
        .block_on(world.todos.load(TodoFilter::All))
        .expect("todo list loads");
    assert_eq!(listing.counts.total, count);
    assert_eq!(listing.counts.active + listing.counts.completed, count);
}

#[then("a session is granted for \"{email}\" lasting {days} days")]
fn a_session_is_granted(world: &mut FormsWorld, email: String, days: i64) {
    let session = world.session.as_ref().expect("session granted");
    assert_eq!(session.email, email);
    assert_eq!(
        session.expires_at,
        world.clock.utc() + TimeDelta::days(days)
    );
}

#[then("no magic link was sent")]
fn no_magic_link_was_sent(world: &mut FormsWorld) {
    assert!(world.outbox.sent().is_empty());
}

#[scenario(
    path = "tests/features/todo_magic_link.feature",
    name = "Creating and completing todos"
)]
fn creating_and_completing_todos(world: FormsWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/todo_magic_link.feature",
    name = "Rejecting a blank title"
)]
fn rejecting_a_blank_title(world: FormsWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/todo_magic_link.feature",
    name = "Clearing completed todos"
)]
fn clearing_completed_todos(world: FormsWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/todo_magic_link.feature",
    name = "Toggling an unknown todo"
)]
fn toggling_an_unknown_todo(world: FormsWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/todo_magic_link.feature",
    name = "Signing in with a magic link"
)]
fn signing_in_with_a_magic_link(world: FormsWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/todo_magic_link.feature",
    name = "Rejecting an expired code"
)]
fn rejecting_an_expired_code(world: FormsWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/todo_magic_link.feature",
    name = "A code works only once"
)]
fn a_code_works_only_once(world: FormsWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/todo_magic_link.feature",
    name = "Rejecting a malformed email"
)]
fn rejecting_a_malformed_email(world: FormsWorld) {
    drop(world);
}
