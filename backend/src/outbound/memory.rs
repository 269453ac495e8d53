//! Process-local adapters for the domain ports.
//!
//! These back the `issue-magic-link` tool and the behaviour suite. State
//! lives behind a [`Mutex`] and disappears with the process.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::auth::{Verification, VerificationType, is_session_expired};
use crate::domain::ports::{
    MagicLinkDeliveryError, MagicLinkMessage, MagicLinkSender, TodoChanges, TodoRepository,
    TodoRepositoryError, VerificationRepository, VerificationRepositoryError,
};
use crate::domain::todos::{Todo, ValidatedTodo};

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>, String> {
    mutex.lock().map_err(|_| format!("{name} lock poisoned"))
}

/// Todo store kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    todos: Mutex<Vec<Todo>>,
}

impl InMemoryTodoRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn todos(&self) -> Result<MutexGuard<'_, Vec<Todo>>, TodoRepositoryError> {
        lock(&self.todos, "todo store").map_err(TodoRepositoryError::query)
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list(&self) -> Result<Vec<Todo>, TodoRepositoryError> {
        Ok(self.todos()?.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Todo>, TodoRepositoryError> {
        Ok(self.todos()?.iter().find(|todo| todo.id == id).cloned())
    }

    async fn create(
        &self,
        todo: &ValidatedTodo,
        now: DateTime<Utc>,
    ) -> Result<Todo, TodoRepositoryError> {
        let record = Todo {
            id: Uuid::new_v4().to_string(),
            title: todo.title.clone(),
            description: todo.description.clone(),
            completed: false,
            created_at: now,
            updated_at: now,
        };
        self.todos()?.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: &str,
        changes: &TodoChanges,
        now: DateTime<Utc>,
    ) -> Result<bool, TodoRepositoryError> {
        let mut todos = self.todos()?;
        let Some(todo) = todos.iter_mut().find(|todo| todo.id == id) else {
            return Ok(false);
        };
        if let Some(title) = &changes.title {
            todo.title.clone_from(title);
        }
        if let Some(description) = &changes.description {
            todo.description.clone_from(description);
        }
        if let Some(completed) = changes.completed {
            todo.completed = completed;
        }
        todo.updated_at = now;
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<(), TodoRepositoryError> {
        self.todos()?.retain(|todo| todo.id != id);
        Ok(())
    }

    async fn delete_completed(&self) -> Result<usize, TodoRepositoryError> {
        let mut todos = self.todos()?;
        let before = todos.len();
        todos.retain(|todo| !todo.completed);
        Ok(before - todos.len())
    }
}

/// Pending verifications keyed by type and target.
#[derive(Debug, Default)]
pub struct InMemoryVerificationRepository {
    pending: Mutex<HashMap<(VerificationType, String), Verification>>,
}

impl InMemoryVerificationRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn pending(
        &self,
    ) -> Result<
        MutexGuard<'_, HashMap<(VerificationType, String), Verification>>,
        VerificationRepositoryError,
    > {
        lock(&self.pending, "verification store").map_err(VerificationRepositoryError::query)
    }
}

#[async_trait]
impl VerificationRepository for InMemoryVerificationRepository {
    async fn upsert(
        &self,
        verification: &Verification,
        now: DateTime<Utc>,
    ) -> Result<(), VerificationRepositoryError> {
        let mut pending = self.pending()?;
        let before = pending.len();
        pending.retain(|_, stored| !is_session_expired(stored.expires_at, now));
        let purged = before - pending.len();
        if purged > 0 {
            debug!(purged, "expired verifications dropped");
        }
        pending.insert(
            (verification.link_type, verification.target.clone()),
            verification.clone(),
        );
        Ok(())
    }

    async fn find(
        &self,
        link_type: VerificationType,
        target: &str,
    ) -> Result<Option<Verification>, VerificationRepositoryError> {
        Ok(self
            .pending()?
            .get(&(link_type, target.to_owned()))
            .cloned())
    }

    async fn delete(
        &self,
        link_type: VerificationType,
        target: &str,
    ) -> Result<(), VerificationRepositoryError> {
        self.pending()?.remove(&(link_type, target.to_owned()));
        Ok(())
    }

    async fn consume(
        &self,
        verification: &Verification,
    ) -> Result<bool, VerificationRepositoryError> {
        let mut pending = self.pending()?;
        let key = (verification.link_type, verification.target.clone());
        let matches = pending
            .get(&key)
            .is_some_and(|stored| stored.code == verification.code);
        if matches {
            pending.remove(&key);
        }
        Ok(matches)
    }
}

/// Sender that keeps every message in an outbox instead of emailing it.
#[derive(Debug, Default)]
pub struct OutboxMagicLinkSender {
    outbox: Mutex<Vec<MagicLinkMessage>>,
}

impl OutboxMagicLinkSender {
    /// Create a sender with an empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<MagicLinkMessage> {
        match self.outbox.lock() {
            Ok(outbox) => outbox.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// The most recent message sent to `target`, if any.
    #[must_use]
    pub fn latest_for(&self, target: &str) -> Option<MagicLinkMessage> {
        self.sent()
            .into_iter()
            .rev()
            .find(|message| message.target == target)
    }
}

#[async_trait]
impl MagicLinkSender for OutboxMagicLinkSender {
    async fn send(&self, message: &MagicLinkMessage) -> Result<(), MagicLinkDeliveryError> {
        lock(&self.outbox, "outbox")
            .map_err(MagicLinkDeliveryError::unavailable)?
            .push(message.clone());
        info!(email = %message.target, "magic link queued in outbox");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Behaviour of the in-memory adapters.
    use super::*;
    use crate::test_support::fixture_now;
    use chrono::TimeDelta;
    use rstest::{fixture, rstest};

    #[fixture]
    fn repo() -> InMemoryTodoRepository {
        InMemoryTodoRepository::new()
    }

    fn validated(title: &str) -> ValidatedTodo {
        ValidatedTodo {
            title: title.to_owned(),
            description: String::new(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn created_todos_are_listed_in_insertion_order(repo: InMemoryTodoRepository) {
        let first = repo
            .create(&validated("first"), fixture_now())
            .await
            .expect("create first");
        let second = repo
            .create(&validated("second"), fixture_now())
            .await
            .expect("create second");

        let listed = repo.list().await.expect("list");
        assert_eq!(listed, vec![first.clone(), second]);
        assert!(!first.completed);
        assert_ne!(listed[0].id, listed[1].id);
    }

    #[rstest]
    #[tokio::test]
    async fn update_applies_only_given_fields(repo: InMemoryTodoRepository) {
        let created = repo
            .create(&validated("title"), fixture_now())
            .await
            .expect("create");
        let later = fixture_now() + TimeDelta::hours(1);

        let updated = repo
            .update(&created.id, &TodoChanges::completed(true), later)
            .await
            .expect("update");
        assert!(updated);

        let stored = repo
            .find_by_id(&created.id)
            .await
            .expect("find")
            .expect("todo present");
        assert_eq!(stored.title, "title");
        assert!(stored.completed);
        assert_eq!(stored.created_at, fixture_now());
        assert_eq!(stored.updated_at, later);
    }

    #[rstest]
    #[tokio::test]
    async fn update_reports_unknown_id(repo: InMemoryTodoRepository) {
        let updated = repo
            .update("missing", &TodoChanges::completed(true), fixture_now())
            .await
            .expect("update");
        assert!(!updated);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_completed_counts_removed_todos(repo: InMemoryTodoRepository) {
        for title in ["a", "b", "c"] {
            let todo = repo
                .create(&validated(title), fixture_now())
                .await
                .expect("create");
            if title != "b" {
                repo.update(&todo.id, &TodoChanges::completed(true), fixture_now())
                    .await
                    .expect("complete");
            }
        }

        assert_eq!(repo.delete_completed().await.expect("clear"), 2);
        let remaining = repo.list().await.expect("list");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "b");
        repo.delete(&remaining[0].id).await.expect("delete");
        repo.delete(&remaining[0].id).await.expect("delete twice");
        assert!(repo.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn verification_upsert_replaces_previous_code() {
        let repo = InMemoryVerificationRepository::new();
        let mut verification = Verification {
            link_type: VerificationType::Login,
            target: "alice@example.com".to_owned(),
            code: "AAAAAA".to_owned(),
            expires_at: fixture_now() + TimeDelta::minutes(10),
        };
        repo.upsert(&verification, fixture_now())
            .await
            .expect("first upsert");
        verification.code = "BBBBBB".to_owned();
        repo.upsert(&verification, fixture_now())
            .await
            .expect("second upsert");

        let found = repo
            .find(VerificationType::Login, "alice@example.com")
            .await
            .expect("find");
        assert_eq!(found.map(|v| v.code).as_deref(), Some("BBBBBB"));

        repo.delete(VerificationType::Login, "alice@example.com")
            .await
            .expect("delete");
        let gone = repo
            .find(VerificationType::Login, "alice@example.com")
            .await
            .expect("find after delete");
        assert!(gone.is_none());
    }

    fn login(target: &str, code: &str, expires_at: DateTime<Utc>) -> Verification {
        Verification {
            link_type: VerificationType::Login,
            target: target.to_owned(),
            code: code.to_owned(),
            expires_at,
        }
    }

    #[tokio::test]
    async fn upsert_drops_expired_verifications() {
        let repo = InMemoryVerificationRepository::new();
        let now = fixture_now();
        repo.upsert(&login("bob@example.com", "OLD111", now), now - TimeDelta::minutes(5))
            .await
            .expect("stale upsert");
        repo.upsert(
            &login("carol@example.com", "LIVE22", now + TimeDelta::minutes(1)),
            now - TimeDelta::minutes(5),
        )
        .await
        .expect("live upsert");

        repo.upsert(
            &login("alice@example.com", "NEW333", now + TimeDelta::minutes(10)),
            now,
        )
        .await
        .expect("fresh upsert");

        let stale = repo
            .find(VerificationType::Login, "bob@example.com")
            .await
            .expect("find stale");
        assert!(stale.is_none());
        let live = repo
            .find(VerificationType::Login, "carol@example.com")
            .await
            .expect("find live");
        assert!(live.is_some());
    }

    #[tokio::test]
    async fn consume_removes_only_the_matching_code_once() {
        let repo = InMemoryVerificationRepository::new();
        let now = fixture_now();
        let issued = login("alice@example.com", "AAAAAA", now + TimeDelta::minutes(10));
        repo.upsert(&issued, now).await.expect("upsert");

        let stale = login("alice@example.com", "ZZZZZZ", issued.expires_at);
        assert!(!repo.consume(&stale).await.expect("consume stale"));
        assert!(repo.consume(&issued).await.expect("first consume"));
        assert!(!repo.consume(&issued).await.expect("second consume"));
        let gone = repo
            .find(VerificationType::Login, "alice@example.com")
            .await
            .expect("find");
        assert!(gone.is_none());
    }

    #[tokio::test]
    async fn outbox_returns_latest_message_per_target() {
        let sender = OutboxMagicLinkSender::new();
        let messages = [
            ("a@example.com", "ONE"),
            ("b@example.com", "TWO"),
            ("a@example.com", "THREE"),
        ];
        for (target, code) in messages {
            sender
                .send(&MagicLinkMessage {
                    target: target.to_owned(),
                    code: code.to_owned(),
                    url: format!("https://example.com/auth/callback?code={code}"),
                })
                .await
                .expect("send");
        }

        assert_eq!(sender.sent().len(), 3);
        let latest = sender.latest_for("a@example.com").expect("message for a");
        assert_eq!(latest.code, "THREE");
        assert!(sender.latest_for("c@example.com").is_none());
    }
}
