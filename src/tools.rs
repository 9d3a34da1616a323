//! Request/response facade used by the calling layer.
//!
//! This module provides [`ReminderTools`] and [`TodoTools`], the only entry
//! points the surrounding tool framework talks to. Every input is a plain
//! string or integer and every output is an [`Envelope`].
//!
//! Each call follows the same discipline:
//! - obtain a fresh [`Session`] from the shared [`ConnectionManager`]
//!   (failure yields the `"Database connection failed"` envelope)
//! - bind a repository to it and run exactly one operation
//! - close the session, whatever the outcome
//!
//! Timestamps must already be well formed (`YYYY-MM-DD HH:MM[:SS]`); no
//! natural-language parsing happens here.

use std::sync::Arc;

use log::debug;
use sea_orm::prelude::Date;

use crate::config::TodoConfig;
use crate::constants::{
    ERROR_INVALID_DUE_DATE, ERROR_INVALID_REMIND_TIME, ERROR_TODO_DESCRIPTION_REQUIRED, GENERATED_TITLE_ELLIPSIS,
    GENERATED_TITLE_WORDS,
};
use crate::entities::Priority;
use crate::envelope::Envelope;
use crate::repositories::{ReminderChanges, ReminderRepository, TodoChanges, TodoRepository};
use crate::storage::{ConnectionManager, Session};
use crate::utils::datetime;

/// Reminder operations for the calling layer.
///
/// # Example
/// ```rust,no_run
/// use heptapal_store::config::DatabaseConfig;
/// use heptapal_store::storage::ConnectionManager;
/// use heptapal_store::tools::ReminderTools;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let manager = Arc::new(ConnectionManager::new(DatabaseConfig::sqlite_memory())?);
/// manager.initialize().await?;
///
/// let tools = ReminderTools::new(manager);
/// let added = tools.add_reminder("Call Mom", "Weekly catch-up", "2024-12-18 19:00").await;
/// println!("{}", added.to_json());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ReminderTools {
    manager: Arc<ConnectionManager>,
}

/// Todo operations for the calling layer.
///
/// Adds a todo with the configured default priority when none is given, and
/// generates a title from the description when the title is left empty.
#[derive(Clone)]
pub struct TodoTools {
    manager: Arc<ConnectionManager>,
    default_priority: Priority,
}

impl ReminderTools {
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self { manager }
    }

    /// Add a reminder firing at `remind_time`.
    pub async fn add_reminder(&self, title: &str, description: &str, remind_time: &str) -> Envelope {
        let Some(remind_time) = datetime::parse_timestamp(remind_time) else {
            return Envelope::error(ERROR_INVALID_REMIND_TIME);
        };

        let session = match open_session(&self.manager, "add reminder").await {
            Ok(session) => session,
            Err(envelope) => return envelope,
        };
        let envelope = ReminderRepository::new(&session)
            .add(title, description, remind_time)
            .await;
        session.close();
        envelope
    }

    /// List active reminders.
    pub async fn list_reminders(&self) -> Envelope {
        let session = match open_session(&self.manager, "list reminders").await {
            Ok(session) => session,
            Err(envelope) => return envelope,
        };
        let envelope = ReminderRepository::new(&session).list().await;
        session.close();
        envelope
    }

    /// Get one reminder, including soft-deleted ones.
    pub async fn get_reminder(&self, id: i32) -> Envelope {
        let session = match open_session(&self.manager, "get reminder").await {
            Ok(session) => session,
            Err(envelope) => return envelope,
        };
        let envelope = ReminderRepository::new(&session).get(id).await;
        session.close();
        envelope
    }

    /// Update the supplied, non-empty fields of a reminder.
    pub async fn update_reminder(
        &self,
        id: i32,
        title: Option<&str>,
        description: Option<&str>,
        remind_time: Option<&str>,
    ) -> Envelope {
        let remind_time = match parse_optional(remind_time, datetime::parse_timestamp) {
            Ok(ts) => ts,
            Err(()) => return Envelope::error(ERROR_INVALID_REMIND_TIME),
        };
        let changes = ReminderChanges {
            title: title.map(str::to_string),
            description: description.map(str::to_string),
            remind_time,
        };

        let session = match open_session(&self.manager, "update reminder").await {
            Ok(session) => session,
            Err(envelope) => return envelope,
        };
        let envelope = ReminderRepository::new(&session).update(id, changes).await;
        session.close();
        envelope
    }

    /// Soft-delete a reminder.
    pub async fn delete_reminder(&self, id: i32) -> Envelope {
        let session = match open_session(&self.manager, "delete reminder").await {
            Ok(session) => session,
            Err(envelope) => return envelope,
        };
        let envelope = ReminderRepository::new(&session).delete(id).await;
        session.close();
        envelope
    }

    /// Search active reminders by title or description.
    pub async fn search_reminders(&self, query: &str) -> Envelope {
        let session = match open_session(&self.manager, "search reminders").await {
            Ok(session) => session,
            Err(envelope) => return envelope,
        };
        let envelope = ReminderRepository::new(&session).search(query).await;
        session.close();
        envelope
    }
}

impl TodoTools {
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self {
            manager,
            default_priority: Priority::default(),
        }
    }

    /// Tools using the `[todos]` defaults from the configuration.
    pub fn from_config(manager: Arc<ConnectionManager>, config: &TodoConfig) -> Self {
        Self::new(manager).with_default_priority(config.default_priority)
    }

    /// Use `priority` for todos added without one.
    pub fn with_default_priority(mut self, priority: Priority) -> Self {
        self.default_priority = priority;
        self
    }

    /// Add a todo item.
    ///
    /// The description is required. An empty title is generated from the
    /// description with [`generate_title`].
    pub async fn add_todo(
        &self,
        title: Option<&str>,
        description: Option<&str>,
        priority: Option<&str>,
        due_date: Option<&str>,
    ) -> Envelope {
        let Some(description) = description.filter(|d| !d.trim().is_empty()) else {
            return Envelope::error(ERROR_TODO_DESCRIPTION_REQUIRED);
        };
        let due_date = match parse_optional(due_date, parse_due_date) {
            Ok(date) => date,
            Err(()) => return Envelope::error(ERROR_INVALID_DUE_DATE),
        };
        let title = match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => title.to_string(),
            None => {
                let generated = generate_title(description);
                debug!("Generated todo title '{}'", generated);
                generated
            }
        };

        let session = match open_session(&self.manager, "add todo item").await {
            Ok(session) => session,
            Err(envelope) => return envelope,
        };
        let envelope = TodoRepository::new(&session)
            .with_default_priority(self.default_priority)
            .add(&title, Some(description), priority, due_date)
            .await;
        session.close();
        envelope
    }

    /// List todos, optionally filtered by status and priority.
    pub async fn list_todos(&self, filter_status: Option<&str>, filter_priority: Option<&str>) -> Envelope {
        let session = match open_session(&self.manager, "list todo items").await {
            Ok(session) => session,
            Err(envelope) => return envelope,
        };
        let envelope = TodoRepository::new(&session)
            .list(filter_status, filter_priority)
            .await;
        session.close();
        envelope
    }

    pub async fn get_todo(&self, id: i32) -> Envelope {
        let session = match open_session(&self.manager, "get todo item").await {
            Ok(session) => session,
            Err(envelope) => return envelope,
        };
        let envelope = TodoRepository::new(&session).get(id).await;
        session.close();
        envelope
    }

    /// Update the supplied, non-empty fields of a todo item.
    pub async fn update_todo(
        &self,
        id: i32,
        title: Option<&str>,
        description: Option<&str>,
        priority: Option<&str>,
        status: Option<&str>,
        due_date: Option<&str>,
    ) -> Envelope {
        let due_date = match parse_optional(due_date, parse_due_date) {
            Ok(date) => date,
            Err(()) => return Envelope::error(ERROR_INVALID_DUE_DATE),
        };
        let changes = TodoChanges {
            title: title.map(str::to_string),
            description: description.map(str::to_string),
            priority: priority.map(str::to_string),
            status: status.map(str::to_string),
            due_date,
        };

        let session = match open_session(&self.manager, "update todo item").await {
            Ok(session) => session,
            Err(envelope) => return envelope,
        };
        let envelope = TodoRepository::new(&session).update(id, changes).await;
        session.close();
        envelope
    }

    /// Permanently delete a todo item.
    pub async fn delete_todo(&self, id: i32) -> Envelope {
        let session = match open_session(&self.manager, "delete todo item").await {
            Ok(session) => session,
            Err(envelope) => return envelope,
        };
        let envelope = TodoRepository::new(&session).delete(id).await;
        session.close();
        envelope
    }

    pub async fn search_todos(&self, query: &str) -> Envelope {
        let session = match open_session(&self.manager, "search todo items").await {
            Ok(session) => session,
            Err(envelope) => return envelope,
        };
        let envelope = TodoRepository::new(&session).search(query).await;
        session.close();
        envelope
    }

    /// Counts by status and priority.
    pub async fn get_todo_statistics(&self) -> Envelope {
        let session = match open_session(&self.manager, "get todo statistics").await {
            Ok(session) => session,
            Err(envelope) => return envelope,
        };
        let envelope = TodoRepository::new(&session).statistics().await;
        session.close();
        envelope
    }
}

/// Build a todo title from its description.
///
/// Keeps the first five whitespace-separated words joined by single spaces,
/// appending `...` when words were dropped.
pub fn generate_title(description: &str) -> String {
    let words: Vec<&str> = description.split_whitespace().collect();
    let mut title = words
        .iter()
        .take(GENERATED_TITLE_WORDS)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if words.len() > GENERATED_TITLE_WORDS {
        title.push_str(GENERATED_TITLE_ELLIPSIS);
    }
    title
}

async fn open_session(manager: &ConnectionManager, action: &str) -> Result<Session, Envelope> {
    manager.get_session().await.map_err(|e| e.into_envelope(action))
}

/// Parse an optional value; empty counts as absent.
fn parse_optional<T, F>(value: Option<&str>, parse: F) -> Result<Option<T>, ()>
where
    F: Fn(&str) -> Option<T>,
{
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse(v).map(Some).ok_or(()),
        None => Ok(None),
    }
}

fn parse_due_date(value: &str) -> Option<Date> {
    datetime::parse_date(value).ok()
}
