//! Reminder repository for database operations.
//!
//! Deleting a reminder is a soft delete: the row is kept with
//! `is_active = false`, still reachable through [`ReminderRepository::get`]
//! but excluded from listing and search.

use sea_orm::prelude::DateTime;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};

use super::{
    check_title_length, contains_folded, contains_ignore_case, require_text, sql_lower_folds_unicode, supplied,
};
use crate::constants::{ERROR_DESCRIPTION_REQUIRED, ERROR_TITLE_REQUIRED};
use crate::entities::reminder;
use crate::envelope::{Envelope, Payload};
use crate::error::{StoreError, StoreResult};
use crate::storage::Session;

/// Partial update for a reminder.
///
/// A field is applied only when it is present and non-empty, so an update
/// can never blank out a title or description.
#[derive(Debug, Clone, Default)]
pub struct ReminderChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub remind_time: Option<DateTime>,
}

/// Repository for reminder-related database operations.
pub struct ReminderRepository<'a> {
    session: &'a Session,
}

impl<'a> ReminderRepository<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Add a new reminder.
    pub async fn add(&self, title: &str, description: &str, remind_time: DateTime) -> Envelope {
        match self.insert(title, description, remind_time).await {
            Ok(reminder) => Envelope::success_with(
                format!("Reminder '{}' added successfully", reminder.title),
                Payload::Reminder(reminder),
            ),
            Err(e) => e.into_envelope("add reminder"),
        }
    }

    /// List all active reminders in insertion order.
    pub async fn list(&self) -> Envelope {
        match Self::find_active(self.session.connection()).await {
            Ok(reminders) => Envelope::success_with(
                format!("Found {} active reminders", reminders.len()),
                Payload::Reminders(reminders),
            ),
            Err(e) => e.into_envelope("list reminders"),
        }
    }

    /// Get a reminder by id, active or not.
    pub async fn get(&self, id: i32) -> Envelope {
        match Self::find_existing(self.session.connection(), id).await {
            Ok(reminder) => Envelope::success_with(
                format!("Reminder {} retrieved successfully", id),
                Payload::Reminder(reminder),
            ),
            Err(e) => e.into_envelope("get reminder"),
        }
    }

    /// Apply a partial update.
    pub async fn update(&self, id: i32, changes: ReminderChanges) -> Envelope {
        match self.apply_update(id, changes).await {
            Ok(reminder) => Envelope::success_with(
                format!("Reminder {} updated successfully", id),
                Payload::Reminder(reminder),
            ),
            Err(e) => e.into_envelope("update reminder"),
        }
    }

    /// Soft-delete a reminder.
    pub async fn delete(&self, id: i32) -> Envelope {
        match self.deactivate(id).await {
            Ok(reminder) => Envelope::success(format!("Reminder '{}' deleted successfully", reminder.title)),
            Err(e) => e.into_envelope("delete reminder"),
        }
    }

    /// Case-insensitive search over title and description of active reminders.
    pub async fn search(&self, query: &str) -> Envelope {
        match self.find_matching(query).await {
            Ok(reminders) => Envelope::success_with(
                format!("Found {} matching reminders", reminders.len()),
                Payload::Reminders(reminders),
            ),
            Err(e) => e.into_envelope("search reminders"),
        }
    }

    async fn insert(&self, title: &str, description: &str, remind_time: DateTime) -> StoreResult<reminder::Model> {
        require_text(title, ERROR_TITLE_REQUIRED)?;
        require_text(description, ERROR_DESCRIPTION_REQUIRED)?;
        check_title_length(title)?;

        let mut active = reminder::ActiveModel::new();
        active.title = ActiveValue::Set(title.to_string());
        active.description = ActiveValue::Set(description.to_string());
        active.remind_time = ActiveValue::Set(remind_time);

        let txn = self.session.begin().await?;
        let outcome = active.insert(&txn).await.map_err(StoreError::from);
        Session::finish(txn, outcome).await
    }

    async fn apply_update(&self, id: i32, changes: ReminderChanges) -> StoreResult<reminder::Model> {
        if let Some(title) = supplied(changes.title.as_deref()) {
            check_title_length(title)?;
        }

        let txn = self.session.begin().await?;
        let outcome = Self::update_in(&txn, id, changes).await;
        Session::finish(txn, outcome).await
    }

    async fn deactivate(&self, id: i32) -> StoreResult<reminder::Model> {
        let txn = self.session.begin().await?;
        let outcome = Self::deactivate_in(&txn, id).await;
        Session::finish(txn, outcome).await
    }

    async fn update_in<C>(conn: &C, id: i32, changes: ReminderChanges) -> StoreResult<reminder::Model>
    where
        C: ConnectionTrait,
    {
        let existing = Self::find_existing(conn, id).await?;
        let mut active: reminder::ActiveModel = existing.clone().into();

        if let Some(title) = supplied(changes.title.as_deref()) {
            active.title = ActiveValue::Set(title.to_string());
        }
        if let Some(description) = supplied(changes.description.as_deref()) {
            active.description = ActiveValue::Set(description.to_string());
        }
        if let Some(remind_time) = changes.remind_time {
            active.remind_time = ActiveValue::Set(remind_time);
        }

        if !active.is_changed() {
            return Ok(existing);
        }
        Ok(active.update(conn).await?)
    }

    async fn deactivate_in<C>(conn: &C, id: i32) -> StoreResult<reminder::Model>
    where
        C: ConnectionTrait,
    {
        let existing = Self::find_existing(conn, id).await?;
        let mut active: reminder::ActiveModel = existing.into();
        active.is_active = ActiveValue::Set(false);
        Ok(active.update(conn).await?)
    }

    async fn find_matching(&self, query: &str) -> StoreResult<Vec<reminder::Model>> {
        let conn = self.session.connection();

        if !sql_lower_folds_unicode(conn.get_database_backend()) {
            let needle = query.to_lowercase();
            let mut reminders = Self::find_active(conn).await?;
            reminders.retain(|r| contains_folded(&r.title, &needle) || contains_folded(&r.description, &needle));
            return Ok(reminders);
        }

        Ok(reminder::Entity::find()
            .filter(reminder::Column::IsActive.eq(true))
            .filter(
                contains_ignore_case(reminder::Column::Title, query)
                    .or(contains_ignore_case(reminder::Column::Description, query)),
            )
            .order_by_asc(reminder::Column::Id)
            .all(conn)
            .await?)
    }

    async fn find_active<C>(conn: &C) -> StoreResult<Vec<reminder::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(reminder::Entity::find()
            .filter(reminder::Column::IsActive.eq(true))
            .order_by_asc(reminder::Column::Id)
            .all(conn)
            .await?)
    }

    async fn find_existing<C>(conn: &C, id: i32) -> StoreResult<reminder::Model>
    where
        C: ConnectionTrait,
    {
        reminder::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or_else(|| StoreError::reminder_not_found(id))
    }
}
