//! Todo repository for database operations.
//!
//! Unlike reminders, todo items are hard-deleted. Status changes keep
//! `completed_at` in step through the entity's active model behavior.

use sea_orm::prelude::Date;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;

use super::{
    check_title_length, contains_folded, contains_ignore_case, require_text, sql_lower_folds_unicode, supplied,
};
use crate::constants::{ERROR_INVALID_FILTER, ERROR_TITLE_REQUIRED};
use crate::entities::todo::{self, Priority, Status};
use crate::envelope::{Envelope, Payload};
use crate::error::{StoreError, StoreResult};
use crate::storage::Session;

/// Live counts over the todo table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TodoStatistics {
    pub total: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub high_priority: u64,
    pub medium_priority: u64,
    pub low_priority: u64,
}

/// Partial update for a todo item.
///
/// Same rule as reminders: empty strings are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<Date>,
}

/// Validated form of [`TodoChanges`].
struct ParsedChanges {
    title: Option<String>,
    description: Option<String>,
    priority: Option<Priority>,
    status: Option<Status>,
    due_date: Option<Date>,
}

/// Repository for todo-related database operations.
pub struct TodoRepository<'a> {
    session: &'a Session,
    default_priority: Priority,
}

impl<'a> TodoRepository<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            default_priority: Priority::default(),
        }
    }

    /// Priority used by [`add`](Self::add) when none is given.
    pub fn with_default_priority(mut self, priority: Priority) -> Self {
        self.default_priority = priority;
        self
    }

    /// Add a new todo item.
    pub async fn add(
        &self,
        title: &str,
        description: Option<&str>,
        priority: Option<&str>,
        due_date: Option<Date>,
    ) -> Envelope {
        match self.insert(title, description, priority, due_date).await {
            Ok(todo) => Envelope::success_with(
                format!("Todo item '{}' added successfully", todo.title),
                Payload::Todo(todo),
            ),
            Err(e) => e.into_envelope("add todo item"),
        }
    }

    /// List todo items, optionally narrowed by status and priority.
    pub async fn list(&self, filter_status: Option<&str>, filter_priority: Option<&str>) -> Envelope {
        match self.find_filtered(filter_status, filter_priority).await {
            Ok(todos) => Envelope::success_with(format!("Found {} todo items", todos.len()), Payload::Todos(todos)),
            Err(e) => e.into_envelope("list todo items"),
        }
    }

    /// Get a todo item by id.
    pub async fn get(&self, id: i32) -> Envelope {
        match Self::find_existing(self.session.connection(), id).await {
            Ok(todo) => Envelope::success_with(format!("Todo item {} retrieved successfully", id), Payload::Todo(todo)),
            Err(e) => e.into_envelope("get todo item"),
        }
    }

    /// Apply a partial update.
    pub async fn update(&self, id: i32, changes: TodoChanges) -> Envelope {
        match self.apply_update(id, changes).await {
            Ok(todo) => Envelope::success_with(format!("Todo item {} updated successfully", id), Payload::Todo(todo)),
            Err(e) => e.into_envelope("update todo item"),
        }
    }

    /// Permanently remove a todo item.
    pub async fn delete(&self, id: i32) -> Envelope {
        match self.remove(id).await {
            Ok(title) => Envelope::success(format!("Todo item '{}' deleted successfully", title)),
            Err(e) => e.into_envelope("delete todo item"),
        }
    }

    /// Case-insensitive search over title and description.
    pub async fn search(&self, query: &str) -> Envelope {
        match self.find_matching(query).await {
            Ok(todos) => Envelope::success_with(
                format!("Found {} matching todo items", todos.len()),
                Payload::Todos(todos),
            ),
            Err(e) => e.into_envelope("search todo items"),
        }
    }

    /// Count todo items by status and priority.
    pub async fn statistics(&self) -> Envelope {
        match self.count_all().await {
            Ok(stats) => Envelope::success_with("Todo statistics retrieved successfully", Payload::Statistics(stats)),
            Err(e) => e.into_envelope("get todo statistics"),
        }
    }

    async fn insert(
        &self,
        title: &str,
        description: Option<&str>,
        priority: Option<&str>,
        due_date: Option<Date>,
    ) -> StoreResult<todo::Model> {
        require_text(title, ERROR_TITLE_REQUIRED)?;
        check_title_length(title)?;
        let priority = match supplied(priority) {
            Some(value) => value.parse::<Priority>()?,
            None => self.default_priority,
        };

        let mut active = todo::ActiveModel::new();
        active.title = ActiveValue::Set(title.to_string());
        active.description = ActiveValue::Set(supplied(description).map(str::to_string));
        active.priority = ActiveValue::Set(priority);
        active.due_date = ActiveValue::Set(due_date);
        active.completed_at = ActiveValue::Set(None);

        let txn = self.session.begin().await?;
        let outcome = active.insert(&txn).await.map_err(StoreError::from);
        Session::finish(txn, outcome).await
    }

    async fn find_filtered(
        &self,
        filter_status: Option<&str>,
        filter_priority: Option<&str>,
    ) -> StoreResult<Vec<todo::Model>> {
        let status = parse_filter::<Status>(filter_status)?;
        let priority = parse_filter::<Priority>(filter_priority)?;

        let mut query = todo::Entity::find();
        if let Some(status) = status {
            query = query.filter(todo::Column::Status.eq(status));
        }
        if let Some(priority) = priority {
            query = query.filter(todo::Column::Priority.eq(priority));
        }

        Ok(query
            .order_by_asc(todo::Column::Id)
            .all(self.session.connection())
            .await?)
    }

    async fn find_matching(&self, query: &str) -> StoreResult<Vec<todo::Model>> {
        let conn = self.session.connection();
        let select = todo::Entity::find().order_by_asc(todo::Column::Id);

        if !sql_lower_folds_unicode(conn.get_database_backend()) {
            let needle = query.to_lowercase();
            let mut todos = select.all(conn).await?;
            todos.retain(|t| {
                contains_folded(&t.title, &needle)
                    || t.description.as_deref().is_some_and(|d| contains_folded(d, &needle))
            });
            return Ok(todos);
        }

        Ok(select
            .filter(
                contains_ignore_case(todo::Column::Title, query)
                    .or(contains_ignore_case(todo::Column::Description, query)),
            )
            .all(conn)
            .await?)
    }

    async fn apply_update(&self, id: i32, changes: TodoChanges) -> StoreResult<todo::Model> {
        let parsed = ParsedChanges::parse(changes)?;

        let txn = self.session.begin().await?;
        let outcome = Self::update_in(&txn, id, parsed).await;
        Session::finish(txn, outcome).await
    }

    async fn remove(&self, id: i32) -> StoreResult<String> {
        let txn = self.session.begin().await?;
        let outcome = Self::remove_in(&txn, id).await;
        Session::finish(txn, outcome).await
    }

    async fn update_in<C>(conn: &C, id: i32, changes: ParsedChanges) -> StoreResult<todo::Model>
    where
        C: ConnectionTrait,
    {
        let existing = Self::find_existing(conn, id).await?;
        let mut active: todo::ActiveModel = existing.clone().into();

        if let Some(title) = changes.title {
            active.title = ActiveValue::Set(title);
        }
        if let Some(description) = changes.description {
            active.description = ActiveValue::Set(Some(description));
        }
        if let Some(priority) = changes.priority {
            active.priority = ActiveValue::Set(priority);
        }
        if let Some(status) = changes.status {
            active.status = ActiveValue::Set(status);
        }
        if let Some(due_date) = changes.due_date {
            active.due_date = ActiveValue::Set(Some(due_date));
        }

        if !active.is_changed() {
            return Ok(existing);
        }
        Ok(active.update(conn).await?)
    }

    async fn remove_in<C>(conn: &C, id: i32) -> StoreResult<String>
    where
        C: ConnectionTrait,
    {
        let existing = Self::find_existing(conn, id).await?;
        let title = existing.title.clone();
        existing.delete(conn).await?;
        Ok(title)
    }

    async fn count_all(&self) -> StoreResult<TodoStatistics> {
        let conn = self.session.connection();
        Ok(TodoStatistics {
            total: todo::Entity::find().count(conn).await?,
            pending: count_where(conn, todo::Column::Status.eq(Status::Pending)).await?,
            in_progress: count_where(conn, todo::Column::Status.eq(Status::InProgress)).await?,
            completed: count_where(conn, todo::Column::Status.eq(Status::Completed)).await?,
            high_priority: count_where(conn, todo::Column::Priority.eq(Priority::High)).await?,
            medium_priority: count_where(conn, todo::Column::Priority.eq(Priority::Medium)).await?,
            low_priority: count_where(conn, todo::Column::Priority.eq(Priority::Low)).await?,
        })
    }

    async fn find_existing<C>(conn: &C, id: i32) -> StoreResult<todo::Model>
    where
        C: ConnectionTrait,
    {
        todo::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or_else(|| StoreError::todo_not_found(id))
    }
}

impl ParsedChanges {
    /// Reject out-of-set enum values before anything is written.
    fn parse(changes: TodoChanges) -> StoreResult<Self> {
        let title = supplied(changes.title.as_deref()).map(str::to_string);
        if let Some(title) = &title {
            check_title_length(title)?;
        }

        Ok(Self {
            title,
            description: supplied(changes.description.as_deref()).map(str::to_string),
            priority: supplied(changes.priority.as_deref())
                .map(str::parse::<Priority>)
                .transpose()?,
            status: supplied(changes.status.as_deref()).map(str::parse::<Status>).transpose()?,
            due_date: changes.due_date,
        })
    }
}

/// Parse an optional filter value; empty means no filter.
fn parse_filter<T>(value: Option<&str>) -> StoreResult<Option<T>>
where
    T: std::str::FromStr,
{
    match supplied(value) {
        Some(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|_| StoreError::validation(ERROR_INVALID_FILTER)),
        None => Ok(None),
    }
}

async fn count_where<C>(conn: &C, condition: sea_orm::sea_query::SimpleExpr) -> StoreResult<u64>
where
    C: ConnectionTrait,
{
    Ok(todo::Entity::find().filter(condition).count(conn).await?)
}
