//! Todo item entity and its closed value sets.
//!
//! `completed_at` is kept in step with `status` by the active model behavior:
//! it is non-null exactly when the status is `completed`.

use std::str::FromStr;

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

use crate::constants::{ERROR_INVALID_PRIORITY, ERROR_INVALID_STATUS};
use crate::error::StoreError;
use crate::utils::datetime;

/// Priority levels for todo items.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[sea_orm(string_value = "low")]
    Low,
    #[default]
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
}

/// Workflow states for todo items. Any state may follow any other.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in_progress",
            Status::Completed => "completed",
        }
    }
}

impl FromStr for Priority {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(StoreError::validation(ERROR_INVALID_PRIORITY)),
        }
    }
}

impl FromStr for Status {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "in_progress" => Ok(Status::InProgress),
            "completed" => Ok(Status::Completed),
            _ => Err(StoreError::validation(ERROR_INVALID_STATUS)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(255))", indexed)]
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(indexed)]
    pub priority: Priority,
    #[sea_orm(indexed)]
    pub status: Status,
    #[sea_orm(indexed)]
    #[serde(with = "datetime::option_date")]
    pub due_date: Option<Date>,
    #[serde(with = "datetime::timestamp")]
    pub created_at: DateTime,
    #[serde(with = "datetime::option_timestamp")]
    pub completed_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// Completion timestamp a todo should carry after moving to `status`.
///
/// Re-affirming `completed` keeps the original timestamp; any other status
/// clears it.
pub fn completion_timestamp(status: Status, current: Option<DateTime>, now: DateTime) -> Option<DateTime> {
    match status {
        Status::Completed => current.or(Some(now)),
        Status::Pending | Status::InProgress => None,
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            priority: ActiveValue::Set(Priority::default()),
            status: ActiveValue::Set(Status::default()),
            created_at: ActiveValue::Set(datetime::now()),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let ActiveValue::Set(status) = self.status {
            let current = match &self.completed_at {
                ActiveValue::Set(ts) | ActiveValue::Unchanged(ts) => *ts,
                ActiveValue::NotSet => None,
            };
            self.completed_at = ActiveValue::Set(completion_timestamp(status, current, datetime::now()));
        }
        Ok(self)
    }
}
