//! Reminder entity.
//!
//! Reminders are never physically removed by the store: deleting one flips
//! `is_active` to false and the row stays retrievable by id.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

use crate::utils::datetime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reminders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(255))", indexed)]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(indexed)]
    #[serde(with = "datetime::timestamp")]
    pub remind_time: DateTime,
    #[serde(with = "datetime::timestamp")]
    pub created_at: DateTime,
    #[sea_orm(indexed)]
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            created_at: ActiveValue::Set(datetime::now()),
            is_active: ActiveValue::Set(true),
            ..ActiveModelTrait::default()
        }
    }
}
