//! Repository layer for database operations.
//!
//! Each repository is bound to one [`Session`](crate::storage::Session) for its
//! lifetime and returns an [`Envelope`](crate::envelope::Envelope) from every
//! public operation. Writes run inside a transaction that is committed on
//! success and rolled back on any failure.

pub mod reminder;
pub mod todo;

pub use reminder::{ReminderChanges, ReminderRepository};
pub use todo::{TodoChanges, TodoRepository, TodoStatistics};

use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, DbBackend};

use crate::constants::TITLE_MAX_LEN;
use crate::error::{StoreError, StoreResult};

/// Case-insensitive substring match of `query` against `column`.
///
/// LIKE wildcards in the query are matched literally.
pub(crate) fn contains_ignore_case<C>(column: C, query: &str) -> SimpleExpr
where
    C: ColumnTrait,
{
    let escaped = query
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(format!("%{}%", escaped)).escape('\\'))
}

/// Whether SQL `LOWER()` folds non-ASCII letters on `backend`.
///
/// SQLite's built-in `LOWER()` only folds ASCII, so searches there are
/// matched in Rust with [`contains_folded`] instead.
pub(crate) fn sql_lower_folds_unicode(backend: DbBackend) -> bool {
    !matches!(backend, DbBackend::Sqlite)
}

/// Unicode case-insensitive substring test; `needle` is already lowercased.
pub(crate) fn contains_folded(text: &str, needle: &str) -> bool {
    text.to_lowercase().contains(needle)
}

/// Treat an empty string the same as an absent value.
pub(crate) fn supplied(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Reject blank text.
pub(crate) fn require_text<'a>(value: &'a str, message: &str) -> StoreResult<&'a str> {
    if value.trim().is_empty() {
        return Err(StoreError::validation(message));
    }
    Ok(value)
}

/// Reject titles longer than the column allows.
pub(crate) fn check_title_length(title: &str) -> StoreResult<()> {
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(StoreError::validation(format!(
            "Title must be at most {} characters",
            TITLE_MAX_LEN
        )));
    }
    Ok(())
}
