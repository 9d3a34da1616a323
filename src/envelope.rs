//! Result envelope returned by every repository and tool operation.
//!
//! The calling layer parses the JSON form directly, so the shape is fixed:
//!
//! ```json
//! {"status": "success", "message": "...", "reminder": {...}}
//! {"status": "error", "message": "..."}
//! ```
//!
//! The payload key is named after what it carries: `reminder`, `reminders`,
//! `todo`, `todos` or `statistics`.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::constants::{STATUS_ERROR, STATUS_SUCCESS};
use crate::entities::{reminder, todo};
use crate::repositories::TodoStatistics;

/// Data attached to a success envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Reminder(reminder::Model),
    Reminders(Vec<reminder::Model>),
    Todo(todo::Model),
    Todos(Vec<todo::Model>),
    Statistics(TodoStatistics),
}

impl Payload {
    /// JSON key the payload is emitted under.
    pub fn key(&self) -> &'static str {
        match self {
            Payload::Reminder(_) => "reminder",
            Payload::Reminders(_) => "reminders",
            Payload::Todo(_) => "todo",
            Payload::Todos(_) => "todos",
            Payload::Statistics(_) => "statistics",
        }
    }
}

/// Uniform success/error response.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Success { message: String, payload: Option<Payload> },
    Error { message: String },
}

impl Envelope {
    pub fn success(message: impl Into<String>) -> Self {
        Envelope::Success {
            message: message.into(),
            payload: None,
        }
    }

    pub fn success_with(message: impl Into<String>, payload: Payload) -> Self {
        Envelope::Success {
            message: message.into(),
            payload: Some(payload),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Envelope::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }

    pub fn status(&self) -> &'static str {
        if self.is_success() {
            STATUS_SUCCESS
        } else {
            STATUS_ERROR
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Envelope::Success { message, .. } | Envelope::Error { message } => message,
        }
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Envelope::Success { payload, .. } => payload.as_ref(),
            Envelope::Error { .. } => None,
        }
    }

    pub fn reminder(&self) -> Option<&reminder::Model> {
        match self.payload() {
            Some(Payload::Reminder(r)) => Some(r),
            _ => None,
        }
    }

    pub fn reminders(&self) -> Option<&[reminder::Model]> {
        match self.payload() {
            Some(Payload::Reminders(r)) => Some(r),
            _ => None,
        }
    }

    pub fn todo(&self) -> Option<&todo::Model> {
        match self.payload() {
            Some(Payload::Todo(t)) => Some(t),
            _ => None,
        }
    }

    pub fn todos(&self) -> Option<&[todo::Model]> {
        match self.payload() {
            Some(Payload::Todos(t)) => Some(t),
            _ => None,
        }
    }

    pub fn statistics(&self) -> Option<&TodoStatistics> {
        match self.payload() {
            Some(Payload::Statistics(s)) => Some(s),
            _ => None,
        }
    }

    /// Wire text with keys in emission order: `status`, `message`, payload.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                "{{\"status\":\"{}\",\"message\":{}}}",
                STATUS_ERROR,
                serde_json::Value::String(e.to_string())
            )
        })
    }

    /// JSON value in the wire shape. Object keys come back sorted.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({ "status": STATUS_ERROR, "message": e.to_string() })
        })
    }
}

impl Serialize for Envelope {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let payload = self.payload();
        let mut map = serializer.serialize_map(Some(if payload.is_some() { 3 } else { 2 }))?;
        map.serialize_entry("status", self.status())?;
        map.serialize_entry("message", self.message())?;
        if let Some(payload) = payload {
            let key = payload.key();
            match payload {
                Payload::Reminder(r) => map.serialize_entry(key, r)?,
                Payload::Reminders(r) => map.serialize_entry(key, r)?,
                Payload::Todo(t) => map.serialize_entry(key, t)?,
                Payload::Todos(t) => map.serialize_entry(key, t)?,
                Payload::Statistics(s) => map.serialize_entry(key, s)?,
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Priority, Status};
    use chrono::NaiveDate;
    use serde_json::json;

    fn sample_todo() -> todo::Model {
        todo::Model {
            id: 4,
            title: "Buy milk".to_string(),
            description: None,
            priority: Priority::High,
            status: Status::InProgress,
            due_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            created_at: NaiveDate::from_ymd_opt(2025, 2, 1)
                .and_then(|d| d.and_hms_opt(8, 30, 5))
                .unwrap(),
            completed_at: None,
        }
    }

    #[test]
    fn error_envelope_has_only_status_and_message() {
        let value = Envelope::error("Reminder with ID 9 not found").to_json();
        assert_eq!(value, json!({"status": "error", "message": "Reminder with ID 9 not found"}));
    }

    #[test]
    fn wire_text_keeps_status_first() {
        let text = Envelope::success_with("ok", Payload::Todo(sample_todo())).to_json_string();
        assert!(text.starts_with(r#"{"status":"success","message":"ok","todo":{"#));

        let error = Envelope::error("Database connection failed").to_json_string();
        assert_eq!(error, r#"{"status":"error","message":"Database connection failed"}"#);
    }

    #[test]
    fn success_without_payload_omits_payload_key() {
        let value = Envelope::success("Todo item 'x' deleted successfully").to_json();
        assert_eq!(value.as_object().unwrap().len(), 2);
        assert_eq!(value["status"], "success");
    }

    #[test]
    fn todo_payload_renders_formats_and_nulls() {
        let envelope = Envelope::success_with("ok", Payload::Todo(sample_todo()));
        let value = envelope.to_json();
        let todo = &value["todo"];
        assert_eq!(todo["priority"], "high");
        assert_eq!(todo["status"], "in_progress");
        assert_eq!(todo["due_date"], "2025-03-01");
        assert_eq!(todo["created_at"], "2025-02-01 08:30:05");
        assert!(todo.as_object().unwrap().contains_key("completed_at"));
        assert!(todo["completed_at"].is_null());
        assert!(todo["description"].is_null());
    }

    #[test]
    fn statistics_payload_key() {
        let stats = TodoStatistics {
            total: 2,
            pending: 1,
            completed: 1,
            medium_priority: 2,
            ..TodoStatistics::default()
        };
        let value = Envelope::success_with("ok", Payload::Statistics(stats)).to_json();
        assert_eq!(value["statistics"]["total"], 2);
        assert_eq!(value["statistics"]["in_progress"], 0);
        assert_eq!(value["statistics"]["medium_priority"], 2);
    }
}
