//! Task data models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task lifecycle state. Only these two values are accepted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }

    /// Parse a client-supplied status string. Anything but the two exact
    /// lowercase values is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(TaskStatus::Pending),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// A stored task. `due_date` is kept as the client-supplied string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub status: TaskStatus,
}

/// Fields for creating a task; the id is assigned server-side.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub status: TaskStatus,
}

/// Full replacement of an existing task's fields.
#[derive(Debug, Clone)]
pub struct TaskUpdate {
    pub task_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub status: TaskStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_is_exact() {
        assert_eq!(TaskStatus::parse("pending"), Some(TaskStatus::Pending));
        assert_eq!(TaskStatus::parse("completed"), Some(TaskStatus::Completed));
        assert_eq!(TaskStatus::parse("Pending"), None);
        assert_eq!(TaskStatus::parse("done"), None);
        assert_eq!(TaskStatus::parse(""), None);
    }

    #[test]
    fn task_serializes_camel_case() {
        let task = Task {
            task_id: Uuid::new_v4(),
            title: "Read Dune".to_string(),
            description: "Chapters 1-5".to_string(),
            due_date: "2026-09-01".to_string(),
            status: TaskStatus::Pending,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("taskId").is_some());
        assert!(json.get("dueDate").is_some());
        assert_eq!(json["status"], "pending");
    }
}
