use super::{hh_mm, wire_enum};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uti_ids::RecordId;

/// Task progress. Only ever moves forward: pending, then in-progress, then completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

wire_enum!(TaskStatus {
    Pending => "pending",
    InProgress => "in-progress",
    Completed => "completed",
});

impl TaskStatus {
    /// The following status, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            TaskStatus::Pending => Some(TaskStatus::InProgress),
            TaskStatus::InProgress => Some(TaskStatus::Completed),
            TaskStatus::Completed => None,
        }
    }

    /// Whether moving from `self` to `to` keeps the task moving forward.
    ///
    /// Staying on the same status is allowed and changes nothing.
    pub fn can_move_to(self, to: Self) -> bool {
        to >= self
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pendente",
            TaskStatus::InProgress => "Em andamento",
            TaskStatus::Completed => "Concluída",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

wire_enum!(TaskPriority {
    High => "high",
    Medium => "medium",
    Low => "low",
});

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub patient_id: RecordId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assigned_to: String,
    #[serde(with = "hh_mm")]
    pub due_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_only_moves_forward() {
        assert!(TaskStatus::Pending.can_move_to(TaskStatus::InProgress));
        assert!(TaskStatus::Pending.can_move_to(TaskStatus::Completed));
        assert!(TaskStatus::InProgress.can_move_to(TaskStatus::InProgress));
        assert!(!TaskStatus::Completed.can_move_to(TaskStatus::Pending));
        assert!(!TaskStatus::InProgress.can_move_to(TaskStatus::Pending));
        assert_eq!(TaskStatus::Completed.next(), None);
    }

    #[test]
    fn status_wire_name_is_kebab_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!("in-progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
    }
}
