//! Task list search and category filters.

use chrono::{DateTime, Utc};
use crm_api_models::{Task, TaskPriority, TaskStatus};

/// Category tabs above the task table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TaskFilter {
    /// Every task.
    #[default]
    All,
    /// Deadline falls on the current day.
    DueToday,
    /// Deadline passed and the task is not completed.
    Overdue,
    /// High priority only.
    HighPriority,
    /// Status is "In Progress".
    InProgress,
    /// Status is "Completed".
    Completed,
}

impl TaskFilter {
    /// Tabs in display order.
    pub const ALL: [Self; 6] = [
        Self::All,
        Self::DueToday,
        Self::Overdue,
        Self::HighPriority,
        Self::InProgress,
        Self::Completed,
    ];

    /// Tab caption.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::DueToday => "Due Today",
            Self::Overdue => "Overdue",
            Self::HighPriority => "High Priority",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Whether `task` belongs in this bucket at instant `now`.
    #[must_use]
    pub fn matches(self, task: &Task, now: DateTime<Utc>) -> bool {
        match self {
            Self::All => true,
            Self::DueToday => task
                .deadline
                .is_some_and(|deadline| deadline.date_naive() == now.date_naive()),
            Self::Overdue => {
                task.status != TaskStatus::Completed
                    && task.deadline.is_some_and(|deadline| deadline < now)
            }
            Self::HighPriority => task.priority == TaskPriority::High,
            Self::InProgress => task.status == TaskStatus::InProgress,
            Self::Completed => task.status == TaskStatus::Completed,
        }
    }
}

/// Case-insensitive substring match on subject, status and owner name.
#[must_use]
pub fn matches_search(task: &Task, term: &str) -> bool {
    let term = term.to_lowercase();
    if term.is_empty() {
        return true;
    }
    task.subject.to_lowercase().contains(&term)
        || task.status.label().to_lowercase().contains(&term)
        || task
            .owner_name
            .as_deref()
            .is_some_and(|owner| owner.to_lowercase().contains(&term))
}

/// Tasks passing both the search box and the active tab, in input order.
#[must_use]
pub fn visible_tasks(tasks: &[Task], term: &str, filter: TaskFilter, now: DateTime<Utc>) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| matches_search(task, term) && filter.matches(task, now))
        .cloned()
        .collect()
}
