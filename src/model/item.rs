// File: ./src/model/item.rs
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    /// Sort weight. Higher ranks are listed first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Low" => Some(Priority::Low),
            "Medium" => Some(Priority::Medium),
            "High" => Some(Priority::High),
            _ => None,
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub date: NaiveDate,
    pub category: String,
    pub priority: Priority,
    pub completed: bool,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

impl Task {
    pub fn new(text: &str, date: NaiveDate, category: &str, priority: Priority) -> Self {
        let category = match category.trim() {
            "" => DEFAULT_CATEGORY.to_string(),
            c => c.to_string(),
        };
        Self {
            id: new_id(),
            text: text.trim().to_string(),
            date,
            category,
            priority,
            completed: false,
            created_at: Utc::now().timestamp_millis(),
        }
    }
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_ranks_high_above_low() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
    }

    #[test]
    fn priority_parse_is_exact_on_names() {
        assert_eq!(Priority::parse("High"), Some(Priority::High));
        assert_eq!(Priority::parse(" Medium "), Some(Priority::Medium));
        assert_eq!(Priority::parse("urgent"), None);
        assert_eq!(Priority::parse("high"), None);
    }

    #[test]
    fn new_task_defaults_blank_category() {
        let d = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let t = Task::new("  buy milk ", d, "  ", Priority::Medium);
        assert_eq!(t.text, "buy milk");
        assert_eq!(t.category, DEFAULT_CATEGORY);
        assert!(!t.completed);
        assert_ne!(t.id, Task::new("x", d, "Work", Priority::Low).id);
    }

    #[test]
    fn task_serializes_with_camel_case_fields() {
        let d = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut t = Task::new("read", d, "Study", Priority::High);
        t.created_at = 42;
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["createdAt"], 42);
        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["priority"], "High");
        assert_eq!(json["completed"], false);
    }
}
