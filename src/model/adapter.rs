// File: ./src/model/adapter.rs
// Handles JSON blob serialization/deserialization
use crate::model::item::{DEFAULT_CATEGORY, Priority, Task, new_id};
use crate::model::state::AppState;
use chrono::NaiveDate;
use serde_json::Value;

impl AppState {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a stored blob. Never fails: anything unreadable falls back to
    /// the default for that field, and a blob that is not JSON at all yields
    /// the default state.
    pub fn from_json(raw: &str, today: NaiveDate) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(&value, today),
            Err(e) => {
                log::warn!("Could not parse stored state, resetting: {}", e);
                Self::new(today)
            }
        }
    }

    pub fn from_value(value: &Value, today: NaiveDate) -> Self {
        let mut state = Self::new(today);
        let Some(obj) = value.as_object() else {
            log::warn!("Stored state is not an object, resetting");
            return state;
        };

        if let Some(items) = obj.get("tasks").and_then(Value::as_array) {
            let before = items.len();
            state.tasks = items.iter().filter_map(Task::from_value).collect();
            let dropped = before - state.tasks.len();
            if dropped > 0 {
                log::warn!("Discarded {} malformed stored task(s)", dropped);
            }
        }

        state.points = obj.get("points").map(parse_points).unwrap_or(0);
        state.show_history = obj.get("showHistory").is_some_and(is_truthy);
        state.dark_mode = obj.get("darkMode").is_some_and(is_truthy);

        if let Some(date) = obj
            .get("selectedDate")
            .and_then(Value::as_str)
            .and_then(parse_day)
        {
            state.selected_date = date;
        }

        state
    }
}

impl Task {
    /// Rebuilds one stored task. Returns `None` when the entry has nothing
    /// worth showing (no text or no usable day).
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let text = obj.get("text").and_then(Value::as_str)?.trim();
        if text.is_empty() {
            return None;
        }
        let date = obj.get("date").and_then(Value::as_str).and_then(parse_day)?;

        let id = match obj.get("id").and_then(Value::as_str) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => new_id(),
        };
        let category = match obj.get("category").and_then(Value::as_str) {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            _ => DEFAULT_CATEGORY.to_string(),
        };
        let priority = obj
            .get("priority")
            .and_then(Value::as_str)
            .and_then(Priority::parse)
            .unwrap_or_default();
        let completed = obj.get("completed").is_some_and(is_truthy);
        let created_at = obj
            .get("createdAt")
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
            .unwrap_or(0);

        Some(Task {
            id,
            text: text.to_string(),
            date,
            category,
            priority,
            completed,
            created_at,
        })
    }
}

pub fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

fn parse_points(v: &Value) -> u64 {
    if let Some(n) = v.as_u64() {
        return n;
    }
    match v.as_f64() {
        Some(f) if f.is_finite() && f > 0.0 => f.floor() as u64,
        _ => 0,
    }
}

// JavaScript-style truthiness, which is what older blobs were written against.
fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn garbage_blob_yields_default_state() {
        let s = AppState::from_json("{not json", today());
        assert_eq!(s, AppState::new(today()));

        let s = AppState::from_json("[1,2,3]", today());
        assert_eq!(s, AppState::new(today()));
    }

    #[test]
    fn invalid_fields_fall_back_one_by_one() {
        let v = json!({
            "tasks": "nope",
            "points": "12",
            "showHistory": 1,
            "selectedDate": "tomorrow",
            "darkMode": ""
        });
        let s = AppState::from_value(&v, today());
        assert!(s.tasks.is_empty());
        assert_eq!(s.points, 0);
        assert!(s.show_history);
        assert_eq!(s.selected_date, today());
        assert!(!s.dark_mode);
    }

    #[test]
    fn negative_and_fractional_points_are_clamped() {
        let s = AppState::from_value(&json!({ "points": -30 }), today());
        assert_eq!(s.points, 0);
        let s = AppState::from_value(&json!({ "points": 25.9 }), today());
        assert_eq!(s.points, 25);
    }

    #[test]
    fn tasks_without_text_or_date_are_dropped() {
        let v = json!({
            "tasks": [
                { "id": "a", "text": "ok", "date": "2024-03-10" },
                { "id": "b", "text": "   ", "date": "2024-03-10" },
                { "id": "c", "text": "no day" },
                { "id": "d", "text": "bad day", "date": "10/03/2024" },
                42
            ]
        });
        let s = AppState::from_value(&v, today());
        assert_eq!(s.tasks.len(), 1);
        assert_eq!(s.tasks[0].id, "a");
    }

    #[test]
    fn task_fields_default_when_malformed() {
        let v = json!({
            "text": "water plants",
            "date": "2024-03-10",
            "category": 7,
            "priority": "Urgent",
            "completed": "yes",
            "createdAt": "soon"
        });
        let t = Task::from_value(&v).unwrap();
        assert!(!t.id.is_empty());
        assert_eq!(t.category, DEFAULT_CATEGORY);
        assert_eq!(t.priority, Priority::Low);
        assert!(t.completed);
        assert_eq!(t.created_at, 0);
    }

    #[test]
    fn well_formed_blob_round_trips() {
        let mut s = AppState::new(today());
        s.points = 30;
        s.dark_mode = true;
        let mut t = Task::new("stretch", today(), "Health", Priority::High);
        t.completed = true;
        s.tasks.push(t);

        let raw = s.to_json().unwrap();
        let back = AppState::from_json(&raw, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert_eq!(back, s);
    }
}
