use crate::model::Task;
use chrono::{Local, NaiveDate};
use serde::Serialize;

/// Everything that is persisted. One instance per process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub tasks: Vec<Task>,
    pub points: u64,
    pub show_history: bool,
    pub selected_date: NaiveDate,
    pub dark_mode: bool,
}

impl AppState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            tasks: Vec::new(),
            points: 0,
            show_history: false,
            selected_date: today,
            dark_mode: false,
        }
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}
