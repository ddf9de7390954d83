// File: ./src/store.rs
//! Pure state transitions and the derived per-day view.
//!
//! Every change goes through [`update`], which takes the current
//! [`AppState`] by value and hands back the next one together with the
//! side effects the caller should run (persisting, celebrating).
use crate::model::{AppState, Priority, Task};
use crate::model::item::new_id;
use chrono::{NaiveDate, Utc};
use std::fmt;

/// Points granted per completion and taken back on un-completion.
pub const REWARD_POINTS: u64 = 10;

/// Input for a new task. `id` and `created_at` are stamped by
/// [`TaskDraft::new`]; tests may set them explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub id: String,
    pub text: String,
    pub category: String,
    pub priority: Priority,
    pub created_at: i64,
}

impl TaskDraft {
    pub fn new(text: &str, category: &str, priority: Priority) -> Self {
        Self {
            id: new_id(),
            text: text.to_string(),
            category: category.to_string(),
            priority,
            created_at: Utc::now().timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddTask(TaskDraft),
    EditTask { id: String, text: String },
    ToggleComplete(String),
    DeleteTask(String),
    SelectDate(NaiveDate),
    ToggleHistory,
    ToggleDarkMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Persist,
    Celebrate,
}

#[derive(Debug)]
pub struct Transition {
    pub state: AppState,
    pub effects: Vec<Effect>,
}

impl Transition {
    pub fn celebrates(&self) -> bool {
        self.effects.contains(&Effect::Celebrate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    EmptyText,
    TaskNotFound(String),
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateError::EmptyText => write!(f, "Task text cannot be empty"),
            UpdateError::TaskNotFound(id) => write!(f, "Task not found: {}", id),
        }
    }
}

impl std::error::Error for UpdateError {}

/// Applies one command. On error the caller keeps its previous state.
pub fn update(mut state: AppState, cmd: Command) -> Result<Transition, UpdateError> {
    let mut effects = vec![Effect::Persist];

    match cmd {
        Command::AddTask(draft) => {
            let task = Task {
                id: draft.id,
                created_at: draft.created_at,
                ..Task::new(
                    &draft.text,
                    state.selected_date,
                    &draft.category,
                    draft.priority,
                )
            };
            if task.text.is_empty() {
                return Err(UpdateError::EmptyText);
            }
            state.tasks.push(task);
        }
        Command::EditTask { id, text } => {
            let text = text.trim();
            if text.is_empty() {
                return Err(UpdateError::EmptyText);
            }
            let task = find_mut(&mut state, &id)?;
            task.text = text.to_string();
        }
        Command::ToggleComplete(id) => {
            let task = find_mut(&mut state, &id)?;
            task.completed = !task.completed;
            if task.completed {
                state.points = state.points.saturating_add(REWARD_POINTS);
                effects.push(Effect::Celebrate);
            } else {
                state.points = state.points.saturating_sub(REWARD_POINTS);
            }
        }
        Command::DeleteTask(id) => {
            let idx = state
                .tasks
                .iter()
                .position(|t| t.id == id)
                .ok_or(UpdateError::TaskNotFound(id))?;
            let removed = state.tasks.remove(idx);
            if removed.completed {
                state.points = state.points.saturating_sub(REWARD_POINTS);
            }
        }
        Command::SelectDate(date) => state.selected_date = date,
        Command::ToggleHistory => state.show_history = !state.show_history,
        Command::ToggleDarkMode => state.dark_mode = !state.dark_mode,
    }

    Ok(Transition { state, effects })
}

fn find_mut<'a>(state: &'a mut AppState, id: &str) -> Result<&'a mut Task, UpdateError> {
    state
        .tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| UpdateError::TaskNotFound(id.to_string()))
}

/// What the list shows for the selected day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayView {
    pub tasks: Vec<Task>,
    pub progress: u16,
    pub empty_message: Option<&'static str>,
}

impl DayView {
    pub fn build(state: &AppState) -> Self {
        let mut tasks: Vec<Task> = tasks_for_day(state, state.selected_date)
            .filter(|t| state.show_history || !t.completed)
            .cloned()
            .collect();
        // Stable, so equal timestamps keep their insertion order.
        tasks.sort_by(|a, b| {
            b.priority
                .rank()
                .cmp(&a.priority.rank())
                .then(a.created_at.cmp(&b.created_at))
        });

        let empty_message = if tasks.is_empty() {
            Some(if state.show_history {
                "No tasks in history for this date."
            } else {
                "No tasks for this date. Add one!"
            })
        } else {
            None
        };

        Self {
            tasks,
            progress: day_progress(state),
            empty_message,
        }
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }
}

pub fn tasks_for_day(state: &AppState, day: NaiveDate) -> impl Iterator<Item = &Task> {
    state.tasks.iter().filter(move |t| t.date == day)
}

/// Percentage of the selected day's tasks that are done, history filter
/// notwithstanding. Zero for an empty day.
pub fn day_progress(state: &AppState) -> u16 {
    let (done, total) = tasks_for_day(state, state.selected_date)
        .fold((0usize, 0usize), |(d, n), t| (d + t.completed as usize, n + 1));
    if total == 0 {
        return 0;
    }
    ((done as f64 / total as f64) * 100.0).round() as u16
}
