// File: ./src/tui/state.rs
use crate::config::Config;
use crate::confetti::ConfettiField;
use crate::model::{AppState, Priority, Task};
use crate::store::{self, Command, DayView, Effect, UpdateError};
use rand::Rng;
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

/// How long the input border stays red after a rejected submit.
pub const FLASH_DURATION: Duration = Duration::from_millis(400);
/// How long the "+10 points" toast stays up.
pub const TOAST_DURATION: Duration = Duration::from_millis(1400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Creating,
    GoToDate,
    // Task modal
    Viewing,
    EditingText,
    ConfirmDelete,
}

impl InputMode {
    pub fn is_modal(self) -> bool {
        matches!(
            self,
            InputMode::Viewing | InputMode::EditingText | InputMode::ConfirmDelete
        )
    }

    pub fn takes_text(self) -> bool {
        matches!(
            self,
            InputMode::Creating | InputMode::GoToDate | InputMode::EditingText
        )
    }
}

pub struct UiState {
    pub app: AppState,
    pub view: DayView,
    pub list_state: ListState,

    pub mode: InputMode,
    pub input_buffer: String,
    pub cursor_position: usize,
    pub categories: Vec<String>,
    pub draft_category: usize,
    pub draft_priority: Priority,
    default_category: usize,
    default_priority: Priority,

    /// Task the modal is bound to.
    pub modal_id: Option<String>,

    pub message: String,
    pub show_full_help: bool,
    pub unsaved_changes: bool,
    /// Sequence number of the last snapshot handed to the storage worker.
    persist_seq: u64,
    pub should_quit: bool,

    pub flash_until: Option<Instant>,
    pub toast_until: Option<Instant>,
    pub confetti: ConfettiField,
}

impl UiState {
    pub fn new(app: AppState, config: &Config) -> Self {
        let mut categories = config.categories.clone();
        if categories.is_empty() {
            categories.push(config.default_category.clone());
        }
        let default_category = categories
            .iter()
            .position(|c| *c == config.default_category)
            .unwrap_or(0);

        let view = DayView::build(&app);
        let mut state = Self {
            app,
            view,
            list_state: ListState::default(),
            mode: InputMode::Normal,
            input_buffer: String::new(),
            cursor_position: 0,
            categories,
            draft_category: default_category,
            draft_priority: config.default_priority,
            default_category,
            default_priority: config.default_priority,
            modal_id: None,
            message: String::new(),
            show_full_help: false,
            unsaved_changes: false,
            persist_seq: 0,
            should_quit: false,
            flash_until: None,
            toast_until: None,
            confetti: ConfettiField::new(config.confetti_particles),
        };
        state.refresh_view();
        state
    }

    /// Runs a command through the store. The previous state is kept when the
    /// command is rejected.
    pub fn dispatch(&mut self, cmd: Command) -> Result<Vec<Effect>, UpdateError> {
        let transition = store::update(self.app.clone(), cmd)?;
        self.app = transition.state;
        if transition.effects.contains(&Effect::Persist) {
            self.unsaved_changes = true;
        }
        self.refresh_view();
        Ok(transition.effects)
    }

    /// Numbers and copies the current state for the storage worker.
    pub fn snapshot(&mut self) -> (u64, Box<AppState>) {
        self.persist_seq += 1;
        (self.persist_seq, Box::new(self.app.clone()))
    }

    /// Only the ack for the newest snapshot means everything is on disk.
    pub fn mark_saved(&mut self, seq: u64) {
        if seq >= self.persist_seq {
            self.unsaved_changes = false;
        }
    }

    /// Rebuilds the visible list, keeping the selection on the same task
    /// where possible.
    pub fn refresh_view(&mut self) {
        let selected_id = self.get_selected_task().map(|t| t.id.clone());
        self.view = DayView::build(&self.app);

        let len = self.view.tasks.len();
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let idx = selected_id
            .and_then(|id| self.view.position(&id))
            .or(self.list_state.selected())
            .unwrap_or(0)
            .min(len - 1);
        self.list_state.select(Some(idx));
    }

    pub fn get_selected_task(&self) -> Option<&Task> {
        self.list_state
            .selected()
            .and_then(|idx| self.view.tasks.get(idx))
    }

    pub fn modal_task(&self) -> Option<&Task> {
        self.modal_id.as_deref().and_then(|id| self.app.find(id))
    }

    pub fn select_id(&mut self, id: &str) {
        if let Some(idx) = self.view.position(id) {
            self.list_state.select(Some(idx));
        }
    }

    // --- Navigation ---

    pub fn next(&mut self) {
        self.jump_forward(1);
    }

    pub fn previous(&mut self) {
        self.jump_backward(1);
    }

    pub fn jump_forward(&mut self, step: usize) {
        let len = self.view.tasks.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + step).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn jump_backward(&mut self, step: usize) {
        if self.view.tasks.is_empty() {
            return;
        }
        let i = self.list_state.selected().unwrap_or(0).saturating_sub(step);
        self.list_state.select(Some(i));
    }

    // --- Modal ---

    pub fn open_modal(&mut self, id: String) {
        self.modal_id = Some(id);
        self.mode = InputMode::Viewing;
        self.reset_input();
    }

    pub fn close_modal(&mut self) {
        self.modal_id = None;
        self.mode = InputMode::Normal;
        self.reset_input();
    }

    // --- New task draft ---

    pub fn start_draft(&mut self) {
        self.mode = InputMode::Creating;
        self.reset_input();
        self.draft_category = self.default_category;
        self.draft_priority = self.default_priority;
    }

    pub fn draft_category_name(&self) -> &str {
        self.categories
            .get(self.draft_category)
            .map(String::as_str)
            .unwrap_or(crate::model::DEFAULT_CATEGORY)
    }

    pub fn cycle_category(&mut self) {
        if !self.categories.is_empty() {
            self.draft_category = (self.draft_category + 1) % self.categories.len();
        }
    }

    pub fn cycle_priority(&mut self) {
        self.draft_priority = self.draft_priority.cycle();
    }

    // --- Text input ---

    fn byte_index(&self) -> usize {
        self.input_buffer
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len())
    }

    pub fn enter_char(&mut self, c: char) {
        let idx = self.byte_index();
        self.input_buffer.insert(idx, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        self.cursor_position -= 1;
        let idx = self.byte_index();
        self.input_buffer.remove(idx);
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let len = self.input_buffer.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(len);
    }

    /// Display columns between the start of the input and the cursor.
    pub fn cursor_column(&self) -> u16 {
        let width = self.input_buffer[..self.byte_index()].width();
        u16::try_from(width).unwrap_or(u16::MAX)
    }

    pub fn set_input(&mut self, text: &str) {
        self.input_buffer = text.to_string();
        self.cursor_position = self.input_buffer.chars().count();
    }

    pub fn reset_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }

    // --- Transient feedback ---

    /// The "shake" shown instead of an error dialog.
    pub fn flash(&mut self) {
        self.flash_until = Some(Instant::now() + FLASH_DURATION);
    }

    pub fn is_flashing(&self, now: Instant) -> bool {
        self.flash_until.is_some_and(|t| now < t)
    }

    pub fn celebrate<R: Rng>(&mut self, rng: &mut R) {
        self.toast_until = Some(Instant::now() + TOAST_DURATION);
        self.confetti.burst(rng);
    }

    pub fn toast_visible(&self, now: Instant) -> bool {
        self.toast_until.is_some_and(|t| now < t)
    }

    /// Whether the screen needs redrawing on a timer rather than on input.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.confetti.is_active() || self.toast_visible(now) || self.is_flashing(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TaskDraft;
    use chrono::NaiveDate;

    fn ui() -> UiState {
        let app = AppState::new(NaiveDate::from_ymd_opt(2024, 2, 2).unwrap());
        UiState::new(app, &Config::default())
    }

    fn add(ui: &mut UiState, id: &str, priority: Priority, at: i64) {
        let draft = TaskDraft {
            id: id.to_string(),
            text: id.to_string(),
            category: "Work".to_string(),
            priority,
            created_at: at,
        };
        ui.dispatch(Command::AddTask(draft)).unwrap();
    }

    #[test]
    fn cursor_edits_are_char_based() {
        let mut s = ui();
        for c in "héllo".chars() {
            s.enter_char(c);
        }
        s.move_cursor_left();
        s.move_cursor_left();
        s.delete_char();
        assert_eq!(s.input_buffer, "hélo");
        s.enter_char('L');
        assert_eq!(s.input_buffer, "héLlo");
        s.reset_input();
        assert_eq!(s.cursor_position, 0);
    }

    #[test]
    fn selection_follows_task_across_resort() {
        let mut s = ui();
        add(&mut s, "low", Priority::Low, 1);
        s.select_id("low");
        add(&mut s, "high", Priority::High, 2);
        assert_eq!(s.get_selected_task().unwrap().id, "low");
    }

    #[test]
    fn selection_clamps_when_rows_disappear() {
        let mut s = ui();
        add(&mut s, "a", Priority::Low, 1);
        add(&mut s, "b", Priority::Low, 2);
        s.jump_forward(10);
        assert_eq!(s.list_state.selected(), Some(1));
        s.dispatch(Command::DeleteTask("b".into())).unwrap();
        assert_eq!(s.list_state.selected(), Some(0));
        s.dispatch(Command::DeleteTask("a".into())).unwrap();
        assert_eq!(s.list_state.selected(), None);
    }

    #[test]
    fn rejected_command_leaves_state_alone() {
        let mut s = ui();
        add(&mut s, "a", Priority::Low, 1);
        let before = s.app.clone();
        s.unsaved_changes = false;
        let err = s.dispatch(Command::ToggleComplete("zzz".into()));
        assert!(err.is_err());
        assert_eq!(s.app, before);
        assert!(!s.unsaved_changes);
    }

    #[test]
    fn draft_starts_from_config_defaults() {
        let mut s = ui();
        s.cycle_category();
        s.cycle_priority();
        s.start_draft();
        assert_eq!(s.draft_category_name(), "General");
        assert_eq!(s.draft_priority, Priority::Low);
        s.cycle_category();
        assert_eq!(s.draft_category_name(), "Work");
    }

    #[test]
    fn cursor_column_counts_display_width() {
        let mut s = ui();
        s.set_input("日本x");
        assert_eq!(s.cursor_position, 3);
        assert_eq!(s.cursor_column(), 5);
        s.move_cursor_left();
        assert_eq!(s.cursor_column(), 4);
        s.reset_input();
        assert_eq!(s.cursor_column(), 0);
    }

    #[test]
    fn only_the_newest_ack_clears_unsaved() {
        let mut s = ui();
        add(&mut s, "a", Priority::Low, 1);
        let (first, _) = s.snapshot();
        s.dispatch(Command::ToggleHistory).unwrap();
        let (second, snap) = s.snapshot();
        assert!(second > first);
        assert!(snap.show_history);

        s.mark_saved(first);
        assert!(s.unsaved_changes);
        s.mark_saved(second);
        assert!(!s.unsaved_changes);
    }

    #[test]
    fn flash_expires() {
        let mut s = ui();
        s.flash();
        let now = Instant::now();
        assert!(s.is_flashing(now));
        assert!(!s.is_flashing(now + FLASH_DURATION + Duration::from_millis(1)));
    }
}
