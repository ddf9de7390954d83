use crate::model::AppState;

/// Requests from the UI loop to the storage worker.
#[derive(Debug)]
pub enum Action {
    // Persistence
    /// `seq` grows by one per snapshot so acks can be matched to the latest.
    Persist { seq: u64, snapshot: Box<AppState> },

    // Lifecycle
    Quit,
}

/// Reports from the storage worker back to the UI loop.
#[derive(Debug, PartialEq)]
pub enum AppEvent {
    Saved(u64),
    Error(String),
}
