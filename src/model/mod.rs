// File: ./src/model/mod.rs
pub mod adapter;
pub mod item;
pub mod state;

pub use item::{DEFAULT_CATEGORY, Priority, Task};
pub use state::AppState;
