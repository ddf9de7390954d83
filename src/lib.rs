// File: ./src/lib.rs
pub mod cli;
pub mod color_utils;
pub mod confetti;
pub mod config;
pub mod logging;
pub mod model;
pub mod paths;
pub mod storage;
pub mod store;
#[cfg(feature = "tui")]
pub mod tui;
