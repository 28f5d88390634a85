//! Terminal UI
//!
//! Design tokens, capability detection and the report views. All terminal
//! styling goes through this module so the data pipeline stays print-free.

pub mod terminal;
pub mod theme;
pub mod views;

pub use terminal::{detect_capabilities, TerminalCapabilities};
