//! villa-tui library
//!
//! Exports types and modules for testing and reuse.

pub mod app;
pub mod error;
pub mod services;
pub mod terminal;
pub mod ui;

// Re-export commonly used types
pub use app::{reduce, Action, AppState, Effect, Screen};
pub use error::{Result, TuiError};
