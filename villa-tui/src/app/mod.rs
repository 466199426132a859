//! Application module
//!
//! - Actions: what can happen, and the I/O the reducer asks for
//! - State: what is true right now
//! - Reducer: pure function (State, Action) -> State

pub mod actions;
pub mod event;
pub mod reducer;
pub mod state;

pub use actions::{Action, Effect, Screen};
pub use reducer::reduce;
pub use state::{AppState, InboxFocus, InboxState, ReviewField, ReviewState, StatusBarState, UiConfig};
