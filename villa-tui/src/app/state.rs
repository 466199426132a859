//! Application state
//!
//! Single source of truth for the TUI. All transitions happen through the
//! reducer (see `reducer.rs`).

use std::time::Instant;

use libvillastay::schema::{Booking, MessageEntry, ReviewCategory, ThreadEntry};
use libvillastay::service::inbox::{InboxTab, MessageHistory, ThreadPhase};
use libvillastay::service::review::{ReviewForm, ReviewPhase};
use libvillastay::config::UiSettings;
use libvillastay::{NotificationQueue, ScreenSize};

use super::actions::{Effect, Screen};

/// Root application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub should_quit: bool,
    pub current_screen: Screen,
    pub help_visible: bool,

    /// Error overlay
    pub error: Option<String>,

    /// Status line, used for read failures and progress
    pub status: StatusBarState,

    /// Breakpoint derived from the terminal width
    pub viewport: ScreenSize,

    /// Toasts
    pub notifications: NotificationQueue,

    pub inbox: InboxState,
    pub review: ReviewState,
    pub config: UiConfig,

    /// I/O queued by the reducer, drained by the event loop
    pub effects: Vec<Effect>,
}

/// Which inbox widget receives keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InboxFocus {
    #[default]
    Threads,
    Compose,
}

/// Inbox route state
#[derive(Debug, Clone, Default)]
pub struct InboxState {
    pub tab: InboxTab,
    pub threads: Vec<ThreadEntry>,
    pub threads_loading: bool,
    pub cursor: usize,

    /// Booking id of the open thread
    pub selected: Option<String>,
    pub history: Option<MessageHistory>,
    pub phase: ThreadPhase,

    pub draft: String,
    pub focus: InboxFocus,

    /// Lines scrolled up from the newest message; 0 = pinned to bottom
    pub scroll: usize,
}

impl InboxState {
    pub fn selected_thread(&self) -> Option<&ThreadEntry> {
        let selected = self.selected.as_deref()?;
        self.threads.iter().find(|t| t.booking_id == selected)
    }

    pub fn thread_under_cursor(&self) -> Option<&ThreadEntry> {
        self.threads.get(self.cursor)
    }

    /// Loaded messages, oldest first
    pub fn messages(&self) -> Vec<MessageEntry> {
        self.history
            .as_ref()
            .map(MessageHistory::messages)
            .unwrap_or_default()
    }

    /// Height of the conversation pane's content: the history marker, then
    /// a header line plus the body lines for each message
    pub fn conversation_lines(&self) -> usize {
        let messages = self.messages();
        if messages.is_empty() {
            return 2;
        }
        1 + messages
            .iter()
            .map(|m| 1 + m.body.lines().count())
            .sum::<usize>()
    }

    pub fn can_send(&self) -> bool {
        self.phase == ThreadPhase::Loaded && !self.draft.trim().is_empty()
    }
}

/// Focusable review form fields, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewField {
    Rating(ReviewCategory),
    Content,
    Photos,
}

impl ReviewField {
    const ORDER: [ReviewField; 7] = [
        ReviewField::Rating(ReviewCategory::Accuracy),
        ReviewField::Rating(ReviewCategory::Cleanliness),
        ReviewField::Rating(ReviewCategory::Communication),
        ReviewField::Rating(ReviewCategory::Location),
        ReviewField::Rating(ReviewCategory::Value),
        ReviewField::Content,
        ReviewField::Photos,
    ];

    fn position(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ReviewField::Content | ReviewField::Photos)
    }
}

impl Default for ReviewField {
    fn default() -> Self {
        ReviewField::Rating(ReviewCategory::Accuracy)
    }
}

/// Review route state
#[derive(Debug, Clone, Default)]
pub struct ReviewState {
    pub booking_id: Option<String>,
    pub booking: Option<Booking>,
    pub loading: bool,
    pub form: ReviewForm,
    pub phase: ReviewPhase,
    pub field: ReviewField,
    pub confirmed_at: Option<Instant>,
}

impl ReviewState {
    pub fn can_submit(&self) -> bool {
        self.booking.is_some() && self.phase.can_submit(&self.form)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusBarState {
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub colors_enabled: bool,
    pub tick_rate_ms: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            should_quit: false,
            current_screen: Screen::Inbox,
            help_visible: false,
            error: None,
            status: StatusBarState::default(),
            viewport: ScreenSize::default(),
            notifications: NotificationQueue::default(),
            inbox: InboxState::default(),
            review: ReviewState::default(),
            config: UiConfig::default(),
            effects: Vec::new(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self::from_settings(&UiSettings::default())
    }
}

impl UiConfig {
    /// `[ui]` section of the config file, plus NO_COLOR from the environment
    pub fn from_settings(settings: &UiSettings) -> Self {
        Self {
            colors_enabled: std::env::var("NO_COLOR").is_err(),
            tick_rate_ms: settings.tick_rate_ms.max(1),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: UiConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Take the effects queued since the last call
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// True while a text widget should receive plain keystrokes
    pub fn is_typing(&self) -> bool {
        if self.help_visible || self.error.is_some() {
            return false;
        }
        match self.current_screen {
            Screen::Inbox => {
                self.inbox.focus == InboxFocus::Compose && self.inbox.selected.is_some()
            }
            Screen::Review => self.review.phase.is_editable() && self.review.field.is_text(),
            Screen::Trips => false,
        }
    }
}
