//! Actions and effects for the reducer pattern
//!
//! Actions describe what happened; the reducer applies them to state.
//! Effects describe I/O the reducer wants performed; the event loop hands
//! them to the service handle, whose results come back as actions.

use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Utc};
use crossterm::event::KeyEvent;
use libvillastay::schema::{Booking, MessageEntry, ReviewCategory, ThreadEntry};
use libvillastay::service::inbox::{InboxTab, MessageHistory};
use libvillastay::service::review::ReviewForm;
use libvillastay::{Notification, PageRequest};

/// Screen/route identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Host inbox: thread list + message pane
    Inbox,

    /// Guest review form
    Review,

    /// Trips list, reached after a review is confirmed
    Trips,
}

/// Actions that trigger state transitions
#[derive(Debug, Clone)]
pub enum Action {
    // === UI Events ===
    Key(KeyEvent),
    Tick,
    Resize(u16, u16),

    // === Navigation ===
    NavigateTo(Screen),
    Quit,
    ShowHelp,
    HideHelp,

    // === Overlays and notifications ===
    ShowError(String),
    DismissError,
    SetStatus(String),
    ClearStatus,
    Notify(Notification),
    DismissNotification(u64),
    /// Drop notifications older than the toast lifetime at this instant
    ExpireNotifications(DateTime<Utc>),

    // === Inbox ===
    InboxSelectTab(InboxTab),
    InboxThreadsLoaded {
        tab: InboxTab,
        threads: Vec<ThreadEntry>,
    },
    InboxThreadsFailed {
        tab: InboxTab,
        error: String,
    },
    InboxCursorMoved(isize),
    InboxSelectThread(String),
    /// Back action on single-pane layouts
    InboxDeselect,
    InboxFocusCompose,
    InboxFocusThreads,
    InboxHistoryPageLoaded {
        booking_id: String,
        offset: usize,
        messages: Vec<MessageEntry>,
    },
    InboxHistoryFailed {
        booking_id: String,
        error: String,
    },
    InboxLoadMore,
    InboxScroll(isize),
    InboxDraftChanged(String),
    InboxSendRequested,
    /// `history` is the thread refetched from offset 0, when that succeeded
    InboxSendSucceeded {
        booking_id: String,
        history: Option<MessageHistory>,
    },
    InboxSendFailed {
        booking_id: String,
        error: String,
    },
    /// Open the review form for the selected thread's booking
    InboxReviewSelected,

    // === Review ===
    ReviewOpen(String),
    ReviewBookingLoaded(Booking),
    ReviewBookingFailed {
        booking_id: String,
        error: String,
    },
    ReviewFocusNext,
    ReviewFocusPrevious,
    ReviewRate(ReviewCategory, u8),
    ReviewContentChanged(String),
    ReviewPhotosChanged(Vec<PathBuf>),
    ReviewSubmitRequested,
    ReviewSubmitSucceeded {
        booking_id: String,
        review_id: String,
        at: Instant,
    },
    ReviewSubmitFailed {
        booking_id: String,
        error: String,
    },
    /// The confirmation overlay has been up long enough
    ReviewConfirmationElapsed,
}

/// I/O requested by the reducer
#[derive(Debug, Clone)]
pub enum Effect {
    LoadThreads(InboxTab),
    LoadHistoryPage {
        booking_id: String,
        page: PageRequest,
    },
    /// Send, then refetch `pages` pages of the thread from offset 0
    SendMessage {
        booking_id: String,
        body: String,
        pages: usize,
    },
    LoadBooking(String),
    SubmitReview {
        booking: Booking,
        form: ReviewForm,
    },
}
