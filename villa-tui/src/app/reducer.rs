//! Pure reducer function for state transitions
//!
//! `(State, Action) -> State`. No I/O happens here: requests are queued as
//! [`Effect`]s on the state and performed by the event loop.
//!
//! Results of requests carry the booking id or tab they were issued for.
//! A result whose key no longer matches the current selection is dropped.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use libvillastay::service::inbox::{MessageHistory, ThreadPhase};
use libvillastay::service::review::{ReviewPhase, CONFIRMATION_DELAY};
use libvillastay::{PageRequest, ScreenSize};

use super::actions::{Action, Effect, Screen};
use super::state::{AppState, InboxFocus, ReviewField, ReviewState};

/// How long a toast stays up
pub const TOAST_TTL_SECS: i64 = 4;

/// Lines moved by PageUp/PageDown in the message pane
const SCROLL_PAGE: isize = 10;

pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        // === UI Events ===
        Action::Key(key) => handle_key(state, key),
        Action::Tick => state,
        Action::Resize(width, _) => AppState {
            viewport: ScreenSize::from_columns(width),
            ..state
        },

        // === Navigation ===
        Action::NavigateTo(screen) => navigate(state, screen),
        Action::Quit => AppState {
            should_quit: true,
            ..state
        },
        Action::ShowHelp => AppState {
            help_visible: true,
            ..state
        },
        Action::HideHelp => AppState {
            help_visible: false,
            ..state
        },

        // === Overlays and notifications ===
        Action::ShowError(error) => AppState {
            error: Some(error),
            ..state
        },
        Action::DismissError => AppState { error: None, ..state },
        Action::SetStatus(message) => with_status(state, message),
        Action::ClearStatus => {
            let mut state = state;
            state.status.message = None;
            state
        }
        Action::Notify(notification) => {
            let mut state = state;
            state.notifications.adopt(notification);
            state
        }
        Action::DismissNotification(id) => {
            let mut state = state;
            state.notifications.dismiss(id);
            state
        }
        Action::ExpireNotifications(now) => {
            let mut state = state;
            state
                .notifications
                .expire(now, chrono::Duration::seconds(TOAST_TTL_SECS));
            state
        }

        // === Inbox ===
        Action::InboxSelectTab(tab) => {
            let mut state = state;
            if state.inbox.tab != tab {
                state.inbox.threads.clear();
                state.inbox.cursor = 0;
            }
            state.inbox.tab = tab;
            state.inbox.threads_loading = true;
            state.effects.push(Effect::LoadThreads(tab));
            state
        }
        Action::InboxThreadsLoaded { tab, threads } => {
            if tab != state.inbox.tab {
                return state;
            }
            let mut state = state;
            state.inbox.cursor = state.inbox.cursor.min(threads.len().saturating_sub(1));
            state.inbox.threads = threads;
            state.inbox.threads_loading = false;
            state
        }
        Action::InboxThreadsFailed { tab, error } => {
            if tab != state.inbox.tab {
                return state;
            }
            let mut state = state;
            state.inbox.threads_loading = false;
            with_status(state, format!("Could not load threads: {}", error))
        }
        Action::InboxCursorMoved(delta) => {
            let mut state = state;
            let last = state.inbox.threads.len().saturating_sub(1);
            state.inbox.cursor = state.inbox.cursor.saturating_add_signed(delta).min(last);
            state
        }
        Action::InboxSelectThread(booking_id) => {
            let mut state = state;
            state.inbox.selected = Some(booking_id.clone());
            state.inbox.history = Some(MessageHistory::new(booking_id.clone()));
            state.inbox.phase = ThreadPhase::select();
            state.inbox.draft.clear();
            state.inbox.scroll = 0;
            state.effects.push(Effect::LoadHistoryPage {
                booking_id,
                page: PageRequest::first(),
            });
            state
        }
        Action::InboxDeselect => {
            let mut state = state;
            state.inbox.selected = None;
            state.inbox.history = None;
            state.inbox.phase = ThreadPhase::Unselected;
            state.inbox.draft.clear();
            state.inbox.focus = InboxFocus::Threads;
            state
        }
        Action::InboxFocusCompose => {
            let mut state = state;
            if state.inbox.selected.is_some() {
                state.inbox.focus = InboxFocus::Compose;
            }
            state
        }
        Action::InboxFocusThreads => {
            let mut state = state;
            state.inbox.focus = InboxFocus::Threads;
            state
        }
        Action::InboxHistoryPageLoaded {
            booking_id,
            offset,
            messages,
        } => {
            if !is_selected(&state, &booking_id) {
                return state;
            }
            let mut state = state;
            if let Some(history) = state.inbox.history.as_mut() {
                if history.apply_page(offset, messages) {
                    state.inbox.phase = state.inbox.phase.loaded();
                }
            }
            state
        }
        Action::InboxHistoryFailed { booking_id, error } => {
            if !is_selected(&state, &booking_id) {
                return state;
            }
            let mut state = state;
            state.inbox.phase = state.inbox.phase.loaded();
            with_status(state, format!("Could not load messages: {}", error))
        }
        Action::InboxLoadMore => {
            let mut state = state;
            if state.inbox.phase != ThreadPhase::Loaded {
                return state;
            }
            let next = state
                .inbox
                .history
                .as_ref()
                .and_then(|h| h.next_page().map(|page| (h.booking_id().to_string(), page)));
            if let Some((booking_id, page)) = next {
                state.effects.push(Effect::LoadHistoryPage { booking_id, page });
            }
            state
        }
        Action::InboxScroll(delta) => {
            let mut state = state;
            let max = state.inbox.conversation_lines();
            state.inbox.scroll = state.inbox.scroll.saturating_add_signed(delta).min(max);
            state
        }
        Action::InboxDraftChanged(draft) => {
            let mut state = state;
            state.inbox.draft = draft;
            state
        }
        Action::InboxSendRequested => {
            if state.inbox.draft.trim().is_empty() {
                return state;
            }
            let body = state.inbox.draft.clone();
            let (Some(booking_id), Some(sending)) =
                (state.inbox.selected.clone(), state.inbox.phase.begin_send())
            else {
                return state;
            };
            let mut state = state;
            let pages = state
                .inbox
                .history
                .as_ref()
                .map(MessageHistory::pages_loaded)
                .unwrap_or(1)
                .max(1);
            state.inbox.phase = sending;
            // Cleared before the request completes; not restored on failure
            state.inbox.draft.clear();
            state.effects.push(Effect::SendMessage {
                booking_id,
                body,
                pages,
            });
            state
        }
        Action::InboxSendSucceeded { booking_id, history } => {
            if !is_selected(&state, &booking_id) {
                return state;
            }
            let mut state = state;
            state.inbox.phase = state.inbox.phase.send_finished();
            if let Some(history) = history {
                // A fresh history also settles a re-select issued mid-send
                state.inbox.history = Some(history);
                state.inbox.phase = ThreadPhase::Loaded;
            }
            state.inbox.scroll = 0;
            state
        }
        Action::InboxSendFailed { booking_id, error: _ } => {
            if !is_selected(&state, &booking_id) {
                return state;
            }
            let mut state = state;
            state.inbox.phase = state.inbox.phase.send_finished();
            state
        }
        Action::InboxReviewSelected => {
            let target = state
                .inbox
                .selected
                .clone()
                .or_else(|| state.inbox.thread_under_cursor().map(|t| t.booking_id.clone()));
            match target {
                Some(booking_id) => reduce(state, Action::ReviewOpen(booking_id)),
                None => state,
            }
        }

        // === Review ===
        Action::ReviewOpen(booking_id) => {
            let mut state = state;
            state.current_screen = Screen::Review;
            state.review = ReviewState {
                booking_id: Some(booking_id.clone()),
                loading: true,
                ..ReviewState::default()
            };
            state.effects.push(Effect::LoadBooking(booking_id));
            state
        }
        Action::ReviewBookingLoaded(booking) => {
            if state.review.booking_id.as_deref() != Some(booking.id.as_str()) {
                return state;
            }
            let mut state = state;
            state.review.booking = Some(booking);
            state.review.loading = false;
            state
        }
        Action::ReviewBookingFailed { booking_id, error } => {
            if state.review.booking_id.as_deref() != Some(booking_id.as_str()) {
                return state;
            }
            let mut state = state;
            state.review.loading = false;
            with_status(state, format!("Could not load booking: {}", error))
        }
        Action::ReviewFocusNext => {
            let mut state = state;
            state.review.field = state.review.field.next();
            state
        }
        Action::ReviewFocusPrevious => {
            let mut state = state;
            state.review.field = state.review.field.previous();
            state
        }
        Action::ReviewRate(category, value) => {
            if !state.review.phase.is_editable() {
                return state;
            }
            let mut state = state;
            match state.review.form.set_rating(category, value) {
                Ok(()) => state,
                Err(e) => with_status(state, e.to_string()),
            }
        }
        Action::ReviewContentChanged(content) => {
            let mut state = state;
            state.review.form.set_content(&content);
            state
        }
        Action::ReviewPhotosChanged(paths) => {
            let mut state = state;
            state.review.form.attach_photos(paths);
            state
        }
        Action::ReviewSubmitRequested => {
            let mut state = state;
            let Some(booking) = state.review.booking.clone() else {
                return state;
            };
            if !state.review.can_submit() {
                let blockers = state.review.form.blockers().join("; ");
                return with_status(state, blockers);
            }
            state.review.phase = ReviewPhase::Submitting;
            state.effects.push(Effect::SubmitReview {
                booking,
                form: state.review.form.clone(),
            });
            state
        }
        Action::ReviewSubmitSucceeded { booking_id, at, .. } => {
            if state.review.booking_id.as_deref() != Some(booking_id.as_str()) {
                return state;
            }
            let mut state = state;
            state.review.phase = ReviewPhase::Confirmed;
            state.review.confirmed_at = Some(at);
            state
        }
        Action::ReviewSubmitFailed { booking_id, error } => {
            if state.review.booking_id.as_deref() != Some(booking_id.as_str()) {
                return state;
            }
            let mut state = state;
            state.review.phase = ReviewPhase::Failed(error);
            state
        }
        Action::ReviewConfirmationElapsed => {
            if state.review.phase != ReviewPhase::Confirmed {
                return state;
            }
            let mut state = state;
            state.review = ReviewState::default();
            state.current_screen = Screen::Trips;
            state
        }
    }
}

/// True once the review confirmation has been shown long enough at `now`
pub fn confirmation_due(state: &AppState, now: Instant) -> bool {
    match (&state.review.phase, state.review.confirmed_at) {
        (ReviewPhase::Confirmed, Some(at)) => now.saturating_duration_since(at) >= CONFIRMATION_DELAY,
        _ => false,
    }
}

/// Whether `key` should be fed to the focused text widget instead of the reducer
pub fn routes_to_textarea(state: &AppState, key: &KeyEvent) -> bool {
    if !state.is_typing() {
        return false;
    }
    let reserved = matches!(
        (key.code, key.modifiers),
        (KeyCode::F(_), _)
            | (KeyCode::Esc, _)
            | (KeyCode::Tab, _)
            | (KeyCode::BackTab, _)
            | (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('q'), KeyModifiers::CONTROL)
            | (KeyCode::Char('s'), KeyModifiers::CONTROL)
    );
    // Plain Enter sends in the compose box
    let sends = state.current_screen == Screen::Inbox
        && key.code == KeyCode::Enter
        && key.modifiers == KeyModifiers::NONE;
    !reserved && !sends
}

fn with_status(state: AppState, message: String) -> AppState {
    let mut state = state;
    state.status.message = Some(message);
    state
}

fn is_selected(state: &AppState, booking_id: &str) -> bool {
    state.inbox.selected.as_deref() == Some(booking_id)
}

fn navigate(state: AppState, screen: Screen) -> AppState {
    let mut state = state;
    state.current_screen = screen;
    if screen == Screen::Inbox && state.inbox.threads.is_empty() && !state.inbox.threads_loading {
        let tab = state.inbox.tab;
        return reduce(state, Action::InboxSelectTab(tab));
    }
    state
}

/// Map keys to actions. Keybindings live here.
fn handle_key(state: AppState, key: KeyEvent) -> AppState {
    // Global keybindings
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), KeyModifiers::CONTROL) => {
            return reduce(state, Action::Quit);
        }
        (KeyCode::F(1), _) => {
            let action = if state.help_visible {
                Action::HideHelp
            } else {
                Action::ShowHelp
            };
            return reduce(state, action);
        }
        (KeyCode::Esc, _) if state.error.is_some() => {
            return reduce(state, Action::DismissError);
        }
        (KeyCode::Esc, _) if state.help_visible => {
            return reduce(state, Action::HideHelp);
        }
        _ if state.help_visible || state.error.is_some() => return state,
        (KeyCode::F(2), _) if !state.review.phase.is_submitting() => {
            return reduce(state, Action::NavigateTo(Screen::Inbox));
        }
        (KeyCode::F(3), _) if !state.review.phase.is_submitting() => {
            return reduce(state, Action::NavigateTo(Screen::Trips));
        }
        (KeyCode::Char('q'), KeyModifiers::NONE)
            if !state.is_typing() && !state.review.phase.is_submitting() =>
        {
            return reduce(state, Action::Quit);
        }
        _ => {}
    }

    match state.current_screen {
        Screen::Inbox => handle_inbox_key(state, key),
        Screen::Review => handle_review_key(state, key),
        Screen::Trips => match key.code {
            KeyCode::Esc => reduce(state, Action::NavigateTo(Screen::Inbox)),
            _ => state,
        },
    }
}

fn handle_inbox_key(state: AppState, key: KeyEvent) -> AppState {
    if state.inbox.focus == InboxFocus::Compose && state.inbox.selected.is_some() {
        return match key.code {
            KeyCode::Enter => reduce(state, Action::InboxSendRequested),
            KeyCode::Esc | KeyCode::Tab => reduce(state, Action::InboxFocusThreads),
            KeyCode::PageUp => reduce(state, Action::InboxScroll(SCROLL_PAGE)),
            KeyCode::PageDown => reduce(state, Action::InboxScroll(-SCROLL_PAGE)),
            _ => state,
        };
    }

    match key.code {
        KeyCode::Tab => {
            let tab = state.inbox.tab.next();
            reduce(state, Action::InboxSelectTab(tab))
        }
        KeyCode::BackTab => {
            let tab = state.inbox.tab.previous();
            reduce(state, Action::InboxSelectTab(tab))
        }
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            let tab = libvillastay::service::inbox::InboxTab::ALL[index];
            reduce(state, Action::InboxSelectTab(tab))
        }
        KeyCode::Up | KeyCode::Char('k') => reduce(state, Action::InboxCursorMoved(-1)),
        KeyCode::Down | KeyCode::Char('j') => reduce(state, Action::InboxCursorMoved(1)),
        KeyCode::Enter => match state.inbox.thread_under_cursor().map(|t| t.booking_id.clone()) {
            Some(booking_id) => reduce(state, Action::InboxSelectThread(booking_id)),
            None => state,
        },
        KeyCode::Char('i') | KeyCode::Right => reduce(state, Action::InboxFocusCompose),
        KeyCode::Char('o') => reduce(state, Action::InboxLoadMore),
        KeyCode::Char('r') => reduce(state, Action::InboxReviewSelected),
        KeyCode::Char('R') => {
            let tab = state.inbox.tab;
            reduce(state, Action::InboxSelectTab(tab))
        }
        KeyCode::PageUp => reduce(state, Action::InboxScroll(SCROLL_PAGE)),
        KeyCode::PageDown => reduce(state, Action::InboxScroll(-SCROLL_PAGE)),
        KeyCode::Esc | KeyCode::Left if state.inbox.selected.is_some() && state.viewport.is_mobile() => {
            reduce(state, Action::InboxDeselect)
        }
        _ => state,
    }
}

fn handle_review_key(state: AppState, key: KeyEvent) -> AppState {
    match (key.code, key.modifiers) {
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => return reduce(state, Action::ReviewSubmitRequested),
        (KeyCode::Tab, _) => return reduce(state, Action::ReviewFocusNext),
        (KeyCode::BackTab, _) => return reduce(state, Action::ReviewFocusPrevious),
        (KeyCode::Esc, _) if !state.review.phase.is_submitting() => {
            return reduce(state, Action::NavigateTo(Screen::Inbox));
        }
        _ => {}
    }

    let ReviewField::Rating(category) = state.review.field else {
        return state;
    };
    let current = state.review.form.rating(category);
    match key.code {
        KeyCode::Char(c @ '1'..='5') => {
            let value = c as u8 - b'0';
            reduce(state, Action::ReviewRate(category, value))
        }
        KeyCode::Right | KeyCode::Char('l') => reduce(state, Action::ReviewRate(category, (current + 1).min(5))),
        KeyCode::Left | KeyCode::Char('h') if current > 1 => {
            reduce(state, Action::ReviewRate(category, current - 1))
        }
        KeyCode::Down | KeyCode::Char('j') => reduce(state, Action::ReviewFocusNext),
        KeyCode::Up | KeyCode::Char('k') => reduce(state, Action::ReviewFocusPrevious),
        _ => state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libvillastay::api::mock::fixtures;
    use libvillastay::schema::ThreadStatus;
    use libvillastay::service::inbox::InboxTab;

    #[test]
    fn test_reducer_is_pure() {
        let state = AppState::new();
        let new_state = reduce(state.clone(), Action::SetStatus("Test".to_string()));

        assert!(state.status.message.is_none());
        assert_eq!(new_state.status.message, Some("Test".to_string()));
    }

    #[test]
    fn test_quit_action() {
        let state = reduce(AppState::new(), Action::Quit);
        assert!(state.should_quit);
    }

    #[test]
    fn test_resize_sets_breakpoint() {
        let state = reduce(AppState::new(), Action::Resize(50, 30));
        assert_eq!(state.viewport, ScreenSize::Xs);
        let state = reduce(state, Action::Resize(150, 40));
        assert_eq!(state.viewport, ScreenSize::Xl);
    }

    #[test]
    fn test_stale_threads_dropped() {
        let mut state = reduce(AppState::new(), Action::InboxSelectTab(InboxTab::Upcoming));
        state = reduce(
            state,
            Action::InboxThreadsLoaded {
                tab: InboxTab::Inquiries,
                threads: vec![fixtures::thread("b1", ThreadStatus::Inquiry)],
            },
        );
        assert!(state.inbox.threads.is_empty());
        assert!(state.inbox.threads_loading);
    }

    #[test]
    fn test_confirmation_due_after_delay() {
        let mut state = AppState::new();
        let at = Instant::now();
        state.review.phase = ReviewPhase::Confirmed;
        state.review.confirmed_at = Some(at);

        assert!(!confirmation_due(&state, at));
        assert!(confirmation_due(&state, at + CONFIRMATION_DELAY));
    }
}
