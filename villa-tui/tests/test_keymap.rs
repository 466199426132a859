//! Keybindings mapped through the reducer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use libvillastay::api::mock::fixtures;
use libvillastay::schema::{ReviewCategory, ThreadStatus};
use libvillastay::service::inbox::InboxTab;
use libvillastay::service::review::ReviewPhase;
use libvillastay::ScreenSize;
use villa_tui::app::reducer::routes_to_textarea;
use villa_tui::app::{reduce, Action, AppState, Effect, InboxFocus, ReviewField, Screen};

fn key(code: KeyCode) -> Action {
    Action::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ctrl(c: char) -> Action {
    Action::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

fn with_threads() -> AppState {
    let mut state = AppState::new();
    state.inbox.threads = vec![
        fixtures::thread("b1", ThreadStatus::Inquiry),
        fixtures::thread("b2", ThreadStatus::Inquiry),
        fixtures::thread("b3", ThreadStatus::Inquiry),
    ];
    state
}

#[test]
fn test_q_quits_application() {
    let state = reduce(AppState::new(), key(KeyCode::Char('q')));
    assert!(state.should_quit);
}

#[test]
fn test_ctrl_c_quits_even_while_typing() {
    let mut state = AppState::new();
    state.inbox.selected = Some("b1".to_string());
    state.inbox.focus = InboxFocus::Compose;
    assert!(state.is_typing());

    assert!(!reduce(state.clone(), key(KeyCode::Char('q'))).should_quit);
    assert!(reduce(state, ctrl('c')).should_quit);
}

#[test]
fn test_q_does_not_quit_while_review_submitting() {
    let mut state = AppState::new();
    state.current_screen = Screen::Review;
    state.review.phase = ReviewPhase::Submitting;

    assert!(!reduce(state, key(KeyCode::Char('q'))).should_quit);
}

#[test]
fn test_f1_toggles_help_and_blocks_other_keys() {
    let state = reduce(AppState::new(), key(KeyCode::F(1)));
    assert!(state.help_visible);

    let state = reduce(state, key(KeyCode::Char('j')));
    assert!(state.help_visible);

    let state = reduce(state, key(KeyCode::Esc));
    assert!(!state.help_visible);
}

#[test]
fn test_esc_dismisses_error_first() {
    let mut state = AppState::new();
    state.help_visible = true;
    state.error = Some("boom".to_string());

    let state = reduce(state, key(KeyCode::Esc));
    assert!(state.error.is_none());
    assert!(state.help_visible);
}

#[test]
fn test_f3_opens_trips_and_f2_returns_to_inbox() {
    let state = reduce(AppState::new(), key(KeyCode::F(3)));
    assert_eq!(state.current_screen, Screen::Trips);

    let mut state = reduce(state, key(KeyCode::F(2)));
    assert_eq!(state.current_screen, Screen::Inbox);
    assert!(matches!(state.take_effects().as_slice(), [Effect::LoadThreads(_)]));
}

#[test]
fn test_tab_cycles_inbox_tabs() {
    let mut state = reduce(AppState::new(), key(KeyCode::Tab));
    assert_eq!(state.inbox.tab, InboxTab::Upcoming);
    assert!(matches!(
        state.take_effects().as_slice(),
        [Effect::LoadThreads(InboxTab::Upcoming)]
    ));

    let state = reduce(state, key(KeyCode::BackTab));
    let state = reduce(state, key(KeyCode::BackTab));
    assert_eq!(state.inbox.tab, InboxTab::Support);

    let state = reduce(state, key(KeyCode::Char('3')));
    assert_eq!(state.inbox.tab, InboxTab::Past);
}

#[test]
fn test_cursor_stays_in_bounds() {
    let state = with_threads();
    let state = reduce(state, key(KeyCode::Up));
    assert_eq!(state.inbox.cursor, 0);

    let state = reduce(state, key(KeyCode::Char('j')));
    let state = reduce(state, key(KeyCode::Down));
    let state = reduce(state, key(KeyCode::Down));
    assert_eq!(state.inbox.cursor, 2);
}

#[test]
fn test_enter_opens_thread_under_cursor() {
    let state = reduce(with_threads(), key(KeyCode::Down));
    let mut state = reduce(state, key(KeyCode::Enter));

    assert_eq!(state.inbox.selected.as_deref(), Some("b2"));
    match state.take_effects().as_slice() {
        [Effect::LoadHistoryPage { booking_id, page }] => {
            assert_eq!(booking_id, "b2");
            assert_eq!(page.offset, 0);
            assert_eq!(page.limit, 50);
        }
        other => panic!("unexpected effects: {:?}", other),
    }
}

#[test]
fn test_i_focuses_compose_only_with_selection() {
    let state = reduce(with_threads(), key(KeyCode::Char('i')));
    assert_eq!(state.inbox.focus, InboxFocus::Threads);

    let state = reduce(state, key(KeyCode::Enter));
    let state = reduce(state, key(KeyCode::Char('i')));
    assert_eq!(state.inbox.focus, InboxFocus::Compose);

    let state = reduce(state, key(KeyCode::Esc));
    assert_eq!(state.inbox.focus, InboxFocus::Threads);
}

#[test]
fn test_esc_goes_back_on_narrow_terminal() {
    let state = reduce(with_threads(), Action::Resize(60, 20));
    assert_eq!(state.viewport, ScreenSize::Sm);

    let state = reduce(state, key(KeyCode::Enter));
    assert!(state.inbox.selected.is_some());

    let state = reduce(state, key(KeyCode::Esc));
    assert!(state.inbox.selected.is_none());
}

#[test]
fn test_esc_keeps_selection_on_wide_terminal() {
    let state = reduce(with_threads(), Action::Resize(120, 40));
    let state = reduce(state, key(KeyCode::Enter));
    let state = reduce(state, key(KeyCode::Esc));
    assert!(state.inbox.selected.is_some());
}

#[test]
fn test_r_opens_review_for_thread() {
    let mut state = reduce(with_threads(), key(KeyCode::Char('r')));

    assert_eq!(state.current_screen, Screen::Review);
    assert_eq!(state.review.booking_id.as_deref(), Some("b1"));
    assert!(matches!(
        state.take_effects().as_slice(),
        [Effect::LoadBooking(id)] if id == "b1"
    ));
}

#[test]
fn test_review_number_keys_rate_focused_category() {
    let mut state = AppState::new();
    state.current_screen = Screen::Review;

    let state = reduce(state, key(KeyCode::Char('4')));
    assert_eq!(state.review.form.rating(ReviewCategory::Accuracy), 4);

    let state = reduce(state, key(KeyCode::Tab));
    assert_eq!(state.review.field, ReviewField::Rating(ReviewCategory::Cleanliness));

    let state = reduce(state, key(KeyCode::Right));
    let state = reduce(state, key(KeyCode::Right));
    assert_eq!(state.review.form.rating(ReviewCategory::Cleanliness), 2);

    let state = reduce(state, key(KeyCode::Left));
    let state = reduce(state, key(KeyCode::Left));
    assert_eq!(state.review.form.rating(ReviewCategory::Cleanliness), 1);
}

#[test]
fn test_textarea_routing() {
    let mut state = AppState::new();
    let plain = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
    assert!(!routes_to_textarea(&state, &plain));

    state.inbox.selected = Some("b1".to_string());
    state.inbox.focus = InboxFocus::Compose;
    assert!(routes_to_textarea(&state, &plain));
    assert!(routes_to_textarea(
        &state,
        &KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)
    ));
    assert!(!routes_to_textarea(&state, &KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    assert!(!routes_to_textarea(&state, &KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));

    state.current_screen = Screen::Review;
    state.review.field = ReviewField::Content;
    assert!(routes_to_textarea(&state, &KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    assert!(!routes_to_textarea(
        &state,
        &KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)
    ));
}
