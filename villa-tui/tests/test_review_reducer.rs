//! Review form transitions

use std::path::PathBuf;
use std::time::Instant;

use libvillastay::api::mock::fixtures;
use libvillastay::schema::ReviewCategory;
use libvillastay::service::review::{ReviewPhase, CONFIRMATION_DELAY};
use villa_tui::app::reducer::confirmation_due;
use villa_tui::app::{reduce, Action, AppState, Effect, Screen};

const CONTENT: &str = "Lovely guests, left the villa spotless.";

fn open(booking_id: &str) -> AppState {
    let mut state = reduce(AppState::new(), Action::ReviewOpen(booking_id.to_string()));
    state.take_effects();
    reduce(state, Action::ReviewBookingLoaded(fixtures::booking(booking_id)))
}

fn filled(scores: [u8; 5], photos: usize) -> AppState {
    let mut state = open("bk-7");
    for (category, score) in ReviewCategory::ALL.into_iter().zip(scores) {
        if score > 0 {
            state = reduce(state, Action::ReviewRate(category, score));
        }
    }
    state = reduce(state, Action::ReviewContentChanged(CONTENT.to_string()));
    reduce(
        state,
        Action::ReviewPhotosChanged((0..photos).map(|i| PathBuf::from(format!("/tmp/p{}.jpg", i))).collect()),
    )
}

#[test]
fn test_open_loads_booking() {
    let mut state = reduce(AppState::new(), Action::ReviewOpen("bk-7".to_string()));

    assert_eq!(state.current_screen, Screen::Review);
    assert!(state.review.loading);
    assert!(matches!(state.take_effects().as_slice(), [Effect::LoadBooking(id)] if id == "bk-7"));
}

#[test]
fn test_booking_for_other_review_is_ignored() {
    let state = reduce(AppState::new(), Action::ReviewOpen("bk-7".to_string()));
    let state = reduce(state, Action::ReviewBookingLoaded(fixtures::booking("bk-8")));

    assert!(state.review.booking.is_none());
    assert!(state.review.loading);
}

#[test]
fn test_complete_form_submits() {
    let mut state = reduce(filled([5, 5, 5, 5, 5], 5), Action::ReviewSubmitRequested);

    assert_eq!(state.review.phase, ReviewPhase::Submitting);
    match state.take_effects().as_slice() {
        [Effect::SubmitReview { booking, form }] => {
            assert_eq!(booking.id, "bk-7");
            assert_eq!(form.overall_rating(), Some(5));
        }
        other => panic!("unexpected effects: {:?}", other),
    }
}

#[test]
fn test_missing_rating_blocks_submit() {
    let mut state = reduce(filled([3, 4, 0, 5, 2], 5), Action::ReviewSubmitRequested);

    assert_eq!(state.review.phase, ReviewPhase::Editing);
    assert!(state.take_effects().is_empty());
    assert!(state.status.message.unwrap().contains("Communication"));
}

#[test]
fn test_four_photos_block_submit() {
    let mut state = reduce(filled([4, 4, 4, 4, 4], 4), Action::ReviewSubmitRequested);

    assert!(state.take_effects().is_empty());
    assert!(state.status.message.unwrap().contains("(4/5)"));
}

#[test]
fn test_ratings_ignored_while_submitting() {
    let state = reduce(filled([5, 5, 5, 5, 5], 5), Action::ReviewSubmitRequested);
    let state = reduce(state, Action::ReviewRate(ReviewCategory::Value, 1));

    assert_eq!(state.review.form.rating(ReviewCategory::Value), 5);
}

#[test]
fn test_failure_keeps_form_for_retry() {
    let state = reduce(filled([4, 5, 4, 5, 4], 5), Action::ReviewSubmitRequested);
    let before = state.review.form.clone();

    let state = reduce(
        state,
        Action::ReviewSubmitFailed {
            booking_id: "bk-7".to_string(),
            error: "status 500".to_string(),
        },
    );

    assert_eq!(state.review.phase, ReviewPhase::Failed("status 500".to_string()));
    assert_eq!(state.review.form, before);
    assert!(state.review.can_submit());
}

#[test]
fn test_success_redirects_to_trips_after_delay() {
    let state = reduce(filled([5, 5, 5, 5, 5], 5), Action::ReviewSubmitRequested);
    let at = Instant::now();
    let state = reduce(
        state,
        Action::ReviewSubmitSucceeded {
            booking_id: "bk-7".to_string(),
            review_id: "rv-1".to_string(),
            at,
        },
    );

    assert_eq!(state.review.phase, ReviewPhase::Confirmed);
    assert_eq!(state.current_screen, Screen::Review);
    assert!(!confirmation_due(&state, at));
    assert!(confirmation_due(&state, at + CONFIRMATION_DELAY));

    let state = reduce(state, Action::ReviewConfirmationElapsed);
    assert_eq!(state.current_screen, Screen::Trips);
    assert!(state.review.booking_id.is_none());
}

#[test]
fn test_elapsed_without_confirmation_is_ignored() {
    let state = reduce(open("bk-7"), Action::ReviewConfirmationElapsed);
    assert_eq!(state.current_screen, Screen::Review);
}
