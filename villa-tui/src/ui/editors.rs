//! Text widgets backed by tui-textarea
//!
//! The reducer owns the canonical text (draft, review content, photo
//! selection). The textareas own cursor and editing state. Keys routed here
//! produce the action that copies the new text into state, and
//! [`Editors::sync`] resets a widget when the state moved on without it.

use std::path::PathBuf;

use crossterm::event::KeyEvent;
use libvillastay::service::review::is_accepted_photo;
use tui_textarea::TextArea;

use crate::app::{Action, AppState, InboxFocus, ReviewField, Screen};

const COMPOSE_PLACEHOLDER: &str = "Write a message… (Enter to send, Esc to go back)";
const CONTENT_PLACEHOLDER: &str = "How was the stay?";
const PHOTOS_PLACEHOLDER: &str = "Photo paths separated by spaces (.jpg, .png)";

/// Which widget receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorTarget {
    Compose,
    Content,
    Photos,
}

pub struct Editors<'a> {
    compose: TextArea<'a>,
    content: TextArea<'a>,
    photos: TextArea<'a>,
    /// Thread the compose box belongs to
    compose_key: Option<String>,
    /// Booking the review widgets belong to
    review_key: Option<String>,
}

impl<'a> Default for Editors<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Editors<'a> {
    pub fn new() -> Self {
        Self {
            compose: blank(COMPOSE_PLACEHOLDER),
            content: blank(CONTENT_PLACEHOLDER),
            photos: blank(PHOTOS_PLACEHOLDER),
            compose_key: None,
            review_key: None,
        }
    }

    /// Widget focused in `state`, if any
    pub fn target(state: &AppState) -> Option<EditorTarget> {
        if !state.is_typing() {
            return None;
        }
        match (state.current_screen, state.inbox.focus, state.review.field) {
            (Screen::Inbox, InboxFocus::Compose, _) => Some(EditorTarget::Compose),
            (Screen::Review, _, ReviewField::Content) => Some(EditorTarget::Content),
            (Screen::Review, _, ReviewField::Photos) => Some(EditorTarget::Photos),
            _ => None,
        }
    }

    /// Feed `key` to the focused widget and return the state update
    pub fn input(&mut self, state: &AppState, key: KeyEvent) -> Option<Action> {
        match Self::target(state)? {
            EditorTarget::Compose => {
                self.compose.input(key);
                Some(Action::InboxDraftChanged(text(&self.compose)))
            }
            EditorTarget::Content => {
                self.content.input(key);
                Some(Action::ReviewContentChanged(text(&self.content)))
            }
            EditorTarget::Photos => {
                self.photos.input(key);
                Some(Action::ReviewPhotosChanged(parse_photo_paths(&text(&self.photos))))
            }
        }
    }

    /// Reset widgets whose owner changed or whose text the state dropped
    pub fn sync(&mut self, state: &AppState) {
        let draft_cleared = state.inbox.draft.is_empty() && !text(&self.compose).is_empty();
        if self.compose_key != state.inbox.selected || draft_cleared {
            self.compose = blank(COMPOSE_PLACEHOLDER);
            self.compose_key = state.inbox.selected.clone();
        }

        if self.review_key != state.review.booking_id {
            self.content = blank(CONTENT_PLACEHOLDER);
            self.photos = blank(PHOTOS_PLACEHOLDER);
            self.review_key = state.review.booking_id.clone();
        } else if text(&self.content) != state.review.form.content() {
            // Pasted past the length limit
            self.content = filled(CONTENT_PLACEHOLDER, state.review.form.content());
        }
    }

    pub fn compose(&self) -> &TextArea<'a> {
        &self.compose
    }

    pub fn content(&self) -> &TextArea<'a> {
        &self.content
    }

    pub fn photos(&self) -> &TextArea<'a> {
        &self.photos
    }
}

/// Whitespace-separated paths with a JPEG or PNG extension
pub fn parse_photo_paths(input: &str) -> Vec<PathBuf> {
    input
        .split_whitespace()
        .map(PathBuf::from)
        .filter(|path| is_accepted_photo(path))
        .collect()
}

fn text(textarea: &TextArea<'_>) -> String {
    textarea.lines().join("\n")
}

fn blank<'a>(placeholder: &str) -> TextArea<'a> {
    let mut textarea = TextArea::default();
    textarea.set_placeholder_text(placeholder);
    textarea
}

fn filled<'a>(placeholder: &str, content: &str) -> TextArea<'a> {
    let mut textarea = TextArea::from(content.lines().map(str::to_string));
    textarea.set_placeholder_text(placeholder);
    textarea.move_cursor(tui_textarea::CursorMove::Bottom);
    textarea.move_cursor(tui_textarea::CursorMove::End);
    textarea
}
