//! Host inbox: thread lists per tab, paginated message history, sending
//!
//! Every request goes out on behalf of the signed-in user; with nobody
//! signed in the service fails with `NotSignedIn` before touching the
//! network.

use std::collections::HashSet;
use std::sync::Arc;

use super::events::{Event, EventBus};
use crate::api::{PageRequest, MESSAGE_PAGE_SIZE};
use crate::error::{Result, VillaError};
use crate::schema::{MessageEntry, SendMessageInput, ThreadEntry, ThreadStatus};
use crate::store::{ClientStore, NotificationKind};

pub const SEND_FAILED_TITLE: &str = "Send failed";
pub const SEND_FAILED_BODY: &str = "Could not deliver message.";

/// Inbox tab and the booking statuses it shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InboxTab {
    #[default]
    Inquiries,
    Upcoming,
    Past,
    Support,
}

impl InboxTab {
    pub const ALL: [InboxTab; 4] = [
        InboxTab::Inquiries,
        InboxTab::Upcoming,
        InboxTab::Past,
        InboxTab::Support,
    ];

    /// Status filter sent to the backend; empty means unfiltered
    pub fn statuses(&self) -> &'static [ThreadStatus] {
        match self {
            InboxTab::Inquiries => &[ThreadStatus::Inquiry],
            InboxTab::Upcoming => &[ThreadStatus::Confirmed],
            InboxTab::Past => &[ThreadStatus::Cancelled, ThreadStatus::Completed],
            InboxTab::Support => &[],
        }
    }

    pub fn accepts(&self, status: ThreadStatus) -> bool {
        let statuses = self.statuses();
        statuses.is_empty() || statuses.contains(&status)
    }

    /// Keep only threads whose status belongs to this tab
    pub fn retain(&self, threads: Vec<ThreadEntry>) -> Vec<ThreadEntry> {
        threads
            .into_iter()
            .filter(|thread| {
                let keep = self.accepts(thread.status);
                if !keep {
                    tracing::warn!(
                        tab = %self,
                        booking_id = %thread.booking_id,
                        status = %thread.status,
                        "Dropping thread outside the tab filter"
                    );
                }
                keep
            })
            .collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InboxTab::Inquiries => "inquiries",
            InboxTab::Upcoming => "upcoming",
            InboxTab::Past => "past",
            InboxTab::Support => "support",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InboxTab::Inquiries => "Inquiries",
            InboxTab::Upcoming => "Upcoming",
            InboxTab::Past => "Past",
            InboxTab::Support => "Support",
        }
    }

    pub fn next(&self) -> Self {
        let index = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let index = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for InboxTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InboxTab {
    type Err = VillaError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        InboxTab::ALL
            .into_iter()
            .find(|tab| tab.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                VillaError::InvalidInput(format!(
                    "Unknown inbox tab '{}'. Expected one of: inquiries, upcoming, past, support",
                    s
                ))
            })
    }
}

/// Pages of one thread's history, loaded oldest page first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageHistory {
    booking_id: String,
    pages: Vec<Vec<MessageEntry>>,
    exhausted: bool,
}

impl MessageHistory {
    pub fn new(booking_id: impl Into<String>) -> Self {
        Self {
            booking_id: booking_id.into(),
            pages: Vec::new(),
            exhausted: false,
        }
    }

    pub fn booking_id(&self) -> &str {
        &self.booking_id
    }

    /// The page to request next, or `None` once a short page arrived
    pub fn next_page(&self) -> Option<PageRequest> {
        if self.exhausted {
            None
        } else {
            Some(PageRequest::nth(self.pages.len()))
        }
    }

    /// Record a page fetched at `offset`
    ///
    /// Returns false and leaves the history untouched when the page is not
    /// the one [`next_page`](Self::next_page) asked for, which happens when
    /// a response arrives after the history moved on.
    pub fn apply_page(&mut self, offset: usize, page: Vec<MessageEntry>) -> bool {
        match self.next_page() {
            Some(expected) if expected.offset == offset => {
                if page.len() < MESSAGE_PAGE_SIZE {
                    self.exhausted = true;
                }
                self.pages.push(page);
                true
            }
            _ => {
                tracing::debug!(
                    booking_id = %self.booking_id,
                    offset,
                    "Ignoring out-of-sequence history page"
                );
                false
            }
        }
    }

    pub fn has_more(&self) -> bool {
        !self.exhausted
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages.len()
    }

    /// All loaded messages, de-duplicated by id, oldest first
    pub fn messages(&self) -> Vec<MessageEntry> {
        let mut seen = HashSet::new();
        let mut merged: Vec<MessageEntry> = self
            .pages
            .iter()
            .flatten()
            .filter(|message| seen.insert(message.id.as_str()))
            .cloned()
            .collect();
        merged.sort_by(|a, b| a.sent_at.cmp(&b.sent_at).then_with(|| a.id.cmp(&b.id)));
        merged
    }

    pub fn len(&self) -> usize {
        self.messages().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(Vec::is_empty)
    }
}

/// Message pane lifecycle for the selected thread
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThreadPhase {
    #[default]
    Unselected,
    Loading,
    Loaded,
    Sending,
}

impl ThreadPhase {
    pub fn select() -> Self {
        ThreadPhase::Loading
    }

    /// First page arrived
    pub fn loaded(self) -> Self {
        match self {
            ThreadPhase::Loading => ThreadPhase::Loaded,
            other => other,
        }
    }

    /// `Some(Sending)` when a send may start from this phase
    pub fn begin_send(self) -> Option<Self> {
        match self {
            ThreadPhase::Loaded => Some(ThreadPhase::Sending),
            _ => None,
        }
    }

    /// Send completed, successfully or not
    pub fn send_finished(self) -> Self {
        match self {
            ThreadPhase::Sending => ThreadPhase::Loaded,
            other => other,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, ThreadPhase::Loading | ThreadPhase::Sending)
    }
}

/// Inbox operations against the shared client
#[derive(Clone)]
pub struct InboxService {
    store: Arc<ClientStore>,
    event_bus: EventBus,
}

impl InboxService {
    pub fn new(store: Arc<ClientStore>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Threads for `tab`, with any thread outside the tab's filter removed
    pub async fn threads(&self, tab: InboxTab) -> Result<Vec<ThreadEntry>> {
        let user = self.store.require_user()?;
        let threads = self
            .store
            .api()
            .list_threads(&user.id, tab.statuses())
            .await
            .map_err(|e| {
                tracing::warn!(tab = %tab, error = %e, "Thread list fetch failed");
                e
            })?;
        let threads = tab.retain(threads);

        tracing::debug!(tab = %tab, count = threads.len(), "Threads loaded");
        self.event_bus.emit(Event::ThreadsLoaded {
            tab: tab.to_string(),
            count: threads.len(),
        });
        Ok(threads)
    }

    /// Fetch one page of a thread's history
    pub async fn fetch_page(&self, booking_id: &str, page: PageRequest) -> Result<Vec<MessageEntry>> {
        self.store.require_user()?;
        let messages = self
            .store
            .api()
            .list_messages(booking_id, page)
            .await
            .map_err(|e| {
                tracing::warn!(booking_id = %booking_id, offset = page.offset, error = %e, "History fetch failed");
                e
            })?;

        self.event_bus.emit(Event::HistoryPageLoaded {
            booking_id: booking_id.to_string(),
            offset: page.offset,
            count: messages.len(),
            has_more: messages.len() == MESSAGE_PAGE_SIZE,
        });
        Ok(messages)
    }

    /// Load the next page into `history`. Returns the number of messages
    /// fetched; zero without a request once pagination has ended.
    pub async fn load_more(&self, history: &mut MessageHistory) -> Result<usize> {
        let Some(page) = history.next_page() else {
            return Ok(0);
        };
        let messages = self.fetch_page(history.booking_id(), page).await?;
        let count = messages.len();
        history.apply_page(page.offset, messages);
        Ok(count)
    }

    /// Refetch a thread from offset 0, up to `pages` pages (at least one)
    pub async fn reload(&self, booking_id: &str, pages: usize) -> Result<MessageHistory> {
        let mut history = MessageHistory::new(booking_id);
        while history.pages_loaded() < pages.max(1) && history.has_more() {
            self.load_more(&mut history).await?;
        }
        Ok(history)
    }

    /// Page through the whole history
    pub async fn load_all(&self, booking_id: &str) -> Result<MessageHistory> {
        let mut history = MessageHistory::new(booking_id);
        while history.has_more() {
            self.load_more(&mut history).await?;
        }
        Ok(history)
    }

    /// Send `text` to a thread
    ///
    /// Whitespace-only text is ignored and yields `Ok(None)` without a
    /// request. Anything else is posted as typed. A failed send queues a
    /// "Send failed" notification.
    pub async fn send(&self, booking_id: &str, text: &str) -> Result<Option<MessageEntry>> {
        if text.trim().is_empty() {
            tracing::debug!(booking_id = %booking_id, "Ignoring empty message");
            return Ok(None);
        }
        self.store.require_user()?;

        let input = SendMessageInput {
            booking_id: booking_id.to_string(),
            body: text.to_string(),
        };
        match self.store.api().send_message(&input).await {
            Ok(message) => {
                tracing::info!(booking_id = %booking_id, message_id = %message.id, "Message sent");
                self.event_bus.emit(Event::MessageSent {
                    booking_id: booking_id.to_string(),
                    message_id: message.id.clone(),
                });
                Ok(Some(message))
            }
            Err(e) => {
                tracing::warn!(booking_id = %booking_id, error = %e, "Message send failed");
                self.store
                    .notify(NotificationKind::Error, SEND_FAILED_TITLE, SEND_FAILED_BODY);
                self.event_bus.emit(Event::MessageSendFailed {
                    booking_id: booking_id.to_string(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }
}
