//! Process-wide client state
//!
//! [`ClientStore`] is created once at startup and shared by every service. It
//! holds the signed-in user, the shared API client and the notification
//! queue. Logging out clears all three plus the persisted token.
//!
//! Viewport breakpoints ([`ScreenSize`]) are plain values so that a front end
//! can keep them next to the rest of its render state.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::BookingApi;
use crate::error::{Result, VillaError};
use crate::schema::User;
use crate::session::TokenStore;

/// Notifications kept before the oldest is dropped
pub const NOTIFICATION_CAPACITY: usize = 20;

/// Viewport breakpoint derived from the terminal width in columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenSize {
    Xs,
    Sm,
    #[default]
    Md,
    Lg,
    Xl,
}

impl ScreenSize {
    pub fn from_columns(columns: u16) -> Self {
        match columns {
            0..=59 => ScreenSize::Xs,
            60..=79 => ScreenSize::Sm,
            80..=99 => ScreenSize::Md,
            100..=139 => ScreenSize::Lg,
            _ => ScreenSize::Xl,
        }
    }

    /// Single-pane layouts
    pub fn is_mobile(&self) -> bool {
        matches!(self, ScreenSize::Xs | ScreenSize::Sm)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

/// A transient toast shown by the front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Bounded FIFO of notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationQueue {
    items: VecDeque<Notification>,
    capacity: usize,
    next_id: u64,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::with_capacity(NOTIFICATION_CAPACITY)
    }
}

impl NotificationQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            capacity: capacity.max(1),
            next_id: 1,
        }
    }

    /// Enqueue a notification, dropping the oldest when full. Returns its id.
    pub fn push(&mut self, kind: NotificationKind, title: impl Into<String>, body: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(Notification {
            id,
            kind,
            title: title.into(),
            body: body.into(),
            created_at: Utc::now(),
        });
        id
    }

    /// Move a notification produced elsewhere into this queue
    pub fn adopt(&mut self, notification: Notification) {
        self.push(notification.kind, notification.title, notification.body);
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Drop notifications older than `ttl` at `now`
    pub fn expire(&mut self, now: DateTime<Utc>, ttl: chrono::Duration) {
        self.items.retain(|n| now - n.created_at < ttl);
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        self.items.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Shared client state: signed-in user, API client, pending notifications
pub struct ClientStore {
    api: Arc<dyn BookingApi>,
    auth_user: RwLock<Option<User>>,
    notifications: Mutex<NotificationQueue>,
    tokens: Option<TokenStore>,
}

impl ClientStore {
    pub fn new(api: Arc<dyn BookingApi>, tokens: Option<TokenStore>) -> Self {
        Self {
            api,
            auth_user: RwLock::new(None),
            notifications: Mutex::new(NotificationQueue::default()),
            tokens,
        }
    }

    pub fn api(&self) -> Arc<dyn BookingApi> {
        Arc::clone(&self.api)
    }

    /// Resolve `user_id` through the backend and remember the result
    pub async fn sign_in(&self, user_id: &str) -> Result<User> {
        let user = self.api.get_user(user_id).await?;
        tracing::info!(user_id = %user.id, role = ?user.role, "Signed in");
        self.set_auth_user(Some(user.clone()));
        Ok(user)
    }

    pub fn set_auth_user(&self, user: Option<User>) {
        match self.auth_user.write() {
            Ok(mut slot) => *slot = user,
            Err(poisoned) => *poisoned.into_inner() = user,
        }
    }

    pub fn auth_user(&self) -> Option<User> {
        match self.auth_user.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// The signed-in user, or `NotSignedIn`
    pub fn require_user(&self) -> Result<User> {
        self.auth_user()
            .ok_or_else(|| VillaError::NotSignedIn("no user is signed in".to_string()))
    }

    pub fn notify(&self, kind: NotificationKind, title: &str, body: &str) {
        self.queue().push(kind, title, body);
    }

    /// Take every pending notification
    pub fn drain_notifications(&self) -> Vec<Notification> {
        self.queue().drain()
    }

    /// Forget the user, pending notifications and the stored token
    pub fn logout(&self) -> Result<()> {
        self.set_auth_user(None);
        self.queue().clear();
        if let Some(tokens) = &self.tokens {
            tokens.clear()?;
        }
        tracing::info!("Logged out");
        Ok(())
    }

    fn queue(&self) -> MutexGuard<'_, NotificationQueue> {
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for ClientStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientStore")
            .field("auth_user", &self.auth_user().map(|u| u.id))
            .field("pending_notifications", &self.queue().len())
            .finish()
    }
}
