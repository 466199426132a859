//! Mock booking API for testing
//!
//! A configurable in-memory backend that can serve canned threads, message
//! history and bookings, record what was sent, and simulate failures and
//! latency. Used by integration tests and by the `--demo` mode of the front
//! ends, so no network access or credentials are needed.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::time::sleep;

use super::{BookingApi, PageRequest};
use crate::error::{ApiError, Result};
use crate::schema::{
    Booking, CreateGuestReviewInput, GuestReview, MessageEntry, MessageType, SendMessageInput,
    SenderRole, ThreadEntry, ThreadStatus, User,
};

pub mod fixtures;

/// Configuration for mock backend behavior
#[derive(Debug, Clone)]
pub struct MockApiConfig {
    /// Users resolvable through `get_user`
    pub users: Vec<User>,

    /// Threads returned by `list_threads`
    pub threads: Vec<ThreadEntry>,

    /// Message history per booking id, in the order the backend returns it
    pub messages: HashMap<String, Vec<MessageEntry>>,

    /// Bookings resolvable through `get_booking`
    pub bookings: Vec<Booking>,

    /// Apply the status filter server-side. When false every thread is
    /// returned regardless of the requested statuses.
    pub honor_status_filter: bool,

    /// Error returned by `list_threads`
    pub threads_error: Option<ApiError>,

    /// Error returned by `send_message`
    pub send_error: Option<ApiError>,

    /// Error returned by `create_review`
    pub review_error: Option<ApiError>,

    /// Delay before completing operations (simulates network latency)
    pub delay: Duration,
}

impl Default for MockApiConfig {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            threads: Vec::new(),
            messages: HashMap::new(),
            bookings: Vec::new(),
            honor_status_filter: true,
            threads_error: None,
            send_error: None,
            review_error: None,
            delay: Duration::from_millis(0),
        }
    }
}

/// Mock backend for testing
pub struct MockBookingApi {
    config: MockApiConfig,
    messages: Mutex<HashMap<String, Vec<MessageEntry>>>,
    thread_requests: Mutex<Vec<Vec<ThreadStatus>>>,
    page_requests: Mutex<Vec<(String, PageRequest)>>,
    sent: Mutex<Vec<SendMessageInput>>,
    reviews: Mutex<Vec<CreateGuestReviewInput>>,
}

impl MockBookingApi {
    pub fn new(config: MockApiConfig) -> Self {
        let messages = config.messages.clone();
        Self {
            config,
            messages: Mutex::new(messages),
            thread_requests: Mutex::new(Vec::new()),
            page_requests: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            reviews: Mutex::new(Vec::new()),
        }
    }

    /// A backend with no data at all
    pub fn empty() -> Self {
        Self::new(MockApiConfig::default())
    }

    /// A backend that fails every message send
    pub fn send_failure(error: ApiError) -> Self {
        Self::new(MockApiConfig {
            send_error: Some(error),
            ..Default::default()
        })
    }

    /// A backend that fails every review submission
    pub fn review_failure(error: ApiError) -> Self {
        Self::new(MockApiConfig {
            review_error: Some(error),
            ..Default::default()
        })
    }

    /// Seeded backend used by the front ends' `--demo` mode
    pub fn demo() -> Self {
        Self::new(fixtures::demo_config())
    }

    /// Number of `list_threads` calls
    pub fn thread_call_count(&self) -> usize {
        lock(&self.thread_requests).len()
    }

    /// Status sets requested through `list_threads`, in call order
    pub fn thread_requests(&self) -> Vec<Vec<ThreadStatus>> {
        lock(&self.thread_requests).clone()
    }

    /// Pages requested through `list_messages`, in call order
    pub fn page_requests(&self) -> Vec<(String, PageRequest)> {
        lock(&self.page_requests).clone()
    }

    /// Number of `send_message` calls, including failed ones
    pub fn send_call_count(&self) -> usize {
        lock(&self.sent).len()
    }

    /// Every `send_message` input received
    pub fn sent_messages(&self) -> Vec<SendMessageInput> {
        lock(&self.sent).clone()
    }

    /// Every `create_review` input received
    pub fn submitted_reviews(&self) -> Vec<CreateGuestReviewInput> {
        lock(&self.reviews).clone()
    }

    async fn simulate_latency(&self) {
        if !self.config.delay.is_zero() {
            sleep(self.config.delay).await;
        }
    }
}

#[async_trait]
impl BookingApi for MockBookingApi {
    async fn list_threads(&self, host_user_id: &str, statuses: &[ThreadStatus]) -> Result<Vec<ThreadEntry>> {
        lock(&self.thread_requests).push(statuses.to_vec());
        self.simulate_latency().await;

        if let Some(error) = &self.config.threads_error {
            return Err(error.clone().into());
        }
        tracing::trace!(host_user_id = %host_user_id, "Mock thread listing");

        let threads = self
            .config
            .threads
            .iter()
            .filter(|t| {
                !self.config.honor_status_filter || statuses.is_empty() || statuses.contains(&t.status)
            })
            .cloned()
            .collect();
        Ok(threads)
    }

    async fn list_messages(&self, booking_id: &str, page: PageRequest) -> Result<Vec<MessageEntry>> {
        lock(&self.page_requests).push((booking_id.to_string(), page));
        self.simulate_latency().await;

        let messages = lock(&self.messages);
        let history = messages.get(booking_id).map(Vec::as_slice).unwrap_or(&[]);
        let page = history
            .iter()
            .skip(page.offset)
            .take(page.limit)
            .cloned()
            .collect();
        Ok(page)
    }

    async fn send_message(&self, input: &SendMessageInput) -> Result<MessageEntry> {
        lock(&self.sent).push(input.clone());
        self.simulate_latency().await;

        if let Some(error) = &self.config.send_error {
            return Err(error.clone().into());
        }

        let message = MessageEntry {
            id: uuid::Uuid::new_v4().to_string(),
            sender_role: Some(SenderRole::Host),
            sender_name: None,
            sender_id: None,
            recipient_id: None,
            body: input.body.clone(),
            sent_at: Utc::now(),
            read_at: None,
            read: false,
            kind: MessageType::Text,
            template_id: None,
        };
        lock(&self.messages)
            .entry(input.booking_id.clone())
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn get_booking(&self, booking_id: &str) -> Result<Booking> {
        self.simulate_latency().await;
        self.config
            .bookings
            .iter()
            .find(|b| b.id == booking_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("booking {}", booking_id)).into())
    }

    async fn create_review(&self, input: &CreateGuestReviewInput) -> Result<GuestReview> {
        lock(&self.reviews).push(input.clone());
        self.simulate_latency().await;

        if let Some(error) = &self.config.review_error {
            return Err(error.clone().into());
        }

        let guest_user_id = self
            .config
            .bookings
            .iter()
            .find(|b| b.id == input.booking_id)
            .map(|b| b.guest_user_id.clone())
            .unwrap_or_default();
        let now = Utc::now();
        Ok(GuestReview {
            id: uuid::Uuid::new_v4().to_string(),
            booking_id: input.booking_id.clone(),
            villa_id: input.villa_id.clone(),
            guest_user_id,
            rating: input.rating,
            title: input.title.clone(),
            content: input.content.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_user(&self, user_id: &str) -> Result<User> {
        self.simulate_latency().await;
        self.config
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("user {}", user_id)).into())
    }
}

impl std::fmt::Debug for MockBookingApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBookingApi")
            .field("threads", &self.config.threads.len())
            .field("bookings", &self.config.bookings.len())
            .finish()
    }
}

// A panicking test thread must not poison the recorders for the rest
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::fixtures::{history, thread};
    use super::*;

    #[tokio::test]
    async fn test_status_filter_applied() {
        let api = MockBookingApi::new(MockApiConfig {
            threads: vec![
                thread("b1", ThreadStatus::Inquiry),
                thread("b2", ThreadStatus::Confirmed),
            ],
            ..Default::default()
        });

        let threads = api.list_threads("host-1", &[ThreadStatus::Inquiry]).await.unwrap();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].booking_id, "b1");

        let all = api.list_threads("host-1", &[]).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(api.thread_call_count(), 2);
    }

    #[tokio::test]
    async fn test_pages_slice_history() {
        let mut messages = HashMap::new();
        messages.insert("b1".to_string(), history(120));
        let api = MockBookingApi::new(MockApiConfig {
            messages,
            ..Default::default()
        });

        assert_eq!(api.list_messages("b1", PageRequest::nth(0)).await.unwrap().len(), 50);
        assert_eq!(api.list_messages("b1", PageRequest::nth(2)).await.unwrap().len(), 20);
        assert!(api.list_messages("b1", PageRequest::nth(3)).await.unwrap().is_empty());
        assert!(api.list_messages("missing", PageRequest::first()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_appends_to_history() {
        let api = MockBookingApi::empty();
        let input = SendMessageInput {
            booking_id: "b1".to_string(),
            body: "Hello".to_string(),
        };
        let sent = api.send_message(&input).await.unwrap();
        assert_eq!(sent.body, "Hello");

        let page = api.list_messages("b1", PageRequest::first()).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(api.sent_messages(), vec![input]);
    }

    #[tokio::test]
    async fn test_send_failure_still_recorded() {
        let api = MockBookingApi::send_failure(ApiError::Server("status 500".to_string()));
        let input = SendMessageInput {
            booking_id: "b1".to_string(),
            body: "Hello".to_string(),
        };
        assert!(api.send_message(&input).await.is_err());
        assert_eq!(api.send_call_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_booking_not_found() {
        let api = MockBookingApi::empty();
        let error = api.get_booking("nope").await.unwrap_err();
        assert!(matches!(error, crate::VillaError::Api(ApiError::NotFound(_))));
    }
}
