//! Booking backend API abstraction
//!
//! The backend is reached only through the [`BookingApi`] trait. The real
//! implementation is [`http::HttpBookingApi`]; [`mock::MockBookingApi`] serves
//! canned data for tests and offline demos.
//!
//! # Example
//!
//! ```no_run
//! use libvillastay::api::{BookingApi, PageRequest, http::HttpBookingApi};
//! use libvillastay::Config;
//!
//! # async fn example() -> libvillastay::Result<()> {
//! let config = Config::load()?;
//! let api = HttpBookingApi::from_config(&config, None)?;
//!
//! let page = api.list_messages("booking-123", PageRequest::first()).await?;
//! println!("{} messages in the first page", page.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::error::Result;
use crate::schema::{
    Booking, CreateGuestReviewInput, GuestReview, MessageEntry, SendMessageInput, ThreadEntry,
    ThreadStatus, User,
};

pub mod http;

// Mock API is available for all builds (not just tests) to support integration tests
pub mod mock;

/// Fixed page size for message history
pub const MESSAGE_PAGE_SIZE: usize = 50;

/// Offset/limit pair for a history page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

impl PageRequest {
    pub fn first() -> Self {
        Self::nth(0)
    }

    /// Page `index` (0-based) of [`MESSAGE_PAGE_SIZE`] messages
    pub fn nth(index: usize) -> Self {
        Self {
            limit: MESSAGE_PAGE_SIZE,
            offset: index * MESSAGE_PAGE_SIZE,
        }
    }
}

/// Operations the client needs from the booking backend
///
/// Implementations validate every decoded response against its schema and
/// report mismatches as `ApiError::Schema`.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// `GET /bookings?host_user_id=&status=`
    ///
    /// An empty `statuses` slice omits the `status` parameter entirely.
    async fn list_threads(&self, host_user_id: &str, statuses: &[ThreadStatus]) -> Result<Vec<ThreadEntry>>;

    /// `GET /bookings/:id/messages?limit=&offset=`
    async fn list_messages(&self, booking_id: &str, page: PageRequest) -> Result<Vec<MessageEntry>>;

    /// `POST /messages`
    async fn send_message(&self, input: &SendMessageInput) -> Result<MessageEntry>;

    /// `GET /bookings/:id`
    async fn get_booking(&self, booking_id: &str) -> Result<Booking>;

    /// `POST /reviews`
    async fn create_review(&self, input: &CreateGuestReviewInput) -> Result<GuestReview>;

    /// `GET /users/:id`
    async fn get_user(&self, user_id: &str) -> Result<User>;
}
