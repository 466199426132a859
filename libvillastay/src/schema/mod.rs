//! Shared data schemas
//!
//! These types are the contract between Villastay clients and the booking
//! backend. Each one derives serde for the wire format and `validator::Validate`
//! for field-level rules; cross-field rules live in [`Schema::extra_checks`].
//! Responses decoded by the API client are run through [`Schema::check`]
//! before they reach a service.

pub mod booking;
pub mod host;
pub mod message;
pub mod review;
pub mod support;
pub mod user;
pub mod villa;

pub use booking::{Booking, BookingStatus, CalendarEvent, CalendarEventType, CreateCalendarEventInput};
pub use host::{Host, LoyaltyCredit, Payout, PayoutStatus, PricingRecommendation};
pub use message::{MessageEntry, MessageType, SendMessageInput, SenderRole, ThreadEntry, ThreadStatus};
pub use review::{CategoryRatings, CreateGuestReviewInput, GuestReview, ReviewCategory};
pub use support::{TicketDraft, TicketPriority};
pub use user::{CreateUserInput, Role, UpdateUserInput, User};
pub use villa::{
    CreateAmenityInput, CreateFileUploadInput, CreatePricingRuleInput, CreateRoomTypeInput,
    CreateVillaInput, Guidebook, LocationData, UpdateVillaInput, Villa, VillaPolicies, VillaStatus,
};

use crate::error::SchemaError;
use validator::Validate;

/// Runtime validation for a schema type
pub trait Schema: Validate {
    /// Entity name used in error messages
    const ENTITY: &'static str;

    /// Rules spanning several fields
    fn extra_checks(&self) -> Result<(), String> {
        Ok(())
    }

    /// Run field rules, then cross-field rules
    fn check(&self) -> Result<(), SchemaError> {
        self.validate()
            .map_err(|e| SchemaError::new(Self::ENTITY, e.to_string()))?;
        self.extra_checks()
            .map_err(|details| SchemaError::new(Self::ENTITY, details))
    }
}

/// Check every record of a list, reporting the first failure with its index
pub fn check_all<T: Schema>(items: &[T]) -> Result<(), SchemaError> {
    for (index, item) in items.iter().enumerate() {
        item.check().map_err(|e| SchemaError {
            entity: format!("{}[{}]", e.entity, index),
            details: e.details,
        })?;
    }
    Ok(())
}
