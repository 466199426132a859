//! Guest review submission
//!
//! [`ReviewForm`] holds the editable draft and decides when it may be
//! submitted; [`ReviewService`] fetches the booking context and posts the
//! review.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::events::{Event, EventBus};
use crate::error::{Result, VillaError};
use crate::schema::{Booking, CategoryRatings, CreateGuestReviewInput, GuestReview, ReviewCategory};
use crate::store::{ClientStore, NotificationKind};

pub const REVIEW_TITLE: &str = "Guest Review";
pub const MAX_CONTENT_CHARS: usize = 2000;
pub const MIN_CONTENT_CHARS: usize = 10;
pub const REQUIRED_PHOTOS: usize = 5;
/// File types the photo picker advertises. Not enforced.
pub const ACCEPTED_PHOTO_TYPES: [&str; 2] = ["image/jpeg", "image/png"];
/// How long the confirmation stays up before leaving the form
pub const CONFIRMATION_DELAY: Duration = Duration::from_millis(1500);

pub const SUBMIT_FAILED_TITLE: &str = "Error";
pub const SUBMIT_FAILED_BODY: &str = "Failed to submit review";

/// Editable review draft
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewForm {
    // 0 = not rated yet
    ratings: [u8; 5],
    content: String,
    photos: Vec<PathBuf>,
}

impl ReviewForm {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(category: ReviewCategory) -> usize {
        match category {
            ReviewCategory::Accuracy => 0,
            ReviewCategory::Cleanliness => 1,
            ReviewCategory::Communication => 2,
            ReviewCategory::Location => 3,
            ReviewCategory::Value => 4,
        }
    }

    /// Set one category score; only 1 through 5 is accepted
    pub fn set_rating(&mut self, category: ReviewCategory, value: u8) -> Result<()> {
        if !(1..=5).contains(&value) {
            return Err(VillaError::InvalidInput(format!(
                "{} rating must be between 1 and 5, got {}",
                category.label(),
                value
            )));
        }
        self.ratings[Self::slot(category)] = value;
        Ok(())
    }

    /// Current score, 0 when unrated
    pub fn rating(&self, category: ReviewCategory) -> u8 {
        self.ratings[Self::slot(category)]
    }

    /// Replace the content, keeping at most [`MAX_CONTENT_CHARS`] characters
    pub fn set_content(&mut self, text: &str) {
        self.content = text.chars().take(MAX_CONTENT_CHARS).collect();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the photo selection with the first [`REQUIRED_PHOTOS`] paths
    pub fn attach_photos<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.photos = paths.into_iter().take(REQUIRED_PHOTOS).map(Into::into).collect();
    }

    pub fn photos(&self) -> &[PathBuf] {
        &self.photos
    }

    pub fn missing_ratings(&self) -> Vec<ReviewCategory> {
        ReviewCategory::ALL
            .into_iter()
            .filter(|c| self.rating(*c) == 0)
            .collect()
    }

    fn trimmed_len(&self) -> usize {
        self.content.trim().chars().count()
    }

    /// Everything still blocking submission, in form order
    pub fn blockers(&self) -> Vec<String> {
        let mut blockers = Vec::new();
        let missing = self.missing_ratings();
        if !missing.is_empty() {
            let names: Vec<_> = missing.iter().map(|c| c.label()).collect();
            blockers.push(format!("Rate {}", names.join(", ")));
        }
        if self.trimmed_len() < MIN_CONTENT_CHARS {
            blockers.push(format!(
                "Write at least {} characters ({}/{})",
                MIN_CONTENT_CHARS,
                self.trimmed_len(),
                MIN_CONTENT_CHARS
            ));
        }
        if self.photos.len() != REQUIRED_PHOTOS {
            blockers.push(format!(
                "Attach exactly {} photos ({}/{})",
                REQUIRED_PHOTOS,
                self.photos.len(),
                REQUIRED_PHOTOS
            ));
        }
        blockers
    }

    /// All five ratings set, enough content and exactly five photos
    pub fn is_complete(&self) -> bool {
        self.blockers().is_empty()
    }

    /// Mean of the five scores rounded half up; `None` until all are rated
    pub fn overall_rating(&self) -> Option<u8> {
        if self.ratings.contains(&0) {
            return None;
        }
        let sum: u16 = self.ratings.iter().map(|r| u16::from(*r)).sum();
        // sum / 5 has no .5 fraction, so adding 2 rounds to nearest
        Some(((sum + 2) / 5) as u8)
    }

    pub fn category_ratings(&self) -> Option<CategoryRatings> {
        self.overall_rating()?;
        let [accuracy, cleanliness, communication, location, value] = self.ratings;
        Some(CategoryRatings {
            accuracy,
            cleanliness,
            communication,
            location,
            value,
        })
    }

    /// Build the request body for `booking`
    pub fn to_input(&self, booking: &Booking) -> Result<CreateGuestReviewInput> {
        let blockers = self.blockers();
        if !blockers.is_empty() {
            return Err(VillaError::InvalidInput(blockers.join("; ")));
        }
        let rating = self
            .overall_rating()
            .ok_or_else(|| VillaError::InvalidInput("review is not fully rated".to_string()))?;
        Ok(CreateGuestReviewInput {
            booking_id: booking.id.clone(),
            villa_id: booking.villa_id.clone(),
            rating,
            title: REVIEW_TITLE.to_string(),
            content: self.content.clone(),
            category_ratings: self.category_ratings(),
        })
    }
}

/// Whether a path looks like one of [`ACCEPTED_PHOTO_TYPES`]
pub fn is_accepted_photo(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg" | "png"))
        .unwrap_or(false)
}

/// Submission lifecycle of the review form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReviewPhase {
    #[default]
    Editing,
    Submitting,
    Confirmed,
    /// Back to editing after a failed submission
    Failed(String),
}

impl ReviewPhase {
    pub fn is_submitting(&self) -> bool {
        matches!(self, ReviewPhase::Submitting)
    }

    pub fn is_editable(&self) -> bool {
        matches!(self, ReviewPhase::Editing | ReviewPhase::Failed(_))
    }

    /// Submit button state: complete form and nothing in flight
    pub fn can_submit(&self, form: &ReviewForm) -> bool {
        self.is_editable() && form.is_complete()
    }
}

/// Review operations against the shared client
#[derive(Clone)]
pub struct ReviewService {
    store: Arc<ClientStore>,
    event_bus: EventBus,
}

impl ReviewService {
    pub fn new(store: Arc<ClientStore>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Booking context shown above the form
    pub async fn load_booking(&self, booking_id: &str) -> Result<Booking> {
        let booking = self.store.api().get_booking(booking_id).await?;
        tracing::debug!(booking_id = %booking.id, nights = booking.nights(), "Loaded booking for review");
        Ok(booking)
    }

    /// Post the review. Failures queue an "Error" notification and leave
    /// the caller's form untouched.
    pub async fn submit(&self, booking: &Booking, form: &ReviewForm) -> Result<GuestReview> {
        let input = form.to_input(booking)?;

        match self.store.api().create_review(&input).await {
            Ok(review) => {
                tracing::info!(booking_id = %booking.id, review_id = %review.id, rating = review.rating, "Review submitted");
                self.event_bus.emit(Event::ReviewSubmitted {
                    booking_id: booking.id.clone(),
                    review_id: review.id.clone(),
                    rating: review.rating,
                });
                Ok(review)
            }
            Err(e) => {
                tracing::warn!(booking_id = %booking.id, error = %e, "Review submission failed");
                self.store
                    .notify(NotificationKind::Error, SUBMIT_FAILED_TITLE, SUBMIT_FAILED_BODY);
                self.event_bus.emit(Event::ReviewSubmitFailed {
                    booking_id: booking.id.clone(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::fixtures::booking;

    fn rated(scores: [u8; 5]) -> ReviewForm {
        let mut form = ReviewForm::new();
        for (category, score) in ReviewCategory::ALL.into_iter().zip(scores) {
            if score > 0 {
                form.set_rating(category, score).unwrap();
            }
        }
        form
    }

    fn photos(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("photo{}.jpg", i)).collect()
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let mut form = ReviewForm::new();
        assert!(form.set_rating(ReviewCategory::Value, 0).is_err());
        assert!(form.set_rating(ReviewCategory::Value, 6).is_err());
        assert_eq!(form.rating(ReviewCategory::Value), 0);
        form.set_rating(ReviewCategory::Value, 4).unwrap();
        assert_eq!(form.rating(ReviewCategory::Value), 4);
    }

    #[test]
    fn test_content_truncated() {
        let mut form = ReviewForm::new();
        form.set_content(&"é".repeat(2500));
        assert_eq!(form.content().chars().count(), MAX_CONTENT_CHARS);
    }

    #[test]
    fn test_photos_truncated_to_five() {
        let mut form = ReviewForm::new();
        form.attach_photos(photos(8));
        assert_eq!(form.photos().len(), 5);
        assert_eq!(form.photos()[0], PathBuf::from("photo0.jpg"));

        form.attach_photos(photos(2));
        assert_eq!(form.photos().len(), 2);
    }

    #[test]
    fn test_overall_rating_rounding() {
        assert_eq!(rated([5, 5, 5, 5, 5]).overall_rating(), Some(5));
        // 17 / 5 = 3.4
        assert_eq!(rated([3, 4, 3, 5, 2]).overall_rating(), Some(3));
        // 18 / 5 = 3.6
        assert_eq!(rated([3, 4, 4, 5, 2]).overall_rating(), Some(4));
        assert_eq!(rated([1, 1, 1, 1, 1]).overall_rating(), Some(1));
        assert_eq!(rated([3, 4, 0, 5, 2]).overall_rating(), None);
    }

    #[test]
    fn test_completeness_gate() {
        let mut form = rated([5, 5, 5, 5, 5]);
        form.set_content("A lovely, quiet villa with a great view of the bay.");
        form.attach_photos(photos(5));
        assert!(form.is_complete());
        assert!(ReviewPhase::Editing.can_submit(&form));
        assert!(!ReviewPhase::Submitting.can_submit(&form));

        form.set_content("   short    ");
        assert!(!form.is_complete());

        let mut form = rated([3, 4, 0, 5, 2]);
        form.set_content("A lovely, quiet villa with a great view of the bay.");
        form.attach_photos(photos(5));
        assert!(!form.is_complete());
        assert_eq!(form.missing_ratings(), vec![ReviewCategory::Communication]);
    }

    #[test]
    fn test_four_photos_blocks() {
        let mut form = rated([4, 4, 4, 4, 4]);
        form.set_content("Spotless and exactly as described.");
        form.attach_photos(photos(4));
        let blockers = form.blockers();
        assert_eq!(blockers.len(), 1);
        assert!(blockers[0].contains("4/5"));
    }

    #[test]
    fn test_to_input_uses_booking_context() {
        let mut form = rated([5, 4, 5, 4, 5]);
        form.set_content("Would happily stay again next summer.");
        form.attach_photos(photos(5));

        let input = form.to_input(&booking("bk-7")).unwrap();
        assert_eq!(input.booking_id, "bk-7");
        assert_eq!(input.villa_id, "villa-azul");
        assert_eq!(input.rating, 5);
        assert_eq!(input.title, REVIEW_TITLE);
        assert_eq!(input.category_ratings.unwrap().cleanliness, 4);
    }

    #[test]
    fn test_to_input_rejects_incomplete() {
        let form = rated([5, 5, 5, 5, 5]);
        let error = form.to_input(&booking("bk-7")).unwrap_err();
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_accepted_photo_extensions() {
        assert!(is_accepted_photo(Path::new("pool.JPG")));
        assert!(is_accepted_photo(Path::new("terrace.png")));
        assert!(!is_accepted_photo(Path::new("notes.pdf")));
        assert!(!is_accepted_photo(Path::new("noext")));
    }
}
