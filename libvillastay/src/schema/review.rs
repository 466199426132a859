//! Guest reviews

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Schema;

/// One of the five sub-scores composing a review's overall rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewCategory {
    Accuracy,
    Cleanliness,
    Communication,
    Location,
    Value,
}

impl ReviewCategory {
    pub const ALL: [ReviewCategory; 5] = [
        ReviewCategory::Accuracy,
        ReviewCategory::Cleanliness,
        ReviewCategory::Communication,
        ReviewCategory::Location,
        ReviewCategory::Value,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReviewCategory::Accuracy => "Accuracy",
            ReviewCategory::Cleanliness => "Cleanliness",
            ReviewCategory::Communication => "Communication",
            ReviewCategory::Location => "Location",
            ReviewCategory::Value => "Value",
        }
    }
}

impl std::str::FromStr for ReviewCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReviewCategory::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown review category: '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct CategoryRatings {
    #[validate(range(min = 1, max = 5))]
    pub accuracy: u8,
    #[validate(range(min = 1, max = 5))]
    pub cleanliness: u8,
    #[validate(range(min = 1, max = 5))]
    pub communication: u8,
    #[validate(range(min = 1, max = 5))]
    pub location: u8,
    #[validate(range(min = 1, max = 5))]
    pub value: u8,
}

impl Schema for CategoryRatings {
    const ENTITY: &'static str = "CategoryRatings";
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct GuestReview {
    pub id: String,
    pub booking_id: String,
    pub villa_id: String,
    pub guest_user_id: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schema for GuestReview {
    const ENTITY: &'static str = "GuestReview";
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct CreateGuestReviewInput {
    #[validate(length(min = 1))]
    pub booking_id: String,
    #[validate(length(min = 1))]
    pub villa_id: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_ratings: Option<CategoryRatings>,
}

impl Schema for CreateGuestReviewInput {
    const ENTITY: &'static str = "CreateGuestReviewInput";

    fn extra_checks(&self) -> Result<(), String> {
        match &self.category_ratings {
            Some(ratings) => ratings.check().map_err(|e| e.to_string()),
            None => Ok(()),
        }
    }
}
