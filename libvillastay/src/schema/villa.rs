//! Villa listings and the inputs that create or edit them

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Schema;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VillaStatus {
    #[default]
    Draft,
    Active,
    Inactive,
    UnderReview,
    Live,
    Suspended,
}

impl VillaStatus {
    /// Statuses a host may set when creating a listing
    pub fn is_host_settable(&self) -> bool {
        matches!(self, VillaStatus::Draft | VillaStatus::Active | VillaStatus::Inactive)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct LocationData {
    pub lat: f64,
    pub lng: f64,
    pub city: String,
    pub address: String,
    pub postal_code: String,
    pub country: String,
}

impl Schema for LocationData {
    const ENTITY: &'static str = "LocationData";

    fn extra_checks(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!("lat {} outside [-90, 90]", self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(format!("lng {} outside [-180, 180]", self.lng));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct VillaPolicies {
    pub cancellation_tier: String,
    #[validate(range(min = 0.0))]
    pub security_deposit_usd: f64,
    pub house_rules: Vec<String>,
    pub checkin_time: String,
    pub checkout_time: String,
}

impl Schema for VillaPolicies {
    const ENTITY: &'static str = "VillaPolicies";
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Villa {
    pub id: String,
    #[validate(length(min = 1))]
    pub title: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location_data: LocationData,
    #[validate(range(min = 0.0))]
    pub price_per_night_usd: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price_usd_per_night: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaning_fee_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_fee_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_waiver_ratio: Option<f64>,
    pub max_guests: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pets: Option<u32>,
    pub bedrooms: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms_total: Option<u32>,
    pub bathrooms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms_total: Option<f64>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub host_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_user_id: Option<String>,
    #[serde(default)]
    pub status: VillaStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policies: Option<VillaPolicies>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schema for Villa {
    const ENTITY: &'static str = "Villa";

    fn extra_checks(&self) -> Result<(), String> {
        self.location_data.check().map_err(|e| e.to_string())?;
        if let Some(policies) = &self.policies {
            policies.check().map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateVillaInput {
    pub host_user_id: String,
    #[validate(length(min = 1))]
    pub slug: String,
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location_data: LocationData,
    pub bedrooms_total: u32,
    pub bathrooms_total: f64,
    #[validate(range(min = 1))]
    pub max_guests: u32,
    pub max_pets: u32,
    #[validate(range(min = 0.0))]
    pub base_price_usd_per_night: f64,
    #[validate(range(min = 0.0))]
    pub cleaning_fee_usd: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub service_fee_ratio: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub damage_waiver_ratio: f64,
    pub status: VillaStatus,
    pub policies: VillaPolicies,
}

impl Schema for CreateVillaInput {
    const ENTITY: &'static str = "CreateVillaInput";

    fn extra_checks(&self) -> Result<(), String> {
        if !self.status.is_host_settable() {
            return Err(format!(
                "status {:?} cannot be set on a new listing (draft, active or inactive only)",
                self.status
            ));
        }
        self.location_data.check().map_err(|e| e.to_string())?;
        self.policies.check().map_err(|e| e.to_string())
    }
}

/// Partial update: every field of [`CreateVillaInput`] becomes optional
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateVillaInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_data: Option<LocationData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms_total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms_total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_guests: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price_usd_per_night: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaning_fee_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_fee_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_waiver_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VillaStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policies: Option<VillaPolicies>,
}

impl Schema for UpdateVillaInput {
    const ENTITY: &'static str = "UpdateVillaInput";

    fn extra_checks(&self) -> Result<(), String> {
        if let Some(status) = self.status {
            if !status.is_host_settable() {
                return Err(format!("status {:?} cannot be set by a host", status));
            }
        }
        if let Some(location) = &self.location_data {
            location.check().map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRoomTypeInput {
    pub villa_id: String,
    #[serde(rename = "type")]
    pub room_type: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub beds_json: Vec<serde_json::Value>,
}

impl Schema for CreateRoomTypeInput {
    const ENTITY: &'static str = "CreateRoomTypeInput";
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAmenityInput {
    pub villa_id: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub category: String,
}

impl Schema for CreateAmenityInput {
    const ENTITY: &'static str = "CreateAmenityInput";
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePricingRuleInput {
    pub villa_id: String,
    pub rule_type: String,
    #[validate(range(min = 0.0))]
    pub multiplier: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl Schema for CreatePricingRuleInput {
    const ENTITY: &'static str = "CreatePricingRuleInput";

    fn extra_checks(&self) -> Result<(), String> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if end < start => {
                Err(format!("end_date {} is before start_date {}", end, start))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFileUploadInput {
    pub uploader_user_id: String,
    #[validate(length(min = 1))]
    pub purpose: String,
}

impl Schema for CreateFileUploadInput {
    const ENTITY: &'static str = "CreateFileUploadInput";
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Guidebook {
    pub id: String,
    pub villa_id: String,
    #[validate(length(min = 1))]
    pub title: String,
    pub content_md: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schema for Guidebook {
    const ENTITY: &'static str = "Guidebook";
}
