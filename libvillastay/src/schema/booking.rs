//! Bookings and the villa calendar

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Schema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Booking {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub villa_id: String,
    pub guest_user_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1))]
    pub guests: u32,
    #[validate(range(min = 0.0))]
    pub amount_usd: f64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

impl Schema for Booking {
    const ENTITY: &'static str = "Booking";

    fn extra_checks(&self) -> Result<(), String> {
        if self.check_in >= self.check_out {
            return Err(format!(
                "check_in {} must be before check_out {}",
                self.check_in, self.check_out
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CalendarEventType {
    Booking,
    Blocked,
    Maintenance,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct CalendarEvent {
    pub id: String,
    pub villa_id: String,
    #[validate(length(min = 1))]
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    pub event_type: CalendarEventType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schema for CalendarEvent {
    const ENTITY: &'static str = "CalendarEvent";

    fn extra_checks(&self) -> Result<(), String> {
        check_date_range(self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCalendarEventInput {
    pub villa_id: String,
    #[validate(length(min = 1))]
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    pub event_type: CalendarEventType,
}

impl Schema for CreateCalendarEventInput {
    const ENTITY: &'static str = "CreateCalendarEventInput";

    fn extra_checks(&self) -> Result<(), String> {
        check_date_range(self.start_date, self.end_date)
    }
}

fn check_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), String> {
    if end < start {
        Err(format!("end_date {} is before start_date {}", end, start))
    } else {
        Ok(())
    }
}
