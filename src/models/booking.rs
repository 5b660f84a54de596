use serde::{Deserialize, Serialize};

use super::enums::BookingStatus;
use super::AssetRef;

/// Input for creating a booking: the doctor snapshot plus the confirmed
/// date and time labels. Id and status are assigned by the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingInput {
    pub doctor_id: String,
    pub doctor_name: String,
    pub doctor_specialty: String,
    pub doctor_image: AssetRef,
    pub clinic: String,
    /// Long-form date label, e.g. "January 5, 2025".
    pub date: String,
    /// Time-slot label, e.g. "09:00 AM".
    pub time: String,
}

/// A review attached to a booking after the visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub rating: u8,
    pub comment: String,
}

/// A scheduled appointment with lifecycle status.
///
/// Doctor fields are a snapshot taken at creation — later edits to the
/// directory record do not reach past bookings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub doctor_specialty: String,
    pub doctor_image: AssetRef,
    pub clinic: String,
    pub date: String,
    pub time: String,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<Review>,
}
