pub mod booking;
pub mod doctor;
pub mod enums;
pub mod hospital;

pub use booking::{Booking, BookingInput, Review};
pub use doctor::Doctor;
pub use enums::BookingStatus;
pub use hospital::Hospital;

use serde::{Deserialize, Serialize};

/// Opaque handle to a bundled image asset.
///
/// The core never interprets it; bookings copy it verbatim from the
/// doctor record at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(pub String);

impl AssetRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }
}

impl From<&str> for AssetRef {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}
