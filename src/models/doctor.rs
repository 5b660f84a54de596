use serde::{Deserialize, Serialize};

use super::AssetRef;

/// A provider card in the directory.
///
/// Bookings snapshot the fields they need at creation time; the catalog
/// list stays the live record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub clinic: String,
    pub rating: f32,
    pub reviews: u32,
    pub image: AssetRef,
}
