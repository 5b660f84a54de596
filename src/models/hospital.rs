use serde::{Deserialize, Serialize};

use super::AssetRef;

/// A medical center card in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: String,
    pub name: String,
    pub address: String,
    pub image: AssetRef,
    pub rating: f32,
    pub reviews: u32,
    /// Facility label, e.g. "General" or "Clinic".
    pub kind: String,
    /// Display-only distance label ("2.5 km/40min"), not a measurement.
    pub distance: String,
}
