//! In-memory favorites registries for doctors and medical centers.
//!
//! Membership is tested by id over an insertion-ordered list. Nothing is
//! persisted: both registries reset to empty on a cold start.

use crate::models::{Doctor, Hospital};

/// Records a registry can hold: anything exposing a stable string id.
pub trait FavoriteRecord {
    fn id(&self) -> &str;
}

impl FavoriteRecord for Doctor {
    fn id(&self) -> &str {
        &self.id
    }
}

impl FavoriteRecord for Hospital {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Insertion-ordered membership list.
///
/// `add` appends unconditionally — duplicate adds produce duplicate
/// entries, and one `remove` drops every entry with the id.
#[derive(Debug)]
pub struct FavoritesRegistry<T> {
    entries: Vec<T>,
}

impl<T> Default for FavoritesRegistry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: FavoriteRecord> FavoritesRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: T) {
        self.entries.push(record);
    }

    pub fn remove(&mut self, id: &str) {
        self.entries.retain(|record| record.id() != id);
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.entries.iter().any(|record| record.id() == id)
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub type DoctorFavorites = FavoritesRegistry<Doctor>;
pub type HospitalFavorites = FavoritesRegistry<Hospital>;
