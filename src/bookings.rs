//! Booking repository — single source of truth for the appointment history.
//!
//! The whole collection is persisted as one JSON document in the key-value
//! store: every mutation rewrites the full blob. A booking is created
//! `upcoming` and may move to `completed` or `cancelled`; terminal statuses
//! admit no further moves. Attaching a review is an attribute mutation,
//! not a lifecycle move.

use tracing::warn;
use uuid::Uuid;

use crate::models::{Booking, BookingInput, BookingStatus, Review};
use crate::store::{KvStore, StoreError};

/// Store key for the serialized collection.
pub const BOOKINGS_KEY: &str = "bookings";

// ─── Errors & policy ──────────────────────────────────────────────────────────

/// Errors from booking repository operations.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("stored bookings are unreadable: {0}")]
    Deserialization(#[source] serde_json::Error),

    #[error("could not serialize bookings: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("could not persist bookings: {0}")]
    Persistence(#[source] StoreError),

    #[error("no booking with id {0}")]
    NotFound(String),

    #[error("booking {} is {} and cannot become {}", .id, .status.as_str(), .requested.as_str())]
    InvalidTransition {
        id: String,
        status: BookingStatus,
        requested: BookingStatus,
    },
}

/// How mutations behave when the target id is unknown or the booking is
/// already terminal: `Lenient` leaves the collection unchanged and reports
/// success (idempotent UI actions), `Strict` surfaces the error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MutationPolicy {
    #[default]
    Lenient,
    Strict,
}

// ─── Repository ───────────────────────────────────────────────────────────────

/// Owns the in-memory collection and mediates all reads/writes to the store.
///
/// Not internally synchronized — wrap in a lock when shared (see
/// [`crate::state::AppState`]). Memory and store stay consistent: a failed
/// persist rolls the in-memory mutation back before the error is returned.
pub struct BookingRepository<S: KvStore> {
    store: S,
    policy: MutationPolicy,
    bookings: Vec<Booking>,
}

impl<S: KvStore> BookingRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_policy(store, MutationPolicy::default())
    }

    pub fn with_policy(store: S, policy: MutationPolicy) -> Self {
        Self {
            store,
            policy,
            bookings: Vec::new(),
        }
    }

    // ── Reads ───────────────────────────────────────────────

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn find(&self, id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    /// Bookings under one status tab, in insertion order.
    pub fn with_status(&self, status: BookingStatus) -> Vec<&Booking> {
        self.bookings.iter().filter(|b| b.status == status).collect()
    }

    // ── Load & persist ──────────────────────────────────────

    /// Replace the in-memory collection with the stored one.
    ///
    /// A missing key leaves the collection empty and succeeds. An
    /// unreadable blob also leaves it empty but returns
    /// [`BookingError::Deserialization`] so the caller can log it; the
    /// expected recovery is to carry on with an empty history.
    pub fn load(&mut self) -> Result<(), BookingError> {
        self.bookings.clear();
        let Some(raw) = self.store.get(BOOKINGS_KEY)? else {
            return Ok(());
        };
        self.bookings =
            serde_json::from_str(&raw).map_err(BookingError::Deserialization)?;
        Ok(())
    }

    /// Write the whole collection. One retry on failure before giving up.
    fn save(&self) -> Result<(), BookingError> {
        let raw = serde_json::to_string(&self.bookings).map_err(BookingError::Serialization)?;
        if let Err(first) = self.store.set(BOOKINGS_KEY, &raw) {
            warn!("bookings write failed, retrying once: {first}");
            self.store
                .set(BOOKINGS_KEY, &raw)
                .map_err(BookingError::Persistence)?;
        }
        Ok(())
    }

    // ── Mutations ───────────────────────────────────────────

    /// Create a booking from the confirmed selection and persist it.
    pub fn add_booking(&mut self, input: BookingInput) -> Result<Booking, BookingError> {
        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            doctor_id: input.doctor_id,
            doctor_name: input.doctor_name,
            doctor_specialty: input.doctor_specialty,
            doctor_image: input.doctor_image,
            clinic: input.clinic,
            date: input.date,
            time: input.time,
            status: BookingStatus::Upcoming,
            review: None,
        };
        self.bookings.push(booking.clone());
        if let Err(e) = self.save() {
            self.bookings.pop();
            return Err(e);
        }
        Ok(booking)
    }

    pub fn cancel_booking(&mut self, id: &str) -> Result<(), BookingError> {
        self.transition(id, BookingStatus::Cancelled)
    }

    pub fn complete_booking(&mut self, id: &str) -> Result<(), BookingError> {
        self.transition(id, BookingStatus::Completed)
    }

    /// Attach (or replace) a review. Allowed in any status; the status
    /// itself is untouched.
    pub fn add_review(&mut self, id: &str, review: Review) -> Result<(), BookingError> {
        let Some(index) = self.bookings.iter().position(|b| b.id == id) else {
            return self.missing(id);
        };
        let previous = self.bookings[index].review.replace(review);
        if let Err(e) = self.save() {
            self.bookings[index].review = previous;
            return Err(e);
        }
        Ok(())
    }

    fn transition(&mut self, id: &str, target: BookingStatus) -> Result<(), BookingError> {
        let Some(index) = self.bookings.iter().position(|b| b.id == id) else {
            return self.missing(id);
        };
        let current = self.bookings[index].status;
        if !current.can_become(target) {
            return match self.policy {
                MutationPolicy::Lenient => Ok(()),
                MutationPolicy::Strict => Err(BookingError::InvalidTransition {
                    id: id.to_string(),
                    status: current,
                    requested: target,
                }),
            };
        }
        self.bookings[index].status = target;
        if let Err(e) = self.save() {
            self.bookings[index].status = current;
            return Err(e);
        }
        Ok(())
    }

    fn missing(&self, id: &str) -> Result<(), BookingError> {
        match self.policy {
            MutationPolicy::Lenient => Ok(()),
            MutationPolicy::Strict => Err(BookingError::NotFound(id.to_string())),
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetRef;
    use crate::store::MemoryStore;
    use std::cell::Cell;
    use std::collections::HashSet;

    fn input(doctor_id: &str) -> BookingInput {
        BookingInput {
            doctor_id: doctor_id.into(),
            doctor_name: "Dr. Sarah Johnson".into(),
            doctor_specialty: "Cardiologist".into(),
            doctor_image: AssetRef::new("assets/doctors/sarah-johnson.png"),
            clinic: "Women's Health Clinic".into(),
            date: "January 5, 2025".into(),
            time: "09:00 AM".into(),
        }
    }

    /// Store that fails the next N writes, then delegates to memory.
    struct FlakyStore {
        inner: MemoryStore,
        failures_left: Cell<u32>,
    }

    impl FlakyStore {
        fn failing(n: u32) -> Self {
            Self {
                inner: MemoryStore::new(),
                failures_left: Cell::new(n),
            }
        }
    }

    impl KvStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            let left = self.failures_left.get();
            if left > 0 {
                self.failures_left.set(left - 1);
                return Err(StoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "injected write failure",
                )));
            }
            self.inner.set(key, value)
        }
    }

    #[test]
    fn add_booking_starts_upcoming() {
        let mut repo = BookingRepository::new(MemoryStore::new());
        let booking = repo.add_booking(input("1")).unwrap();

        assert_eq!(booking.status, BookingStatus::Upcoming);
        assert_eq!(booking.date, "January 5, 2025");
        assert_eq!(booking.time, "09:00 AM");

        // Appears only under the Upcoming tab.
        assert_eq!(repo.with_status(BookingStatus::Upcoming).len(), 1);
        assert!(repo.with_status(BookingStatus::Completed).is_empty());
        assert!(repo.with_status(BookingStatus::Cancelled).is_empty());
    }

    #[test]
    fn reload_reproduces_collection() {
        let store = MemoryStore::new();
        let mut first = BookingRepository::new(&store);
        first.add_booking(input("1")).unwrap();
        first.add_booking(input("2")).unwrap();
        first.add_booking(input("3")).unwrap();
        let written = first.bookings().to_vec();

        let mut second = BookingRepository::new(&store);
        second.load().unwrap();
        assert_eq!(second.bookings(), written.as_slice());
    }

    #[test]
    fn ids_are_unique() {
        let mut repo = BookingRepository::new(MemoryStore::new());
        for _ in 0..50 {
            repo.add_booking(input("1")).unwrap();
        }
        let ids: HashSet<&str> = repo.bookings().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn cancel_moves_to_cancelled_tab() {
        let mut repo = BookingRepository::new(MemoryStore::new());
        let booking = repo.add_booking(input("1")).unwrap();

        repo.cancel_booking(&booking.id).unwrap();

        assert!(repo.with_status(BookingStatus::Upcoming).is_empty());
        let cancelled = repo.with_status(BookingStatus::Cancelled);
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].id, booking.id);
    }

    #[test]
    fn complete_moves_to_completed_tab() {
        let mut repo = BookingRepository::new(MemoryStore::new());
        let booking = repo.add_booking(input("1")).unwrap();

        repo.complete_booking(&booking.id).unwrap();
        assert_eq!(
            repo.find(&booking.id).unwrap().status,
            BookingStatus::Completed
        );
    }

    #[test]
    fn status_never_returns_to_upcoming() {
        let mut repo = BookingRepository::new(MemoryStore::new());
        let booking = repo.add_booking(input("1")).unwrap();

        repo.complete_booking(&booking.id).unwrap();
        // Lenient mode: a second transition is a no-op, never a regression.
        repo.cancel_booking(&booking.id).unwrap();
        assert_eq!(
            repo.find(&booking.id).unwrap().status,
            BookingStatus::Completed
        );
    }

    #[test]
    fn rebooking_after_cancel_works() {
        // Rescheduling a cancelled visit creates a fresh booking from the
        // same doctor snapshot; the cancelled record stays as history.
        let mut repo = BookingRepository::new(MemoryStore::new());
        let first = repo.add_booking(input("1")).unwrap();
        repo.cancel_booking(&first.id).unwrap();

        let second = repo.add_booking(input("1")).unwrap();
        assert_eq!(second.status, BookingStatus::Upcoming);
        assert_eq!(repo.with_status(BookingStatus::Cancelled).len(), 1);
        assert_eq!(repo.with_status(BookingStatus::Upcoming).len(), 1);
    }

    #[test]
    fn unknown_id_is_noop_by_default() {
        let mut repo = BookingRepository::new(MemoryStore::new());
        repo.add_booking(input("1")).unwrap();
        let before = repo.bookings().to_vec();

        repo.cancel_booking("no-such-id").unwrap();
        repo.complete_booking("no-such-id").unwrap();
        repo.add_review(
            "no-such-id",
            Review {
                rating: 5,
                comment: "great".into(),
            },
        )
        .unwrap();

        assert_eq!(repo.bookings(), before.as_slice());
    }

    #[test]
    fn strict_mode_surfaces_not_found() {
        let mut repo =
            BookingRepository::with_policy(MemoryStore::new(), MutationPolicy::Strict);
        let err = repo.cancel_booking("no-such-id").unwrap_err();
        assert!(matches!(err, BookingError::NotFound(_)));
    }

    #[test]
    fn strict_mode_rejects_terminal_transition() {
        let mut repo =
            BookingRepository::with_policy(MemoryStore::new(), MutationPolicy::Strict);
        let booking = repo.add_booking(input("1")).unwrap();
        repo.complete_booking(&booking.id).unwrap();

        let err = repo.cancel_booking(&booking.id).unwrap_err();
        assert!(matches!(err, BookingError::InvalidTransition { .. }));
        assert_eq!(
            repo.find(&booking.id).unwrap().status,
            BookingStatus::Completed
        );
    }

    #[test]
    fn review_attaches_without_touching_status() {
        let mut repo = BookingRepository::new(MemoryStore::new());
        let booking = repo.add_booking(input("1")).unwrap();
        repo.complete_booking(&booking.id).unwrap();

        let review = Review {
            rating: 5,
            comment: "Very attentive.".into(),
        };
        repo.add_review(&booking.id, review.clone()).unwrap();

        let stored = repo.find(&booking.id).unwrap();
        assert_eq!(stored.status, BookingStatus::Completed);
        assert_eq!(stored.review.as_ref(), Some(&review));
    }

    #[test]
    fn review_allowed_on_upcoming_booking() {
        let mut repo = BookingRepository::new(MemoryStore::new());
        let booking = repo.add_booking(input("1")).unwrap();

        repo.add_review(
            &booking.id,
            Review {
                rating: 4,
                comment: "early feedback".into(),
            },
        )
        .unwrap();
        assert_eq!(
            repo.find(&booking.id).unwrap().status,
            BookingStatus::Upcoming
        );
        assert!(repo.find(&booking.id).unwrap().review.is_some());
    }

    #[test]
    fn load_missing_key_starts_empty() {
        let mut repo = BookingRepository::new(MemoryStore::new());
        repo.load().unwrap();
        assert!(repo.bookings().is_empty());
    }

    #[test]
    fn load_malformed_blob_errors_and_leaves_empty() {
        let store = MemoryStore::new();
        store.set(BOOKINGS_KEY, "{not json").unwrap();

        let mut repo = BookingRepository::new(&store);
        let err = repo.load().unwrap_err();
        assert!(matches!(err, BookingError::Deserialization(_)));
        assert!(repo.bookings().is_empty());
    }

    #[test]
    fn load_replaces_previous_collection() {
        let store = MemoryStore::new();
        let mut repo = BookingRepository::new(&store);
        repo.add_booking(input("1")).unwrap();

        store.set(BOOKINGS_KEY, "[]").unwrap();
        repo.load().unwrap();
        assert!(repo.bookings().is_empty());
    }

    #[test]
    fn persisted_form_is_a_lowercase_status_array() {
        let store = MemoryStore::new();
        let mut repo = BookingRepository::new(&store);
        repo.add_booking(input("1")).unwrap();

        let raw = store.get(BOOKINGS_KEY).unwrap().unwrap();
        assert!(raw.starts_with('['));
        assert!(raw.contains(r#""status":"upcoming""#));
        // Absent review is omitted, not null.
        assert!(!raw.contains("review"));
    }

    #[test]
    fn failed_add_rolls_back_memory() {
        // Two failures: the write and its retry both fail.
        let mut repo = BookingRepository::new(FlakyStore::failing(2));
        let err = repo.add_booking(input("1")).unwrap_err();
        assert!(matches!(err, BookingError::Persistence(_)));
        assert!(repo.bookings().is_empty());
    }

    #[test]
    fn failed_transition_rolls_back_status() {
        let store = FlakyStore::failing(0);
        let mut repo = BookingRepository::new(store);
        let booking = repo.add_booking(input("1")).unwrap();

        repo.store.failures_left.set(2);
        let err = repo.cancel_booking(&booking.id).unwrap_err();
        assert!(matches!(err, BookingError::Persistence(_)));
        assert_eq!(
            repo.find(&booking.id).unwrap().status,
            BookingStatus::Upcoming
        );
    }

    #[test]
    fn failed_review_rolls_back_previous_review() {
        let mut repo = BookingRepository::new(FlakyStore::failing(0));
        let booking = repo.add_booking(input("1")).unwrap();
        let original = Review {
            rating: 3,
            comment: "ok".into(),
        };
        repo.add_review(&booking.id, original.clone()).unwrap();

        repo.store.failures_left.set(2);
        let err = repo
            .add_review(
                &booking.id,
                Review {
                    rating: 1,
                    comment: "replaced".into(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, BookingError::Persistence(_)));
        assert_eq!(repo.find(&booking.id).unwrap().review.as_ref(), Some(&original));
    }

    #[test]
    fn single_write_failure_recovers_via_retry() {
        let mut repo = BookingRepository::new(FlakyStore::failing(1));
        let booking = repo.add_booking(input("1")).unwrap();
        assert_eq!(repo.bookings().len(), 1);

        // The retried write actually reached the store.
        let raw = repo.store.inner.get(BOOKINGS_KEY).unwrap().unwrap();
        assert!(raw.contains(&booking.id));
    }
}
