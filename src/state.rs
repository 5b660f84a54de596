//! App-wide service objects, constructed once and handed to the
//! presentation layer by reference.
//!
//! Replaces app-wide context singletons with explicit ownership: the
//! booking repository, both favorites registries and the authenticator
//! live behind `RwLock`s so one `AppState` can be shared across the UI
//! shell. The repository lock is also what serializes writers — the
//! store itself makes no read-modify-write guarantee.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::error;

use crate::auth::Authenticator;
use crate::bookings::{BookingError, BookingRepository, MutationPolicy};
use crate::catalog;
use crate::config;
use crate::favorites::{DoctorFavorites, HospitalFavorites};
use crate::models::{Doctor, Hospital};
use crate::store::{FileStore, KvStore, StoreError};

/// Errors surfaced by state construction and access.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("state lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Booking(#[from] BookingError),
}

/// Transport-agnostic application state.
pub struct AppState<S: KvStore> {
    bookings: RwLock<BookingRepository<S>>,
    favorite_doctors: RwLock<DoctorFavorites>,
    favorite_hospitals: RwLock<HospitalFavorites>,
    auth: RwLock<Authenticator>,
    /// Directory lists, injected at construction. Read-only.
    doctors: Vec<Doctor>,
    hospitals: Vec<Hospital>,
}

impl<S: KvStore> AppState<S> {
    pub fn new(store: S, doctors: Vec<Doctor>, hospitals: Vec<Hospital>) -> Self {
        Self::with_policy(store, MutationPolicy::default(), doctors, hospitals)
    }

    pub fn with_policy(
        store: S,
        policy: MutationPolicy,
        doctors: Vec<Doctor>,
        hospitals: Vec<Hospital>,
    ) -> Self {
        Self {
            bookings: RwLock::new(BookingRepository::with_policy(store, policy)),
            favorite_doctors: RwLock::new(DoctorFavorites::new()),
            favorite_hospitals: RwLock::new(HospitalFavorites::new()),
            auth: RwLock::new(Authenticator::new()),
            doctors,
            hospitals,
        }
    }

    /// Load the persisted booking history.
    ///
    /// An unreadable blob is logged and treated as an empty history — the
    /// app keeps running; the user is never blocked on old data.
    pub fn load_bookings(&self) -> Result<(), StateError> {
        let mut repo = self.bookings.write().map_err(|_| StateError::LockPoisoned)?;
        match repo.load() {
            Ok(()) => Ok(()),
            Err(e @ BookingError::Deserialization(_)) => {
                error!("ignoring stored bookings: {e}");
                Ok(())
            }
            Err(other) => Err(other.into()),
        }
    }

    // ── Guarded access ──────────────────────────────────────

    pub fn bookings(&self) -> Result<RwLockReadGuard<'_, BookingRepository<S>>, StateError> {
        self.bookings.read().map_err(|_| StateError::LockPoisoned)
    }

    pub fn bookings_mut(
        &self,
    ) -> Result<RwLockWriteGuard<'_, BookingRepository<S>>, StateError> {
        self.bookings.write().map_err(|_| StateError::LockPoisoned)
    }

    pub fn favorite_doctors(&self) -> Result<RwLockReadGuard<'_, DoctorFavorites>, StateError> {
        self.favorite_doctors
            .read()
            .map_err(|_| StateError::LockPoisoned)
    }

    pub fn favorite_doctors_mut(
        &self,
    ) -> Result<RwLockWriteGuard<'_, DoctorFavorites>, StateError> {
        self.favorite_doctors
            .write()
            .map_err(|_| StateError::LockPoisoned)
    }

    pub fn favorite_hospitals(
        &self,
    ) -> Result<RwLockReadGuard<'_, HospitalFavorites>, StateError> {
        self.favorite_hospitals
            .read()
            .map_err(|_| StateError::LockPoisoned)
    }

    pub fn favorite_hospitals_mut(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HospitalFavorites>, StateError> {
        self.favorite_hospitals
            .write()
            .map_err(|_| StateError::LockPoisoned)
    }

    pub fn auth(&self) -> Result<RwLockReadGuard<'_, Authenticator>, StateError> {
        self.auth.read().map_err(|_| StateError::LockPoisoned)
    }

    pub fn auth_mut(&self) -> Result<RwLockWriteGuard<'_, Authenticator>, StateError> {
        self.auth.write().map_err(|_| StateError::LockPoisoned)
    }

    // ── Directory ───────────────────────────────────────────

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn hospitals(&self) -> &[Hospital] {
        &self.hospitals
    }

    /// Directory search used by the doctors screen.
    pub fn search_doctors(&self, query: &str, specialty: Option<&str>) -> Vec<&Doctor> {
        catalog::filter_doctors(&self.doctors, query, specialty)
    }

    /// Directory search used by the map screen.
    pub fn search_hospitals(&self, query: &str) -> Vec<&Hospital> {
        catalog::filter_hospitals(&self.hospitals, query)
    }
}

impl AppState<FileStore> {
    /// Open the on-disk state under the default data directory and load
    /// the persisted booking history.
    pub fn open(doctors: Vec<Doctor>, hospitals: Vec<Hospital>) -> Result<Self, StateError> {
        let store = FileStore::open(config::store_dir())?;
        let state = Self::new(store, doctors, hospitals);
        state.load_bookings()?;
        Ok(state)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
