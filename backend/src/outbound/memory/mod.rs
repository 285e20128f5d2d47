//! In-process trip repository.
//!
//! Backs the `plan-trip` binary and behaviour tests. State lives for the
//! lifetime of the adapter; callers that need it across runs load and dump
//! it as a JSON array of trips.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{TripRepository, TripRepositoryError};
use crate::domain::{Trip, TripId};

/// `TripRepository` keyed by trip identifier.
#[derive(Debug, Default)]
pub struct InMemoryTripRepository {
    store: Mutex<HashMap<TripId, Trip>>,
}

impl InMemoryTripRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-loaded with `trips`.
    pub fn with_trips(trips: impl IntoIterator<Item = Trip>) -> Self {
        let store = trips
            .into_iter()
            .map(|trip| (trip.trip_id.clone(), trip))
            .collect();
        Self {
            store: Mutex::new(store),
        }
    }

    /// Create a repository from a JSON array of trips.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when `bytes` is not an array of trips.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let trips: Vec<Trip> = serde_json::from_slice(bytes)?;
        Ok(Self::with_trips(trips))
    }

    /// Serialise the stored trips as a JSON array, ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when a trip cannot be serialised.
    pub async fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(&self.trips().await)
    }

    /// Snapshot of every stored trip, ordered by identifier.
    pub async fn trips(&self) -> Vec<Trip> {
        let guard = self.store.lock().await;
        let mut trips: Vec<Trip> = guard.values().cloned().collect();
        trips.sort_by(|left, right| left.trip_id.as_ref().cmp(right.trip_id.as_ref()));
        trips
    }
}

#[async_trait]
impl TripRepository for InMemoryTripRepository {
    async fn save(&self, trip: &Trip) -> Result<(), TripRepositoryError> {
        self.store
            .lock()
            .await
            .insert(trip.trip_id.clone(), trip.clone());
        Ok(())
    }

    async fn find_by_id(&self, trip_id: &TripId) -> Result<Option<Trip>, TripRepositoryError> {
        Ok(self.store.lock().await.get(trip_id).cloned())
    }

    async fn delete_by_id(&self, trip_id: &TripId) -> Result<(), TripRepositoryError> {
        self.store.lock().await.remove(trip_id);
        Ok(())
    }
}
