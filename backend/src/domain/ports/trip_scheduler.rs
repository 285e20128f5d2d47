//! Port for the downstream itinerary scheduler.
//!
//! The scheduler receives the aggregated event pool together with the trip
//! and returns the trip with its itinerary filled in. How days are arranged
//! is owned entirely by the adapter.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Event, Trip};

define_port_error! {
    /// Errors raised by scheduler adapters.
    pub enum TripSchedulerError {
        /// The scheduler could not be reached or exceeded its time budget.
        Unavailable { message: String } =>
            "trip scheduler unavailable: {message}",
        /// The scheduler could not build an itinerary from the pool.
        Rejected { message: String } =>
            "trip scheduler rejected the trip: {message}",
    }
}

/// Port for turning an event pool into a scheduled trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripScheduler: Send + Sync {
    /// Arrange `events` into a day-by-day itinerary for `trip`.
    async fn schedule(&self, events: Vec<Event>, trip: Trip) -> Result<Trip, TripSchedulerError>;
}

/// Fixture scheduler returning the trip without an itinerary.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTripScheduler;

#[async_trait]
impl TripScheduler for FixtureTripScheduler {
    async fn schedule(&self, _events: Vec<Event>, trip: Trip) -> Result<Trip, TripSchedulerError> {
        Ok(trip)
    }
}
