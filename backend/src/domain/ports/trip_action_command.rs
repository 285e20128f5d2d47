//! Driving port for trip mutations.
//!
//! Callers submit one mutation envelope (`type`, `elementId`, `invokedBy`,
//! `details.trip`) and receive either the stored trip or the identifier of
//! the deleted one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Trip, TripActionError, TripId, UserId};

/// Payload carried under `details`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripActionDetails {
    /// Trip attributes; full for create/edit/regenerate, partial for update.
    #[serde(default)]
    pub trip: Option<Value>,
}

/// One trip mutation request.
///
/// `action_type` stays a raw string so unrecognised actions surface as
/// [`TripActionError::UnsupportedAction`] rather than a decode failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripActionRequest {
    /// Mutation type, e.g. `CREATE`.
    #[serde(rename = "type")]
    pub action_type: String,
    /// Target trip; required for edit, update, and delete.
    #[serde(default)]
    pub element_id: Option<TripId>,
    /// User submitting the request.
    pub invoked_by: UserId,
    /// Mutation payload.
    #[serde(default, alias = "moreDetails")]
    pub details: TripActionDetails,
}

/// Result of a successful trip mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TripActionOutcome {
    /// The trip was stored.
    Saved {
        /// The stored trip.
        trip: Trip,
    },
    /// The trip was removed.
    Deleted {
        /// Identifier of the removed trip.
        trip_id: TripId,
    },
}

/// Port for executing trip mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripActionCommand: Send + Sync {
    /// Execute one mutation end to end.
    async fn invoke(&self, request: TripActionRequest)
    -> Result<TripActionOutcome, TripActionError>;
}

/// Fixture command that accepts deletes and rejects everything else.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTripActionCommand;

#[async_trait]
impl TripActionCommand for FixtureTripActionCommand {
    async fn invoke(
        &self,
        request: TripActionRequest,
    ) -> Result<TripActionOutcome, TripActionError> {
        match request.element_id {
            Some(trip_id) if request.action_type.eq_ignore_ascii_case("DELETE") => {
                Ok(TripActionOutcome::Deleted { trip_id })
            }
            _ => Err(TripActionError::unsupported_action(request.action_type)),
        }
    }
}
