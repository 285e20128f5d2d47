//! Trip mutation orchestration.
//!
//! The service implements the [`TripActionCommand`] driving port. Create,
//! edit, and regenerate requests run the aggregation pipeline; update and
//! delete requests only touch the repository. Every successful path ends in
//! exactly one save or delete, and nothing is written before that point.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    RecommendationSource, TripActionCommand, TripActionDetails, TripActionOutcome,
    TripActionRequest, TripRepository, TripScheduler, TripSchedulerError,
};
use crate::domain::{
    EventAggregationConfig, EventAggregator, EventQuota, OperationMode, PipelineStage, Trip,
    TripActionError, TripAttributes, TripAttributesPatch, TripId, UserId,
};

/// Collaborators injected into [`TripActionService`].
#[derive(Clone)]
pub struct TripActionServicePorts {
    /// Recommendation provider.
    pub source: Arc<dyn RecommendationSource>,
    /// Trip persistence.
    pub repository: Arc<dyn TripRepository>,
    /// Downstream itinerary scheduler.
    pub scheduler: Arc<dyn TripScheduler>,
}

impl TripActionServicePorts {
    /// Bundle the service collaborators.
    pub fn new(
        source: Arc<dyn RecommendationSource>,
        repository: Arc<dyn TripRepository>,
        scheduler: Arc<dyn TripScheduler>,
    ) -> Self {
        Self {
            source,
            repository,
            scheduler,
        }
    }
}

/// Service limits for trip mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripActionServiceConfig {
    /// Aggregation limits.
    pub aggregation: EventAggregationConfig,
    /// Budget for one scheduler call.
    pub scheduler_timeout: Duration,
}

impl Default for TripActionServiceConfig {
    fn default() -> Self {
        Self {
            aggregation: EventAggregationConfig::default(),
            scheduler_timeout: Duration::from_secs(30),
        }
    }
}

/// Domain service executing trip mutations.
#[derive(Clone)]
pub struct TripActionService {
    aggregator: EventAggregator,
    repository: Arc<dyn TripRepository>,
    scheduler: Arc<dyn TripScheduler>,
    scheduler_timeout: Duration,
}

impl TripActionService {
    /// Wire the service from its collaborators.
    /// ```rust,ignore
    /// let service = TripActionService::new(ports, TripActionServiceConfig::default());
    /// ```
    pub fn new(ports: TripActionServicePorts, config: TripActionServiceConfig) -> Self {
        let TripActionServicePorts {
            source,
            repository,
            scheduler,
        } = ports;
        Self {
            aggregator: EventAggregator::new(source, config.aggregation),
            repository,
            scheduler,
            scheduler_timeout: config.scheduler_timeout,
        }
    }

    async fn generate_trip(
        &self,
        mode: OperationMode,
        request: TripActionRequest,
    ) -> Result<TripActionOutcome, TripActionError> {
        let TripActionRequest {
            element_id,
            invoked_by,
            details,
            ..
        } = request;
        let (trip_id, user_id) = self.resolve_identity(mode, element_id, invoked_by).await?;
        let attributes: TripAttributes = trip_payload(details)?;
        let mut trip = Trip::from_attributes(trip_id, user_id, attributes)?;

        let quota = EventQuota::compute(
            trip.length,
            trip.day_load.load_value(),
            trip.category_count(),
            mode,
        );
        info!(
            stage = %PipelineStage::QuotaComputed,
            trip_id = %trip.trip_id,
            days = trip.length,
            per_category = quota.per_category,
            total = quota.total,
            "derived event quotas"
        );

        let pool = self.aggregator.aggregate(&trip, quota).await?;
        let events = pool.into_events();

        let trip = if mode.builds_pool() {
            debug!(stage = %PipelineStage::PoolFinalized, pool_size = events.len());
            trip.events_pool = events;
            trip
        } else {
            debug!(stage = %PipelineStage::ScheduleRequested, pool_size = events.len());
            self.schedule(events, trip).await?
        };

        self.persist(&trip).await?;
        Ok(TripActionOutcome::Saved { trip })
    }

    async fn resolve_identity(
        &self,
        mode: OperationMode,
        element_id: Option<TripId>,
        invoked_by: UserId,
    ) -> Result<(TripId, UserId), TripActionError> {
        match mode {
            OperationMode::Edit => {
                let existing = self.find_existing(mode, element_id).await?;
                Ok((existing.trip_id, existing.user_id))
            }
            _ => Ok((element_id.unwrap_or_else(TripId::random), invoked_by)),
        }
    }

    async fn schedule(
        &self,
        events: Vec<crate::domain::Event>,
        trip: Trip,
    ) -> Result<Trip, TripActionError> {
        let budget = self.scheduler_timeout;
        match tokio::time::timeout(budget, self.scheduler.schedule(events, trip)).await {
            Ok(result) => result.map_err(|error| {
                warn!(%error, "trip scheduler failed");
                TripActionError::from(error)
            }),
            Err(_) => {
                warn!(?budget, "trip scheduler timed out");
                Err(TripSchedulerError::unavailable(format!(
                    "scheduler exceeded {}ms",
                    budget.as_millis()
                ))
                .into())
            }
        }
    }

    async fn update_trip(
        &self,
        request: TripActionRequest,
    ) -> Result<TripActionOutcome, TripActionError> {
        let TripActionRequest {
            element_id,
            details,
            ..
        } = request;
        let mut trip = self.find_existing(OperationMode::Update, element_id).await?;
        let patch: TripAttributesPatch = trip_payload(details)?;
        trip.apply_patch(patch)?;

        self.persist(&trip).await?;
        Ok(TripActionOutcome::Saved { trip })
    }

    async fn delete_trip(
        &self,
        request: TripActionRequest,
    ) -> Result<TripActionOutcome, TripActionError> {
        let trip = self
            .find_existing(OperationMode::Delete, request.element_id)
            .await?;

        debug!(stage = %PipelineStage::PersistRequested, trip_id = %trip.trip_id, "deleting trip");
        self.repository.delete_by_id(&trip.trip_id).await?;
        info!(stage = %PipelineStage::Done, trip_id = %trip.trip_id, "trip deleted");
        Ok(TripActionOutcome::Deleted {
            trip_id: trip.trip_id,
        })
    }

    async fn find_existing(
        &self,
        mode: OperationMode,
        element_id: Option<TripId>,
    ) -> Result<Trip, TripActionError> {
        let trip_id = element_id.ok_or_else(|| {
            TripActionError::invalid_request(format!("{mode} requires an elementId"))
        })?;
        self.repository
            .find_by_id(&trip_id)
            .await?
            .ok_or_else(|| TripActionError::not_found(trip_id))
    }

    async fn persist(&self, trip: &Trip) -> Result<(), TripActionError> {
        debug!(stage = %PipelineStage::PersistRequested, trip_id = %trip.trip_id, "saving trip");
        self.repository.save(trip).await?;
        info!(stage = %PipelineStage::Done, trip_id = %trip.trip_id, "trip saved");
        Ok(())
    }
}

#[async_trait]
impl TripActionCommand for TripActionService {
    async fn invoke(
        &self,
        request: TripActionRequest,
    ) -> Result<TripActionOutcome, TripActionError> {
        let mode: OperationMode = request
            .action_type
            .parse()
            .map_err(|error: crate::domain::ParseOperationModeError| {
                TripActionError::unsupported_action(error.input)
            })?;
        debug!(stage = %PipelineStage::Idle, action = %mode, invoked_by = %request.invoked_by);

        match mode {
            OperationMode::Create | OperationMode::Edit | OperationMode::Regenerate => {
                self.generate_trip(mode, request).await
            }
            OperationMode::Update => self.update_trip(request).await,
            OperationMode::Delete => self.delete_trip(request).await,
        }
    }
}

fn trip_payload<T: DeserializeOwned>(details: TripActionDetails) -> Result<T, TripActionError> {
    let raw = details
        .trip
        .ok_or_else(|| TripActionError::invalid_request("details.trip is required"))?;
    serde_json::from_value(raw)
        .map_err(|error| TripActionError::invalid_request(format!("invalid trip payload: {error}")))
}

#[cfg(test)]
#[path = "trip_action_service_tests.rs"]
mod tests;
