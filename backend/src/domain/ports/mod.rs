//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod recommendation_source;
mod trip_action_command;
mod trip_repository;
mod trip_scheduler;

#[cfg(test)]
pub use recommendation_source::MockRecommendationSource;
pub use recommendation_source::{
    FixtureRecommendationSource, RecommendationCandidate, RecommendationQuery,
    RecommendationRanking, RecommendationSource, RecommendationSourceError,
};
#[cfg(test)]
pub use trip_action_command::MockTripActionCommand;
pub use trip_action_command::{
    FixtureTripActionCommand, TripActionCommand, TripActionDetails, TripActionOutcome,
    TripActionRequest,
};
#[cfg(test)]
pub use trip_repository::MockTripRepository;
pub use trip_repository::{FixtureTripRepository, TripRepository, TripRepositoryError};
#[cfg(test)]
pub use trip_scheduler::MockTripScheduler;
pub use trip_scheduler::{FixtureTripScheduler, TripScheduler, TripSchedulerError};
