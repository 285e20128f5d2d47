//! Domain primitives, services, and ports for trip planning.
//!
//! Purpose: model trips, interest categories, and event pools, and run trip
//! mutations against injected ports. Nothing in this module knows about
//! HTTP, process state, or a particular store.
//!
//! Public surface:
//! - [`TripActionService`]: executes create, edit, regenerate, update, and
//!   delete mutations through [`ports::TripActionCommand`].
//! - [`EventAggregator`]: concurrent category fetch, dedup, and backfill.
//! - [`EventQuota`] / [`OperationMode`] / [`DayLoad`]: quota arithmetic.
//! - [`Trip`] and its attribute types.
//! - [`TripActionError`] / [`ErrorCode`]: failure taxonomy.

pub mod category;
pub mod date_span;
pub mod error;
pub mod event;
pub mod event_aggregation;
pub mod event_pool;
pub mod pipeline_stage;
pub mod ports;
pub mod quota;
pub mod trip;
pub mod trip_action_service;

pub use self::category::{
    EventCategory, HIDDEN_GEMS_LABEL, HIDDEN_GEMS_TAG_LABEL, InterestCategory,
    ParseInterestCategoryError,
};
pub use self::date_span::{DateFormatError, TRIP_DATE_FORMAT, parse_trip_date, trip_length_days};
pub use self::error::{ErrorCode, ErrorEnvelope, TripActionError};
pub use self::event::{Coordinates, Event};
pub use self::event_aggregation::{EventAggregationConfig, EventAggregator};
pub use self::event_pool::EventPool;
pub use self::pipeline_stage::PipelineStage;
pub use self::quota::{
    DayLoad, EventQuota, OperationMode, POOL_BUILDING_MULTIPLIER, ParseOperationModeError,
};
pub use self::trip::{
    ItineraryDay, Trip, TripAttributes, TripAttributesPatch, TripId, TripValidationError, UserId,
};
pub use self::trip_action_service::{
    TripActionService, TripActionServiceConfig, TripActionServicePorts,
};
