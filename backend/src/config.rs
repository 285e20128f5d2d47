//! Trip planner configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{EventAggregationConfig, TripActionServiceConfig};

const DEFAULT_BASE_URL: &str = "https://www.triposo.com/api/20220705/poi.json";
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_AGGREGATION_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_SCHEDULER_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_MAX_CONCURRENT_QUERIES: usize = 4;

/// Configuration values for the recommendation provider and trip pipeline.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRIP_PLANNER")]
pub struct TripPlannerSettings {
    /// Triposo POI endpoint.
    pub base_url: Option<String>,
    /// Triposo account identifier.
    pub account: Option<String>,
    /// Triposo API token.
    pub token: Option<String>,
    /// Per-request HTTP timeout in seconds.
    pub request_timeout_seconds: Option<u64>,
    /// Maximum distance from the route, in metres.
    #[ortho_config(default = 10_000)]
    pub search_radius_meters: u32,
    /// Budget for the whole aggregation run, in seconds.
    pub aggregation_timeout_seconds: Option<u64>,
    /// Budget for one scheduler call, in seconds.
    pub scheduler_timeout_seconds: Option<u64>,
    /// Category queries allowed in flight at once.
    pub max_concurrent_queries: Option<usize>,
}

impl TripPlannerSettings {
    /// Return the configured endpoint, falling back to the public Triposo API.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] when the configured value is not a URL.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))
    }

    /// Return the per-request HTTP timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_seconds
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        )
    }

    /// Return the aggregation limits handed to the domain.
    pub fn aggregation_config(&self) -> EventAggregationConfig {
        EventAggregationConfig {
            max_distance_meters: self.search_radius_meters,
            max_concurrent_queries: self
                .max_concurrent_queries
                .unwrap_or(DEFAULT_MAX_CONCURRENT_QUERIES)
                .max(1),
            aggregation_timeout: Duration::from_secs(
                self.aggregation_timeout_seconds
                    .unwrap_or(DEFAULT_AGGREGATION_TIMEOUT_SECONDS),
            ),
        }
    }

    /// Return the full service configuration.
    pub fn service_config(&self) -> TripActionServiceConfig {
        TripActionServiceConfig {
            aggregation: self.aggregation_config(),
            scheduler_timeout: Duration::from_secs(
                self.scheduler_timeout_seconds
                    .unwrap_or(DEFAULT_SCHEDULER_TIMEOUT_SECONDS),
            ),
        }
    }
}
