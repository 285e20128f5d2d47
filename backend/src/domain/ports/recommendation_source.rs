//! Driven port for fetching ranked point-of-interest recommendations.
//!
//! The domain owns the query shape and candidate contract so aggregation can
//! stay provider-agnostic. Adapters own transport, authentication, and
//! payload decoding.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::Coordinates;

/// Result ordering requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecommendationRanking {
    /// Highest provider relevance score first.
    Relevance,
    /// Highest local-popularity score first.
    LocalPopularity,
}

/// One bounded recommendation query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationQuery {
    /// Location token where the route starts.
    pub start_location: String,
    /// Location token where the route ends.
    pub end_location: String,
    /// Pipe-delimited tag-label filter.
    pub tag_labels: String,
    /// Maximum distance from the route, in metres.
    pub max_distance_meters: u32,
    /// Result ordering.
    pub ranking: RecommendationRanking,
    /// Result count cap.
    pub max_results: u32,
}

/// One raw recommendation returned by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationCandidate {
    /// Display name.
    pub name: String,
    /// Position in WGS84.
    pub coordinates: Coordinates,
    /// Long description.
    pub intro: String,
    /// Short description.
    pub snippet: String,
    /// Image references.
    pub images: Vec<Value>,
    /// Provider-specific properties.
    pub properties: Vec<Value>,
    /// Provider relevance score.
    pub score: f64,
}

define_port_error! {
    /// Errors surfaced while querying the recommendation provider.
    pub enum RecommendationSourceError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "recommendation transport failed: {message}",
        /// The provider call exceeded its time budget.
        Timeout { message: String } =>
            "recommendation request timed out: {message}",
        /// The provider rate-limited the request.
        RateLimited { message: String } =>
            "recommendation provider rate limited request: {message}",
        /// The provider response could not be decoded.
        Decode { message: String } =>
            "recommendation response malformed: {message}",
        /// The request was rejected before or by the provider.
        InvalidRequest { message: String } =>
            "recommendation request invalid: {message}",
    }
}

/// Port for querying ranked recommendations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Fetch at most `query.max_results` candidates, best first.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use trip_backend::domain::ports::{
    ///     FixtureRecommendationSource, RecommendationQuery, RecommendationRanking,
    ///     RecommendationSource,
    /// };
    ///
    /// let source = FixtureRecommendationSource;
    /// let candidates = source
    ///     .recommend(&RecommendationQuery {
    ///         start_location: "Paris".to_owned(),
    ///         end_location: "Lyon".to_owned(),
    ///         tag_labels: "museums".to_owned(),
    ///         max_distance_meters: 10_000,
    ///         ranking: RecommendationRanking::Relevance,
    ///         max_results: 5,
    ///     })
    ///     .await?;
    /// assert!(candidates.is_empty());
    /// # Ok::<(), trip_backend::domain::ports::RecommendationSourceError>(())
    /// ```
    async fn recommend(
        &self,
        query: &RecommendationQuery,
    ) -> Result<Vec<RecommendationCandidate>, RecommendationSourceError>;
}

/// Fixture implementation returning no candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureRecommendationSource;

#[async_trait]
impl RecommendationSource for FixtureRecommendationSource {
    async fn recommend(
        &self,
        _query: &RecommendationQuery,
    ) -> Result<Vec<RecommendationCandidate>, RecommendationSourceError> {
        Ok(Vec::new())
    }
}
