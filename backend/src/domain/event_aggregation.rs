//! Event aggregation for one trip.
//!
//! Category queries run concurrently but are merged into the [`EventPool`]
//! strictly in the trip's category order, so the pool is deterministic for
//! a given set of provider responses. A popularity-ranked fallback query
//! then tops the pool up to the total quota.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info, warn};

use crate::domain::ports::{
    RecommendationCandidate, RecommendationQuery, RecommendationRanking, RecommendationSource,
    RecommendationSourceError,
};
use crate::domain::{
    Event, EventCategory, EventPool, EventQuota, HIDDEN_GEMS_TAG_LABEL, InterestCategory,
    PipelineStage, Trip,
};

/// Aggregation limits supplied by the composition root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventAggregationConfig {
    /// Distance ceiling around the start-end line, in metres.
    pub max_distance_meters: u32,
    /// Category queries allowed in flight at once.
    pub max_concurrent_queries: usize,
    /// Budget for the category phase and backfill together.
    pub aggregation_timeout: Duration,
}

impl Default for EventAggregationConfig {
    fn default() -> Self {
        Self {
            max_distance_meters: 10_000,
            max_concurrent_queries: 4,
            aggregation_timeout: Duration::from_secs(30),
        }
    }
}

/// Builds the event pool for a trip from a recommendation source.
#[derive(Clone)]
pub struct EventAggregator {
    source: Arc<dyn RecommendationSource>,
    config: EventAggregationConfig,
}

impl EventAggregator {
    /// Create an aggregator over `source`.
    pub fn new(source: Arc<dyn RecommendationSource>, config: EventAggregationConfig) -> Self {
        Self { source, config }
    }

    /// Fetch, deduplicate, and backfill events for `trip`.
    ///
    /// # Errors
    ///
    /// Returns the first [`RecommendationSourceError`] raised by any query,
    /// or [`RecommendationSourceError::Timeout`] when the whole run exceeds
    /// the configured budget. In-flight queries are dropped in both cases.
    pub async fn aggregate(
        &self,
        trip: &Trip,
        quota: EventQuota,
    ) -> Result<EventPool, RecommendationSourceError> {
        let budget = self.config.aggregation_timeout;
        let run = async {
            let mut pool = self.fetch_categories(trip, quota.per_category).await?;
            self.backfill_shortfall(&mut pool, trip, quota).await?;
            Ok(pool)
        };
        match tokio::time::timeout(budget, run).await {
            Ok(result) => result,
            Err(_) => {
                warn!(trip_id = %trip.trip_id, ?budget, "event aggregation timed out");
                Err(RecommendationSourceError::timeout(format!(
                    "event aggregation exceeded {}ms",
                    budget.as_millis()
                )))
            }
        }
    }

    /// Query every selected category and merge results in category order.
    ///
    /// # Errors
    ///
    /// Returns the first provider error; remaining queries are cancelled.
    pub async fn fetch_categories(
        &self,
        trip: &Trip,
        per_category: u32,
    ) -> Result<EventPool, RecommendationSourceError> {
        let queries: Vec<_> = trip
            .categories
            .iter()
            .map(|&category| {
                let source = Arc::clone(&self.source);
                let query = self.category_query(trip, category, per_category);
                async move {
                    let candidates = source.recommend(&query).await.inspect_err(|error| {
                        warn!(%category, %error, "category query failed");
                    })?;
                    Ok::<_, RecommendationSourceError>((category, capped(candidates, per_category)))
                }
            })
            .collect();

        let batches: Vec<(InterestCategory, Vec<RecommendationCandidate>)> = stream::iter(queries)
            .buffered(self.config.max_concurrent_queries.max(1))
            .try_collect()
            .await?;
        debug!(stage = %PipelineStage::CategoriesFetched, queries = batches.len());

        let mut pool = EventPool::new();
        for (category, candidates) in batches {
            let offered = candidates.len();
            let mut accepted = 0_usize;
            for candidate in candidates {
                if pool.offer(Event::from_candidate(candidate, category.into())) {
                    accepted += 1;
                }
            }
            debug!(%category, offered, accepted, "merged category results");
        }
        debug!(stage = %PipelineStage::Deduplicated, pool_size = pool.len());
        Ok(pool)
    }

    /// Top the pool up to `quota.total` with popularity-ranked events.
    ///
    /// Backfilled events are labelled [`EventCategory::HiddenGems`] and are
    /// appended without checking names against the pool. Returns how many
    /// events were appended; no query is issued when nothing is missing.
    ///
    /// # Errors
    ///
    /// Returns the provider error of the fallback query.
    pub async fn backfill_shortfall(
        &self,
        pool: &mut EventPool,
        trip: &Trip,
        quota: EventQuota,
    ) -> Result<usize, RecommendationSourceError> {
        let remaining = quota.shortfall(pool.len());
        if remaining == 0 {
            debug!(
                stage = %PipelineStage::ShortfallChecked,
                pool_size = pool.len(),
                total = quota.total,
                "no shortfall"
            );
            return Ok(0);
        }

        info!(
            pool_size = pool.len(),
            total = quota.total,
            remaining,
            "backfilling shortfall with popular events"
        );
        let query = RecommendationQuery {
            start_location: trip.start_location.clone(),
            end_location: trip.end_location.clone(),
            tag_labels: HIDDEN_GEMS_TAG_LABEL.to_owned(),
            max_distance_meters: self.config.max_distance_meters,
            ranking: RecommendationRanking::LocalPopularity,
            max_results: remaining,
        };
        let candidates = self.source.recommend(&query).await.inspect_err(|error| {
            warn!(%error, "fallback query failed");
        })?;

        let backfill = capped(candidates, remaining);
        let appended = backfill.len();
        for candidate in backfill {
            pool.append_unchecked(Event::from_candidate(candidate, EventCategory::HiddenGems));
        }
        debug!(
            stage = %PipelineStage::ShortfallChecked,
            pool_size = pool.len(),
            appended
        );
        Ok(appended)
    }

    fn category_query(
        &self,
        trip: &Trip,
        category: InterestCategory,
        per_category: u32,
    ) -> RecommendationQuery {
        RecommendationQuery {
            start_location: trip.start_location.clone(),
            end_location: trip.end_location.clone(),
            tag_labels: category.tag_labels().to_owned(),
            max_distance_meters: self.config.max_distance_meters,
            ranking: RecommendationRanking::Relevance,
            max_results: per_category,
        }
    }
}

fn capped(mut candidates: Vec<RecommendationCandidate>, limit: u32) -> Vec<RecommendationCandidate> {
    candidates.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    candidates
}

#[cfg(test)]
#[path = "event_aggregation_tests.rs"]
mod tests;
