//! Event quota derivation.
//!
//! Quotas bound how many recommendations are requested per category and in
//! total. Pool-building modes over-fetch so the traveller has more to choose
//! from before the trip is scheduled.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Multiplier applied to both quotas in pool-building modes.
pub const POOL_BUILDING_MULTIPLIER: u32 = 2;

/// Daily intensity chosen for a trip.
///
/// Each level maps to the number of events planned per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayLoad {
    /// Two events per day.
    #[serde(alias = "low")]
    Low,
    /// Three events per day.
    #[serde(alias = "medium")]
    Medium,
    /// Four events per day.
    #[serde(alias = "high")]
    High,
}

impl DayLoad {
    /// Events planned per day at this intensity.
    pub const fn load_value(self) -> u32 {
        match self {
            Self::Low => 2,
            Self::Medium => 3,
            Self::High => 4,
        }
    }
}

/// Trip mutation requested by a caller.
///
/// # Example
///
/// ```
/// # use trip_backend::domain::OperationMode;
/// let mode: OperationMode = "CREATE".parse().expect("known mode");
/// assert!(mode.builds_pool());
/// assert!(!OperationMode::Regenerate.builds_pool());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationMode {
    /// Create a trip and build its candidate pool.
    Create,
    /// Rebuild the candidate pool of an existing trip.
    Edit,
    /// Aggregate events and hand them to the scheduler.
    #[serde(alias = "GENERATE")]
    Regenerate,
    /// Replace trip attributes without touching events.
    Update,
    /// Remove a trip.
    Delete,
}

impl OperationMode {
    /// All operation modes.
    pub const ALL: [Self; 5] = [
        Self::Create,
        Self::Edit,
        Self::Regenerate,
        Self::Update,
        Self::Delete,
    ];

    /// Returns the wire name of the mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Edit => "EDIT",
            Self::Regenerate => "REGENERATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }

    /// Whether this mode stores an unscheduled candidate pool.
    ///
    /// Pool-building modes also double both quotas.
    pub const fn builds_pool(self) -> bool {
        matches!(self, Self::Create | Self::Edit)
    }

    /// Whether this mode runs event aggregation at all.
    pub const fn aggregates_events(self) -> bool {
        matches!(self, Self::Create | Self::Edit | Self::Regenerate)
    }

    /// Whether the request must name an existing trip.
    pub const fn requires_element_id(self) -> bool {
        matches!(self, Self::Edit | Self::Update | Self::Delete)
    }

    const fn quota_multiplier(self) -> u32 {
        if self.builds_pool() {
            POOL_BUILDING_MULTIPLIER
        } else {
            1
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a mutation type is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported trip action '{input}'")]
pub struct ParseOperationModeError {
    /// The rejected input.
    pub input: String,
}

/// Legacy wire name accepted for [`OperationMode::Regenerate`].
const GENERATE_ALIAS: &str = "GENERATE";

impl FromStr for OperationMode {
    type Err = ParseOperationModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(GENERATE_ALIAS) {
            return Ok(Self::Regenerate);
        }
        Self::ALL
            .iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| ParseOperationModeError {
                input: s.to_owned(),
            })
    }
}

/// Event targets for one pipeline run.
///
/// `per_category * categories` need not equal `total`; both are derived
/// independently and the rounding gap is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventQuota {
    /// Results requested from each category query.
    pub per_category: u32,
    /// Pool size the run aims for before backfilling stops.
    pub total: u32,
}

impl EventQuota {
    /// Derive quotas from trip length, daily load, and category count.
    ///
    /// A zero category count is treated as one.
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_backend::domain::{EventQuota, OperationMode};
    ///
    /// let quota = EventQuota::compute(3, 2, 2, OperationMode::Create);
    /// assert_eq!(quota, EventQuota { per_category: 6, total: 12 });
    ///
    /// let quota = EventQuota::compute(3, 2, 2, OperationMode::Regenerate);
    /// assert_eq!(quota, EventQuota { per_category: 3, total: 6 });
    /// ```
    pub fn compute(days: u32, load: u32, category_count: u32, mode: OperationMode) -> Self {
        let planned = days.saturating_mul(load);
        let per_category = planned.div_ceil(category_count.max(1));
        let multiplier = mode.quota_multiplier();
        Self {
            per_category: per_category.saturating_mul(multiplier),
            total: planned.saturating_mul(multiplier),
        }
    }

    /// Number of events still needed to reach the total quota.
    pub fn shortfall(&self, pool_size: usize) -> u32 {
        let pool_size = u32::try_from(pool_size).unwrap_or(u32::MAX);
        self.total.saturating_sub(pool_size)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(3, 2, 2, 3, 6)]
    #[case(1, 2, 3, 1, 2)]
    #[case(5, 3, 2, 8, 15)]
    #[case(2, 4, 8, 1, 8)]
    #[case(7, 4, 1, 28, 28)]
    fn derives_unscaled_quotas(
        #[case] days: u32,
        #[case] load: u32,
        #[case] categories: u32,
        #[case] per_category: u32,
        #[case] total: u32,
    ) {
        let quota = EventQuota::compute(days, load, categories, OperationMode::Regenerate);
        assert_eq!(quota, EventQuota { per_category, total });
    }

    #[rstest]
    #[case(OperationMode::Create)]
    #[case(OperationMode::Edit)]
    fn pool_building_modes_double_both_quotas(#[case] mode: OperationMode) {
        for (days, load, categories) in [(3, 2, 2), (1, 3, 4), (10, 4, 3)] {
            let base = EventQuota::compute(days, load, categories, OperationMode::Regenerate);
            let scaled = EventQuota::compute(days, load, categories, mode);
            assert_eq!(scaled.per_category, base.per_category * 2);
            assert_eq!(scaled.total, base.total * 2);
        }
    }

    #[test]
    fn rounding_gap_is_preserved() {
        let quota = EventQuota::compute(5, 3, 2, OperationMode::Regenerate);
        assert_ne!(quota.per_category * 2, quota.total);
    }

    #[rstest]
    #[case(6, 0, 6)]
    #[case(6, 4, 2)]
    #[case(6, 6, 0)]
    #[case(6, 9, 0)]
    fn shortfall_never_goes_negative(
        #[case] total: u32,
        #[case] pool_size: usize,
        #[case] expected: u32,
    ) {
        let quota = EventQuota {
            per_category: 1,
            total,
        };
        assert_eq!(quota.shortfall(pool_size), expected);
    }

    #[rstest]
    #[case("CREATE", OperationMode::Create)]
    #[case("edit", OperationMode::Edit)]
    #[case("Regenerate", OperationMode::Regenerate)]
    #[case("GENERATE", OperationMode::Regenerate)]
    #[case("generate", OperationMode::Regenerate)]
    #[case("UPDATE", OperationMode::Update)]
    #[case("DELETE", OperationMode::Delete)]
    fn parses_known_modes(#[case] raw: &str, #[case] expected: OperationMode) {
        assert_eq!(raw.parse::<OperationMode>(), Ok(expected));
    }

    #[test]
    fn deserialises_generate_alias() {
        let mode: OperationMode = serde_json::from_str("\"GENERATE\"").expect("alias parses");
        assert_eq!(mode, OperationMode::Regenerate);
        assert_eq!(mode.as_str(), "REGENERATE");
    }

    #[test]
    fn rejects_unknown_modes() {
        let error = "ARCHIVE"
            .parse::<OperationMode>()
            .expect_err("unknown mode");
        assert_eq!(error.input, "ARCHIVE");
    }

    #[rstest]
    #[case(DayLoad::Low, 2)]
    #[case(DayLoad::Medium, 3)]
    #[case(DayLoad::High, 4)]
    fn day_load_values_are_positive(#[case] load: DayLoad, #[case] expected: u32) {
        assert_eq!(load.load_value(), expected);
    }
}
