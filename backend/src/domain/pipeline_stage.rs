//! Stages of the trip aggregation pipeline, used as structured log fields.

use std::fmt;

/// Progress marker for one trip mutation run.
///
/// Runs move strictly forward: `Idle`, `QuotaComputed`, `CategoriesFetched`,
/// `Deduplicated`, `ShortfallChecked`, then `PoolFinalized` or
/// `ScheduleRequested`, then `PersistRequested` and `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineStage {
    /// Request received, nothing computed yet.
    Idle,
    /// Trip length and quotas derived.
    QuotaComputed,
    /// Every category query answered.
    CategoriesFetched,
    /// Category results merged into the pool.
    Deduplicated,
    /// Shortfall measured and, if needed, backfilled.
    ShortfallChecked,
    /// Pool attached to the trip without scheduling.
    PoolFinalized,
    /// Pool handed to the scheduler.
    ScheduleRequested,
    /// Save or delete issued to the repository.
    PersistRequested,
    /// Mutation finished.
    Done,
}

impl PipelineStage {
    /// Returns the log name of the stage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::QuotaComputed => "quota_computed",
            Self::CategoriesFetched => "categories_fetched",
            Self::Deduplicated => "deduplicated",
            Self::ShortfallChecked => "shortfall_checked",
            Self::PoolFinalized => "pool_finalized",
            Self::ScheduleRequested => "schedule_requested",
            Self::PersistRequested => "persist_requested",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
