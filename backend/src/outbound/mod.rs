//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **triposo**: reqwest-backed `RecommendationSource` for the Triposo POI API
//! - **memory**: in-process `TripRepository`
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
pub mod triposo;
