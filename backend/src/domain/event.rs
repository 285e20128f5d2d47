//! Candidate points of interest gathered for a trip.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::EventCategory;
use crate::domain::ports::RecommendationCandidate;

/// WGS84 position of an event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// A single point-of-interest candidate in a trip's pool.
///
/// `name` is the pool's identity key and is compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Display name; unique within one pool.
    pub name: String,
    /// Where the event takes place.
    pub coordinates: Coordinates,
    /// Short description.
    pub snippet: String,
    /// Long description.
    pub intro: String,
    /// Provider image references.
    #[serde(default)]
    pub images: Vec<Value>,
    /// Provider relevance score.
    pub score: f64,
    /// Provider-specific properties.
    #[serde(default)]
    pub properties: Vec<Value>,
    /// Category the event was sourced under.
    pub category: EventCategory,
}

impl Event {
    /// Label a raw provider candidate with the category it was fetched for.
    pub fn from_candidate(candidate: RecommendationCandidate, category: EventCategory) -> Self {
        let RecommendationCandidate {
            name,
            coordinates,
            intro,
            snippet,
            images,
            properties,
            score,
        } = candidate;
        Self {
            name,
            coordinates,
            snippet,
            intro,
            images,
            score,
            properties,
            category,
        }
    }
}
