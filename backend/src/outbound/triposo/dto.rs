//! DTOs for decoding Triposo POI responses.
//!
//! The adapter decodes into these transport DTOs first, then maps into
//! domain candidates (`RecommendationCandidate`) in one pass.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::Coordinates;
use crate::domain::ports::RecommendationCandidate;

#[derive(Debug, Deserialize)]
pub(super) struct TriposoResponseDto {
    pub(super) results: Vec<TriposoPoiDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TriposoPoiDto {
    pub(super) name: String,
    pub(super) coordinates: Option<TriposoCoordinatesDto>,
    #[serde(default)]
    pub(super) intro: Option<String>,
    #[serde(default)]
    pub(super) snippet: Option<String>,
    #[serde(default)]
    pub(super) images: Vec<Value>,
    #[serde(default)]
    pub(super) properties: Vec<Value>,
    #[serde(default)]
    pub(super) score: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct TriposoCoordinatesDto {
    pub(super) latitude: f64,
    pub(super) longitude: f64,
}

impl TriposoResponseDto {
    pub(super) fn into_domain_candidates(self) -> Result<Vec<RecommendationCandidate>, String> {
        self.results
            .into_iter()
            .map(TriposoPoiDto::into_domain_candidate)
            .collect()
    }
}

impl TriposoPoiDto {
    fn into_domain_candidate(self) -> Result<RecommendationCandidate, String> {
        let coordinates = self
            .coordinates
            .ok_or_else(|| format!("poi '{}' missing coordinates", self.name))?;
        if !coordinates.latitude.is_finite() || !coordinates.longitude.is_finite() {
            return Err(format!("poi '{}' includes non-finite coordinates", self.name));
        }

        Ok(RecommendationCandidate {
            name: self.name,
            coordinates: Coordinates {
                latitude: coordinates.latitude,
                longitude: coordinates.longitude,
            },
            intro: self.intro.unwrap_or_default(),
            snippet: self.snippet.unwrap_or_default(),
            images: self.images,
            properties: self.properties,
            score: self.score,
        })
    }
}
