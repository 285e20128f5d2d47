//! Interest categories and their recommendation tag labels.
//!
//! Purpose: map the fixed, user-facing category vocabulary onto the
//! pipe-delimited tag-label expressions understood by the recommendation
//! provider. The table is a process-wide constant; nothing mutates it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tag label used by the popularity fallback query.
pub const HIDDEN_GEMS_TAG_LABEL: &str = "character-Popular_with_locals";

/// Category label attached to events sourced by the popularity fallback.
pub const HIDDEN_GEMS_LABEL: &str = "hidden gems";

/// A user-selectable interest category.
///
/// # Example
///
/// ```
/// # use trip_backend::domain::InterestCategory;
/// let category: InterestCategory = "food".parse().expect("known category");
/// assert_eq!(category, InterestCategory::Food);
/// assert!(category.tag_labels().contains("poitype-Restaurant"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestCategory {
    /// Outdoor trails, huts, parks, and sights.
    Hiking,
    /// Adrenaline activities and amusement parks.
    Extreme,
    /// Art, history, memorials, and heritage sites.
    Culture,
    /// Shopping centres and districts.
    Shopping,
    /// Museums.
    Museums,
    /// Cuisine, restaurants, and food experiences.
    Food,
    /// Beaches, gardens, hot springs, and spas.
    Relaxing,
    /// Casinos and gambling.
    Casino,
}

impl InterestCategory {
    /// All categories in vocabulary order.
    pub const ALL: [Self; 8] = [
        Self::Hiking,
        Self::Extreme,
        Self::Culture,
        Self::Shopping,
        Self::Museums,
        Self::Food,
        Self::Relaxing,
        Self::Casino,
    ];

    /// Returns the wire name of the category.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hiking => "hiking",
            Self::Extreme => "extreme",
            Self::Culture => "culture",
            Self::Shopping => "shopping",
            Self::Museums => "museums",
            Self::Food => "food",
            Self::Relaxing => "relaxing",
            Self::Casino => "casino",
        }
    }

    /// Returns the pipe-delimited provider tag labels for the category.
    pub const fn tag_labels(self) -> &'static str {
        match self {
            Self::Hiking => {
                "poitype-Alpine_hut|camping|daytrips|poitype-Forest|hiking|poitype-Hiking_trail|wildlife|national_park|poitype-Sight|sightseeing"
            }
            Self::Extreme => "adrenaline|amusementparks",
            Self::Culture => "art|culture|history|poitype-Memorial|character-World_heritage",
            Self::Shopping => "shopping|poitype-Shopping_centre|poitype-Shopping_district",
            Self::Museums => "museums",
            Self::Food => "cuisine|food|foodexperiences|poitype-Restaurant",
            Self::Relaxing => "beaches|poitype-Botanical_garden|poitype-Hot_spring|poitype-Spa",
            Self::Casino => "poitype-Casino|gambling",
        }
    }
}

impl fmt::Display for InterestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown interest category '{input}'")]
pub struct ParseInterestCategoryError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for InterestCategory {
    type Err = ParseInterestCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|category| category.as_str() == s)
            .copied()
            .ok_or_else(|| ParseInterestCategoryError {
                input: s.to_owned(),
            })
    }
}

/// The category an event was sourced under.
///
/// Serialises as the plain category label so stored pools read
/// `"food"` or `"hidden gems"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EventCategory {
    /// Sourced by a per-category query.
    Interest(InterestCategory),
    /// Sourced by the popularity fallback query.
    HiddenGems,
}

impl EventCategory {
    /// Returns the label stored alongside the event.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Interest(category) => category.as_str(),
            Self::HiddenGems => HIDDEN_GEMS_LABEL,
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<InterestCategory> for EventCategory {
    fn from(value: InterestCategory) -> Self {
        Self::Interest(value)
    }
}

impl From<EventCategory> for String {
    fn from(value: EventCategory) -> Self {
        value.label().to_owned()
    }
}

impl TryFrom<String> for EventCategory {
    type Error = ParseInterestCategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == HIDDEN_GEMS_LABEL {
            return Ok(Self::HiddenGems);
        }
        value.parse().map(Self::Interest)
    }
}
