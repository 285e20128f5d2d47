//! Trip records and the attribute payloads that mutate them.
//!
//! Purpose: hold one traveller's trip, its derived length, and either a
//! candidate event pool (pool-building modes) or a scheduled itinerary.
//!
//! ## Invariants
//! - `length` always equals the inclusive day span of `start_date` and
//!   `end_date`.
//! - `categories` is non-empty and free of repeats; order is the order the
//!   caller chose.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::date_span::{DateFormatError, trip_length_days};
use crate::domain::{DayLoad, Event, InterestCategory};

/// Stable trip identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(String);

impl TripId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Allocate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl AsRef<str> for TripId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the user owning a trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trip attributes supplied with create, edit, and regenerate requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripAttributes {
    /// First day, `MM/DD/YYYY`.
    pub start_date: String,
    /// Last day, `MM/DD/YYYY`.
    pub end_date: String,
    /// Provider location token where the trip starts.
    pub start_location: String,
    /// Provider location token where the trip ends.
    pub end_location: String,
    /// Selected interest categories.
    pub categories: Vec<InterestCategory>,
    /// Daily intensity.
    pub day_load: DayLoad,
}

/// Partial trip attributes supplied with update requests.
///
/// Present fields replace the stored values; absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripAttributesPatch {
    /// Replacement first day.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Replacement last day.
    #[serde(default)]
    pub end_date: Option<String>,
    /// Replacement start location.
    #[serde(default)]
    pub start_location: Option<String>,
    /// Replacement end location.
    #[serde(default)]
    pub end_location: Option<String>,
    /// Replacement category selection.
    #[serde(default)]
    pub categories: Option<Vec<InterestCategory>>,
    /// Replacement daily intensity.
    #[serde(default)]
    pub day_load: Option<DayLoad>,
}

/// One scheduled day of a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    /// One-based day number within the trip.
    pub day: u32,
    /// Events planned for the day, in visiting order.
    pub events: Vec<Event>,
}

/// Reasons trip attributes cannot form a valid trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TripValidationError {
    /// A trip date was malformed.
    #[error(transparent)]
    DateFormat(#[from] DateFormatError),
    /// No interest category was selected.
    #[error("trip must select at least one interest category")]
    EmptyCategories,
}

/// A traveller's trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    /// Trip identifier.
    pub trip_id: TripId,
    /// Owning user.
    pub user_id: UserId,
    /// First day, `MM/DD/YYYY`.
    pub start_date: String,
    /// Last day, `MM/DD/YYYY`.
    pub end_date: String,
    /// Inclusive length in days.
    pub length: u32,
    /// Provider location token where the trip starts.
    pub start_location: String,
    /// Provider location token where the trip ends.
    pub end_location: String,
    /// Selected interest categories in the caller's order.
    pub categories: Vec<InterestCategory>,
    /// Daily intensity.
    pub day_load: DayLoad,
    /// Unscheduled candidate events; filled by pool-building modes.
    #[serde(default)]
    pub events_pool: Vec<Event>,
    /// Scheduled days; filled by the scheduler.
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
}

impl Trip {
    /// Build a trip from request attributes, deriving its length.
    ///
    /// # Errors
    ///
    /// Returns [`TripValidationError`] when a date is malformed or no
    /// category is selected.
    pub fn from_attributes(
        trip_id: TripId,
        user_id: UserId,
        attributes: TripAttributes,
    ) -> Result<Self, TripValidationError> {
        let TripAttributes {
            start_date,
            end_date,
            start_location,
            end_location,
            categories,
            day_load,
        } = attributes;
        let categories = normalise_categories(categories)?;
        let length = trip_length_days(&start_date, &end_date)?;
        Ok(Self {
            trip_id,
            user_id,
            start_date,
            end_date,
            length,
            start_location,
            end_location,
            categories,
            day_load,
            events_pool: Vec::new(),
            itinerary: Vec::new(),
        })
    }

    /// Apply an attribute patch, keeping identity and events.
    ///
    /// The patch is validated before anything changes, so a rejected patch
    /// leaves the trip untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TripValidationError`] when the patched dates are malformed
    /// or the patched category list is empty.
    pub fn apply_patch(&mut self, patch: TripAttributesPatch) -> Result<(), TripValidationError> {
        let TripAttributesPatch {
            start_date,
            end_date,
            start_location,
            end_location,
            categories,
            day_load,
        } = patch;
        let categories = categories.map(normalise_categories).transpose()?;
        let start_date = start_date.unwrap_or_else(|| self.start_date.clone());
        let end_date = end_date.unwrap_or_else(|| self.end_date.clone());
        let length = trip_length_days(&start_date, &end_date)?;

        self.start_date = start_date;
        self.end_date = end_date;
        self.length = length;
        if let Some(location) = start_location {
            self.start_location = location;
        }
        if let Some(location) = end_location {
            self.end_location = location;
        }
        if let Some(categories) = categories {
            self.categories = categories;
        }
        if let Some(day_load) = day_load {
            self.day_load = day_load;
        }
        Ok(())
    }

    /// Number of distinct selected categories.
    pub fn category_count(&self) -> u32 {
        u32::try_from(self.categories.len()).unwrap_or(u32::MAX)
    }
}

fn normalise_categories(
    categories: Vec<InterestCategory>,
) -> Result<Vec<InterestCategory>, TripValidationError> {
    let mut unique = Vec::with_capacity(categories.len());
    for category in categories {
        if !unique.contains(&category) {
            unique.push(category);
        }
    }
    if unique.is_empty() {
        return Err(TripValidationError::EmptyCategories);
    }
    Ok(unique)
}
