//! Domain-level error types for trip mutations.
//!
//! These errors are transport agnostic. Edge adapters map them onto their own
//! envelopes through [`TripActionError::code`].

use serde::{Deserialize, Serialize};

use crate::domain::date_span::DateFormatError;
use crate::domain::ports::{RecommendationSourceError, TripRepositoryError, TripSchedulerError};
use crate::domain::{TripId, TripValidationError};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// The mutation type is not recognised.
    UnsupportedAction,
    /// The requested trip does not exist.
    NotFound,
    /// A downstream collaborator failed or timed out.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Failure of one trip mutation.
///
/// Every variant aborts the whole mutation; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TripActionError {
    /// A trip date was not `MM/DD/YYYY`.
    #[error(transparent)]
    DateFormat(#[from] DateFormatError),
    /// The mutation type is not one of the supported actions.
    #[error("unsupported trip action '{action}'")]
    UnsupportedAction {
        /// The rejected action name.
        action: String,
    },
    /// No trip exists with the requested identifier.
    #[error("trip {trip_id} not found")]
    NotFound {
        /// The identifier that missed.
        trip_id: TripId,
    },
    /// The request envelope or trip payload is invalid.
    #[error("invalid trip request: {message}")]
    InvalidRequest {
        /// What was wrong.
        message: String,
    },
    /// The recommendation provider failed.
    #[error(transparent)]
    Provider(#[from] RecommendationSourceError),
    /// The itinerary scheduler failed.
    #[error(transparent)]
    Scheduler(#[from] TripSchedulerError),
    /// Trip persistence failed.
    #[error(transparent)]
    Repository(#[from] TripRepositoryError),
}

impl TripActionError {
    /// Convenience constructor for [`Self::UnsupportedAction`].
    pub fn unsupported_action(action: impl Into<String>) -> Self {
        Self::UnsupportedAction {
            action: action.into(),
        }
    }

    /// Convenience constructor for [`Self::NotFound`].
    pub fn not_found(trip_id: TripId) -> Self {
        Self::NotFound { trip_id }
    }

    /// Convenience constructor for [`Self::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this failure.
    ///
    /// # Examples
    /// ```
    /// use trip_backend::domain::{ErrorCode, TripActionError, TripId};
    ///
    /// let err = TripActionError::not_found(TripId::new("missing"));
    /// assert_eq!(err.code(), ErrorCode::NotFound);
    /// ```
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::DateFormat(_) | Self::InvalidRequest { .. } => ErrorCode::InvalidRequest,
            Self::UnsupportedAction { .. } => ErrorCode::UnsupportedAction,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Provider(RecommendationSourceError::InvalidRequest { .. }) => {
                ErrorCode::InvalidRequest
            }
            Self::Provider(_) | Self::Scheduler(TripSchedulerError::Unavailable { .. }) => {
                ErrorCode::ServiceUnavailable
            }
            Self::Repository(TripRepositoryError::Connection { .. }) => {
                ErrorCode::ServiceUnavailable
            }
            Self::Scheduler(_) | Self::Repository(_) => ErrorCode::InternalError,
        }
    }
}

impl From<TripValidationError> for TripActionError {
    fn from(value: TripValidationError) -> Self {
        match value {
            TripValidationError::DateFormat(error) => Self::DateFormat(error),
            other @ TripValidationError::EmptyCategories => Self::invalid_request(other.to_string()),
        }
    }
}

/// Serialisable error envelope for edge adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Stable error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

impl From<&TripActionError> for ErrorEnvelope {
    fn from(value: &TripActionError) -> Self {
        Self {
            code: value.code(),
            message: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        TripActionError::DateFormat(DateFormatError { input: "x".to_owned() }),
        ErrorCode::InvalidRequest
    )]
    #[case(TripActionError::unsupported_action("ARCHIVE"), ErrorCode::UnsupportedAction)]
    #[case(TripActionError::not_found(TripId::new("t")), ErrorCode::NotFound)]
    #[case(
        TripActionError::Provider(RecommendationSourceError::decode("no results")),
        ErrorCode::ServiceUnavailable
    )]
    #[case(
        TripActionError::Provider(RecommendationSourceError::invalid_request("bad tag")),
        ErrorCode::InvalidRequest
    )]
    #[case(
        TripActionError::Scheduler(TripSchedulerError::unavailable("down")),
        ErrorCode::ServiceUnavailable
    )]
    #[case(
        TripActionError::Scheduler(TripSchedulerError::rejected("no days")),
        ErrorCode::InternalError
    )]
    #[case(
        TripActionError::Repository(TripRepositoryError::connection("pool")),
        ErrorCode::ServiceUnavailable
    )]
    #[case(
        TripActionError::Repository(TripRepositoryError::query("constraint")),
        ErrorCode::InternalError
    )]
    fn maps_errors_to_codes(#[case] error: TripActionError, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }

    #[test]
    fn validation_errors_keep_date_format_distinct() {
        let error: TripActionError = TripValidationError::EmptyCategories.into();
        assert!(matches!(error, TripActionError::InvalidRequest { .. }));

        let error: TripActionError =
            TripValidationError::DateFormat(DateFormatError { input: "x".to_owned() }).into();
        assert!(matches!(error, TripActionError::DateFormat(_)));
    }

    #[test]
    fn envelope_serialises_snake_case_code() {
        let error = TripActionError::unsupported_action("ARCHIVE");
        let value = serde_json::to_value(ErrorEnvelope::from(&error)).expect("serialise");
        assert_eq!(value["code"], "unsupported_action");
        assert_eq!(value["message"], "unsupported trip action 'ARCHIVE'");
    }
}
