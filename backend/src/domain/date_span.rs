//! Inclusive day counts between trip dates.
//!
//! Trip dates travel as `MM/DD/YYYY` strings. The span is the absolute
//! difference in calendar days plus one, so a same-day trip lasts one day
//! and argument order does not matter.

use chrono::NaiveDate;

/// `chrono` pattern for trip dates.
pub const TRIP_DATE_FORMAT: &str = "%m/%d/%Y";

/// Returned when a trip date does not match `MM/DD/YYYY`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("trip date '{input}' must use the MM/DD/YYYY format")]
pub struct DateFormatError {
    /// The rejected input.
    pub input: String,
}

/// Parse a `MM/DD/YYYY` trip date.
///
/// # Errors
///
/// Returns [`DateFormatError`] when the input is not a valid calendar date in
/// the expected format.
pub fn parse_trip_date(raw: &str) -> Result<NaiveDate, DateFormatError> {
    NaiveDate::parse_from_str(raw, TRIP_DATE_FORMAT).map_err(|_| DateFormatError {
        input: raw.to_owned(),
    })
}

/// Count the days covered by a trip, inclusive of both ends.
///
/// # Examples
///
/// ```
/// use trip_backend::domain::trip_length_days;
///
/// assert_eq!(trip_length_days("06/01/2024", "06/03/2024"), Ok(3));
/// assert_eq!(trip_length_days("06/03/2024", "06/01/2024"), Ok(3));
/// assert_eq!(trip_length_days("06/01/2024", "06/01/2024"), Ok(1));
/// ```
///
/// # Errors
///
/// Returns [`DateFormatError`] for the first date that fails to parse.
pub fn trip_length_days(start: &str, end: &str) -> Result<u32, DateFormatError> {
    let start_date = parse_trip_date(start)?;
    let end_date = parse_trip_date(end)?;
    let span = end_date.signed_duration_since(start_date).num_days().unsigned_abs();
    let days = u32::try_from(span).unwrap_or(u32::MAX);
    Ok(days.saturating_add(1))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("06/01/2024", "06/01/2024", 1)]
    #[case("06/01/2024", "06/02/2024", 2)]
    #[case("06/01/2024", "06/03/2024", 3)]
    #[case("02/28/2024", "03/01/2024", 3)]
    #[case("12/31/2023", "01/01/2024", 2)]
    fn counts_inclusive_days(#[case] start: &str, #[case] end: &str, #[case] expected: u32) {
        assert_eq!(trip_length_days(start, end), Ok(expected));
    }

    #[rstest]
    #[case("06/01/2024", "07/15/2024")]
    #[case("01/01/2023", "12/31/2024")]
    fn span_is_symmetric(#[case] first: &str, #[case] second: &str) {
        assert_eq!(
            trip_length_days(first, second),
            trip_length_days(second, first)
        );
    }

    #[rstest]
    #[case("2024-06-01", "06/02/2024", "2024-06-01")]
    #[case("06/01/2024", "13/01/2024", "13/01/2024")]
    #[case("06/01/2024", "02/30/2024", "02/30/2024")]
    #[case("", "06/02/2024", "")]
    fn rejects_malformed_dates(#[case] start: &str, #[case] end: &str, #[case] rejected: &str) {
        let error = trip_length_days(start, end).expect_err("malformed date");
        assert_eq!(error.input, rejected);
    }
}
