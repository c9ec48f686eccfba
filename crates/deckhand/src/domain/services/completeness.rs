//! Completeness Calculator
//!
//! Pure scoring of a [`CollectedData`] snapshot against the Field Schema.

use crate::domain::value_objects::{CollectedData, StartupField};

/// Completeness at or above which a conversation is ready to generate
pub const READINESS_THRESHOLD: u8 = 80;

/// Percentage of required fields filled, rounded to the nearest integer.
///
/// With six required fields: 1 → 17, 4 → 67, 5 → 83.
pub fn completeness(data: &CollectedData) -> u8 {
    let required = StartupField::REQUIRED.len();
    let filled = StartupField::REQUIRED
        .iter()
        .filter(|field| data.is_filled(**field))
        .count();

    // round-half-up of 100 * filled / required, in integers
    ((200 * filled + required) / (2 * required)) as u8
}

/// Same as [`completeness`], treating a missing snapshot as empty
pub fn completeness_of(data: Option<&CollectedData>) -> u8 {
    data.map(completeness).unwrap_or(0)
}

/// `completeness(data) >= READINESS_THRESHOLD`
pub fn is_ready(data: &CollectedData) -> bool {
    meets_threshold(data, READINESS_THRESHOLD)
}

pub fn meets_threshold(data: &CollectedData, threshold: u8) -> bool {
    completeness(data) >= threshold
}

/// Required fields still unfilled, in schema order
pub fn missing_fields(data: &CollectedData) -> Vec<StartupField> {
    StartupField::REQUIRED
        .into_iter()
        .filter(|field| !data.is_filled(*field))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: usize) -> CollectedData {
        StartupField::REQUIRED
            .iter()
            .take(n)
            .map(|f| (f.as_str(), "value"))
            .collect()
    }

    #[test]
    fn test_empty_or_missing_is_zero() {
        assert_eq!(completeness(&CollectedData::new()), 0);
        assert_eq!(completeness_of(None), 0);
    }

    #[test]
    fn test_rounding_per_field() {
        let expected = [0, 17, 33, 50, 67, 83, 100];
        for (n, pct) in expected.into_iter().enumerate() {
            assert_eq!(completeness(&filled(n)), pct, "{} fields filled", n);
        }
    }

    #[test]
    fn test_threshold_exactness() {
        assert_eq!(completeness(&filled(5)), 83);
        assert!(is_ready(&filled(5)));

        assert_eq!(completeness(&filled(4)), 67);
        assert!(!is_ready(&filled(4)));
    }

    #[test]
    fn test_monotonic_in_filled_fields() {
        for n in 0..StartupField::REQUIRED.len() {
            assert!(completeness(&filled(n + 1)) > completeness(&filled(n)));
        }
    }

    #[test]
    fn test_extra_and_blank_fields_ignored() {
        let data: CollectedData = [
            ("company_name", "Acme"),
            ("industry", "  \t"),
            ("team_size", "12"),
        ]
        .into_iter()
        .collect();

        assert_eq!(completeness(&data), 17);
        assert_eq!(missing_fields(&data).len(), 5);
        assert_eq!(missing_fields(&data)[0], StartupField::Industry);
    }
}
