use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{ExtractionError, Result};

/// Confidence below which a result is not considered valid.
pub const DEFAULT_CONFIDENCE_FLOOR: f64 = 0.5;

/// Output of one extraction call. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    extracted_data: BTreeMap<String, Option<String>>,
    confidence_score: f64,
    validation_errors: Vec<String>,
    #[serde(skip)]
    confidence_floor: f64,
}

impl ExtractionResult {
    /// Build a result, rejecting confidence scores outside `[0.0, 1.0]`.
    pub fn new(
        extracted_data: BTreeMap<String, Option<String>>,
        confidence_score: f64,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&confidence_score) {
            return Err(ExtractionError::InvalidConfidence(confidence_score));
        }
        Ok(Self {
            extracted_data,
            confidence_score,
            validation_errors: Vec::new(),
            confidence_floor: DEFAULT_CONFIDENCE_FLOOR,
        })
    }

    #[must_use]
    pub fn with_validation_errors(mut self, errors: Vec<String>) -> Self {
        self.validation_errors = errors;
        self
    }

    /// Override the floor used by [`Self::is_valid`]; clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn with_confidence_floor(mut self, floor: f64) -> Self {
        self.confidence_floor = if floor.is_nan() {
            DEFAULT_CONFIDENCE_FLOOR
        } else {
            floor.clamp(0.0, 1.0)
        };
        self
    }

    #[must_use]
    pub const fn extracted_data(&self) -> &BTreeMap<String, Option<String>> {
        &self.extracted_data
    }

    #[must_use]
    pub const fn confidence_score(&self) -> f64 {
        self.confidence_score
    }

    #[must_use]
    pub fn validation_errors(&self) -> &[String] {
        &self.validation_errors
    }

    #[must_use]
    pub const fn confidence_floor(&self) -> f64 {
        self.confidence_floor
    }

    /// Value of one field, `None` when absent or not part of the result.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.extracted_data.get(field)?.as_deref()
    }

    /// No validation errors and confidence at or above the floor.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validation_errors.is_empty() && self.confidence_score >= self.confidence_floor
    }

    #[must_use]
    pub fn has_data(&self) -> bool {
        self.extracted_data.values().any(Option::is_some)
    }

    /// Names of the fields that carry a value, in key order.
    #[must_use]
    pub fn extracted_fields(&self) -> Vec<&str> {
        self.extracted_data
            .iter()
            .filter(|(_, value)| value.is_some())
            .map(|(field, _)| field.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, Option<&str>)]) -> BTreeMap<String, Option<String>> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn test_confidence_out_of_range_rejected() {
        for score in [1.5, -0.1, f64::NAN] {
            let result = ExtractionResult::new(BTreeMap::new(), score);
            assert!(matches!(result, Err(ExtractionError::InvalidConfidence(_))));
        }
    }

    #[test]
    fn test_confidence_bounds_inclusive() {
        assert!(ExtractionResult::new(BTreeMap::new(), 0.0).is_ok());
        assert!(ExtractionResult::new(BTreeMap::new(), 1.0).is_ok());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_extracted_fields_skip_absent_values() {
        let result = ExtractionResult::new(data(&[("name", Some("John")), ("email", None)]), 0.75)
            .expect("valid confidence");

        assert_eq!(result.extracted_fields(), vec!["name"]);
        assert!(result.has_data());
        assert!(result.is_valid());
        assert_eq!(result.get("name"), Some("John"));
        assert_eq!(result.get("email"), None);
        assert_eq!(result.get("phone"), None);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_validity_rules() {
        let empty = ExtractionResult::new(data(&[("name", None)]), 0.9).expect("valid confidence");
        assert!(!empty.has_data());

        let low = ExtractionResult::new(data(&[("name", Some("Alex"))]), 0.4)
            .expect("valid confidence");
        assert!(!low.is_valid());
        assert!(low.clone().with_confidence_floor(0.3).is_valid());

        let with_errors = ExtractionResult::new(data(&[("age", Some("abc"))]), 0.9)
            .expect("valid confidence")
            .with_validation_errors(vec!["age: age must be a whole number ('abc')".to_string()]);
        assert!(!with_errors.is_valid());
        assert_eq!(with_errors.validation_errors().len(), 1);
    }
}
