//! The envelope every parser call returns.
//!
//! Missing fields are data, not exceptions: a parser that finds nothing
//! reports `success = false` with confidence 0.0 and an empty payload,
//! and the caller moves on. Only the domain validator is allowed to
//! reject a record.

use serde::Serialize;

/// Confidence ceiling once a warning has been attached.
const WARNED_CONFIDENCE_CAP: f32 = 0.7;

/// Result of one parser invocation.
///
/// `confidence` is a [0, 1] heuristic reflecting how many expected
/// sub-fields resolved, not a statistical probability.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutcome<T> {
    pub success: bool,
    pub data: T,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub confidence: f32,
}

impl<T> ParseOutcome<T> {
    /// A successful parse with the given confidence, clamped to [0, 1].
    pub fn hit(data: T, confidence: f32) -> Self {
        Self {
            success: true,
            data,
            errors: Vec::new(),
            warnings: Vec::new(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// A miss: nothing found, zero confidence. Sibling field categories
    /// are unaffected.
    pub fn miss(data: T) -> Self {
        Self {
            success: false,
            data,
            errors: Vec::new(),
            warnings: Vec::new(),
            confidence: 0.0,
        }
    }

    /// Attaches a warning and caps confidence at 0.7.
    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
        if self.confidence > WARNED_CONFIDENCE_CAP {
            self.confidence = WARNED_CONFIDENCE_CAP;
        }
    }

    /// Attaches an error and flips the outcome to failure.
    pub fn push_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.success = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_clamps_confidence() {
        let outcome = ParseOutcome::hit((), 1.4);
        assert!(outcome.success);
        assert!((outcome.confidence - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn miss_has_zero_confidence() {
        let outcome = ParseOutcome::miss(Vec::<String>::new());
        assert!(!outcome.success);
        assert!(outcome.confidence.abs() < f32::EPSILON);
    }

    #[test]
    fn warning_caps_confidence() {
        let mut outcome = ParseOutcome::hit((), 0.95);
        outcome.push_warning("partial data");
        assert!((outcome.confidence - 0.7).abs() < f32::EPSILON);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn warning_leaves_lower_confidence_alone() {
        let mut outcome = ParseOutcome::hit((), 0.4);
        outcome.push_warning("partial data");
        assert!((outcome.confidence - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn error_flips_success() {
        let mut outcome = ParseOutcome::hit((), 0.9);
        outcome.push_error("boom");
        assert!(!outcome.success);
    }
}
