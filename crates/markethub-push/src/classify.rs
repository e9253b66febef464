//! Provider error-code classification.
//!
//! Permanent means the token will never succeed again and must be
//! evicted; transient means a future attempt may succeed and the token
//! is left registered. Unknown codes classify as transient so that a new
//! provider error can never cause an eviction.

use std::collections::HashSet;

use markethub_core::config::ClassificationOverrides;
use markethub_core::traits::push::FailureClass;

/// Codes the provider documents as end-of-life for a token: the token is
/// unregistered, does not exist, or is malformed.
const DEFAULT_PERMANENT: &[&str] = &["UNREGISTERED", "NOT_FOUND", "INVALID_ARGUMENT"];

/// Maps provider error codes to a [`FailureClass`].
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    permanent: HashSet<String>,
}

impl ErrorClassifier {
    /// Build a classifier from the built-in defaults plus configuration
    /// overrides. A code listed under `transient` is removed from the
    /// permanent set even if it is a default.
    pub fn new(overrides: &ClassificationOverrides) -> Self {
        let mut permanent: HashSet<String> =
            DEFAULT_PERMANENT.iter().map(|s| (*s).to_string()).collect();
        for code in &overrides.permanent {
            permanent.insert(code.to_uppercase());
        }
        for code in &overrides.transient {
            permanent.remove(&code.to_uppercase());
        }
        Self { permanent }
    }

    /// Classify a provider error code.
    pub fn classify(&self, code: &str) -> FailureClass {
        if self.permanent.contains(&code.to_uppercase()) {
            FailureClass::Permanent
        } else {
            FailureClass::Transient
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new(&ClassificationOverrides::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_permanent_codes() {
        let classifier = ErrorClassifier::default();
        assert_eq!(classifier.classify("UNREGISTERED"), FailureClass::Permanent);
        assert_eq!(classifier.classify("NOT_FOUND"), FailureClass::Permanent);
        assert_eq!(
            classifier.classify("INVALID_ARGUMENT"),
            FailureClass::Permanent
        );
    }

    #[test]
    fn provider_side_errors_are_transient() {
        let classifier = ErrorClassifier::default();
        assert_eq!(classifier.classify("UNAVAILABLE"), FailureClass::Transient);
        assert_eq!(
            classifier.classify("QUOTA_EXCEEDED"),
            FailureClass::Transient
        );
    }

    #[test]
    fn unknown_codes_are_transient() {
        let classifier = ErrorClassifier::default();
        assert_eq!(
            classifier.classify("SOME_FUTURE_ERROR"),
            FailureClass::Transient
        );
    }

    #[test]
    fn overrides_extend_and_reclassify() {
        let overrides = ClassificationOverrides {
            permanent: vec!["sender_id_mismatch".to_string()],
            transient: vec!["invalid_argument".to_string()],
        };
        let classifier = ErrorClassifier::new(&overrides);
        assert_eq!(
            classifier.classify("SENDER_ID_MISMATCH"),
            FailureClass::Permanent
        );
        assert_eq!(
            classifier.classify("INVALID_ARGUMENT"),
            FailureClass::Transient
        );
    }
}
