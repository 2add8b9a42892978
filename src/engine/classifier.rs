//! Expected-error classifiers
//!
//! A classifier decides whether an error outcome on a given channel is a
//! known, benign condition (bad guest data rejected by the authority,
//! stale credentials on the venue side, ...) rather than a failure of the
//! submission itself. Expected errors are left out of the success rate.

use std::fmt;

/// Policy answering "is this error expected for this channel?"
pub trait ErrorClassifier: fmt::Debug + Send + Sync {
    /// True when `state` is an error the channel treats as benign given `reason`
    fn is_expected_error(&self, reason: &str, state: &str) -> bool;
}

/// Fallback classifier: nothing is expected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultClassifier;

impl ErrorClassifier for DefaultClassifier {
    fn is_expected_error(&self, _reason: &str, _state: &str) -> bool {
        false
    }
}

/// Classifier backed by fixed lists of applicable states and reason patterns
///
/// An outcome is expected when its state is applicable and its reason
/// contains any pattern as a literal, case-sensitive substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternClassifier {
    name: &'static str,
    applicable_states: &'static [&'static str],
    patterns: &'static [&'static str],
}

impl PatternClassifier {
    pub const fn new(
        name: &'static str,
        applicable_states: &'static [&'static str],
        patterns: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            applicable_states,
            patterns,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn applicable_states(&self) -> &'static [&'static str] {
        self.applicable_states
    }

    pub fn patterns(&self) -> &'static [&'static str] {
        self.patterns
    }

    /// First pattern contained in `reason`, if any
    pub fn matching_pattern(&self, reason: &str) -> Option<&'static str> {
        if reason.is_empty() {
            return None;
        }
        self.patterns
            .iter()
            .copied()
            .find(|pattern| !pattern.is_empty() && reason.contains(*pattern))
    }
}

impl ErrorClassifier for PatternClassifier {
    fn is_expected_error(&self, reason: &str, state: &str) -> bool {
        self.applicable_states.iter().any(|applicable| *applicable == state)
            && self.matching_pattern(reason).is_some()
    }
}

/// Spain hospedajes: guest data validation failures reported as INVALID
pub const SPAIN_HOS: PatternClassifier = PatternClassifier::new(
    "SPAIN_HOS",
    &["INVALID"],
    &[
        "Fields 'leader guest phone' and 'invite email': one of these is required for booking registration.",
        "Field 'leader guest name' is required for booking registration.",
        "Invalid name format. Name and first surname are required.",
        "El nombre contiene caracteres no permitidos.",
        "The credentials are invalid.",
    ],
);

/// Mossos d'Esquadra: field format rejections
pub const SPAIN_MOS: PatternClassifier = PatternClassifier::new(
    "MOS",
    &["ERROR", "INVALID"],
    &[
        "Validation error",
        "Postal code does not match expected format",
        "Contains non-printable characters",
        "Field length incorrect",
        "Conté caracters no imprimibles",
    ],
);

/// Italy alloggiati (ISP)
pub const ITALY_ISP: PatternClassifier = PatternClassifier::new(
    "ISP",
    &["ERROR", "INVALID"],
    &["Wrong credentials", "Data di Arrivo Errata"],
);

pub const NAT: PatternClassifier =
    PatternClassifier::new("NAT", &["ERROR", "INVALID"], &["exp_date field is required!"]);

/// Portugal SEF also reports validation failures as CANCELED
pub const PORTUGAL_SEF: PatternClassifier = PatternClassifier::new(
    "PORTUGAL_SEF",
    &["ERROR", "INVALID", "CANCELED"],
    &["validation errors"],
);

pub const DUBAI_DTCM: PatternClassifier =
    PatternClassifier::new("DTCM", &["ERROR", "INVALID"], &["not active in DTCM"]);

/// Built-in classifiers and the channel identifiers they serve
pub const BUILTIN_CLASSIFIERS: &[(&[&str], PatternClassifier)] = &[
    (&["SPAIN_HOS"], SPAIN_HOS),
    (&["MOS"], SPAIN_MOS),
    (&["ISP"], ITALY_ISP),
    (&["NAT"], NAT),
    (&["SEF", "PORTUGAL_SEF"], PORTUGAL_SEF),
    (&["DTCM"], DUBAI_DTCM),
];
