//! Error types for the profiling pipeline.
//!
//! Faults are layered by blast radius. A [`SubjectFault`] spoils one subject
//! and the run keeps going; a [`ConfigError`] means the weight/ratio tables or
//! cutoff tunables are unusable and the run never starts; a [`CutoffError`]
//! only blocks cohort selection, never profiling. [`ProfileError`] is the
//! crate-level umbrella returned at I/O and configuration boundaries.

use serde::Serialize;
use thiserror::Error;

use crate::chart::ChartPoint;

pub type Result<T> = std::result::Result<T, ProfileError>;

/// A fault scoped to a single subject. The pipeline logs it, records the
/// subject as faulted, and moves on.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubjectFault {
    /// A chart-point longitude outside `[0, 360)` or not finite.
    #[error("invalid placement for {point}: longitude {longitude} is outside [0, 360)")]
    InvalidPlacement { point: ChartPoint, longitude: f64 },

    /// The component library has no text for a key the subject's chart
    /// requires. Fatal for the subject: a partial profile is never emitted.
    #[error("no component text for key \"{key}\"")]
    MissingComponent { key: String },
}

/// Incomplete or out-of-range configuration. Aborts the run before any
/// subject is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("weight table has no entry for chart point \"{point}\"")]
    MissingPointWeight { point: String },

    #[error("weight table names unknown chart point \"{name}\"")]
    UnknownPoint { name: String },

    #[error("ratio table has no entry for category \"{category}\"")]
    MissingCategoryRatio { category: String },

    #[error("ratio table names unknown category \"{name}\"")]
    UnknownCategory { name: String },

    #[error("cutoff {field} must be at least {min}, got {got}")]
    CutoffOutOfRange {
        field: &'static str,
        min: usize,
        got: usize,
    },
}

/// Why cohort selection produced no cutoff. Never aborts a run: the caller
/// decides whether to profile the full list instead.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CutoffError {
    #[error("insufficient data for cutoff: {observed} scored subjects, at least {required} required")]
    InsufficientData { observed: usize, required: usize },
}

/// Crate-level error. Everything a caller can see at the library boundary.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error(transparent)]
    Subject(#[from] SubjectFault),

    #[error("configuration error: {0}")]
    MissingConfiguration(#[from] ConfigError),

    #[error(transparent)]
    Cutoff(#[from] CutoffError),

    /// A component-library key that matches neither recognized key shape.
    #[error("malformed component key \"{key}\"")]
    MalformedComponentKey { key: String },

    /// A subject record that could not be decoded, with its source location.
    #[error("malformed record at {path}:{line}: {message}")]
    MalformedRecord {
        path: String,
        line: usize,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_fault_messages_name_the_offender() {
        let fault = SubjectFault::InvalidPlacement {
            point: ChartPoint::Moon,
            longitude: 360.0,
        };
        assert_eq!(
            fault.to_string(),
            "invalid placement for Moon: longitude 360 is outside [0, 360)"
        );

        let fault = SubjectFault::MissingComponent {
            key: "Moon in Aries".to_string(),
        };
        assert!(fault.to_string().contains("\"Moon in Aries\""));
    }

    #[test]
    fn test_config_error_wraps_into_missing_configuration() {
        let err: ProfileError = ConfigError::MissingCategoryRatio {
            category: "hemisphere".to_string(),
        }
        .into();
        assert!(matches!(err, ProfileError::MissingConfiguration(_)));
        assert!(err.to_string().starts_with("configuration error:"));
    }

    #[test]
    fn test_insufficient_data_reports_both_counts() {
        let err = CutoffError::InsufficientData {
            observed: 120,
            required: 1000,
        };
        let msg = err.to_string();
        assert!(msg.contains("120"));
        assert!(msg.contains("1000"));
    }
}
