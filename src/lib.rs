//! # natal-profiler
//!
//! Deterministic natal-chart personality profiles for ranked historical
//! subjects, with a variance-plateau cohort cutoff.
//!
//! The pipeline has two halves. The chart half normalizes raw ecliptic
//! longitudes into signs and whole-sign houses, classifies every balance
//! category (signs, elements, modes, quadrants, hemispheres) into
//! weak/neutral/strong against weighted thresholds, and assembles a profile
//! by concatenating text components from a library in a fixed canonical
//! order. The cohort half accumulates the cumulative variance of five trait
//! axes down the eminence ranking and cuts the list where the diversity
//! curve plateaus.
//!
//! Identical inputs produce byte-identical profiles, and the plateau verdict
//! never moves once reached, so datasets can be profiled incrementally.

pub mod assemble;
pub mod chart;
pub mod classify;
pub mod cli;
pub mod cutoff;
pub mod error;
pub mod io;
pub mod library;
pub mod pipeline;
pub mod subject;

pub use assemble::{assemble_profile, component_keys, CATEGORY_ORDER};
pub use chart::{
    ChartPoint, Element, Hemisphere, House, Mode, Placement, Placements, Quadrant, Sign,
};
pub use classify::{
    Category, CategoryBalance, CategoryRatios, ClassifierConfig, Division, DivisionScore,
    DivisionalClassifier, RatioTable, Strength, SubjectClassification, WeightTable,
};
pub use cutoff::{
    CohortCutoff, CurveArtifact, CutoffConfig, PlateauDetector, TraitAccumulator, VarianceCurve,
};
pub use error::{ConfigError, CutoffError, ProfileError, Result, SubjectFault};
pub use library::{ComponentKey, ComponentLibrary};
pub use pipeline::{
    OutcomeSummary, PipelineConfig, PipelineRun, ProfilePipeline, ProfileRecord, SubjectOutcome,
};
pub use subject::{BirthRecord, Subject, SubjectId, TraitScores, TRAIT_COUNT, TRAIT_NAMES};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
