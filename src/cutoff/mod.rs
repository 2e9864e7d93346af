//! Cohort cutoff selection: the cumulative diversity curve and the
//! variance-plateau detector that decides how deep into the ranked list
//! profiling should reach.

pub mod curve;
pub mod selector;

pub use curve::{TraitAccumulator, VarianceCurve};
pub use selector::{CohortCutoff, CurveArtifact, CutoffConfig, PlateauDetector};
