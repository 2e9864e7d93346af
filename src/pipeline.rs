//! The profiling pipeline: rank, score, cut, classify, assemble.
//!
//! A run takes the full subject list and produces one outcome per subject.
//! Scored subjects feed the diversity curve in descending-eminence order;
//! the plateau detector proposes a cohort boundary; subjects inside the
//! boundary are normalized, classified, and assembled in parallel. A subject
//! fault never stops the run, and a missing or still-accumulating cutoff
//! degrades to profiling the whole list with a warning.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assemble::assemble_profile;
use crate::chart::Placements;
use crate::classify::{
    CategoryRatios, ClassifierConfig, DivisionalClassifier, RatioTable, WeightTable,
};
use crate::cutoff::{CohortCutoff, CurveArtifact, CutoffConfig, PlateauDetector, VarianceCurve};
use crate::error::{CutoffError, Result, SubjectFault};
use crate::library::ComponentLibrary;
use crate::subject::{Subject, SubjectId};

// ============================================================================
// Configuration
// ============================================================================

/// Whole-pipeline configuration: classifier tables plus cutoff tunables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineConfig {
    pub classifier: ClassifierConfig,
    pub cutoff: CutoffConfig,
}

/// On-disk shape of the YAML config. Tables are name-keyed maps; a table
/// that is present must be complete, a table that is absent falls back to
/// the reference defaults.
#[derive(Debug, Deserialize)]
struct RawPipelineConfig {
    #[serde(default)]
    weights: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    ratios: Option<BTreeMap<String, CategoryRatios>>,
    #[serde(default)]
    cutoff: CutoffConfig,
}

impl PipelineConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<PipelineConfig> {
        let raw: RawPipelineConfig = serde_yaml::from_str(yaml)?;
        let weights = match &raw.weights {
            Some(named) => WeightTable::from_named(named)?,
            None => WeightTable::default(),
        };
        let ratios = match &raw.ratios {
            Some(named) => RatioTable::from_named(named)?,
            None => RatioTable::default(),
        };
        raw.cutoff.validate()?;
        Ok(PipelineConfig {
            classifier: ClassifierConfig { weights, ratios },
            cutoff: raw.cutoff,
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<PipelineConfig> {
        let yaml = fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&yaml)?;
        log::debug!("loaded pipeline config from {}", path.as_ref().display());
        Ok(config)
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// One retained subject's finished profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: SubjectId,
    pub name: String,
    pub eminence_rank: u32,
    pub description: String,
}

/// What happened to one subject during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubjectOutcome {
    /// Classified and assembled successfully.
    Profiled(ProfileRecord),
    /// Spoiled by a per-subject fault; everyone else is unaffected.
    Faulted {
        id: SubjectId,
        eminence_rank: u32,
        fault: SubjectFault,
    },
    /// Ranked past the cohort boundary.
    ExcludedByCutoff { id: SubjectId, eminence_rank: u32 },
}

impl SubjectOutcome {
    pub fn id(&self) -> &SubjectId {
        match self {
            SubjectOutcome::Profiled(record) => &record.id,
            SubjectOutcome::Faulted { id, .. } => id,
            SubjectOutcome::ExcludedByCutoff { id, .. } => id,
        }
    }

    pub fn is_profiled(&self) -> bool {
        matches!(self, SubjectOutcome::Profiled(_))
    }
}

/// Tally of outcomes for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OutcomeSummary {
    pub profiled: usize,
    pub faulted: usize,
    pub excluded_by_cutoff: usize,
}

impl OutcomeSummary {
    pub fn tally(outcomes: &[SubjectOutcome]) -> OutcomeSummary {
        let mut summary = OutcomeSummary::default();
        for outcome in outcomes {
            match outcome {
                SubjectOutcome::Profiled(_) => summary.profiled += 1,
                SubjectOutcome::Faulted { .. } => summary.faulted += 1,
                SubjectOutcome::ExcludedByCutoff { .. } => summary.excluded_by_cutoff += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.profiled + self.faulted + self.excluded_by_cutoff
    }
}

impl fmt::Display for OutcomeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} profiled, {} faulted, {} excluded by cutoff",
            self.profiled, self.faulted, self.excluded_by_cutoff
        )
    }
}

/// Everything a run produced. Outcomes are in descending eminence order.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRun {
    pub outcomes: Vec<SubjectOutcome>,
    pub cutoff: Option<CohortCutoff>,
    pub curve: VarianceCurve,
    pub summary: OutcomeSummary,
}

impl PipelineRun {
    /// Finished profiles, in descending eminence order.
    pub fn profiles(&self) -> impl Iterator<Item = &ProfileRecord> {
        self.outcomes.iter().filter_map(|o| match o {
            SubjectOutcome::Profiled(record) => Some(record),
            _ => None,
        })
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// The assembled pipeline. Construction validates nothing further: configs
/// are checked where they are loaded, so every pipeline is runnable.
pub struct ProfilePipeline {
    classifier: DivisionalClassifier,
    detector: PlateauDetector,
    library: ComponentLibrary,
}

impl ProfilePipeline {
    pub fn new(config: PipelineConfig, library: ComponentLibrary) -> ProfilePipeline {
        ProfilePipeline {
            classifier: DivisionalClassifier::new(config.classifier),
            detector: PlateauDetector::new(config.cutoff),
            library,
        }
    }

    pub fn library(&self) -> &ComponentLibrary {
        &self.library
    }

    pub fn classifier(&self) -> &DivisionalClassifier {
        &self.classifier
    }

    /// Builds the diversity curve over the scored subjects in descending
    /// eminence order and evaluates the cutoff. Unscored subjects contribute
    /// nothing to the curve.
    pub fn select_cohort(
        &self,
        subjects: &[Subject],
    ) -> std::result::Result<(VarianceCurve, Option<CohortCutoff>), CutoffError> {
        let ordered = rank_order(subjects);
        let mut curve = VarianceCurve::new();
        for subject in &ordered {
            if let Some(traits) = &subject.traits {
                curve.push(traits);
            }
        }
        let cutoff = self.detector.evaluate(&curve)?;
        Ok((curve, cutoff))
    }

    /// Runs the full pipeline over a subject list.
    ///
    /// The cutoff is advisory: with too little data, or no plateau yet, the
    /// whole list is profiled and the condition is logged. Per-subject
    /// faults are recorded in the outcomes, never propagated.
    pub fn run(&self, subjects: &[Subject]) -> PipelineRun {
        let ordered = rank_order(subjects);

        let mut curve = VarianceCurve::new();
        for subject in &ordered {
            if let Some(traits) = &subject.traits {
                curve.push(traits);
            }
        }

        let cutoff = match self.detector.evaluate(&curve) {
            Ok(Some(cutoff)) => {
                log::info!(
                    "cohort cutoff at {} scored subjects (diversity {:.6})",
                    cutoff.cohort_size,
                    cutoff.diversity_at_cutoff
                );
                Some(cutoff)
            }
            Ok(None) => {
                log::warn!(
                    "no diversity plateau over {} scored subjects; profiling the full list",
                    curve.len()
                );
                None
            }
            Err(CutoffError::InsufficientData { observed, required }) => {
                log::warn!(
                    "insufficient data for cohort cutoff ({observed} scored subjects, \
                     {required} required); profiling the full list"
                );
                None
            }
        };

        let boundary = match &cutoff {
            Some(cutoff) => retained_count(&ordered, cutoff.cohort_size),
            None => ordered.len(),
        };
        let (retained, excluded) = ordered.split_at(boundary);

        let mut outcomes: Vec<SubjectOutcome> = retained
            .par_iter()
            .map(|subject| self.profile_subject(subject))
            .collect();
        for subject in excluded {
            outcomes.push(SubjectOutcome::ExcludedByCutoff {
                id: subject.id.clone(),
                eminence_rank: subject.eminence_rank,
            });
        }

        let summary = OutcomeSummary::tally(&outcomes);
        log::info!("run complete: {summary}");

        PipelineRun {
            outcomes,
            cutoff,
            curve,
            summary,
        }
    }

    /// Normalize, classify, assemble. All the per-subject work.
    pub fn profile_subject(&self, subject: &Subject) -> SubjectOutcome {
        match self.try_profile(subject) {
            Ok(description) => SubjectOutcome::Profiled(ProfileRecord {
                id: subject.id.clone(),
                name: subject.name.clone(),
                eminence_rank: subject.eminence_rank,
                description,
            }),
            Err(fault) => {
                log::warn!("subject {} faulted: {fault}", subject.id);
                SubjectOutcome::Faulted {
                    id: subject.id.clone(),
                    eminence_rank: subject.eminence_rank,
                    fault,
                }
            }
        }
    }

    fn try_profile(&self, subject: &Subject) -> std::result::Result<String, SubjectFault> {
        let placements = Placements::from_longitudes(&subject.longitudes)?;
        let classification = self.classifier.classify(&placements);
        assemble_profile(&classification, &placements, &self.library)
    }

    /// Evaluation trace for a run's curve, for writing alongside profiles.
    pub fn curve_artifact(&self, run: &PipelineRun) -> CurveArtifact {
        self.detector.artifact(&run.curve)
    }
}

/// Subjects in descending eminence order: rank ascending, ties by id.
fn rank_order(subjects: &[Subject]) -> Vec<&Subject> {
    let mut ordered: Vec<&Subject> = subjects.iter().collect();
    ordered.sort_by(|a, b| a.eminence_key().cmp(&b.eminence_key()));
    ordered
}

/// Number of list positions retained by a cutoff of `cohort_size` scored
/// subjects: everything up to and including the last retained scored
/// subject, unscored neighbors included.
fn retained_count(ordered: &[&Subject], cohort_size: usize) -> usize {
    let mut scored_seen = 0;
    for (i, subject) in ordered.iter().enumerate() {
        if subject.traits.is_some() {
            scored_seen += 1;
            if scored_seen == cohort_size {
                return i + 1;
            }
        }
    }
    ordered.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::component_keys;
    use crate::chart::{ChartPoint, KENNEDY_LONGITUDES};
    use crate::subject::{BirthRecord, TraitScores};

    fn birth() -> BirthRecord {
        BirthRecord {
            date: "1900-01-01".parse().unwrap(),
            time: None,
            place: None,
        }
    }

    fn subject(id: &str, rank: u32, traits: Option<TraitScores>) -> Subject {
        Subject::new(
            Some(id.to_string()),
            format!("Subject {id}"),
            birth(),
            rank,
            KENNEDY_LONGITUDES,
            traits,
        )
    }

    fn spread(x: f64) -> Option<TraitScores> {
        Some(TraitScores::from_array([x, x, x, x, x]))
    }

    /// Library covering every key the Kennedy chart needs.
    fn kennedy_library() -> ComponentLibrary {
        let placements = Placements::from_longitudes(&KENNEDY_LONGITUDES).unwrap();
        let classification =
            DivisionalClassifier::new(ClassifierConfig::default()).classify(&placements);
        let mut library = ComponentLibrary::new();
        for key in component_keys(&classification, &placements) {
            library.insert(key, format!("[{}]", key.render()));
        }
        library
    }

    fn test_config(min_subjects: usize, sustain: usize) -> PipelineConfig {
        PipelineConfig {
            classifier: ClassifierConfig::default(),
            cutoff: CutoffConfig {
                smoothing_window: 1,
                slope_threshold: 0.0,
                sustain,
                min_subjects,
            },
        }
    }

    /// Rising diversity for `rising` subjects, then uniform scores.
    fn ranked_subjects(rising: usize, flat: usize) -> Vec<Subject> {
        let mut subjects = Vec::new();
        for i in 0..rising {
            let x = if i % 2 == 0 { i as f64 } else { -(i as f64) };
            subjects.push(subject(&format!("r{i:03}"), i as u32 + 1, spread(x)));
        }
        for i in 0..flat {
            subjects.push(subject(
                &format!("f{i:03}"),
                (rising + i) as u32 + 1,
                spread(0.0),
            ));
        }
        subjects
    }

    #[test]
    fn test_run_profiles_whole_list_without_plateau() {
        let pipeline = ProfilePipeline::new(test_config(2, 3), kennedy_library());
        let subjects = ranked_subjects(10, 0);
        let run = pipeline.run(&subjects);

        assert_eq!(run.cutoff, None);
        assert_eq!(run.summary.profiled, 10);
        assert_eq!(run.summary.excluded_by_cutoff, 0);
        assert_eq!(run.curve.len(), 10);
    }

    #[test]
    fn test_run_excludes_past_cutoff() {
        let pipeline = ProfilePipeline::new(test_config(2, 3), kennedy_library());
        let subjects = ranked_subjects(20, 15);
        let run = pipeline.run(&subjects);

        let cutoff = run.cutoff.expect("plateau expected");
        assert_eq!(cutoff.cohort_size, 20);
        assert_eq!(run.summary.profiled, 20);
        assert_eq!(run.summary.excluded_by_cutoff, 15);
        assert_eq!(run.summary.total(), 35);

        // Outcomes stay in eminence order; the tail is all exclusions.
        for outcome in &run.outcomes[..20] {
            assert!(outcome.is_profiled(), "{:?}", outcome.id());
        }
        for outcome in &run.outcomes[20..] {
            assert!(matches!(outcome, SubjectOutcome::ExcludedByCutoff { .. }));
        }
    }

    #[test]
    fn test_run_records_faults_without_stopping() {
        let pipeline = ProfilePipeline::new(test_config(50, 3), kennedy_library());
        let mut subjects = ranked_subjects(6, 0);
        subjects[2].longitudes[ChartPoint::Venus.index()] = 720.0;
        let run = pipeline.run(&subjects);

        assert_eq!(run.summary.profiled, 5);
        assert_eq!(run.summary.faulted, 1);
        match &run.outcomes[2] {
            SubjectOutcome::Faulted { id, fault, .. } => {
                assert_eq!(id.as_str(), "r002");
                assert!(matches!(fault, SubjectFault::InvalidPlacement { .. }));
            }
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_component_faults_only_that_subject() {
        let mut library = kennedy_library();
        let placements = Placements::from_longitudes(&KENNEDY_LONGITUDES).unwrap();
        let classification =
            DivisionalClassifier::new(ClassifierConfig::default()).classify(&placements);
        let keys = component_keys(&classification, &placements);

        // A chart variant whose Moon moved to Leo needs one extra key.
        let mut shifted = KENNEDY_LONGITUDES;
        shifted[ChartPoint::Moon.index()] = 125.0;
        let shifted_placements = Placements::from_longitudes(&shifted).unwrap();
        let shifted_classification =
            DivisionalClassifier::new(ClassifierConfig::default()).classify(&shifted_placements);
        for key in component_keys(&shifted_classification, &shifted_placements) {
            if !keys.contains(&key) && key.render() != "Moon in Leo" {
                library.insert(key, "extra");
            }
        }

        let pipeline = ProfilePipeline::new(test_config(50, 3), library);
        let mut subjects = ranked_subjects(4, 0);
        subjects[1].longitudes = shifted;
        let run = pipeline.run(&subjects);

        assert_eq!(run.summary.faulted, 1);
        match &run.outcomes[1] {
            SubjectOutcome::Faulted { fault, .. } => {
                assert_eq!(
                    fault,
                    &SubjectFault::MissingComponent {
                        key: "Moon in Leo".to_string()
                    }
                );
            }
            other => panic!("expected fault, got {other:?}"),
        }
        assert_eq!(run.summary.profiled, 3);
    }

    #[test]
    fn test_select_cohort_skips_unscored_subjects() {
        let pipeline = ProfilePipeline::new(test_config(2, 3), kennedy_library());
        let mut subjects = ranked_subjects(20, 15);
        subjects.insert(5, subject("unscored", 100, None));
        // Renumber everyone after the insertion to keep ranks unique.
        for (i, subject) in subjects.iter_mut().enumerate() {
            subject.eminence_rank = i as u32 + 1;
        }

        let (curve, cutoff) = pipeline.select_cohort(&subjects).unwrap();
        assert_eq!(curve.len(), 35);
        let cutoff = cutoff.expect("plateau expected");
        assert_eq!(cutoff.cohort_size, 20);

        // The unscored subject sits inside the boundary and is profiled.
        let run = pipeline.run(&subjects);
        assert_eq!(run.summary.profiled, 21);
        assert_eq!(run.summary.excluded_by_cutoff, 15);
    }

    #[test]
    fn test_run_is_deterministic() {
        let pipeline = ProfilePipeline::new(test_config(2, 3), kennedy_library());
        let subjects = ranked_subjects(20, 10);
        let first = pipeline.run(&subjects);
        let second = pipeline.run(&subjects);
        assert_eq!(first, second);
    }

    #[test]
    fn test_config_from_yaml() {
        let config = PipelineConfig::from_yaml_str(
            r#"
cutoff:
  smoothing_window: 10
  sustain: 5
  min_subjects: 20
"#,
        )
        .unwrap();
        assert_eq!(config.classifier, ClassifierConfig::default());
        assert_eq!(config.cutoff.smoothing_window, 10);
        assert_eq!(config.cutoff.sustain, 5);
        assert_eq!(config.cutoff.min_subjects, 20);
        assert_eq!(config.cutoff.slope_threshold, 0.0);
    }

    #[test]
    fn test_config_rejects_partial_weight_table() {
        let err = PipelineConfig::from_yaml_str(
            r#"
weights:
  moon: 3
  sun: 3
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("weight table"));
    }

    #[test]
    fn test_empty_config_is_reference_default() {
        let config = PipelineConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }
}
