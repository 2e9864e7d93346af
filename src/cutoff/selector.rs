//! Plateau detection over the diversity curve.
//!
//! The raw curve is smoothed with a trailing moving average, slopes are taken
//! as first differences, and the cohort boundary is the start of the first
//! run of `sustain` consecutive slopes below the threshold. Trailing (not
//! centered) smoothing keeps every already-computed value fixed as data
//! arrives, so a cutoff found once can only be confirmed, never moved, by
//! more subjects.

use serde::{Deserialize, Serialize};

use crate::cutoff::curve::VarianceCurve;
use crate::error::{ConfigError, CutoffError};

fn default_smoothing_window() -> usize {
    1000
}

fn default_sustain() -> usize {
    250
}

fn default_min_subjects() -> usize {
    1000
}

/// Tunables for plateau detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutoffConfig {
    /// Trailing moving-average window over the raw curve.
    pub smoothing_window: usize,
    /// A slope below this counts toward a plateau. Zero means any decline.
    pub slope_threshold: f64,
    /// Consecutive sub-threshold slopes required to call a plateau.
    pub sustain: usize,
    /// Minimum scored subjects before any verdict is attempted.
    pub min_subjects: usize,
}

impl Default for CutoffConfig {
    fn default() -> CutoffConfig {
        CutoffConfig {
            smoothing_window: default_smoothing_window(),
            slope_threshold: 0.0,
            sustain: default_sustain(),
            min_subjects: default_min_subjects(),
        }
    }
}

impl CutoffConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smoothing_window < 1 {
            return Err(ConfigError::CutoffOutOfRange {
                field: "smoothing_window",
                min: 1,
                got: self.smoothing_window,
            });
        }
        if self.sustain < 1 {
            return Err(ConfigError::CutoffOutOfRange {
                field: "sustain",
                min: 1,
                got: self.sustain,
            });
        }
        if self.min_subjects < 2 {
            return Err(ConfigError::CutoffOutOfRange {
                field: "min_subjects",
                min: 2,
                got: self.min_subjects,
            });
        }
        Ok(())
    }
}

/// A detected cohort boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CohortCutoff {
    /// Number of scored subjects retained: everyone before the plateau.
    pub cohort_size: usize,
    /// Smoothed diversity at the last retained subject.
    pub diversity_at_cutoff: f64,
    /// Curve length when the verdict was reached.
    pub curve_len: usize,
}

/// Full evaluation trace, written alongside the profiles so a run's verdict
/// can be inspected without recomputing anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveArtifact {
    pub config: CutoffConfig,
    pub raw: Vec<f64>,
    pub smoothed: Vec<f64>,
    pub slopes: Vec<f64>,
    pub cutoff: Option<CohortCutoff>,
}

/// Scans diversity curves for a sustained plateau.
#[derive(Debug, Clone)]
pub struct PlateauDetector {
    config: CutoffConfig,
}

impl PlateauDetector {
    pub fn new(config: CutoffConfig) -> PlateauDetector {
        PlateauDetector { config }
    }

    pub fn config(&self) -> &CutoffConfig {
        &self.config
    }

    /// Trailing moving average. Entry `i` averages the window ending at `i`,
    /// truncated at the head while fewer than `smoothing_window` values
    /// exist. Appending to `raw` never changes earlier entries.
    pub fn smooth(&self, raw: &[f64]) -> Vec<f64> {
        let window = self.config.smoothing_window.max(1);
        let mut out = Vec::with_capacity(raw.len());
        let mut window_sum = 0.0;
        for (i, &value) in raw.iter().enumerate() {
            window_sum += value;
            if i >= window {
                window_sum -= raw[i - window];
            }
            let span = (i + 1).min(window) as f64;
            out.push(window_sum / span);
        }
        out
    }

    /// First differences of the smoothed curve. Entry 0 is a zero pad so
    /// slope and curve indices line up; real slopes start at entry 1.
    pub fn slopes(smoothed: &[f64]) -> Vec<f64> {
        let mut out = Vec::with_capacity(smoothed.len());
        for (i, &value) in smoothed.iter().enumerate() {
            if i == 0 {
                out.push(0.0);
            } else {
                out.push(value - smoothed[i - 1]);
            }
        }
        out
    }

    /// Evaluates the curve.
    ///
    /// - Fewer than `min_subjects` scored values: [`CutoffError::InsufficientData`].
    /// - Enough data but no sustained decline yet: `Ok(None)`, the curve is
    ///   still accumulating.
    /// - Otherwise the first sustained run of sub-threshold slopes fixes the
    ///   boundary at the run's start.
    pub fn evaluate(&self, curve: &VarianceCurve) -> Result<Option<CohortCutoff>, CutoffError> {
        let observed = curve.len();
        if observed < self.config.min_subjects {
            return Err(CutoffError::InsufficientData {
                observed,
                required: self.config.min_subjects,
            });
        }
        let smoothed = self.smooth(curve.values());
        Ok(self.find_plateau(&smoothed))
    }

    /// Builds the full evaluation trace for a curve. Never fails: with too
    /// little data the artifact simply carries no cutoff.
    pub fn artifact(&self, curve: &VarianceCurve) -> CurveArtifact {
        let raw = curve.values().to_vec();
        let smoothed = self.smooth(&raw);
        let slopes = Self::slopes(&smoothed);
        let cutoff = if curve.len() < self.config.min_subjects {
            None
        } else {
            self.find_plateau(&smoothed)
        };
        CurveArtifact {
            config: self.config,
            raw,
            smoothed,
            slopes,
            cutoff,
        }
    }

    fn find_plateau(&self, smoothed: &[f64]) -> Option<CohortCutoff> {
        let slopes = Self::slopes(smoothed);
        let mut run_start = 0;
        let mut run_len = 0;
        for (i, &slope) in slopes.iter().enumerate().skip(1) {
            if slope < self.config.slope_threshold {
                if run_len == 0 {
                    run_start = i;
                }
                run_len += 1;
                if run_len >= self.config.sustain {
                    return Some(CohortCutoff {
                        cohort_size: run_start,
                        diversity_at_cutoff: smoothed[run_start - 1],
                        curve_len: smoothed.len(),
                    });
                }
            } else {
                run_len = 0;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cutoff::curve::VarianceCurve;
    use crate::subject::TraitScores;

    fn detector(window: usize, sustain: usize, min_subjects: usize) -> PlateauDetector {
        PlateauDetector::new(CutoffConfig {
            smoothing_window: window,
            slope_threshold: 0.0,
            sustain,
            min_subjects,
        })
    }

    /// Curve whose diversity rises while early subjects arrive and then
    /// decays once the scores turn uniform.
    fn rising_then_flat(rising: usize, flat: usize) -> VarianceCurve {
        let mut curve = VarianceCurve::new();
        for i in 0..rising {
            let x = if i % 2 == 0 { i as f64 } else { -(i as f64) };
            curve.push(&TraitScores::from_array([x, x, x, x, x]));
        }
        for _ in 0..flat {
            curve.push(&TraitScores::from_array([0.0, 0.0, 0.0, 0.0, 0.0]));
        }
        curve
    }

    #[test]
    fn test_config_validation() {
        assert!(CutoffConfig::default().validate().is_ok());
        let bad = CutoffConfig {
            smoothing_window: 0,
            ..CutoffConfig::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::CutoffOutOfRange {
                field: "smoothing_window",
                ..
            })
        ));
        let bad = CutoffConfig {
            min_subjects: 1,
            ..CutoffConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_smoothing_truncates_head_window() {
        let detector = detector(3, 1, 2);
        let smoothed = detector.smooth(&[3.0, 6.0, 9.0, 12.0]);
        assert_eq!(smoothed, vec![3.0, 4.5, 6.0, 9.0]);
    }

    #[test]
    fn test_smoothing_window_one_is_identity() {
        let detector = detector(1, 1, 2);
        let raw = [0.5, 0.25, 0.125];
        assert_eq!(detector.smooth(&raw), raw.to_vec());
    }

    #[test]
    fn test_slopes_pad_index_zero() {
        let slopes = PlateauDetector::slopes(&[1.0, 3.0, 2.0]);
        assert_eq!(slopes, vec![0.0, 2.0, -1.0]);
    }

    #[test]
    fn test_insufficient_data() {
        let detector = detector(1, 2, 50);
        let curve = rising_then_flat(10, 10);
        assert_eq!(
            detector.evaluate(&curve),
            Err(CutoffError::InsufficientData {
                observed: 20,
                required: 50,
            })
        );
    }

    #[test]
    fn test_no_plateau_on_rising_curve() {
        let detector = detector(1, 3, 2);
        let curve = rising_then_flat(30, 0);
        assert_eq!(detector.evaluate(&curve), Ok(None));
    }

    #[test]
    fn test_detects_plateau_at_decline_start() {
        let detector = detector(1, 3, 2);
        let curve = rising_then_flat(20, 15);
        let cutoff = detector.evaluate(&curve).unwrap().expect("plateau expected");
        // Diversity starts shrinking with the first uniform subject, at
        // curve index 20, so twenty scored subjects are retained.
        assert_eq!(cutoff.cohort_size, 20);
        assert_eq!(cutoff.curve_len, 35);
        assert!(cutoff.diversity_at_cutoff > 0.0);
    }

    #[test]
    fn test_sustain_filters_single_dips() {
        // Values at the running mean (zero) dent the curve for one step;
        // the alternating pairs around them push it back up. Dips land at
        // indices 3 and 6 only, never adjacent.
        let mut curve = VarianceCurve::new();
        for x in [0.0, 10.0, -10.0, 0.0, 20.0, -20.0, 0.0, 30.0, -30.0, 40.0] {
            curve.push(&TraitScores::from_array([x, x, x, x, x]));
        }
        let strict = detector(1, 2, 2);
        let raw = curve.values();
        let dips: Vec<usize> = (1..raw.len()).filter(|&i| raw[i] < raw[i - 1]).collect();
        assert!(!dips.is_empty());
        assert!(dips.windows(2).all(|w| w[1] > w[0] + 1), "dips are isolated");
        assert_eq!(strict.evaluate(&curve), Ok(None));

        let lenient = detector(1, 1, 2);
        let cutoff = lenient.evaluate(&curve).unwrap().expect("single dip triggers");
        assert_eq!(cutoff.cohort_size, dips[0]);
    }

    #[test]
    fn test_verdict_is_stable_under_append() {
        let detector = detector(2, 3, 2);
        let mut curve = rising_then_flat(12, 30);
        let first = detector
            .evaluate(&curve)
            .unwrap()
            .expect("plateau expected");
        for _ in 0..25 {
            curve.push(&TraitScores::from_array([0.0; 5]));
        }
        let second = detector
            .evaluate(&curve)
            .unwrap()
            .expect("plateau still expected");
        assert_eq!(first.cohort_size, second.cohort_size);
        assert_eq!(first.diversity_at_cutoff, second.diversity_at_cutoff);
    }

    #[test]
    fn test_artifact_carries_trace() {
        let detector = detector(2, 2, 2);
        let curve = rising_then_flat(8, 8);
        let artifact = detector.artifact(&curve);
        assert_eq!(artifact.raw.len(), 16);
        assert_eq!(artifact.smoothed.len(), 16);
        assert_eq!(artifact.slopes.len(), 16);
        assert_eq!(artifact.raw, curve.values());
        assert_eq!(
            artifact.cutoff,
            detector.evaluate(&curve).unwrap()
        );
    }

    #[test]
    fn test_artifact_without_enough_data_has_no_cutoff() {
        let detector = detector(1, 1, 100);
        let curve = rising_then_flat(5, 5);
        let artifact = detector.artifact(&curve);
        assert_eq!(artifact.cutoff, None);
        assert_eq!(artifact.raw.len(), 10);
    }
}
