//! Cumulative trait-variance accumulation.
//!
//! Subjects arrive in descending eminence order and each one appends a single
//! point to the diversity curve: the mean across the five trait axes of the
//! sample variance over all subjects so far. Accumulation is prefix-ordered
//! running sums, so feeding a stream in one pass or in resumed chunks
//! produces bit-identical curves.

use serde::{Deserialize, Serialize};

use crate::subject::{TraitScores, TRAIT_COUNT};

/// Running sums and sums of squares per trait axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitAccumulator {
    count: usize,
    sums: [f64; TRAIT_COUNT],
    sum_squares: [f64; TRAIT_COUNT],
}

impl TraitAccumulator {
    pub fn new() -> TraitAccumulator {
        TraitAccumulator {
            count: 0,
            sums: [0.0; TRAIT_COUNT],
            sum_squares: [0.0; TRAIT_COUNT],
        }
    }

    pub fn push(&mut self, scores: &TraitScores) {
        let values = scores.as_array();
        for (i, &v) in values.iter().enumerate() {
            self.sums[i] += v;
            self.sum_squares[i] += v * v;
        }
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Per-trait sample variance (n - 1 denominator). All zeros until two
    /// subjects have been accumulated. Rounding can push the variance
    /// expression slightly negative, so it is floored at zero.
    pub fn variances(&self) -> [f64; TRAIT_COUNT] {
        let mut out = [0.0; TRAIT_COUNT];
        if self.count < 2 {
            return out;
        }
        let n = self.count as f64;
        for i in 0..TRAIT_COUNT {
            let centered = self.sum_squares[i] - self.sums[i] * self.sums[i] / n;
            out[i] = (centered / (n - 1.0)).max(0.0);
        }
        out
    }

    /// Mean of the per-trait variances: one diversity value.
    pub fn diversity(&self) -> f64 {
        let variances = self.variances();
        variances.iter().sum::<f64>() / TRAIT_COUNT as f64
    }
}

impl Default for TraitAccumulator {
    fn default() -> TraitAccumulator {
        TraitAccumulator::new()
    }
}

/// The cumulative diversity curve. `values()[k]` is the diversity after the
/// first `k + 1` scored subjects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VarianceCurve {
    accumulator: TraitAccumulator,
    values: Vec<f64>,
}

impl VarianceCurve {
    pub fn new() -> VarianceCurve {
        VarianceCurve::default()
    }

    /// Appends one subject's scores and returns the new diversity value.
    /// Existing curve values are never revisited.
    pub fn push(&mut self, scores: &TraitScores) -> f64 {
        self.accumulator.push(scores);
        let value = self.accumulator.diversity();
        self.values.push(value);
        value
    }

    pub fn from_scores<'a>(scores: impl IntoIterator<Item = &'a TraitScores>) -> VarianceCurve {
        let mut curve = VarianceCurve::new();
        for s in scores {
            curve.push(s);
        }
        curve
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: [f64; TRAIT_COUNT]) -> TraitScores {
        TraitScores::from_array(values)
    }

    #[test]
    fn test_variance_is_zero_below_two_subjects() {
        let mut acc = TraitAccumulator::new();
        assert_eq!(acc.diversity(), 0.0);
        acc.push(&scores([1.0, 2.0, 3.0, 4.0, 5.0]));
        assert_eq!(acc.count(), 1);
        assert_eq!(acc.variances(), [0.0; TRAIT_COUNT]);
        assert_eq!(acc.diversity(), 0.0);
    }

    #[test]
    fn test_sample_variance_hand_check() {
        // First axis over {1, 2, 3}: mean 2, sample variance 1.
        let mut acc = TraitAccumulator::new();
        acc.push(&scores([1.0, 0.0, 0.0, 0.0, 0.0]));
        acc.push(&scores([2.0, 0.0, 0.0, 0.0, 0.0]));
        acc.push(&scores([3.0, 0.0, 0.0, 0.0, 0.0]));
        let variances = acc.variances();
        assert!((variances[0] - 1.0).abs() < 1e-12);
        assert_eq!(&variances[1..], &[0.0; 4]);
        // Diversity averages over all five axes.
        assert!((acc.diversity() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_curve_indexes_by_subjects_seen() {
        let curve = VarianceCurve::from_scores(&[
            scores([1.0, 1.0, 1.0, 1.0, 1.0]),
            scores([3.0, 3.0, 3.0, 3.0, 3.0]),
        ]);
        assert_eq!(curve.len(), 2);
        // One subject: no spread yet.
        assert_eq!(curve.values()[0], 0.0);
        // Two subjects {1, 3} per axis: sample variance 2 on each.
        assert!((curve.values()[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_resumed_accumulation_is_bit_identical() {
        let all: Vec<TraitScores> = (0..40)
            .map(|i| {
                let x = i as f64;
                scores([
                    x.sin(),
                    (x * 0.7).cos(),
                    x / 13.0,
                    (x * x) % 5.0,
                    -x / 7.0,
                ])
            })
            .collect();

        let one_pass = VarianceCurve::from_scores(&all);
        for split in [0, 1, 17, 39, 40] {
            let mut resumed = VarianceCurve::from_scores(&all[..split]);
            for s in &all[split..] {
                resumed.push(s);
            }
            assert_eq!(one_pass, resumed, "split at {split}");
        }
    }

    #[test]
    fn test_push_never_rewrites_history() {
        let mut curve = VarianceCurve::new();
        let mut snapshots: Vec<Vec<f64>> = Vec::new();
        for i in 0..10 {
            curve.push(&scores([i as f64, 0.5, -0.5, 2.0, 1.0 / (i + 1) as f64]));
            snapshots.push(curve.values().to_vec());
        }
        for (i, snapshot) in snapshots.iter().enumerate() {
            assert_eq!(&curve.values()[..=i], snapshot.as_slice());
        }
    }
}
