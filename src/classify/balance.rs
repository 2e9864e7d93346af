//! Weighted tri-state balance classification.
//!
//! For each category, every chart point's weight is added to the division the
//! point occupies. The category's thresholds are its average division score
//! scaled by the configured weak/strong ratios, and each division lands in
//! exactly one state:
//!
//! ```text
//! total <  average * weak_ratio    => Weak
//! total >= average * strong_ratio  => Strong
//! otherwise                        => Neutral
//! ```
//!
//! The boundary comparisons are exact. A total equal to the strong threshold
//! is strong; a total equal to the weak threshold is not weak.

use serde::Serialize;

use crate::chart::Placements;
use crate::classify::category::{Category, Division, Strength, CATEGORY_COUNT};
use crate::classify::config::ClassifierConfig;

/// One division's total and resulting state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DivisionScore {
    pub division: Division,
    pub total: f64,
    pub strength: Strength,
}

/// One category's full classification: thresholds and the per-division
/// scores in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBalance {
    pub category: Category,
    pub average: f64,
    pub weak_threshold: f64,
    pub strong_threshold: f64,
    pub scores: Vec<DivisionScore>,
}

impl CategoryBalance {
    pub fn strength_of(&self, division: Division) -> Option<Strength> {
        self.scores
            .iter()
            .find(|s| s.division == division)
            .map(|s| s.strength)
    }

    pub fn strong(&self) -> impl Iterator<Item = &DivisionScore> {
        self.scores
            .iter()
            .filter(|s| s.strength == Strength::Strong)
    }

    pub fn weak(&self) -> impl Iterator<Item = &DivisionScore> {
        self.scores.iter().filter(|s| s.strength == Strength::Weak)
    }
}

/// All five category balances for one subject, in canonical category order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectClassification {
    balances: [CategoryBalance; CATEGORY_COUNT],
}

impl SubjectClassification {
    pub fn category(&self, category: Category) -> &CategoryBalance {
        &self.balances[category as usize]
    }

    pub fn balances(&self) -> impl Iterator<Item = &CategoryBalance> {
        self.balances.iter()
    }

    /// Every non-neutral division score, in canonical assembly order.
    pub fn non_neutral(&self) -> impl Iterator<Item = &DivisionScore> {
        self.balances
            .iter()
            .flat_map(|b| b.scores.iter())
            .filter(|s| !s.strength.is_neutral())
    }
}

/// The balance classifier. Stateless once configured; classifying the same
/// placements twice yields identical results.
#[derive(Debug, Clone)]
pub struct DivisionalClassifier {
    config: ClassifierConfig,
}

impl DivisionalClassifier {
    pub fn new(config: ClassifierConfig) -> DivisionalClassifier {
        DivisionalClassifier { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classifies every category for one normalized chart.
    pub fn classify(&self, placements: &Placements) -> SubjectClassification {
        let balances = std::array::from_fn(|i| self.classify_category(Category::ALL[i], placements));
        SubjectClassification { balances }
    }

    fn classify_category(&self, category: Category, placements: &Placements) -> CategoryBalance {
        let totals = self.category_totals(category, placements);
        let average = totals.iter().sum::<f64>() / totals.len() as f64;
        let ratios = self.config.ratios.ratios(category);
        let weak_threshold = average * ratios.weak;
        let strong_threshold = average * ratios.strong;

        let scores = category
            .divisions()
            .iter()
            .zip(totals.iter())
            .map(|(&division, &total)| {
                let strength = if total < weak_threshold {
                    Strength::Weak
                } else if total >= strong_threshold {
                    Strength::Strong
                } else {
                    Strength::Neutral
                };
                DivisionScore {
                    division,
                    total,
                    strength,
                }
            })
            .collect();

        CategoryBalance {
            category,
            average,
            weak_threshold,
            strong_threshold,
            scores,
        }
    }

    /// Sums point weights into the category's divisions. Sign-derived
    /// categories count all twelve points; house-derived categories skip the
    /// angles. A point lies in one hemisphere of each axis, so it scores
    /// twice there.
    fn category_totals(&self, category: Category, placements: &Placements) -> Vec<f64> {
        let mut totals = vec![0.0; category.division_count()];
        for placement in placements.iter() {
            let weight = self.config.weights.weight(placement.point);
            match category {
                Category::Sign => totals[placement.sign as usize] += weight,
                Category::Element => totals[placement.element() as usize] += weight,
                Category::Mode => totals[placement.mode() as usize] += weight,
                Category::Quadrant if placement.point.counts_in_houses() => {
                    totals[placement.quadrant() as usize] += weight;
                }
                Category::Hemisphere if placement.point.counts_in_houses() => {
                    totals[placement.horizontal_hemisphere() as usize] += weight;
                    totals[placement.vertical_hemisphere() as usize] += weight;
                }
                _ => {}
            }
        }
        totals
    }
}
