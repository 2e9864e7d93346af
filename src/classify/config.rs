//! Classifier configuration: the per-point weight table and the per-category
//! weak/strong ratio table.
//!
//! Both tables ship with reference defaults and can be overridden from
//! configuration. Overrides must be complete: a table that names only some
//! points or categories is rejected up front rather than silently blended
//! with the defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::chart::{ChartPoint, POINT_COUNT};
use crate::classify::category::{Category, CATEGORY_COUNT};
use crate::error::ConfigError;

// ============================================================================
// Weight table
// ============================================================================

/// Scoring weight of each chart point, indexed in canonical point order.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    weights: [f64; POINT_COUNT],
}

/// Reference weights: luminaries and angles 3, inner planets 2, the social
/// planets 1, outer planets 0.
const REFERENCE_WEIGHTS: [f64; POINT_COUNT] = [
    3.0, // Moon
    3.0, // Sun
    2.0, // Mercury
    2.0, // Venus
    2.0, // Mars
    1.0, // Jupiter
    1.0, // Saturn
    0.0, // Uranus
    0.0, // Neptune
    0.0, // Pluto
    3.0, // Ascendant
    3.0, // Midheaven
];

impl WeightTable {
    pub const fn reference() -> WeightTable {
        WeightTable {
            weights: REFERENCE_WEIGHTS,
        }
    }

    /// Builds a table from name-keyed overrides. Every chart point must be
    /// present and every name must be a known point.
    pub fn from_named(named: &BTreeMap<String, f64>) -> Result<WeightTable, ConfigError> {
        for name in named.keys() {
            if ChartPoint::from_name(name).is_none() {
                return Err(ConfigError::UnknownPoint { name: name.clone() });
            }
        }
        let mut weights = [0.0; POINT_COUNT];
        for point in ChartPoint::ALL {
            let value = named
                .iter()
                .find(|(name, _)| ChartPoint::from_name(name) == Some(point))
                .map(|(_, &w)| w);
            match value {
                Some(w) => weights[point.index()] = w,
                None => {
                    return Err(ConfigError::MissingPointWeight {
                        point: point.name().to_string(),
                    })
                }
            }
        }
        Ok(WeightTable { weights })
    }

    pub fn weight(&self, point: ChartPoint) -> f64 {
        self.weights[point.index()]
    }
}

impl Default for WeightTable {
    fn default() -> WeightTable {
        WeightTable::reference()
    }
}

// ============================================================================
// Ratio table
// ============================================================================

/// Weak and strong threshold ratios for one category. Thresholds are the
/// category's average score times these ratios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryRatios {
    pub weak: f64,
    pub strong: f64,
}

/// Per-category ratios, indexed in canonical category order.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioTable {
    ratios: [CategoryRatios; CATEGORY_COUNT],
}

/// Reference ratios. A weak ratio of zero makes the weak state unreachable
/// for that category, since a total can never drop below zero.
const REFERENCE_RATIOS: [CategoryRatios; CATEGORY_COUNT] = [
    CategoryRatios { weak: 0.0, strong: 2.0 }, // Sign
    CategoryRatios { weak: 0.5, strong: 1.5 }, // Element
    CategoryRatios { weak: 0.5, strong: 1.5 }, // Mode
    CategoryRatios { weak: 0.0, strong: 1.5 }, // Quadrant
    CategoryRatios { weak: 0.0, strong: 1.4 }, // Hemisphere
];

impl RatioTable {
    pub const fn reference() -> RatioTable {
        RatioTable {
            ratios: REFERENCE_RATIOS,
        }
    }

    /// Builds a table from name-keyed overrides. Every category must be
    /// present and every name must be a known category.
    pub fn from_named(named: &BTreeMap<String, CategoryRatios>) -> Result<RatioTable, ConfigError> {
        for name in named.keys() {
            if Category::from_label(name).is_none() {
                return Err(ConfigError::UnknownCategory { name: name.clone() });
            }
        }
        let mut ratios = REFERENCE_RATIOS;
        for category in Category::ALL {
            let value = named
                .iter()
                .find(|(name, _)| Category::from_label(name) == Some(category))
                .map(|(_, &r)| r);
            match value {
                Some(r) => ratios[category as usize] = r,
                None => {
                    return Err(ConfigError::MissingCategoryRatio {
                        category: category.label().to_string(),
                    })
                }
            }
        }
        Ok(RatioTable { ratios })
    }

    pub fn ratios(&self, category: Category) -> CategoryRatios {
        self.ratios[category as usize]
    }
}

impl Default for RatioTable {
    fn default() -> RatioTable {
        RatioTable::reference()
    }
}

/// Full classifier configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassifierConfig {
    pub weights: WeightTable,
    pub ratios: RatioTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named_weights(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries
            .iter()
            .map(|(name, w)| (name.to_string(), *w))
            .collect()
    }

    #[test]
    fn test_reference_weights() {
        let table = WeightTable::reference();
        assert_eq!(table.weight(ChartPoint::Moon), 3.0);
        assert_eq!(table.weight(ChartPoint::Mercury), 2.0);
        assert_eq!(table.weight(ChartPoint::Saturn), 1.0);
        assert_eq!(table.weight(ChartPoint::Pluto), 0.0);
        assert_eq!(table.weight(ChartPoint::Midheaven), 3.0);
    }

    #[test]
    fn test_reference_ratios() {
        let table = RatioTable::reference();
        assert_eq!(table.ratios(Category::Sign).weak, 0.0);
        assert_eq!(table.ratios(Category::Sign).strong, 2.0);
        assert_eq!(table.ratios(Category::Element).weak, 0.5);
        assert_eq!(table.ratios(Category::Hemisphere).strong, 1.4);
    }

    #[test]
    fn test_weight_table_rejects_missing_point() {
        let mut named = named_weights(&[
            ("moon", 3.0),
            ("sun", 3.0),
            ("mercury", 2.0),
            ("venus", 2.0),
            ("mars", 2.0),
            ("jupiter", 1.0),
            ("saturn", 1.0),
            ("uranus", 0.0),
            ("neptune", 0.0),
            ("pluto", 0.0),
            ("ascendant", 3.0),
        ]);
        let err = WeightTable::from_named(&named).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingPointWeight {
                point: "Midheaven".to_string()
            }
        );

        named.insert("midheaven".to_string(), 3.0);
        let table = WeightTable::from_named(&named).unwrap();
        assert_eq!(table, WeightTable::reference());
    }

    #[test]
    fn test_weight_table_rejects_unknown_point() {
        let named = named_weights(&[("chiron", 1.0)]);
        let err = WeightTable::from_named(&named).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownPoint {
                name: "chiron".to_string()
            }
        );
    }

    #[test]
    fn test_ratio_table_rejects_missing_category() {
        let named: BTreeMap<String, CategoryRatios> = [
            ("sign", CategoryRatios { weak: 0.0, strong: 2.0 }),
            ("element", CategoryRatios { weak: 0.5, strong: 1.5 }),
        ]
        .into_iter()
        .map(|(n, r)| (n.to_string(), r))
        .collect();
        let err = RatioTable::from_named(&named).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingCategoryRatio {
                category: "Mode".to_string()
            }
        );
    }

    #[test]
    fn test_ratio_table_rejects_unknown_category() {
        let named: BTreeMap<String, CategoryRatios> =
            [("decan".to_string(), CategoryRatios { weak: 0.0, strong: 2.0 })]
                .into_iter()
                .collect();
        let err = RatioTable::from_named(&named).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownCategory {
                name: "decan".to_string()
            }
        );
    }
}
