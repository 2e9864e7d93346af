//! Tri-state balance classification of normalized charts.
//!
//! Submodules:
//! - [`category`]: the five categories, their divisions, and the strength
//!   states.
//! - [`config`]: weight and ratio tables with reference defaults.
//! - [`balance`]: the classifier itself.

pub mod balance;
pub mod category;
pub mod config;

pub use balance::{CategoryBalance, DivisionScore, DivisionalClassifier, SubjectClassification};
pub use category::{Category, Division, Strength, CATEGORY_COUNT};
pub use config::{CategoryRatios, ClassifierConfig, RatioTable, WeightTable};
