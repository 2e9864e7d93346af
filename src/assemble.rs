//! Profile assembly: classification plus placements into one description.
//!
//! Assembly is a pure function of its inputs. The component order is fixed:
//! balance components by category (signs, elements, modes, quadrants,
//! hemispheres), each category's divisions in declaration order with neutral
//! states skipped, then one point-in-sign component per chart point in
//! canonical point order. Fragments are joined with single spaces.

use crate::chart::Placements;
use crate::classify::{Category, SubjectClassification};
use crate::error::SubjectFault;
use crate::library::{ComponentKey, ComponentLibrary};

/// Canonical category assembly order.
pub const CATEGORY_ORDER: [Category; 5] = Category::ALL;

/// The component keys a subject's profile requires, in assembly order.
pub fn component_keys(
    classification: &SubjectClassification,
    placements: &Placements,
) -> Vec<ComponentKey> {
    let mut keys = Vec::new();
    for category in CATEGORY_ORDER {
        for score in &classification.category(category).scores {
            if !score.strength.is_neutral() {
                keys.push(ComponentKey::Balance {
                    division: score.division,
                    strength: score.strength,
                });
            }
        }
    }
    for placement in placements.iter() {
        keys.push(ComponentKey::PointInSign {
            point: placement.point,
            sign: placement.sign,
        });
    }
    keys
}

/// Assembles the full profile text, or fails with the first missing
/// component key. No partial profile is ever produced.
pub fn assemble_profile(
    classification: &SubjectClassification,
    placements: &Placements,
    library: &ComponentLibrary,
) -> Result<String, SubjectFault> {
    let keys = component_keys(classification, placements);
    let mut fragments = Vec::with_capacity(keys.len());
    for key in &keys {
        fragments.push(library.get(key)?);
    }
    Ok(fragments.join(" "))
}
