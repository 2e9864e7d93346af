//! Balance categories and their divisions.
//!
//! A category is one way of slicing a chart (by sign, element, mode,
//! quadrant, or hemisphere); a division is one slice within it. Both carry
//! the exact labels used in component keys, so the text library and the
//! classifier can never drift apart.

use std::fmt;

use serde::Serialize;

use crate::chart::{
    Element, Hemisphere, Mode, Quadrant, Sign, ELEMENT_COUNT, HEMISPHERE_COUNT, MODE_COUNT,
    QUADRANT_COUNT, SIGN_COUNT,
};

/// The five balance categories, in canonical assembly order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sign,
    Element,
    Mode,
    Quadrant,
    Hemisphere,
}

pub const CATEGORY_COUNT: usize = 5;

impl Category {
    /// All categories in canonical order.
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Sign,
        Category::Element,
        Category::Mode,
        Category::Quadrant,
        Category::Hemisphere,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Sign => "Sign",
            Category::Element => "Element",
            Category::Mode => "Mode",
            Category::Quadrant => "Quadrant",
            Category::Hemisphere => "Hemisphere",
        }
    }

    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
            .copied()
    }

    /// Number of divisions the category's threshold average runs over.
    pub fn division_count(self) -> usize {
        self.divisions().len()
    }

    /// The category's divisions in declaration order. This order fixes both
    /// the classifier's score layout and the assembly order of balance
    /// components.
    pub fn divisions(self) -> &'static [Division] {
        match self {
            Category::Sign => &SIGN_DIVISIONS,
            Category::Element => &ELEMENT_DIVISIONS,
            Category::Mode => &MODE_DIVISIONS,
            Category::Quadrant => &QUADRANT_DIVISIONS,
            Category::Hemisphere => &HEMISPHERE_DIVISIONS,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

const SIGN_DIVISIONS: [Division; SIGN_COUNT] = [
    Division::Sign(Sign::Aries),
    Division::Sign(Sign::Taurus),
    Division::Sign(Sign::Gemini),
    Division::Sign(Sign::Cancer),
    Division::Sign(Sign::Leo),
    Division::Sign(Sign::Virgo),
    Division::Sign(Sign::Libra),
    Division::Sign(Sign::Scorpio),
    Division::Sign(Sign::Sagittarius),
    Division::Sign(Sign::Capricorn),
    Division::Sign(Sign::Aquarius),
    Division::Sign(Sign::Pisces),
];

const ELEMENT_DIVISIONS: [Division; ELEMENT_COUNT] = [
    Division::Element(Element::Fire),
    Division::Element(Element::Earth),
    Division::Element(Element::Air),
    Division::Element(Element::Water),
];

const MODE_DIVISIONS: [Division; MODE_COUNT] = [
    Division::Mode(Mode::Cardinal),
    Division::Mode(Mode::Fixed),
    Division::Mode(Mode::Mutable),
];

const QUADRANT_DIVISIONS: [Division; QUADRANT_COUNT] = [
    Division::Quadrant(Quadrant::First),
    Division::Quadrant(Quadrant::Second),
    Division::Quadrant(Quadrant::Third),
    Division::Quadrant(Quadrant::Fourth),
];

const HEMISPHERE_DIVISIONS: [Division; HEMISPHERE_COUNT] = [
    Division::Hemisphere(Hemisphere::Eastern),
    Division::Hemisphere(Hemisphere::Western),
    Division::Hemisphere(Hemisphere::Northern),
    Division::Hemisphere(Hemisphere::Southern),
];

/// One division of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Division {
    Sign(Sign),
    Element(Element),
    Mode(Mode),
    Quadrant(Quadrant),
    Hemisphere(Hemisphere),
}

impl Division {
    pub fn category(self) -> Category {
        match self {
            Division::Sign(_) => Category::Sign,
            Division::Element(_) => Category::Element,
            Division::Mode(_) => Category::Mode,
            Division::Quadrant(_) => Category::Quadrant,
            Division::Hemisphere(_) => Category::Hemisphere,
        }
    }

    /// Division label as it appears in component keys: "Taurus", "Fire",
    /// "Cardinal", "3", "Western".
    pub fn label(self) -> &'static str {
        match self {
            Division::Sign(s) => s.name(),
            Division::Element(e) => e.name(),
            Division::Mode(m) => m.name(),
            Division::Quadrant(q) => q.label(),
            Division::Hemisphere(h) => h.name(),
        }
    }

    /// Looks a division up by category and key label.
    pub fn from_labels(category: Category, label: &str) -> Option<Division> {
        category
            .divisions()
            .iter()
            .find(|d| d.label().eq_ignore_ascii_case(label))
            .copied()
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.category().label(), self.label())
    }
}

/// Tri-state classification of one division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Weak,
    Neutral,
    Strong,
}

impl Strength {
    pub fn label(self) -> &'static str {
        match self {
            Strength::Weak => "Weak",
            Strength::Neutral => "Neutral",
            Strength::Strong => "Strong",
        }
    }

    pub fn is_neutral(self) -> bool {
        matches!(self, Strength::Neutral)
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
