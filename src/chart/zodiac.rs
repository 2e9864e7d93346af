//! Zodiac vocabulary: signs, elements, modes, and the twelve chart points.
//!
//! Everything here is a fixed table. Signs map to elements and modes through
//! const arrays indexed by the sign's position on the wheel, so the mapping is
//! checkable at a glance and costs nothing at runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Signs
// ============================================================================

/// The twelve zodiac signs, in wheel order starting at Aries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

pub const SIGN_COUNT: usize = 12;

const SIGN_NAMES: [&str; SIGN_COUNT] = [
    "Aries",
    "Taurus",
    "Gemini",
    "Cancer",
    "Leo",
    "Virgo",
    "Libra",
    "Scorpio",
    "Sagittarius",
    "Capricorn",
    "Aquarius",
    "Pisces",
];

/// Triplicities: every fourth sign shares an element.
const SIGN_ELEMENTS: [Element; SIGN_COUNT] = [
    Element::Fire,  // Aries
    Element::Earth, // Taurus
    Element::Air,   // Gemini
    Element::Water, // Cancer
    Element::Fire,  // Leo
    Element::Earth, // Virgo
    Element::Air,   // Libra
    Element::Water, // Scorpio
    Element::Fire,  // Sagittarius
    Element::Earth, // Capricorn
    Element::Air,   // Aquarius
    Element::Water, // Pisces
];

/// Quadruplicities: every third sign shares a mode.
const SIGN_MODES: [Mode; SIGN_COUNT] = [
    Mode::Cardinal, // Aries
    Mode::Fixed,    // Taurus
    Mode::Mutable,  // Gemini
    Mode::Cardinal, // Cancer
    Mode::Fixed,    // Leo
    Mode::Mutable,  // Virgo
    Mode::Cardinal, // Libra
    Mode::Fixed,    // Scorpio
    Mode::Mutable,  // Sagittarius
    Mode::Cardinal, // Capricorn
    Mode::Fixed,    // Aquarius
    Mode::Mutable,  // Pisces
];

impl Sign {
    /// All signs in wheel order.
    pub const ALL: [Sign; SIGN_COUNT] = [
        Sign::Aries,
        Sign::Taurus,
        Sign::Gemini,
        Sign::Cancer,
        Sign::Leo,
        Sign::Virgo,
        Sign::Libra,
        Sign::Scorpio,
        Sign::Sagittarius,
        Sign::Capricorn,
        Sign::Aquarius,
        Sign::Pisces,
    ];

    /// Position on the wheel, 0 (Aries) through 11 (Pisces).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Sign at the given wheel position, if it is in range.
    pub fn from_index(index: usize) -> Option<Sign> {
        Sign::ALL.get(index).copied()
    }

    /// Case-insensitive lookup by English name.
    pub fn from_name(name: &str) -> Option<Sign> {
        Sign::ALL
            .iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
            .copied()
    }

    pub fn name(self) -> &'static str {
        SIGN_NAMES[self as usize]
    }

    pub fn element(self) -> Element {
        SIGN_ELEMENTS[self as usize]
    }

    pub fn mode(self) -> Mode {
        SIGN_MODES[self as usize]
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Elements and modes
// ============================================================================

/// The four classical elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

pub const ELEMENT_COUNT: usize = 4;

impl Element {
    pub const ALL: [Element; ELEMENT_COUNT] =
        [Element::Fire, Element::Earth, Element::Air, Element::Water];

    pub fn name(self) -> &'static str {
        match self {
            Element::Fire => "Fire",
            Element::Earth => "Earth",
            Element::Air => "Air",
            Element::Water => "Water",
        }
    }

    pub fn from_name(name: &str) -> Option<Element> {
        Element::ALL
            .iter()
            .find(|e| e.name().eq_ignore_ascii_case(name))
            .copied()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The three modes (quadruplicities).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Cardinal,
    Fixed,
    Mutable,
}

pub const MODE_COUNT: usize = 3;

impl Mode {
    pub const ALL: [Mode; MODE_COUNT] = [Mode::Cardinal, Mode::Fixed, Mode::Mutable];

    pub fn name(self) -> &'static str {
        match self {
            Mode::Cardinal => "Cardinal",
            Mode::Fixed => "Fixed",
            Mode::Mutable => "Mutable",
        }
    }

    pub fn from_name(name: &str) -> Option<Mode> {
        Mode::ALL
            .iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
            .copied()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Chart points
// ============================================================================

/// The twelve scored chart points, in canonical order.
///
/// The order is load-bearing: input longitude arrays, the weight table, and
/// the point-in-sign section of an assembled profile all follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartPoint {
    Moon,
    Sun,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Ascendant,
    Midheaven,
}

pub const POINT_COUNT: usize = 12;

const POINT_NAMES: [&str; POINT_COUNT] = [
    "Moon",
    "Sun",
    "Mercury",
    "Venus",
    "Mars",
    "Jupiter",
    "Saturn",
    "Uranus",
    "Neptune",
    "Pluto",
    "Ascendant",
    "Midheaven",
];

impl ChartPoint {
    /// All points in canonical order.
    pub const ALL: [ChartPoint; POINT_COUNT] = [
        ChartPoint::Moon,
        ChartPoint::Sun,
        ChartPoint::Mercury,
        ChartPoint::Venus,
        ChartPoint::Mars,
        ChartPoint::Jupiter,
        ChartPoint::Saturn,
        ChartPoint::Uranus,
        ChartPoint::Neptune,
        ChartPoint::Pluto,
        ChartPoint::Ascendant,
        ChartPoint::Midheaven,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        POINT_NAMES[self as usize]
    }

    /// Case-insensitive lookup by name. Accepts the common abbreviations
    /// "asc" and "mc" for the two angles.
    pub fn from_name(name: &str) -> Option<ChartPoint> {
        if name.eq_ignore_ascii_case("asc") {
            return Some(ChartPoint::Ascendant);
        }
        if name.eq_ignore_ascii_case("mc") {
            return Some(ChartPoint::Midheaven);
        }
        ChartPoint::ALL
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .copied()
    }

    /// The Ascendant and Midheaven are angles, not bodies.
    pub fn is_angle(self) -> bool {
        matches!(self, ChartPoint::Ascendant | ChartPoint::Midheaven)
    }

    /// Whether this point participates in house-derived balances
    /// (quadrants and hemispheres). The angles define the house frame and
    /// are excluded from it.
    pub fn counts_in_houses(self) -> bool {
        !self.is_angle()
    }
}

impl fmt::Display for ChartPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_order_matches_wheel() {
        assert_eq!(Sign::Aries.index(), 0);
        assert_eq!(Sign::Pisces.index(), 11);
        assert_eq!(Sign::from_index(4), Some(Sign::Leo));
        assert_eq!(Sign::from_index(12), None);
    }

    #[test]
    fn test_element_table() {
        assert_eq!(Sign::Aries.element(), Element::Fire);
        assert_eq!(Sign::Leo.element(), Element::Fire);
        assert_eq!(Sign::Sagittarius.element(), Element::Fire);
        assert_eq!(Sign::Taurus.element(), Element::Earth);
        assert_eq!(Sign::Virgo.element(), Element::Earth);
        assert_eq!(Sign::Capricorn.element(), Element::Earth);
        assert_eq!(Sign::Gemini.element(), Element::Air);
        assert_eq!(Sign::Libra.element(), Element::Air);
        assert_eq!(Sign::Aquarius.element(), Element::Air);
        assert_eq!(Sign::Cancer.element(), Element::Water);
        assert_eq!(Sign::Scorpio.element(), Element::Water);
        assert_eq!(Sign::Pisces.element(), Element::Water);
    }

    #[test]
    fn test_mode_table() {
        for (i, sign) in Sign::ALL.iter().enumerate() {
            let expected = match i % 3 {
                0 => Mode::Cardinal,
                1 => Mode::Fixed,
                _ => Mode::Mutable,
            };
            assert_eq!(sign.mode(), expected, "wrong mode for {sign}");
        }
    }

    #[test]
    fn test_sign_name_round_trip() {
        for sign in Sign::ALL {
            assert_eq!(Sign::from_name(sign.name()), Some(sign));
            assert_eq!(Sign::from_name(&sign.name().to_lowercase()), Some(sign));
        }
        assert_eq!(Sign::from_name("Ophiuchus"), None);
    }

    #[test]
    fn test_point_canonical_order() {
        assert_eq!(ChartPoint::Moon.index(), 0);
        assert_eq!(ChartPoint::Sun.index(), 1);
        assert_eq!(ChartPoint::Ascendant.index(), 10);
        assert_eq!(ChartPoint::Midheaven.index(), 11);
    }

    #[test]
    fn test_point_lookup_accepts_aliases() {
        assert_eq!(ChartPoint::from_name("moon"), Some(ChartPoint::Moon));
        assert_eq!(ChartPoint::from_name("ASC"), Some(ChartPoint::Ascendant));
        assert_eq!(ChartPoint::from_name("mc"), Some(ChartPoint::Midheaven));
        assert_eq!(ChartPoint::from_name("Vertex"), None);
    }

    #[test]
    fn test_angles_excluded_from_house_balances() {
        assert!(!ChartPoint::Ascendant.counts_in_houses());
        assert!(!ChartPoint::Midheaven.counts_in_houses());
        assert!(ChartPoint::Moon.counts_in_houses());
        assert!(ChartPoint::Pluto.counts_in_houses());
    }
}
