//! Whole-sign houses, quadrants, and hemispheres.
//!
//! Houses are whole-sign and anchored at the Ascendant: the Ascendant's sign
//! is house 1, the next sign on the wheel house 2, and so on around. A house
//! then rolls up into one quadrant and two hemispheres (one per axis).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chart::zodiac::Sign;

/// A whole-sign house, numbered 1 through 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct House(u8);

impl House {
    /// House of `sign` in a chart whose Ascendant falls in `ascendant_sign`.
    pub fn from_signs(sign: Sign, ascendant_sign: Sign) -> House {
        let offset = (sign.index() + 12 - ascendant_sign.index()) % 12;
        House(offset as u8 + 1)
    }

    /// House number, 1 through 12.
    pub fn number(self) -> u8 {
        self.0
    }

    /// Quadrant containing this house. Houses 1-3 form the first quadrant,
    /// 4-6 the second, 7-9 the third, 10-12 the fourth.
    pub fn quadrant(self) -> Quadrant {
        match (self.0 - 1) / 3 {
            0 => Quadrant::First,
            1 => Quadrant::Second,
            2 => Quadrant::Third,
            _ => Quadrant::Fourth,
        }
    }

    /// Eastern for houses 10-12 and 1-3 (the Ascendant's side of the
    /// meridian), Western for houses 4-9.
    pub fn horizontal_hemisphere(self) -> Hemisphere {
        match self.quadrant() {
            Quadrant::First | Quadrant::Fourth => Hemisphere::Eastern,
            Quadrant::Second | Quadrant::Third => Hemisphere::Western,
        }
    }

    /// Northern for houses 1-6 (below the horizon), Southern for 7-12.
    pub fn vertical_hemisphere(self) -> Hemisphere {
        if self.0 <= 6 {
            Hemisphere::Northern
        } else {
            Hemisphere::Southern
        }
    }
}

impl fmt::Display for House {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "House {}", self.0)
    }
}

/// A quadrant of the house wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quadrant {
    First,
    Second,
    Third,
    Fourth,
}

pub const QUADRANT_COUNT: usize = 4;

const QUADRANT_LABELS: [&str; QUADRANT_COUNT] = ["1", "2", "3", "4"];

impl Quadrant {
    pub const ALL: [Quadrant; QUADRANT_COUNT] = [
        Quadrant::First,
        Quadrant::Second,
        Quadrant::Third,
        Quadrant::Fourth,
    ];

    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Bare numeral used in component keys ("1" through "4").
    pub fn label(self) -> &'static str {
        QUADRANT_LABELS[self as usize]
    }

    pub fn from_label(label: &str) -> Option<Quadrant> {
        Quadrant::ALL.iter().find(|q| q.label() == label).copied()
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quadrant {}", self.number())
    }
}

/// One of the four chart hemispheres. Eastern/Western split the wheel at the
/// meridian, Northern/Southern at the horizon; every house lies in exactly
/// one hemisphere of each pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    Eastern,
    Western,
    Northern,
    Southern,
}

pub const HEMISPHERE_COUNT: usize = 4;

impl Hemisphere {
    pub const ALL: [Hemisphere; HEMISPHERE_COUNT] = [
        Hemisphere::Eastern,
        Hemisphere::Western,
        Hemisphere::Northern,
        Hemisphere::Southern,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Hemisphere::Eastern => "Eastern",
            Hemisphere::Western => "Western",
            Hemisphere::Northern => "Northern",
            Hemisphere::Southern => "Southern",
        }
    }

    pub fn from_name(name: &str) -> Option<Hemisphere> {
        Hemisphere::ALL
            .iter()
            .find(|h| h.name().eq_ignore_ascii_case(name))
            .copied()
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
