//! Placement normalization: raw ecliptic longitudes into signs and houses.

use serde::Serialize;

use crate::chart::houses::{Hemisphere, House, Quadrant};
use crate::chart::zodiac::{ChartPoint, Element, Mode, Sign, POINT_COUNT};
use crate::error::SubjectFault;

/// Width of one sign in degrees of ecliptic longitude.
const SIGN_WIDTH: f64 = 30.0;

/// One chart point resolved against the zodiac and the house frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub point: ChartPoint,
    /// Ecliptic longitude in `[0, 360)`.
    pub longitude: f64,
    pub sign: Sign,
    /// Degrees into the sign, in `[0, 30)`.
    pub degree_in_sign: f64,
    pub house: House,
}

impl Placement {
    pub fn element(self) -> Element {
        self.sign.element()
    }

    pub fn mode(self) -> Mode {
        self.sign.mode()
    }

    pub fn quadrant(self) -> Quadrant {
        self.house.quadrant()
    }

    pub fn horizontal_hemisphere(self) -> Hemisphere {
        self.house.horizontal_hemisphere()
    }

    pub fn vertical_hemisphere(self) -> Hemisphere {
        self.house.vertical_hemisphere()
    }
}

/// The fully normalized chart for one subject: all twelve points with their
/// signs and whole-sign houses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placements {
    entries: [Placement; POINT_COUNT],
}

impl Placements {
    /// Normalizes a chart from raw longitudes, indexed in canonical point
    /// order (`ChartPoint::ALL`).
    ///
    /// Every longitude must be finite and in `[0, 360)`; the first offender
    /// fails the whole chart with [`SubjectFault::InvalidPlacement`]. Houses
    /// are whole-sign, anchored at the Ascendant's sign.
    pub fn from_longitudes(longitudes: &[f64; POINT_COUNT]) -> Result<Placements, SubjectFault> {
        let mut signs = [Sign::Aries; POINT_COUNT];
        for (point, &longitude) in ChartPoint::ALL.iter().zip(longitudes.iter()) {
            if !longitude.is_finite() || !(0.0..360.0).contains(&longitude) {
                return Err(SubjectFault::InvalidPlacement {
                    point: *point,
                    longitude,
                });
            }
            let index = (longitude / SIGN_WIDTH) as usize;
            // Longitudes just under 360.0 can round the quotient up to 12.0.
            signs[point.index()] = Sign::from_index(index.min(11)).unwrap_or(Sign::Pisces);
        }

        let ascendant_sign = signs[ChartPoint::Ascendant.index()];
        let entries = std::array::from_fn(|i| {
            let point = ChartPoint::ALL[i];
            let sign = signs[i];
            Placement {
                point,
                longitude: longitudes[i],
                sign,
                degree_in_sign: longitudes[i] - sign.index() as f64 * SIGN_WIDTH,
                house: House::from_signs(sign, ascendant_sign),
            }
        });
        Ok(Placements { entries })
    }

    pub fn get(&self, point: ChartPoint) -> &Placement {
        &self.entries[point.index()]
    }

    /// Placements in canonical point order.
    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.entries.iter()
    }

    pub fn ascendant_sign(&self) -> Sign {
        self.entries[ChartPoint::Ascendant.index()].sign
    }
}

/// Shared test chart: John F. Kennedy, 1917-05-29 15:00 EST, Brookline MA.
#[cfg(test)]
pub(crate) const KENNEDY_LONGITUDES: [f64; POINT_COUNT] = [
    167.25, // Moon in Virgo
    67.5,   // Sun in Gemini
    50.2,   // Mercury in Taurus
    76.8,   // Venus in Gemini
    48.1,   // Mars in Taurus
    53.0,   // Jupiter in Taurus
    117.4,  // Saturn in Cancer
    323.9,  // Uranus in Aquarius
    123.7,  // Neptune in Leo
    93.5,   // Pluto in Cancer
    200.1,  // Ascendant in Libra
    117.9,  // Midheaven in Cancer
];
