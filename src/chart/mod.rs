//! Chart geometry: zodiac tables, whole-sign houses, and placement
//! normalization from raw ecliptic longitudes.

pub mod houses;
pub mod placements;
pub mod zodiac;

pub use houses::{Hemisphere, House, Quadrant, HEMISPHERE_COUNT, QUADRANT_COUNT};
pub use placements::{Placement, Placements};
pub use zodiac::{
    ChartPoint, Element, Mode, Sign, ELEMENT_COUNT, MODE_COUNT, POINT_COUNT, SIGN_COUNT,
};

#[cfg(test)]
pub(crate) use placements::KENNEDY_LONGITUDES;
