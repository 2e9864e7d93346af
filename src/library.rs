//! The component text library: canonical keys and their prose fragments.
//!
//! A profile is pure assembly. Every sentence of output text lives here,
//! keyed by one of two shapes:
//!
//! - balance components: `"<Category> <Division> <State>"`, e.g.
//!   `"Element Fire Weak"` or `"Quadrant 3 Strong"`
//! - point-in-sign components: `"<Point> in <Sign>"`, e.g. `"Moon in Aries"`
//!
//! Keys are parsed strictly on load so a typo in the library file surfaces
//! once, at startup, instead of as a missing component mid-run.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::chart::{ChartPoint, Sign};
use crate::classify::{Category, Division, Strength};
use crate::error::{ProfileError, Result, SubjectFault};

static BALANCE_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(Sign|Element|Mode|Quadrant|Hemisphere) ([A-Za-z0-9]+) (Weak|Strong)$")
        .expect("balance key pattern is valid")
});

static POINT_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]+) in ([A-Za-z]+)$").expect("point key pattern is valid")
});

/// A canonical component key. Rendering and parsing are inverses for every
/// valid key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum ComponentKey {
    /// A non-neutral balance state. Neutral states never form keys.
    Balance {
        division: Division,
        strength: Strength,
    },
    /// A chart point occupying a sign.
    PointInSign { point: ChartPoint, sign: Sign },
}

impl ComponentKey {
    /// Canonical string form of the key.
    pub fn render(&self) -> String {
        match self {
            ComponentKey::Balance { division, strength } => format!(
                "{} {} {}",
                division.category().label(),
                division.label(),
                strength.label()
            ),
            ComponentKey::PointInSign { point, sign } => {
                format!("{} in {}", point.name(), sign.name())
            }
        }
    }

    /// Parses a canonical key string. Case and spacing are exact; a neutral
    /// state or an unknown label is malformed.
    pub fn parse(key: &str) -> Result<ComponentKey> {
        if let Some(captures) = POINT_KEY.captures(key) {
            let point = ChartPoint::from_name(&captures[1]);
            let sign = Sign::from_name(&captures[2]);
            if let (Some(point), Some(sign)) = (point, sign) {
                return Ok(ComponentKey::PointInSign { point, sign });
            }
        }
        if let Some(captures) = BALANCE_KEY.captures(key) {
            let category = Category::from_label(&captures[1]);
            let strength = match &captures[3] {
                "Weak" => Some(Strength::Weak),
                "Strong" => Some(Strength::Strong),
                _ => None,
            };
            if let (Some(category), Some(strength)) = (category, strength) {
                if let Some(division) = Division::from_labels(category, &captures[2]) {
                    return Ok(ComponentKey::Balance { division, strength });
                }
            }
        }
        Err(ProfileError::MalformedComponentKey {
            key: key.to_string(),
        })
    }
}

impl From<ComponentKey> for String {
    fn from(key: ComponentKey) -> String {
        key.render()
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// The component library: key to prose fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentLibrary {
    components: HashMap<ComponentKey, String>,
}

impl ComponentLibrary {
    pub fn new() -> ComponentLibrary {
        ComponentLibrary::default()
    }

    /// Loads a library from a flat JSON object of key strings to text.
    /// Every key must parse; the first malformed key (in lexicographic
    /// order) fails the load.
    pub fn from_json_str(json: &str) -> Result<ComponentLibrary> {
        let raw: BTreeMap<String, String> = serde_json::from_str(json)?;
        let mut components = HashMap::with_capacity(raw.len());
        for (key, text) in raw {
            components.insert(ComponentKey::parse(&key)?, text);
        }
        Ok(ComponentLibrary { components })
    }

    /// Loads a library file. See [`ComponentLibrary::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<ComponentLibrary> {
        let json = fs::read_to_string(path.as_ref())?;
        let library = Self::from_json_str(&json)?;
        log::debug!(
            "loaded component library from {} ({} components)",
            path.as_ref().display(),
            library.len()
        );
        Ok(library)
    }

    pub fn insert(&mut self, key: ComponentKey, text: impl Into<String>) {
        self.components.insert(key, text.into());
    }

    /// Text for a key. Absence is a per-subject fault naming the rendered
    /// key, so operators know exactly which library entry to add.
    pub fn get(&self, key: &ComponentKey) -> std::result::Result<&str, SubjectFault> {
        self.components
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| SubjectFault::MissingComponent { key: key.render() })
    }

    pub fn contains(&self, key: &ComponentKey) -> bool {
        self.components.contains_key(key)
    }

    /// Keys from `required` that the library lacks, in input order with
    /// duplicates dropped. Empty means full coverage.
    pub fn missing_from<'a>(
        &self,
        required: impl IntoIterator<Item = &'a ComponentKey>,
    ) -> Vec<ComponentKey> {
        let mut missing = Vec::new();
        for key in required {
            if !self.contains(key) && !missing.contains(key) {
                missing.push(*key);
            }
        }
        missing
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
