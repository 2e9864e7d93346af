//! Subjects: identity, birth data, eminence rank, and trait scores.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chart::POINT_COUNT;

/// Number of scored trait axes per subject.
pub const TRAIT_COUNT: usize = 5;

/// Canonical names for the five trait axes, in storage order.
pub const TRAIT_NAMES: [&str; TRAIT_COUNT] = [
    "openness",
    "conscientiousness",
    "extraversion",
    "agreeableness",
    "neuroticism",
];

/// One subject's standardized scores on the five trait axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitScores {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
}

impl TraitScores {
    pub fn from_array(values: [f64; TRAIT_COUNT]) -> TraitScores {
        TraitScores {
            openness: values[0],
            conscientiousness: values[1],
            extraversion: values[2],
            agreeableness: values[3],
            neuroticism: values[4],
        }
    }

    /// Scores in `TRAIT_NAMES` order.
    pub fn as_array(&self) -> [f64; TRAIT_COUNT] {
        [
            self.openness,
            self.conscientiousness,
            self.extraversion,
            self.agreeableness,
            self.neuroticism,
        ]
    }
}

/// Stable identifier for a subject. Either supplied by the source dataset or
/// derived deterministically from name and birth date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> SubjectId {
        SubjectId(id.into())
    }

    /// Derives a v5 UUID from `name` and `birth_date`. The same inputs always
    /// produce the same id, so re-ingesting a dataset is idempotent.
    pub fn derive(name: &str, birth_date: NaiveDate) -> SubjectId {
        let seed = format!("{name}|{birth_date}");
        SubjectId(Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes()).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Birth data as recorded by the source dataset. Only the date is required;
/// time and place ride along for provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthRecord {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
}

/// One profiled subject: identity, chart input, rank, and optional trait
/// scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub birth: BirthRecord,
    /// Eminence rank, 1 = most eminent. Ties are broken by id.
    pub eminence_rank: u32,
    /// Ecliptic longitudes in canonical point order.
    pub longitudes: [f64; POINT_COUNT],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traits: Option<TraitScores>,
}

impl Subject {
    /// Builds a subject, deriving the id from name and birth date when the
    /// source record carries none.
    pub fn new(
        id: Option<String>,
        name: String,
        birth: BirthRecord,
        eminence_rank: u32,
        longitudes: [f64; POINT_COUNT],
        traits: Option<TraitScores>,
    ) -> Subject {
        let id = match id {
            Some(id) => SubjectId::new(id),
            None => SubjectId::derive(&name, birth.date),
        };
        Subject {
            id,
            name,
            birth,
            eminence_rank,
            longitudes,
            traits,
        }
    }

    /// Total-order sort key: rank ascending, then id for determinism.
    pub fn eminence_key(&self) -> (u32, &SubjectId) {
        (self.eminence_rank, &self.id)
    }
}

/// Sorts subjects into descending-eminence order (rank 1 first).
pub fn sort_by_eminence(subjects: &mut [Subject]) {
    subjects.sort_by(|a, b| a.eminence_key().cmp(&b.eminence_key()));
}
