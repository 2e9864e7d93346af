//! Dataset I/O: JSONL subject loading and run artifact writing.
//!
//! Subjects arrive one JSON object per line. Chart longitudes are keyed by
//! point name rather than position, so a column reordering in the source
//! dataset cannot silently scramble a chart. Outputs are JSONL for the
//! per-subject records and pretty JSON for the curve artifact.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chart::{ChartPoint, POINT_COUNT};
use crate::cutoff::CurveArtifact;
use crate::error::{ProfileError, Result};
use crate::pipeline::{ProfileRecord, SubjectOutcome};
use crate::subject::{BirthRecord, Subject, TraitScores};

/// One line of a subject dataset.
#[derive(Debug, Deserialize)]
struct RawSubjectRecord {
    #[serde(default)]
    id: Option<String>,
    name: String,
    birth: BirthRecord,
    eminence_rank: u32,
    /// Point-name keyed ecliptic longitudes.
    longitudes: BTreeMap<String, f64>,
    #[serde(default)]
    traits: Option<TraitScores>,
}

fn malformed(path: &Path, line: usize, message: impl Into<String>) -> ProfileError {
    ProfileError::MalformedRecord {
        path: path.display().to_string(),
        line,
        message: message.into(),
    }
}

fn longitudes_from_named(
    named: &BTreeMap<String, f64>,
    path: &Path,
    line: usize,
) -> Result<[f64; POINT_COUNT]> {
    for name in named.keys() {
        if ChartPoint::from_name(name).is_none() {
            return Err(malformed(path, line, format!("unknown chart point \"{name}\"")));
        }
    }
    let mut longitudes = [0.0; POINT_COUNT];
    for point in ChartPoint::ALL {
        let value = named
            .iter()
            .find(|(name, _)| ChartPoint::from_name(name) == Some(point))
            .map(|(_, &v)| v);
        match value {
            Some(v) => longitudes[point.index()] = v,
            None => {
                return Err(malformed(
                    path,
                    line,
                    format!("missing chart point \"{}\"", point.name()),
                ))
            }
        }
    }
    Ok(longitudes)
}

/// Loads a JSONL subject dataset. Blank lines are skipped; any undecodable
/// line fails the load with its line number.
pub fn load_subjects_jsonl(path: impl AsRef<Path>) -> Result<Vec<Subject>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut subjects = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let raw: RawSubjectRecord = serde_json::from_str(&line)
            .map_err(|e| malformed(path, line_number, e.to_string()))?;
        let longitudes = longitudes_from_named(&raw.longitudes, path, line_number)?;
        subjects.push(Subject::new(
            raw.id,
            raw.name,
            raw.birth,
            raw.eminence_rank,
            longitudes,
            raw.traits,
        ));
    }
    log::info!("loaded {} subjects from {}", subjects.len(), path.display());
    Ok(subjects)
}

fn create_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn write_jsonl<T: Serialize>(path: &Path, records: impl IntoIterator<Item = T>) -> Result<usize> {
    create_parent_dirs(path)?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let mut count = 0;
    for record in records {
        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Writes finished profiles as JSONL, one record per line.
pub fn write_profiles_jsonl<'a>(
    path: impl AsRef<Path>,
    profiles: impl IntoIterator<Item = &'a ProfileRecord>,
) -> Result<usize> {
    let count = write_jsonl(path.as_ref(), profiles)?;
    log::info!("wrote {count} profiles to {}", path.as_ref().display());
    Ok(count)
}

/// Writes the full per-subject outcome list as JSONL, faults and exclusions
/// included.
pub fn write_outcomes_jsonl<'a>(
    path: impl AsRef<Path>,
    outcomes: impl IntoIterator<Item = &'a SubjectOutcome>,
) -> Result<usize> {
    let count = write_jsonl(path.as_ref(), outcomes)?;
    log::info!("wrote {count} outcomes to {}", path.as_ref().display());
    Ok(count)
}

/// Writes the curve evaluation trace as pretty JSON.
pub fn write_curve_artifact(path: impl AsRef<Path>, artifact: &CurveArtifact) -> Result<()> {
    let path = path.as_ref();
    create_parent_dirs(path)?;
    let json = serde_json::to_string_pretty(artifact)?;
    fs::write(path, json)?;
    log::info!("wrote curve artifact to {}", path.display());
    Ok(())
}

/// Reads back a profiles JSONL file.
pub fn load_profiles_jsonl(path: impl AsRef<Path>) -> Result<Vec<ProfileRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut profiles = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: ProfileRecord = serde_json::from_str(&line)
            .map_err(|e| malformed(path, index + 1, e.to_string()))?;
        profiles.push(record);
    }
    Ok(profiles)
}
