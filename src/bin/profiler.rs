//! natal-profiler pipeline binary.
//!
//! Loads a ranked subject dataset and a component text library, selects the
//! profiled cohort from the trait-diversity curve, and writes one profile
//! per retained subject.
//!
//! # Environment Variables
//!
//! - `PROFILER_SUBJECTS` — JSONL subject dataset (default: "subjects.jsonl")
//! - `PROFILER_LIBRARY` — JSON component library (default: "library.json")
//! - `PROFILER_CONFIG` — optional YAML config with weight/ratio tables and
//!   cutoff tunables; reference defaults when unset
//! - `PROFILER_OUT` — output directory (default: "out")
//! - `RUST_LOG` — log filter (default: "info")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin profiler -- profile
//! cargo run --bin profiler -- cohort
//! cargo run --bin profiler -- check-library
//! ```

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{bail, Context};

use natal_profiler::assemble::component_keys;
use natal_profiler::chart::Placements;
use natal_profiler::cli::{parse_command, CliCommand};
use natal_profiler::cutoff::PlateauDetector;
use natal_profiler::error::CutoffError;
use natal_profiler::io::{
    load_subjects_jsonl, write_curve_artifact, write_outcomes_jsonl, write_profiles_jsonl,
};
use natal_profiler::library::ComponentLibrary;
use natal_profiler::pipeline::{PipelineConfig, ProfilePipeline};
use natal_profiler::subject::Subject;

struct Paths {
    subjects: PathBuf,
    library: PathBuf,
    config: Option<PathBuf>,
    out: PathBuf,
}

impl Paths {
    fn from_env() -> Paths {
        Paths {
            subjects: std::env::var("PROFILER_SUBJECTS")
                .unwrap_or_else(|_| "subjects.jsonl".to_string())
                .into(),
            library: std::env::var("PROFILER_LIBRARY")
                .unwrap_or_else(|_| "library.json".to_string())
                .into(),
            config: std::env::var("PROFILER_CONFIG").ok().map(PathBuf::from),
            out: std::env::var("PROFILER_OUT")
                .unwrap_or_else(|_| "out".to_string())
                .into(),
        }
    }
}

fn load_config(paths: &Paths) -> anyhow::Result<PipelineConfig> {
    match &paths.config {
        Some(path) => PipelineConfig::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn load_inputs(paths: &Paths) -> anyhow::Result<(PipelineConfig, Vec<Subject>)> {
    let config = load_config(paths)?;
    let subjects = load_subjects_jsonl(&paths.subjects)
        .with_context(|| format!("loading subjects from {}", paths.subjects.display()))?;
    Ok((config, subjects))
}

fn cmd_profile(paths: &Paths) -> anyhow::Result<()> {
    let (config, subjects) = load_inputs(paths)?;
    let library = ComponentLibrary::from_json_file(&paths.library)
        .with_context(|| format!("loading library from {}", paths.library.display()))?;

    let pipeline = ProfilePipeline::new(config, library);
    let run = pipeline.run(&subjects);

    let profiles: Vec<_> = run.profiles().collect();
    write_profiles_jsonl(paths.out.join("profiles.jsonl"), profiles)?;
    write_outcomes_jsonl(paths.out.join("outcomes.jsonl"), run.outcomes.iter())?;
    write_curve_artifact(paths.out.join("curve.json"), &pipeline.curve_artifact(&run))?;

    println!("{}", run.summary);
    if let Some(cutoff) = &run.cutoff {
        println!(
            "cohort cutoff: {} scored subjects of {}",
            cutoff.cohort_size, cutoff.curve_len
        );
    } else {
        println!("no cohort cutoff; full list profiled");
    }
    Ok(())
}

fn cmd_cohort(paths: &Paths) -> anyhow::Result<()> {
    let (config, subjects) = load_inputs(paths)?;
    let detector = PlateauDetector::new(config.cutoff);
    let pipeline = ProfilePipeline::new(config, ComponentLibrary::new());

    match pipeline.select_cohort(&subjects) {
        Ok((curve, Some(cutoff))) => {
            write_curve_artifact(paths.out.join("curve.json"), &detector.artifact(&curve))?;
            println!(
                "cohort cutoff at {} of {} scored subjects (diversity {:.6})",
                cutoff.cohort_size,
                curve.len(),
                cutoff.diversity_at_cutoff
            );
        }
        Ok((curve, None)) => {
            write_curve_artifact(paths.out.join("curve.json"), &detector.artifact(&curve))?;
            println!(
                "no plateau yet over {} scored subjects; still accumulating",
                curve.len()
            );
        }
        Err(CutoffError::InsufficientData { observed, required }) => {
            println!("insufficient data: {observed} scored subjects, {required} required");
        }
    }
    Ok(())
}

fn cmd_check_library(paths: &Paths) -> anyhow::Result<()> {
    let (config, subjects) = load_inputs(paths)?;
    let library = ComponentLibrary::from_json_file(&paths.library)
        .with_context(|| format!("loading library from {}", paths.library.display()))?;
    let pipeline = ProfilePipeline::new(config, library);

    let mut required = Vec::new();
    let mut seen = BTreeSet::new();
    let mut skipped = 0usize;
    for subject in &subjects {
        let placements = match Placements::from_longitudes(&subject.longitudes) {
            Ok(p) => p,
            Err(fault) => {
                log::warn!("subject {} skipped: {fault}", subject.id);
                skipped += 1;
                continue;
            }
        };
        let classification = pipeline.classifier().classify(&placements);
        for key in component_keys(&classification, &placements) {
            if seen.insert(key.render()) {
                required.push(key);
            }
        }
    }

    let missing = pipeline.library().missing_from(required.iter());
    println!(
        "{} subjects checked ({} skipped), {} distinct keys required, {} missing",
        subjects.len() - skipped,
        skipped,
        required.len(),
        missing.len()
    );
    for key in &missing {
        println!("missing: {key}");
    }
    if !missing.is_empty() {
        bail!("library is missing {} component keys", missing.len());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let command = match args.get(1) {
        None => CliCommand::Profile,
        Some(arg) => match parse_command(arg) {
            Some(command) => command,
            None => bail!("unknown command \"{arg}\"; expected profile, cohort, check-library, or version"),
        },
    };

    let paths = Paths::from_env();
    match command {
        CliCommand::Profile => cmd_profile(&paths),
        CliCommand::Cohort => cmd_cohort(&paths),
        CliCommand::CheckLibrary => cmd_check_library(&paths),
        CliCommand::Version => {
            println!("natal-profiler {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
