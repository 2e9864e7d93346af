//! CLI commands for the profiler binary.
//!
//! Provides the command vocabulary for running the pipeline, inspecting the
//! cohort cutoff, and checking component-library coverage.

/// Available CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliCommand {
    /// Run the full pipeline and write profiles, outcomes, and the curve
    /// artifact.
    Profile,
    /// Evaluate the cohort cutoff only.
    Cohort,
    /// Report component keys the library is missing for a dataset.
    CheckLibrary,
    /// Show version information.
    Version,
}

impl std::fmt::Display for CliCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Profile => write!(f, "profile"),
            Self::Cohort => write!(f, "cohort"),
            Self::CheckLibrary => write!(f, "check-library"),
            Self::Version => write!(f, "version"),
        }
    }
}

/// Parse a CLI command from a string.
pub fn parse_command(cmd: &str) -> Option<CliCommand> {
    match cmd {
        "profile" | "run" => Some(CliCommand::Profile),
        "cohort" => Some(CliCommand::Cohort),
        "check-library" | "check_library" => Some(CliCommand::CheckLibrary),
        "version" | "--version" | "-v" => Some(CliCommand::Version),
        _ => None,
    }
}
