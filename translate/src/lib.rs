//! Translates SDK examples into other programming languages by running ailly once per target
//! language. This is normally used through the `scout` binary, but is exposed as a library crate
//! as well.

pub mod cli;

use ailly::check::{CheckError, ensure_available};
use ailly::{PluginPathError, ToolConfigError, Translation};
use scout_core::command::{CommandRunner, RunStatus};
use scout_core::config::Config;
use scout_core::diagnostics::{ParseError, init_logging};
use scout_core::utils::reset_scratch_dir;
use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Performs a complete scout run: the optional dependency check, the optional scratch directory
/// reset, and one translation per configured target.
///
/// Errors that make the whole run pointless (bad tool config, failed dependency check, scratch
/// directory errors) are returned as `Err`. Individual translations that fail do not stop the run;
/// they are recorded in the returned [Report].
pub fn scout(config: &Config, runner: &mut dyn CommandRunner) -> Result<Report, ScoutError> {
    let _logging = init_logging(&config.log_filter)?;
    let tool_config = ailly::Config::from_tools(&config.tools)?;
    tool_config.validate();

    match config.npx_check {
        true => ensure_available(runner, &tool_config)?,
        false => debug!("Skipping dependency check"),
    }

    let example = config.example_path();
    if !example.is_dir() {
        warn!("Example directory {} does not exist", example.display());
    }
    if config.clean {
        let scouts = reset_scratch_dir(&example).map_err(|source| ScoutError::Scratch {
            path: example.clone(),
            source,
        })?;
        info!("Cleaned {}", scouts.display());
    }
    if config.targets.is_empty() {
        warn!("No target languages configured; nothing to translate");
    }

    let tool_dir = tool_config.tool_dir(&config.repo_root);
    let mut report = Report::default();
    for target in &config.targets {
        let translation = Translation {
            source: config.language,
            example: &example,
            target: target.as_str(),
            instructions: config.additional_prompt.as_str(),
        };
        info!("Converting {} to {target}", example.display());
        let invocation = translation.invocation(&tool_config, &tool_dir)?;
        println!("{invocation}");
        let result = runner.run(&invocation);
        match &result {
            Ok(RunStatus::Success) => info!("Translation to {target} finished"),
            Ok(status) => error!("Translation to {target} failed: {status}"),
            Err(error) => error!("Failed to launch translation to {target}: {error}"),
        }
        report.outcomes.push(TargetOutcome {
            target: target.clone(),
            out_dir: translation.out_dir(),
            result,
        });
    }
    Ok(report)
}

/// An error that aborted a scout run before or between translations.
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("invalid log_filter: {0}")]
    LogFilter(#[from] ParseError),
    #[error(transparent)]
    ToolConfig(#[from] ToolConfigError),
    #[error("dependency check failed: {0}")]
    Check(#[from] CheckError),
    #[error("failed to reset the .scouts directory of {}: {source}", path.display())]
    Scratch { path: PathBuf, source: io::Error },
    #[error(transparent)]
    PluginPath(#[from] PluginPathError),
}

/// The outcome of every translation attempted during a run, in the order they ran.
#[derive(Debug, Default)]
pub struct Report {
    pub outcomes: Vec<TargetOutcome>,
}

impl Report {
    /// Returns the translations that failed or could not be launched.
    pub fn failures(&self) -> impl Iterator<Item = &TargetOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    /// Returns `true` if every translation succeeded.
    pub fn succeeded(&self) -> bool {
        self.failures().next().is_none()
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let failed = self.failures().count();
        writeln!(f, "{failed} of {} translations failed", self.outcomes.len())?;
        for outcome in self.failures() {
            writeln!(f, "  {outcome}")?;
        }
        Ok(())
    }
}

/// The result of translating into a single target language.
#[derive(Debug)]
pub struct TargetOutcome {
    pub target: String,
    /// Where the translation was asked to write its output.
    pub out_dir: PathBuf,
    pub result: io::Result<RunStatus>,
}

impl TargetOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self.result, Ok(RunStatus::Success))
    }
}

impl Display for TargetOutcome {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self.result {
            Ok(status) => write!(f, "{}: {status}", self.target),
            Err(error) => write!(f, "{}: failed to launch: {error}", self.target),
        }
    }
}
