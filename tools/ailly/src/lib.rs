//! Drives the `@ailly/cli` translation tool, which is run through a package runner (`npx` by
//! default). This crate knows how to verify and install the tool ([check]) and how to ask it to
//! translate one example into one target language ([Translation]).

pub mod check;

use scout_core::command::{Invocation, OutputMode};
use scout_core::config::unknown_field_warning;
use scout_core::example::scout_dir;
use scout_core::SdkLanguage;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Key of this tool's table under `[tools]` in the configuration.
pub const TOOL_NAME: &str = "ailly";

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Package runner used to launch the tool, e.g. "npx".
    pub runner: String,

    /// Package reference passed to the runner, e.g. "@ailly/cli" or "@ailly/cli@1.0.1".
    pub package: String,

    /// JavaScript runtime whose presence is checked before installing, e.g. "node".
    pub runtime: String,

    /// Package manager used to install the tool, e.g. "npm".
    pub installer: String,

    /// Value of ailly's `--engine` option.
    pub engine: String,

    /// Directory holding the plugin. Translations run with this as their working directory.
    /// Relative paths are resolved against the repository root.
    pub dir: PathBuf,

    /// File name of the plugin, inside `dir`.
    pub plugin: String,

    /// Whether to pass `--isolated`.
    pub isolated: bool,

    #[serde(flatten)]
    unknown: HashMap<String, Value>,
}

impl Config {
    /// Extracts this tool's configuration from the `tools` table of the run config.
    pub fn from_tools(tools: &HashMap<String, Value>) -> Result<Config, ToolConfigError> {
        let value = tools.get(TOOL_NAME).ok_or(ToolConfigError::Missing)?;
        Ok(Config::deserialize(value)?)
    }

    pub fn validate(&self) {
        unknown_field_warning("tools.ailly", &self.unknown);
    }

    /// Returns a mock config for testing.
    pub fn mock() -> Self {
        Self {
            runner: "npx".into(),
            package: "@ailly/cli".into(),
            runtime: "node".into(),
            installer: "npm".into(),
            engine: "bedrock".into(),
            dir: PathBuf::from("/mock/tools/ailly"),
            plugin: "plugin.mjs".into(),
            isolated: true,
            unknown: HashMap::new(),
        }
    }

    /// Returns the tool directory, resolving a relative `dir` against `repo_root`.
    pub fn tool_dir(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(&self.dir)
    }

    /// Returns the `file://` URI of the plugin. ailly loads plugins by URI, so the path must be
    /// absolute.
    pub fn plugin_uri(&self, tool_dir: &Path) -> Result<Url, PluginPathError> {
        let path = std::path::absolute(tool_dir.join(&self.plugin))?;
        Url::from_file_path(&path).map_err(|()| PluginPathError::NotAbsolute(path))
    }

    /// An invocation of the tool itself (`npx @ailly/cli ...`).
    pub(crate) fn tool_invocation(&self) -> Invocation {
        Invocation::new(&self.runner).arg(&self.package)
    }
}

/// Error extracting [Config] from the run configuration.
#[derive(Debug, Error)]
pub enum ToolConfigError {
    #[error("missing [tools.ailly] configuration")]
    Missing,
    #[error("invalid [tools.ailly] configuration: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Error building the plugin's file URI.
#[derive(Debug, Error)]
pub enum PluginPathError {
    #[error("cannot resolve plugin path: {0}")]
    IoError(#[from] std::io::Error),
    #[error("plugin path {0:?} cannot be expressed as a file URI")]
    NotAbsolute(PathBuf),
}

/// Builds the prompt that asks ailly to translate an example from `source` into `target`.
pub fn translation_prompt(source: SdkLanguage, target: &str, instructions: &str) -> String {
    format!(
        "Translate the final block of code from {source} to {target} programming language. \
         {instructions}"
    )
}

/// A request to translate one example into one target language.
pub struct Translation<'a> {
    pub source: SdkLanguage,
    pub example: &'a Path,
    pub target: &'a str,
    pub instructions: &'a str,
}

impl Translation<'_> {
    /// Directory this translation writes into: `<example>/.scouts/<target>`.
    pub fn out_dir(&self) -> PathBuf {
        scout_dir(self.example, self.target)
    }

    /// Builds the ailly command for this translation. `tool_dir` is the directory containing the
    /// plugin, which also becomes the command's working directory.
    pub fn invocation(
        &self,
        config: &Config,
        tool_dir: &Path,
    ) -> Result<Invocation, PluginPathError> {
        let plugin = config.plugin_uri(tool_dir)?;
        let invocation = config
            .tool_invocation()
            .args(["--engine", config.engine.as_str()])
            .args(["--plugin", plugin.as_str()])
            .arg("--root")
            .arg(self.example)
            .arg("--out")
            .arg(self.out_dir())
            .arg("--prompt")
            .arg(translation_prompt(self.source, self.target, self.instructions));
        let invocation = match config.isolated {
            true => invocation.arg("--isolated"),
            false => invocation,
        };
        Ok(invocation
            .current_dir(tool_dir)
            .output(OutputMode::Inherited))
    }
}
