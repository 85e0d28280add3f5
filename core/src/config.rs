use std::{collections::HashMap, path::PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::example::{SdkLanguage, Service};

/// Configuration for a scout run. The sources of these configuration values (from
/// highest-precedence to lowest-precedence) are:
///
/// 1. Dedicated command line flags (e.g. `--language`, `--clean`).
/// 2. Configurations passed using the `--config` command line flag.
/// 3. `scouts.toml` in the current directory.
/// 4. A user-specific configuration directory (e.g. `$HOME/.config/scouts/scouts.toml').
/// 5. The defaults compiled into the `scout` binary.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Root of the repository holding the `<language>/<service>` example directories.
    pub repo_root: PathBuf,

    /// SDK language the examples are translated from.
    pub language: SdkLanguage,

    /// Service whose examples are translated.
    pub service: Service,

    /// Free-text instructions appended to every translation prompt.
    pub additional_prompt: String,

    /// Languages to translate into. One scout directory is produced per entry.
    pub targets: Vec<String>,

    /// If true, verify the translation tool (and its runtime) are available before running,
    /// installing the tool if it is missing.
    pub npx_check: bool,

    /// If true, the `.scouts` directory is wiped before any translation runs.
    pub clean: bool,

    /// Filter describing which log messages should be output to stderr. This is in the
    /// `tracing_subscriber::filter::EnvFilter` format.
    pub log_filter: String,

    /// Sub-configuration for each external tool.
    pub tools: HashMap<String, serde_json::Value>,

    // serde will place any unrecognized fields here. This will be passed to unknown_field_warning
    // after parsing to emit warnings on unrecognized config entries.
    #[serde(flatten)]
    pub unknown: HashMap<String, serde_json::Value>,
}

impl Config {
    /// Returns a mock config for testing.
    pub fn mock() -> Self {
        Self {
            repo_root: PathBuf::from("mock_repo"),
            language: SdkLanguage::default(),
            service: Service::default(),
            additional_prompt: String::new(),
            targets: vec!["kotlin".to_owned()],
            npx_check: false,
            clean: false,
            log_filter: "off".to_owned(),
            tools: Default::default(),
            unknown: Default::default(),
        }
    }

    /// Returns `<repo_root>/<language>/<service>`, the directory holding the example to translate.
    pub fn example_path(&self) -> PathBuf {
        crate::example::example_path(&self.repo_root, self.language, self.service)
    }
}

/// Prints out a warning message for every field in `unknown`.
///
/// This is intended for use by config validation routines. `prefix` should be the path to this
/// entry (e.g. `tools::Config` should call this with a `prefix` of `tools`).
pub fn unknown_field_warning(prefix: &str, unknown: &HashMap<String, Value>) {
    let mut entries: Vec<_> = unknown.keys().collect();
    entries.sort_unstable();
    entries.into_iter().for_each(|name| match prefix {
        "" => eprintln!("Warning: unknown config key {name}"),
        p => eprintln!("Warning: unknown config key {p}.{name}"),
    });
}
