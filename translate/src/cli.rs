//! The command-line arguments and configuration system for [crate::scout] and the `scout`
//! binary.

use clap::Parser;
use config::FileFormat::Toml;
use directories::ProjectDirs;
use scout_core::config::{Config, unknown_field_warning};
use scout_core::{SdkLanguage, Service};
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Translates SDK examples into other programming languages using ailly. Results are written to
/// <repo root>/<language>/<service>/.scouts/<target>.
#[derive(Debug, Parser)]
#[command(name = "scout")]
pub struct Args {
    /// The language of the SDK [default: javascriptv3].
    #[arg(long, value_enum)]
    pub language: Option<SdkLanguage>,

    /// The targeted service [default: s3].
    #[arg(long, value_enum)]
    pub service: Option<Service>,

    /// Additional instructions to provide for the LLM.
    #[arg(long)]
    pub additional_prompt: Option<String>,

    /// When set, output verbose debugging info.
    #[arg(long)]
    pub verbose: bool,

    /// Verify `npx` is available and ensure ailly is installed before translating.
    #[arg(long)]
    pub npx_check: bool,

    /// Never run the ailly dependency check, even if enabled by --npx-check or the config.
    #[arg(long)]
    pub skip_npx_check: bool,

    /// Clean the .scouts target folder before generating.
    #[arg(long)]
    pub clean: bool,

    /// Language to translate into; may be repeated. Replaces the configured target list.
    #[arg(long = "target", value_name = "LANGUAGE")]
    pub targets: Vec<String>,

    /// Directory containing the <language>/<service> examples [default: current directory].
    #[arg(long)]
    pub repo_root: Option<PathBuf>,

    /// Set a configuration value; format $NAME=$VALUE.
    #[arg(long, short)]
    pub config: Vec<String>,

    /// Prints out the location of the config file.
    #[arg(long)]
    pub print_config_path: bool,
}

/// Error produced while assembling the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config value {0:?}; no '=' found")]
    MalformedOverride(String),
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid repository root: {0}")]
    RepoRoot(#[from] io::Error),
    #[error("invalid target language {0:?}: must be a single directory name")]
    InvalidTarget(String),
}

/// Performs parsing and validation of the config; to be called by main() before doing anything
/// else.
///
/// Returns the config, or None if a command line flag that calls for an early exit (such as
/// --print-config-path) was provided.
pub fn initialize(args: &Args) -> Result<Option<Config>, ConfigError> {
    let dirs = ProjectDirs::from("", "", "scouts");
    let config_dir = dirs.as_ref().map(ProjectDirs::config_dir);
    if args.print_config_path {
        match config_dir {
            Some(dir) => println!("Config file location: {:?}", config_file(dir)),
            None => println!("No user config file location (no home directory)"),
        }
        return Ok(None);
    }
    let config = load_config(args, config_dir)?;
    unknown_field_warning("", &config.unknown);
    Ok(Some(config))
}

fn load_config(args: &Args, config_dir: Option<&Path>) -> Result<Config, ConfigError> {
    let mut settings = config::Config::builder().add_source(config::File::from_str(
        include_str!("../default_config.toml"),
        Toml,
    ));
    if let Some(config_dir) = config_dir {
        settings =
            settings.add_source(config::File::from(config_file(config_dir)).required(false));
    }
    settings =
        settings.add_source(config::File::from(PathBuf::from("scouts.toml")).required(false));
    for config_arg in &args.config {
        let Some((name, value)) = config_arg.split_once('=') else {
            return Err(ConfigError::MalformedOverride(config_arg.clone()));
        };
        // Config keys are deserialized through a flattened struct, which will not coerce
        // strings into booleans, so boolean overrides are passed as booleans.
        settings = match value.parse::<bool>() {
            Ok(value) => settings.set_override(name, value)?,
            Err(_) => settings.set_override(name, value)?,
        };
    }

    if let Some(language) = args.language {
        settings = settings.set_override("language", language.as_str())?;
    }
    if let Some(service) = args.service {
        settings = settings.set_override("service", service.as_str())?;
    }
    if let Some(ref prompt) = args.additional_prompt {
        settings = settings.set_override("additional_prompt", prompt.as_str())?;
    }
    if args.verbose {
        settings = settings.set_override("log_filter", "debug")?;
    }
    if args.npx_check {
        settings = settings.set_override("npx_check", true)?;
    }
    if args.clean {
        settings = settings.set_override("clean", true)?;
    }
    // Applied last so that it wins over --npx-check and every config file.
    if args.skip_npx_check {
        settings = settings.set_override("npx_check", false)?;
    }

    // Paths and lists are patched in after deserialization rather than passed through
    // set_override, which cannot represent a Path losslessly.
    let mut config: Config = settings.build()?.try_deserialize()?;
    if let Some(ref repo_root) = args.repo_root {
        config.repo_root = repo_root.clone();
    }
    if !args.targets.is_empty() {
        config.targets = args.targets.clone();
    }
    // Translations run inside the tool directory, so every path handed to them must be absolute.
    config.repo_root = std::path::absolute(&config.repo_root)?;
    if let Some(target) = config.targets.iter().find(|t| !is_valid_target(t)) {
        return Err(ConfigError::InvalidTarget(target.clone()));
    }
    Ok(config)
}

/// A target names a directory under .scouts, so it must be exactly one normal path component.
fn is_valid_target(target: &str) -> bool {
    let mut components = Path::new(target).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == target
    )
}

/// Returns the config file path, given the config directory.
fn config_file(config_dir: &Path) -> PathBuf {
    [config_dir, "scouts.toml".as_ref()].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_enum_values() {
        assert!(Args::try_parse_from(["", "--language", "pythonv3"]).is_err());
        assert!(Args::try_parse_from(["", "--service", "ec2"]).is_err());
        let args = Args::try_parse_from(["", "--language", "rustv1", "--service", "dynamodb"])
            .unwrap();
        assert_eq!(args.language, Some(SdkLanguage::RustV1));
        assert_eq!(args.service, Some(Service::Dynamodb));
    }

    #[test]
    fn valid_targets() {
        assert!(is_valid_target("kotlin"));
        assert!(is_valid_target("c++"));
        assert!(!is_valid_target(""));
        assert!(!is_valid_target("."));
        assert!(!is_valid_target(".."));
        assert!(!is_valid_target("kotlin/"));
        assert!(!is_valid_target("a/b"));
        assert!(!is_valid_target("/kotlin"));
    }

    #[cfg(not(miri))]
    #[test]
    fn defaults() {
        use scout_core::test_util::tempdir;
        let config_dir = tempdir().unwrap();
        let config = load_config(&Args::parse_from([""]), Some(config_dir.path())).unwrap();
        assert_eq!(config.language, SdkLanguage::JavascriptV3);
        assert_eq!(config.service, Service::S3);
        assert_eq!(config.additional_prompt, "");
        assert_eq!(config.targets, ["kotlin"]);
        assert!(!config.npx_check);
        assert!(!config.clean);
        assert_eq!(config.log_filter, "warn");
        assert!(config.repo_root.is_absolute());
        assert!(config.tools.contains_key("ailly"));
        assert!(config.unknown.is_empty());
        let ailly = ailly::Config::from_tools(&config.tools).unwrap();
        assert_eq!(ailly.package, "@ailly/cli");
        assert_eq!(ailly.dir, PathBuf::from(".tools/ailly"));
    }

    #[cfg(not(miri))]
    #[test]
    fn load_config_test() {
        use scout_core::test_util::tempdir;
        use std::{fs, io::Write as _};
        let config_dir = tempdir().unwrap();
        let load = |args: &[&str]| {
            let args = Args::parse_from([""].iter().chain(args));
            load_config(&args, Some(config_dir.path())).unwrap()
        };

        assert_eq!(load(&["--repo-root", "/repo"]).repo_root, PathBuf::from("/repo"));
        fs::File::create(config_file(config_dir.path()))
            .unwrap()
            .write_all(
                br#"
                    repo_root = "/from/file"
                    language = "gov2"
                    targets = ["rust", "python"]
                    [tools.ailly]
                    package = "@ailly/cli@1.0.1"
                "#,
            )
            .unwrap();
        let config = load(&[]);
        assert_eq!(config.repo_root, PathBuf::from("/from/file"));
        assert_eq!(config.language, SdkLanguage::GoV2);
        assert_eq!(config.targets, ["rust", "python"]);
        // Tables from different sources are merged key by key.
        let ailly = ailly::Config::from_tools(&config.tools).unwrap();
        assert_eq!(ailly.package, "@ailly/cli@1.0.1");
        assert_eq!(ailly.engine, "bedrock");
        // Verify the --config flag overrides the user's config file.
        assert_eq!(
            load(&["--config", "language=rustv1"]).language,
            SdkLanguage::RustV1
        );
        // Verify dedicated flags override --config.
        let config = load(&[
            "--config",
            "service=s3",
            "--service",
            "cloudwatch-logs",
            "--repo-root",
            "/flag",
            "--target",
            "kotlin",
            "--additional-prompt",
            "Keep comments.",
        ]);
        assert_eq!(config.service, Service::CloudwatchLogs);
        assert_eq!(config.repo_root, PathBuf::from("/flag"));
        assert_eq!(config.targets, ["kotlin"]);
        assert_eq!(config.additional_prompt, "Keep comments.");
        assert_eq!(config.example_path(), PathBuf::from("/flag/gov2/cloudwatch-logs"));
        // Boolean overrides reach nested tool tables as booleans.
        let config = load(&["--config", "tools.ailly.isolated=false"]);
        assert!(!ailly::Config::from_tools(&config.tools).unwrap().isolated);
        // Verify --verbose and --clean.
        let config = load(&["--verbose", "--clean"]);
        assert_eq!(config.log_filter, "debug");
        assert!(config.clean);
    }

    #[cfg(not(miri))]
    #[test]
    fn skip_npx_check_wins() {
        use scout_core::test_util::tempdir;
        let config_dir = tempdir().unwrap();
        let load = |args: &[&str]| {
            let args = Args::parse_from([""].iter().chain(args));
            load_config(&args, Some(config_dir.path())).unwrap().npx_check
        };
        assert!(!load(&[]));
        assert!(load(&["--npx-check"]));
        assert!(load(&["--config", "npx_check=true"]));
        assert!(!load(&["--npx-check", "--skip-npx-check"]));
        assert!(!load(&["--skip-npx-check", "--npx-check"]));
        assert!(!load(&["--config", "npx_check=true", "--skip-npx-check"]));
    }

    #[cfg(not(miri))]
    #[test]
    fn load_config_errors() {
        use scout_core::test_util::tempdir;
        let config_dir = tempdir().unwrap();
        let load = |args: &[&str]| {
            let args = Args::parse_from([""].iter().chain(args));
            load_config(&args, Some(config_dir.path()))
        };
        assert!(matches!(
            load(&["--config", "clean"]),
            Err(ConfigError::MalformedOverride(_))
        ));
        assert!(matches!(
            load(&["--config", "language=cobol"]),
            Err(ConfigError::Load(_))
        ));
        assert!(matches!(
            load(&["--target", "../escape"]),
            Err(ConfigError::InvalidTarget(t)) if t == "../escape"
        ));
    }
}
