//! The directory convention used to locate SDK examples and their scouts.
//!
//! Examples live at `<repo root>/<language>/<service>`. Translations of an example are written
//! beneath it, at `<example>/.scouts/<target language>`.

use clap::ValueEnum;
use serde::Deserialize;
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

/// Name of the per-example directory that holds one subdirectory per target language.
pub const SCRATCH_DIR: &str = ".scouts";

/// An SDK implementation language whose examples can be translated.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, ValueEnum)]
pub enum SdkLanguage {
    #[serde(rename = "rustv1")]
    #[value(name = "rustv1")]
    RustV1,
    #[default]
    #[serde(rename = "javascriptv3")]
    #[value(name = "javascriptv3")]
    JavascriptV3,
    #[serde(rename = "gov2")]
    #[value(name = "gov2")]
    GoV2,
}

impl SdkLanguage {
    /// The directory name (and tag) of this language.
    pub fn as_str(self) -> &'static str {
        match self {
            SdkLanguage::RustV1 => "rustv1",
            SdkLanguage::JavascriptV3 => "javascriptv3",
            SdkLanguage::GoV2 => "gov2",
        }
    }
}

impl Display for SdkLanguage {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A service whose example code can be translated.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, ValueEnum)]
pub enum Service {
    #[serde(rename = "cloudwatch-logs")]
    #[value(name = "cloudwatch-logs")]
    CloudwatchLogs,
    #[serde(rename = "dynamodb")]
    #[value(name = "dynamodb")]
    Dynamodb,
    #[default]
    #[serde(rename = "s3")]
    #[value(name = "s3")]
    S3,
}

impl Service {
    /// The directory name (and tag) of this service.
    pub fn as_str(self) -> &'static str {
        match self {
            Service::CloudwatchLogs => "cloudwatch-logs",
            Service::Dynamodb => "dynamodb",
            Service::S3 => "s3",
        }
    }
}

impl Display for Service {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns `<repo_root>/<language>/<service>`.
pub fn example_path(repo_root: &Path, language: SdkLanguage, service: Service) -> PathBuf {
    PathBuf::from_iter([
        repo_root,
        language.as_str().as_ref(),
        service.as_str().as_ref(),
    ])
}

/// Returns `<example>/.scouts`.
pub fn scratch_dir(example: &Path) -> PathBuf {
    example.join(SCRATCH_DIR)
}

/// Returns `<example>/.scouts/<target>`, the directory a single translation writes into.
pub fn scout_dir(example: &Path, target: &str) -> PathBuf {
    PathBuf::from_iter([example, SCRATCH_DIR.as_ref(), target.as_ref()])
}
