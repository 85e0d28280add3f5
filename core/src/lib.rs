//! Shared building blocks for the scout translation driver: the run [config::Config], the
//! `<language>/<service>` example layout, scratch directory handling, and the [command] seam
//! through which every external process is launched.

pub mod command;
pub mod config;
pub mod diagnostics;
pub mod example;
pub mod test_util;
pub mod utils;

pub use command::{CommandRunner, Invocation, RunStatus};
pub use example::{SdkLanguage, Service};
