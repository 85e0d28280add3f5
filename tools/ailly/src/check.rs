//! Verifies that ailly can be launched, installing it if necessary.
//!
//! The check is split into independent [Step]s so that each command can be stubbed on its own:
//! the runtime must be present, the tool is installed only if it cannot be launched, and the
//! version is printed for the record without its result being checked.

use crate::Config;
use scout_core::command::{CommandRunner, Invocation, OutputMode, RunStatus};
use std::fmt::{self, Display, Formatter};
use std::io;
use thiserror::Error;
use tracing::{info, warn};

/// One command of the dependency check.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Step {
    /// `node --version`
    VerifyRuntime,
    /// `npx @ailly/cli --help`
    VerifyTool,
    /// `npm install @ailly/cli`
    InstallTool,
    /// `npx @ailly/cli --version`
    PrintVersion,
}

impl Step {
    /// The command run for this step.
    pub fn invocation(self, config: &Config) -> Invocation {
        match self {
            Step::VerifyRuntime => Invocation::new(&config.runtime)
                .arg("--version")
                .output(OutputMode::Captured),
            Step::VerifyTool => config
                .tool_invocation()
                .arg("--help")
                .output(OutputMode::Captured),
            Step::InstallTool => Invocation::new(&config.installer)
                .args(["install", config.package.as_str()])
                .output(OutputMode::Captured),
            Step::PrintVersion => config
                .tool_invocation()
                .arg("--version")
                .output(OutputMode::Inherited),
        }
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Step::VerifyRuntime => "verify runtime",
            Step::VerifyTool => "verify tool",
            Step::InstallTool => "install tool",
            Step::PrintVersion => "print version",
        })
    }
}

/// A dependency check step that could not be completed.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("{step}: failed to launch command: {source}")]
    Spawn {
        step: Step,
        #[source]
        source: io::Error,
    },
    #[error("{step}: command failed with {status}")]
    Failed { step: Step, status: RunStatus },
}

impl CheckError {
    pub fn step(&self) -> Step {
        match self {
            CheckError::Spawn { step, .. } | CheckError::Failed { step, .. } => *step,
        }
    }
}

/// Runs `step`, turning anything other than success into an error.
pub fn run_step(
    runner: &mut dyn CommandRunner,
    config: &Config,
    step: Step,
) -> Result<(), CheckError> {
    let invocation = step.invocation(config);
    info!("Dependency check ({step}): {invocation}");
    match runner.run(&invocation) {
        Err(source) => Err(CheckError::Spawn { step, source }),
        Ok(RunStatus::Success) => Ok(()),
        Ok(status) => Err(CheckError::Failed { step, status }),
    }
}

/// Confirms the runtime is present, installs the tool if it cannot be launched, and prints the
/// tool's version. The version step never fails the check.
pub fn ensure_available(runner: &mut dyn CommandRunner, config: &Config) -> Result<(), CheckError> {
    run_step(runner, config, Step::VerifyRuntime)?;
    if let Err(error) = run_step(runner, config, Step::VerifyTool) {
        info!("{} is not available ({error}); installing it", config.package);
        run_step(runner, config, Step::InstallTool)?;
        run_step(runner, config, Step::VerifyTool)?;
    }
    if let Err(error) = run_step(runner, config, Step::PrintVersion) {
        warn!("Ignoring version check failure: {error}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::test_util::MockRunner;

    const RUNTIME: &str = "'node' '--version'";
    const HELP: &str = "'npx' '@ailly/cli' '--help'";
    const INSTALL: &str = "'npm' 'install' '@ailly/cli'";
    const VERSION: &str = "'npx' '@ailly/cli' '--version'";

    fn failed() -> io::Result<RunStatus> {
        Ok(RunStatus::Failed { code: Some(1) })
    }

    #[test]
    fn already_installed() {
        let mut runner = MockRunner::new();
        ensure_available(&mut runner, &Config::mock()).unwrap();
        assert_eq!(runner.shell_lines(), [RUNTIME, HELP, VERSION]);
    }

    #[test]
    fn installs_missing_tool() {
        let mut help_calls = 0;
        let mut runner = MockRunner::new().respond(move |invocation| {
            if invocation.shell_line() == HELP {
                help_calls += 1;
                if help_calls == 1 {
                    return failed();
                }
            }
            Ok(RunStatus::Success)
        });
        ensure_available(&mut runner, &Config::mock()).unwrap();
        assert_eq!(runner.shell_lines(), [RUNTIME, HELP, INSTALL, HELP, VERSION]);
    }

    #[test]
    fn missing_runtime_aborts() {
        let mut runner = MockRunner::new().respond(|_| Err(io::ErrorKind::NotFound.into()));
        let error = ensure_available(&mut runner, &Config::mock()).unwrap_err();
        assert!(matches!(error, CheckError::Spawn { step: Step::VerifyRuntime, .. }));
        assert_eq!(runner.shell_lines(), [RUNTIME]);
    }

    #[test]
    fn failed_install_aborts() {
        let mut runner = MockRunner::new().respond(|invocation| match invocation.shell_line() {
            line if line == HELP || line == INSTALL => failed(),
            _ => Ok(RunStatus::Success),
        });
        let error = ensure_available(&mut runner, &Config::mock()).unwrap_err();
        assert_eq!(error.step(), Step::InstallTool);
        assert_eq!(runner.shell_lines(), [RUNTIME, HELP, INSTALL]);
    }

    #[test]
    fn still_missing_after_install() {
        let mut runner = MockRunner::new().respond(|invocation| match invocation.shell_line() {
            line if line == HELP => failed(),
            _ => Ok(RunStatus::Success),
        });
        let error = ensure_available(&mut runner, &Config::mock()).unwrap_err();
        assert!(matches!(
            error,
            CheckError::Failed {
                step: Step::VerifyTool,
                status: RunStatus::Failed { code: Some(1) }
            }
        ));
        assert_eq!(runner.shell_lines(), [RUNTIME, HELP, INSTALL, HELP]);
    }

    #[test]
    fn version_failure_ignored() {
        let mut runner = MockRunner::new().respond(|invocation| match invocation.shell_line() {
            line if line == VERSION => failed(),
            _ => Ok(RunStatus::Success),
        });
        assert!(ensure_available(&mut runner, &Config::mock()).is_ok());
        assert_eq!(runner.shell_lines(), [RUNTIME, HELP, VERSION]);
    }

    #[test]
    fn captured_output() {
        let config = Config::mock();
        assert_eq!(Step::VerifyRuntime.invocation(&config).get_output(), OutputMode::Captured);
        assert_eq!(Step::PrintVersion.invocation(&config).get_output(), OutputMode::Inherited);
    }
}
