//! The interface through which every external process is launched.
//!
//! Nothing in the driver calls [std::process::Command] directly; it builds an [Invocation] and
//! hands it to a [CommandRunner]. [SystemRunner] actually spawns processes, while tests substitute
//! [crate::test_util::MockRunner].

use std::ffi::{OsStr, OsString};
use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::{debug, trace};

/// A single external command: program, arguments, and optional working directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Invocation {
    program: OsString,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
    output: OutputMode,
}

/// What happens to a child's stdout and stderr.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputMode {
    /// Collected by the runner and only emitted as log messages.
    Captured,
    /// Shared with this process, so the child writes straight to the terminal.
    #[default]
    Inherited,
}

impl Invocation {
    pub fn new<S: AsRef<OsStr>>(program: S) -> Invocation {
        Invocation {
            program: program.as_ref().to_owned(),
            args: vec![],
            current_dir: None,
            output: OutputMode::default(),
        }
    }

    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Invocation {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    pub fn args<I: IntoIterator<Item = S>, S: AsRef<OsStr>>(mut self, args: I) -> Invocation {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_owned()));
        self
    }

    pub fn current_dir<P: AsRef<Path>>(mut self, dir: P) -> Invocation {
        self.current_dir = Some(dir.as_ref().to_owned());
        self
    }

    pub fn output(mut self, output: OutputMode) -> Invocation {
        self.output = output;
        self
    }

    pub fn get_program(&self) -> &OsStr {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    pub fn get_output(&self) -> OutputMode {
        self.output
    }

    /// Returns the value following the first occurrence of `flag` in the argument list, if any.
    pub fn flag_value(&self, flag: &str) -> Option<&OsStr> {
        let position = self.args.iter().position(|a| a == flag)?;
        self.args.get(position + 1).map(OsString::as_os_str)
    }

    /// Renders this invocation as a line that can be pasted into a POSIX shell, e.g.
    /// `cd '/tools' ; 'npx' '@ailly/cli' '--isolated'`. Every word is single-quoted.
    pub fn shell_line(&self) -> String {
        let mut line = String::new();
        if let Some(dir) = &self.current_dir {
            line.push_str("cd ");
            line.push_str(&shell_quote(dir.as_os_str()));
            line.push_str(" ; ");
        }
        let words: Vec<_> = std::iter::once(&self.program)
            .chain(&self.args)
            .map(|word| shell_quote(word))
            .collect();
        line.push_str(&words.join(" "));
        line
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        command
    }
}

impl Display for Invocation {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.shell_line())
    }
}

/// Quotes `word` for a POSIX shell. Embedded single quotes become `'\''`.
fn shell_quote(word: &OsStr) -> String {
    format!("'{}'", word.to_string_lossy().replace('\'', r"'\''"))
}

/// How an external command finished.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunStatus {
    Success,
    /// The command ran but did not succeed. `code` is `None` if it was killed by a signal.
    Failed { code: Option<i32> },
}

impl RunStatus {
    pub fn success(self) -> bool {
        self == RunStatus::Success
    }
}

impl From<ExitStatus> for RunStatus {
    fn from(status: ExitStatus) -> RunStatus {
        match status.success() {
            true => RunStatus::Success,
            false => RunStatus::Failed {
                code: status.code(),
            },
        }
    }
}

impl Display for RunStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RunStatus::Success => write!(f, "success"),
            RunStatus::Failed { code: Some(code) } => write!(f, "exit code {code}"),
            RunStatus::Failed { code: None } => write!(f, "terminated by signal"),
        }
    }
}

/// Launches external commands and waits for them to finish.
pub trait CommandRunner {
    /// Runs `invocation` to completion. An `Err` means the process could not be started at all;
    /// a process that starts and fails is reported as `Ok(RunStatus::Failed { .. })`.
    fn run(&mut self, invocation: &Invocation) -> io::Result<RunStatus>;
}

/// A [CommandRunner] that spawns real child processes, blocking until each exits.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> io::Result<RunStatus> {
        debug!("Running {invocation}");
        let status = match invocation.output {
            OutputMode::Inherited => invocation.command().status()?,
            OutputMode::Captured => {
                let output = invocation.command().output()?;
                trace!("stdout: {}", String::from_utf8_lossy(&output.stdout));
                trace!("stderr: {}", String::from_utf8_lossy(&output.stderr));
                output.status
            }
        };
        let status: RunStatus = status.into();
        debug!("{:?} finished: {status}", invocation.program);
        Ok(status)
    }
}
