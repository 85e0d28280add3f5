//! Place to put utilities that are only used by tests.

use crate::command::{CommandRunner, Invocation, RunStatus};
use std::io;

/// Returns a new temporary directory. Unlike the defaults in the `tempdir` and `tempfile` crates,
/// this directory is not world-accessible by default.
#[cfg(not(miri))]
pub fn tempdir() -> std::io::Result<tempfile::TempDir> {
    use std::fs::Permissions;
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(Permissions::from_mode(0o700));
    }
    builder.tempdir()
}

/// A runner that can be programmed to have many different behaviors, for testing code that
/// launches external commands. Every invocation it receives is recorded, whether or not it
/// "succeeds".
pub struct MockRunner {
    #[allow(clippy::type_complexity)]
    respond: Box<dyn FnMut(&Invocation) -> io::Result<RunStatus>>,
    invocations: Vec<Invocation>,
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder-style API for configuring how this MockRunner behaves.
///
/// # Example
/// ```
/// use scout_core::test_util::MockRunner;
/// use scout_core::{CommandRunner, Invocation, RunStatus};
/// let mut runner = MockRunner::new().respond(|_| Ok(RunStatus::Failed { code: Some(1) }));
/// let status = runner.run(&Invocation::new("node").arg("--version")).unwrap();
/// assert!(!status.success());
/// assert_eq!(runner.invocations().len(), 1);
/// ```
impl MockRunner {
    /// Creates a new MockRunner, which reports success for every invocation.
    pub fn new() -> MockRunner {
        MockRunner {
            respond: Box::new(|_| Ok(RunStatus::Success)),
            invocations: vec![],
        }
    }

    /// Sets a closure that decides the outcome of each invocation.
    pub fn respond<F: FnMut(&Invocation) -> io::Result<RunStatus> + 'static>(
        mut self,
        f: F,
    ) -> MockRunner {
        self.respond = Box::new(f);
        self
    }

    /// All invocations received so far, in order.
    pub fn invocations(&self) -> &[Invocation] {
        &self.invocations
    }

    /// The invocations received so far, rendered with [Invocation::shell_line].
    pub fn shell_lines(&self) -> Vec<String> {
        self.invocations.iter().map(Invocation::shell_line).collect()
    }
}

impl CommandRunner for MockRunner {
    fn run(&mut self, invocation: &Invocation) -> io::Result<RunStatus> {
        self.invocations.push(invocation.clone());
        (self.respond)(invocation)
    }
}
