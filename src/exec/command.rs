use std::fmt;

/// Whether a command changes the state of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Inspects the host only (`findmnt`, `dnf check-update`, ...).
    ReadOnly,
    /// Installs, enables, disables, writes or restarts something.
    Mutating,
}

/// How the child's stdout/stderr are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Collect output so the caller can inspect it.
    Capture,
    /// Stream straight to the terminal (long package transactions).
    Inherit,
}

/// An external tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemCommand {
    program: String,
    args: Vec<String>,
    effect: Effect,
    output: OutputMode,
    ok_codes: Vec<i32>,
}

impl SystemCommand {
    fn new<I, S>(program: &str, args: I, effect: Effect) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            effect,
            output: OutputMode::Capture,
            ok_codes: vec![0],
        }
    }

    /// A command that only reads host state.
    pub fn query<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(program, args, Effect::ReadOnly)
    }

    /// A command that modifies host state.
    pub fn mutate<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(program, args, Effect::Mutating)
    }

    /// Append one more argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Let the child write directly to the terminal.
    pub fn streamed(mut self) -> Self {
        self.output = OutputMode::Inherit;
        self
    }

    /// Treat these exit codes as success instead of just 0.
    pub fn accept_codes(mut self, codes: &[i32]) -> Self {
        self.ok_codes = codes.to_vec();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn is_mutating(&self) -> bool {
        self.effect == Effect::Mutating
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output
    }

    /// Whether `code` counts as a successful exit for this command.
    pub fn accepts(&self, code: Option<i32>) -> bool {
        code.is_some_and(|c| self.ok_codes.contains(&c))
    }
}

impl fmt::Display for SystemCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Result of running a [`SystemCommand`].
///
/// `stdout`/`stderr` are empty for [`OutputMode::Inherit`] commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the child was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Output of a child that exited with `code` and printed `stdout`.
    pub fn exited(code: i32, stdout: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}
