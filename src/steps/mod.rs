//! The seven hardening steps and the context they run in.
//!
//! Steps run in a fixed order and never stop the sequence: every command is
//! best effort, failures are logged and folded into the step's
//! [`StepOutcome`]. Under dry-run a step only logs what it would do; the only
//! external command it may run is a read-only query.

pub mod firewall;
pub mod packages;
pub mod selinux;
pub mod services;
pub mod ssh;
pub mod sysctl;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::HardenError;
use crate::exec::{CommandOutput, CommandRunner, SystemCommand};
use crate::mode::HardeningMode;

/// Shared inputs for every step of one run.
pub struct StepContext<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a Config,
    mode: HardeningMode,
    dry_run: bool,
}

impl<'a> StepContext<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        config: &'a Config,
        mode: HardeningMode,
        dry_run: bool,
    ) -> Self {
        Self {
            runner,
            config,
            mode,
            dry_run,
        }
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn mode(&self) -> HardeningMode {
        self.mode
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Run one command, turning spawn failures and rejected exit codes into
    /// errors. Mutating commands are refused outright under dry-run.
    pub fn invoke(&self, command: &SystemCommand) -> Result<CommandOutput, HardenError> {
        if self.dry_run && command.is_mutating() {
            return Err(HardenError::DryRunViolation {
                command: command.to_string(),
            });
        }

        let output = self
            .runner
            .run(command)
            .map_err(|source| HardenError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if command.accepts(output.code) {
            Ok(output)
        } else {
            Err(HardenError::ExitStatus {
                command: command.to_string(),
                code: output.code,
                stderr: output.stderr,
            })
        }
    }
}

/// Collects the failures of one step while it keeps going.
pub struct Attempts<'c, 'a> {
    ctx: &'c StepContext<'a>,
    failures: Vec<String>,
}

impl<'c, 'a> Attempts<'c, 'a> {
    pub fn new(ctx: &'c StepContext<'a>) -> Self {
        Self {
            ctx,
            failures: Vec::new(),
        }
    }

    /// Run `command`; on failure log a warning, remember it and carry on.
    pub fn run(&mut self, command: SystemCommand) -> Option<CommandOutput> {
        match self.ctx.invoke(&command) {
            Ok(output) => Some(output),
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    /// Record a failure that did not come from a command.
    pub fn fail(&mut self, err: impl fmt::Display) {
        warn!("{}", err);
        self.failures.push(err.to_string());
    }

    pub fn outcome(self) -> StepOutcome {
        if self.failures.is_empty() {
            StepOutcome::Succeeded
        } else {
            StepOutcome::Failed(self.failures.join("; "))
        }
    }
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Every command exited successfully.
    Succeeded,
    /// At least one command could not run or failed; later ones still ran.
    Failed(String),
    /// Dry-run: the intended action was logged only.
    Planned,
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

/// The hardening steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    SystemUpdate,
    DisableServices,
    Firewall,
    Selinux,
    Ssh,
    Sysctl,
    Fail2ban,
}

impl Step {
    pub const ALL: [Step; 7] = [
        Step::SystemUpdate,
        Step::DisableServices,
        Step::Firewall,
        Step::Selinux,
        Step::Ssh,
        Step::Sysctl,
        Step::Fail2ban,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Step::SystemUpdate => "system update",
            Step::DisableServices => "service disablement",
            Step::Firewall => "firewall",
            Step::Selinux => "SELinux enforcement",
            Step::Ssh => "SSH hardening",
            Step::Sysctl => "sysctl hardening",
            Step::Fail2ban => "fail2ban",
        }
    }

    pub fn run(self, ctx: &StepContext<'_>) -> StepOutcome {
        match self {
            Step::SystemUpdate => packages::update_system(ctx),
            Step::DisableServices => services::disable_services(ctx),
            Step::Firewall => firewall::configure_firewall(ctx),
            Step::Selinux => selinux::enforce_selinux(ctx),
            Step::Ssh => ssh::harden_ssh(ctx),
            Step::Sysctl => sysctl::harden_sysctl(ctx),
            Step::Fail2ban => packages::install_fail2ban(ctx),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of the run summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub step: Step,
    pub outcome: StepOutcome,
}

/// Outcomes of every step of a run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub steps: Vec<StepReport>,
}

impl RunSummary {
    pub fn failed(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|r| r.outcome.is_failed())
    }

    pub fn count(&self, wanted: fn(&StepOutcome) -> bool) -> usize {
        self.steps.iter().filter(|r| wanted(&r.outcome)).count()
    }

    /// Log one line per step plus a total.
    pub fn log(&self) {
        for report in &self.steps {
            match &report.outcome {
                StepOutcome::Succeeded => info!("  {:<20} ok", report.step.label()),
                StepOutcome::Planned => info!("  {:<20} planned", report.step.label()),
                StepOutcome::Failed(reason) => {
                    warn!("  {:<20} FAILED ({})", report.step.label(), reason)
                }
            }
        }

        let failed = self.count(StepOutcome::is_failed);
        if failed == 0 {
            info!("All {} steps completed.", self.steps.len());
        } else {
            warn!(
                "{} of {} steps reported failures.",
                failed,
                self.steps.len()
            );
        }
    }
}

/// Run every step in order. Failures never stop the sequence.
pub fn run_all(ctx: &StepContext<'_>) -> RunSummary {
    let total = Step::ALL.len();
    let mut summary = RunSummary::default();

    for (i, step) in Step::ALL.into_iter().enumerate() {
        info!("[{}/{}] {}", i + 1, total, step.label());
        let outcome = step.run(ctx);
        summary.steps.push(StepReport { step, outcome });
    }

    summary
}
