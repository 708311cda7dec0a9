//! These structs provide the CLI interface for timew-moco.

use crate::transform::MissingTaskPolicy;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// timew-moco: Book your Timewarrior intervals as MOCO activities.
///
/// Install the binary into your Timewarrior extensions directory, e.g.
/// ~/.config/timewarrior/extensions/moco, and run `timew moco :week`. Timewarrior writes its
/// configuration and the selected intervals to stdin.
///
/// The first tag of every interval must look like `Project Name: what you did`. The project name
/// is matched against the projects you are assigned to in MOCO, the remaining tags are matched
/// against the tasks of that project.
///
/// Nothing is sent to MOCO unless you pass --submit to the report command.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    /// The subcommand, which is `report` when none was given. This is how Timewarrior calls us.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or_default()
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Turn a Timewarrior report from stdin (or --input) into MOCO activities.
    ///
    /// Intervals are matched to projects and tasks, then merged when they share the day, the
    /// project and the description. By default the result is only printed. Pass --submit to
    /// create the activities in MOCO.
    Report(ReportArgs),
    /// List the active MOCO projects you are assigned to, with their tasks.
    Projects,
}

impl Default for Command {
    fn default() -> Self {
        Command::Report(ReportArgs::default())
    }
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for the syntax.
    #[arg(long, env = "TIMEW_MOCO_LOG_LEVEL", default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// Your MOCO subdomain, e.g. `acme` for https://acme.mocoapp.com. Falls back to the
    /// `moco.domain` key of your Timewarrior configuration.
    #[arg(long, env = "MOCO_DOMAIN")]
    domain: Option<String>,

    /// Your personal MOCO API key, found in your MOCO profile under "Integrations".
    #[arg(long, env = "MOCO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// The minimum similarity for a project name to match. Falls back to the `moco.threshold` key
    /// of your Timewarrior configuration, then to 0.8.
    #[arg(long)]
    threshold: Option<f64>,
}

impl Common {
    pub fn new(
        log_level: LevelFilter,
        domain: Option<String>,
        api_key: Option<String>,
        threshold: Option<f64>,
    ) -> Self {
        Self {
            log_level,
            domain,
            api_key,
            threshold,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }
}

/// (Not shown): Args for the `timew-moco report` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct ReportArgs {
    /// Read the Timewarrior report from this file instead of stdin.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Create the activities in MOCO. Without this flag nothing is sent.
    #[arg(long)]
    submit: bool,

    /// Stop at the first interval that cannot be converted instead of skipping it.
    #[arg(long)]
    strict: bool,

    /// What to do with an interval whose project has no active task: `skip` it with a warning or
    /// `fail` it like any other unmatched interval.
    #[arg(long, value_enum, default_value_t = MissingTaskPolicy::Skip)]
    missing_task: MissingTaskPolicy,
}

impl ReportArgs {
    pub fn new(
        input: Option<PathBuf>,
        submit: bool,
        strict: bool,
        missing_task: MissingTaskPolicy,
    ) -> Self {
        Self {
            input,
            submit,
            strict,
            missing_task,
        }
    }

    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn submit(&self) -> bool {
        self.submit
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn missing_task_policy(&self) -> MissingTaskPolicy {
        self.missing_task
    }
}
