//! # dine
//!
//! Seats a table of agents, runs every agent through its think/eat cycles
//! on its own thread, and prints the table after each change.
//!
//! ```text
//! dine [REPETITIONS] [--agents N] [--dawdle-ms MS] [--seed S]
//!      [--policy parity|lower-first] [--verify] [--log-level LEVEL]
//! ```
//!
//! The table goes to stdout; logs and errors go to stderr. Exit status is
//! 0 when every agent finished, 1 otherwise.

use std::io;
use std::process::ExitCode;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use dine::prelude::*;
use tracing::{error, info};

/// Run a dining table simulation
#[derive(Parser, Debug)]
#[command(name = "dine")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Think/eat cycles per agent (a positive integer)
    #[arg(value_name = "REPETITIONS", default_value = "1", allow_negative_numbers = true)]
    repetitions: String,

    /// Number of agents seated at the table
    #[arg(short = 'n', long, env = "DINE_AGENTS", default_value_t = 5)]
    agents: u32,

    /// Upper bound on each random pause, in milliseconds (0 disables pauses)
    #[arg(long, env = "DINE_DAWDLE_MS", default_value_t = 1000)]
    dawdle_ms: u64,

    /// Seed for the pause generators (default: taken from the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Order in which each agent picks up its forks
    #[arg(long, value_enum, default_value_t = PolicyArg::Parity)]
    policy: PolicyArg,

    /// Check every snapshot for consistency and fail on the first problem
    #[arg(long)]
    verify: bool,

    /// Log level when DINE_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// Even seats right first, odd seats left first
    Parity,
    /// Lower-numbered fork first
    LowerFirst,
}

impl From<PolicyArg> for AcquisitionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Parity => AcquisitionPolicy::Parity,
            PolicyArg::LowerFirst => AcquisitionPolicy::LowerFirst,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too and are not failures.
            let failed = e.use_stderr();
            let _ = e.print();
            return if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(e) = init_logging(&cli.log_level) {
        eprintln!("dine: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "run failed");
            eprintln!("dine: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = DinnerConfig {
        agents: cli.agents,
        repetitions: DinnerConfig::parse_repetitions(&cli.repetitions)?,
        dawdle: Duration::from_millis(cli.dawdle_ms),
        seed: cli.seed.unwrap_or_else(clock_seed),
        policy: cli.policy.into(),
    };
    let dinner = Dinner::new(config).context("invalid configuration")?;

    let renderer = TableRenderer::new(io::stdout());
    let report = if cli.verify {
        let checker = InvariantChecker::new();
        let report = dinner.run(&(&renderer, &checker))?;
        let violations = checker.violations();
        if let Some(first) = violations.first() {
            bail!(
                "{} inconsistent snapshot(s) out of {}, first: {first}",
                violations.len(),
                checker.checked()
            );
        }
        info!(checked = checker.checked(), "every snapshot consistent");
        report
    } else {
        dinner.run(&renderer)?
    };

    if renderer.write_failed() {
        bail!("could not write the table to stdout");
    }
    for agent in &report.agents {
        info!(
            agent = %agent.agent,
            meals = agent.meals,
            mean_wait = ?agent.mean_wait(),
            max_wait = ?agent.max_wait,
            "agent summary"
        );
    }
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| fold_nanos(d.as_nanos()))
        .unwrap_or(0)
}

/// XOR the high half of a nanosecond count into the low half.
fn fold_nanos(nanos: u128) -> u64 {
    let low = u64::try_from(nanos & u128::from(u64::MAX)).unwrap_or(u64::MAX);
    let high = u64::try_from(nanos >> 64).unwrap_or(u64::MAX);
    low ^ high
}

/// Install the stderr subscriber. `DINE_LOG` wins over `--log-level`.
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("DINE_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install log subscriber")?;

    Ok(())
}
