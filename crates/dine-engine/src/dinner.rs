//! The dispatcher.
//!
//! [`Dinner`] owns a validated configuration. Each call to
//! [`run`](Dinner::run) builds a fresh table, spawns one scoped thread per
//! agent, blocks until all of them are joined, and checks that every fork
//! came back before reporting.

use std::error::Error;
use std::fmt;
use std::thread;
use std::time::Instant;

use dine_core::{AgentId, Ring, TableError, TableObserver};
use dine_table::{PoolError, SharedTable};
use tracing::{error, info};

use crate::config::{ConfigError, DinnerConfig};
use crate::dawdle::Dawdle;
use crate::metrics::{AgentReport, DinnerReport};
use crate::worker::{Worker, WorkerError};

// ── DinnerError ───────────────────────────────────────────────────

/// Errors from setting up or running a dinner.
#[derive(Debug)]
pub enum DinnerError {
    /// The configuration was rejected.
    Config(ConfigError),
    /// The table could not be set up.
    Table(TableError),
    /// The fork pool could not be set up or checked.
    Pool(PoolError),
    /// A worker thread could not be started. Agents already started were
    /// run to completion and joined first.
    ResourceInit {
        /// The agent whose thread failed to start.
        agent: AgentId,
        /// The OS error.
        source: std::io::Error,
    },
    /// A worker stopped with an error.
    Worker {
        /// The failing agent.
        agent: AgentId,
        /// What went wrong.
        source: WorkerError,
    },
    /// A worker thread panicked.
    WorkerPanicked {
        /// The agent whose thread panicked.
        agent: AgentId,
    },
    /// Forks were still held after every worker was joined.
    ForksStillHeld {
        /// Number of held forks.
        held: usize,
    },
}

impl fmt::Display for DinnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Table(e) => write!(f, "table: {e}"),
            Self::Pool(e) => write!(f, "fork pool: {e}"),
            Self::ResourceInit { agent, source } => {
                write!(f, "could not start worker for agent {agent}: {source}")
            }
            Self::Worker { agent, source } => write!(f, "agent {agent}: {source}"),
            Self::WorkerPanicked { agent } => write!(f, "agent {agent} panicked"),
            Self::ForksStillHeld { held } => {
                write!(f, "{held} fork(s) still held after all agents finished")
            }
        }
    }
}

impl Error for DinnerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Table(e) => Some(e),
            Self::Pool(e) => Some(e),
            Self::ResourceInit { source, .. } => Some(source),
            Self::Worker { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for DinnerError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<TableError> for DinnerError {
    fn from(e: TableError) -> Self {
        Self::Table(e)
    }
}

impl From<PoolError> for DinnerError {
    fn from(e: PoolError) -> Self {
        Self::Pool(e)
    }
}

// ── Dinner ────────────────────────────────────────────────────────

/// A validated dinner, ready to run.
#[derive(Clone, Debug)]
pub struct Dinner {
    config: DinnerConfig,
    ring: Ring,
}

impl Dinner {
    /// Validate `config`. Nothing is allocated if it is rejected.
    pub fn new(config: DinnerConfig) -> Result<Self, ConfigError> {
        let ring = config.ring()?;
        Ok(Self { config, ring })
    }

    /// The configuration this dinner was built from.
    pub fn config(&self) -> &DinnerConfig {
        &self.config
    }

    /// Seating topology.
    pub fn ring(&self) -> Ring {
        self.ring
    }

    /// Run every agent to completion.
    ///
    /// `observer` sees the initial table, every change, and (on success)
    /// the final table. Its callbacks run under the table lock.
    pub fn run(&self, observer: &dyn TableObserver) -> Result<DinnerReport, DinnerError> {
        let started = Instant::now();
        info!(
            agents = self.ring.len(),
            repetitions = self.config.repetitions,
            dawdle = ?self.config.dawdle,
            seed = self.config.seed,
            policy = %self.config.policy,
            "dinner starting"
        );

        let table = SharedTable::new(self.ring, self.config.repetitions, observer)?;
        table.announce_start()?;

        let agents = thread::scope(|s| self.spawn_and_join(s, &table))?;

        let held = table.pool().held_count()?;
        if held > 0 {
            error!(held, "forks still held after join");
            return Err(DinnerError::ForksStillHeld { held });
        }
        table.announce_finish()?;

        let report = DinnerReport {
            agents,
            elapsed: started.elapsed(),
            snapshots: table.published(),
        };
        info!(
            meals = report.total_meals(),
            snapshots = report.snapshots,
            elapsed = ?report.elapsed,
            interrupted = report.interrupted_delays(),
            "dinner finished"
        );
        Ok(report)
    }

    fn spawn_and_join<'scope, 'env>(
        &'env self,
        s: &'scope thread::Scope<'scope, 'env>,
        table: &'env SharedTable<'env>,
    ) -> Result<Vec<AgentReport>, DinnerError> {
        let mut handles = Vec::with_capacity(self.ring.len() as usize);
        let mut failure = None;

        for agent in self.ring.agents() {
            let worker = Worker::new(
                agent,
                self.config.policy,
                self.config.repetitions,
                table,
                Dawdle::for_agent(self.config.dawdle, self.config.seed, agent),
            );
            let spawned = thread::Builder::new()
                .name(format!("dine-agent-{agent}"))
                .spawn_scoped(s, move || worker.run());
            match spawned {
                Ok(handle) => handles.push((agent, handle)),
                Err(source) => {
                    error!(%agent, error = %source, "failed to spawn worker");
                    failure = Some(DinnerError::ResourceInit { agent, source });
                    break;
                }
            }
        }

        let mut reports = Vec::with_capacity(handles.len());
        for (agent, handle) in handles {
            match handle.join() {
                Ok(Ok(report)) => reports.push(report),
                Ok(Err(source)) => {
                    error!(%agent, error = %source, "worker failed");
                    failure.get_or_insert(DinnerError::Worker { agent, source });
                }
                Err(_) => {
                    error!(%agent, "worker panicked");
                    failure.get_or_insert(DinnerError::WorkerPanicked { agent });
                }
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(reports),
        }
    }
}
