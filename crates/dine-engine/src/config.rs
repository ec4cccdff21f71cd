//! Dinner configuration, validation, and error types.
//!
//! [`DinnerConfig`] is the input for [`Dinner::new`](crate::Dinner::new).
//! [`validate()`](DinnerConfig::validate) checks every parameter before
//! any fork or thread exists, so a bad configuration allocates nothing.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use dine_core::{Ring, TopologyError};

use crate::policy::{AcquisitionPolicy, PolicyError};

// ── Defaults ──────────────────────────────────────────────────────

/// Default table size.
pub const DEFAULT_AGENTS: u32 = 5;

/// Default number of think/eat cycles per agent.
pub const DEFAULT_REPETITIONS: u32 = 1;

/// Default upper bound on each randomized pause.
pub const DEFAULT_DAWDLE: Duration = Duration::from_millis(1000);

// ── DinnerConfig ──────────────────────────────────────────────────

/// Everything needed to run one dinner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DinnerConfig {
    /// Number of agents (and forks). Must be in `2..=Ring::MAX_AGENTS`.
    pub agents: u32,
    /// Think/eat cycles each agent runs. Must be at least 1.
    pub repetitions: u32,
    /// Upper bound on each pause. Pauses are drawn uniformly from
    /// `[0, dawdle)`; zero disables pausing.
    pub dawdle: Duration,
    /// Seed for the per-agent pause generators.
    pub seed: u64,
    /// Fork acquisition order.
    pub policy: AcquisitionPolicy,
}

impl Default for DinnerConfig {
    fn default() -> Self {
        Self {
            agents: DEFAULT_AGENTS,
            repetitions: DEFAULT_REPETITIONS,
            dawdle: DEFAULT_DAWDLE,
            seed: 0,
            policy: AcquisitionPolicy::default(),
        }
    }
}

impl DinnerConfig {
    /// Configuration with `repetitions` cycles and defaults elsewhere.
    pub fn with_repetitions(repetitions: u32) -> Self {
        Self {
            repetitions,
            ..Self::default()
        }
    }

    /// Parse a repetition count from user text.
    ///
    /// Surrounding whitespace is ignored. Text that is not an integer is
    /// [`ConfigError::NotANumber`]; an integer below 1 or beyond `u32` is
    /// [`ConfigError::InvalidRepetitions`].
    pub fn parse_repetitions(raw: &str) -> Result<u32, ConfigError> {
        let value: i64 = raw.trim().parse().map_err(|_| ConfigError::NotANumber {
            input: raw.to_string(),
        })?;
        if value < 1 {
            return Err(ConfigError::InvalidRepetitions { value });
        }
        u32::try_from(value).map_err(|_| ConfigError::InvalidRepetitions { value })
    }

    /// Check every parameter.
    ///
    /// Checks, in order: repetitions, table size, pause bound, then that
    /// the acquisition policy cannot deadlock at this table size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ring().map(|_| ())
    }

    /// Validate and return the seating ring.
    pub fn ring(&self) -> Result<Ring, ConfigError> {
        if self.repetitions == 0 {
            return Err(ConfigError::InvalidRepetitions { value: 0 });
        }
        let ring = Ring::new(self.agents)?;
        if u64::try_from(self.dawdle.as_nanos()).is_err() {
            return Err(ConfigError::DawdleTooLong {
                dawdle: self.dawdle,
            });
        }
        self.policy.verify(&ring)?;
        Ok(ring)
    }
}

// ── ConfigError ───────────────────────────────────────────────────

/// Errors detected during configuration validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The repetition count is below 1 or does not fit.
    InvalidRepetitions {
        /// The value given.
        value: i64,
    },
    /// The repetition count is not an integer.
    NotANumber {
        /// The text given.
        input: String,
    },
    /// The table size is out of range.
    Topology(TopologyError),
    /// The pause bound does not fit in 64 bits of nanoseconds.
    DawdleTooLong {
        /// The bound given.
        dawdle: Duration,
    },
    /// The acquisition policy admits a circular wait.
    Policy(PolicyError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRepetitions { value } => write!(
                f,
                "expected a positive number of repetitions, got {value}"
            ),
            Self::NotANumber { input } => write!(
                f,
                "expected a number of repetitions, got '{input}'"
            ),
            Self::Topology(e) => write!(f, "table: {e}"),
            Self::DawdleTooLong { dawdle } => {
                write!(f, "dawdle bound {dawdle:?} is too long")
            }
            Self::Policy(e) => write!(f, "policy: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Topology(e) => Some(e),
            Self::Policy(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TopologyError> for ConfigError {
    fn from(e: TopologyError) -> Self {
        Self::Topology(e)
    }
}

impl From<PolicyError> for ConfigError {
    fn from(e: PolicyError) -> Self {
        Self::Policy(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = DinnerConfig::default();
        assert_eq!(config.agents, 5);
        assert_eq!(config.repetitions, 1);
        assert_eq!(config.dawdle, Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_accepts_positive_integers() {
        assert_eq!(DinnerConfig::parse_repetitions("1"), Ok(1));
        assert_eq!(DinnerConfig::parse_repetitions(" 42 "), Ok(42));
    }

    #[test]
    fn parse_rejects_zero_and_negatives() {
        assert_eq!(
            DinnerConfig::parse_repetitions("0"),
            Err(ConfigError::InvalidRepetitions { value: 0 })
        );
        assert_eq!(
            DinnerConfig::parse_repetitions("-3"),
            Err(ConfigError::InvalidRepetitions { value: -3 })
        );
    }

    #[test]
    fn parse_rejects_non_numbers() {
        for raw in ["abc", "", "1.5", "3x"] {
            assert!(
                matches!(
                    DinnerConfig::parse_repetitions(raw),
                    Err(ConfigError::NotANumber { .. })
                ),
                "{raw:?} should not parse"
            );
        }
    }

    #[test]
    fn parse_rejects_values_beyond_u32() {
        let too_big = (u32::MAX as i64 + 1).to_string();
        assert!(matches!(
            DinnerConfig::parse_repetitions(&too_big),
            Err(ConfigError::InvalidRepetitions { .. })
        ));
    }

    #[test]
    fn zero_repetitions_rejected() {
        let config = DinnerConfig::with_repetitions(0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidRepetitions { value: 0 })
        );
    }

    #[test]
    fn single_agent_rejected() {
        let config = DinnerConfig {
            agents: 1,
            ..DinnerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Topology(TopologyError::TooFewAgents { len: 1 }))
        ));
    }

    #[test]
    fn huge_dawdle_rejected() {
        let config = DinnerConfig {
            dawdle: Duration::MAX,
            ..DinnerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DawdleTooLong { .. })
        ));
    }

    #[test]
    fn zero_dawdle_accepted() {
        let config = DinnerConfig {
            dawdle: Duration::ZERO,
            ..DinnerConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn ring_matches_agent_count() {
        let config = DinnerConfig {
            agents: 9,
            ..DinnerConfig::default()
        };
        assert_eq!(config.ring().unwrap().len(), 9);
    }

    #[test]
    fn error_messages_carry_the_input() {
        let msg = ConfigError::NotANumber {
            input: "abc".into(),
        }
        .to_string();
        assert!(msg.contains("abc"));
        let msg = ConfigError::InvalidRepetitions { value: -3 }.to_string();
        assert!(msg.contains("-3"));
    }
}
