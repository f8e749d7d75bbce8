//! Error types
//!
//! Both kinds are fatal: configuration errors are raised while building a
//! simulation, contract violations when a decision agent misbehaves.

use crate::moves::Move;
use crate::payoff::Payoffs;

/// Invalid simulation configuration, detected at construction time.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Payoffs do not satisfy temptation > reward > punishment > sucker.
    PayoffOrdering { payoffs: Payoffs },
    /// A payoff is NaN or infinite.
    NonFinitePayoff { payoffs: Payoffs },
    /// `rounds` must be at least 1.
    ZeroRounds,
    /// `participants` must be at least 1.
    ZeroParticipants,
    /// A tuning parameter is NaN or infinite.
    NonFiniteParameter { name: &'static str },
    /// The configuration document could not be parsed.
    Parse(String),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::PayoffOrdering { payoffs } => write!(
                f,
                "payoffs T={} R={} P={} S={} violate T > R > P > S",
                payoffs.temptation, payoffs.reward, payoffs.punishment, payoffs.sucker
            ),
            ConfigError::NonFinitePayoff { payoffs } => write!(
                f,
                "payoffs T={} R={} P={} S={} must all be finite",
                payoffs.temptation, payoffs.reward, payoffs.punishment, payoffs.sucker
            ),
            ConfigError::ZeroRounds => write!(f, "rounds must be positive"),
            ConfigError::ZeroParticipants => write!(f, "participants must be positive"),
            ConfigError::NonFiniteParameter { name } => write!(f, "{} must be finite", name),
            ConfigError::Parse(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A decision agent broke its contract with the simulation core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContractViolation {
    /// `choose` returned an option that was not among the candidates.
    ForeignOption { seat: usize },
    /// A similarity function was registered for an attribute the agent does not have.
    UnknownAttribute { name: String },
    /// `choose` was called with no candidates.
    EmptyCandidates,
    /// The candidates offered no option for a move the agent wanted to play.
    MissingMove { mv: Move },
}

impl core::fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ContractViolation::ForeignOption { seat } => {
                write!(f, "agent in seat {} chose an option outside the candidate set", seat)
            }
            ContractViolation::UnknownAttribute { name } => {
                write!(f, "similarity registered for unknown attribute {:?}", name)
            }
            ContractViolation::EmptyCandidates => write!(f, "no candidate options offered"),
            ContractViolation::MissingMove { mv } => {
                write!(f, "no candidate option offers move {}", mv)
            }
        }
    }
}

impl std::error::Error for ContractViolation {}

/// Any failure that aborts a simulation run
#[derive(Clone, Debug, PartialEq)]
pub enum SimError {
    Config(ConfigError),
    Contract(ContractViolation),
}

impl core::fmt::Display for SimError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SimError::Config(e) => write!(f, "configuration error: {}", e),
            SimError::Contract(e) => write!(f, "contract violation: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Config(e) => Some(e),
            SimError::Contract(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Config(e)
    }
}

impl From<ContractViolation> for SimError {
    fn from(e: ContractViolation) -> Self {
        SimError::Contract(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}
