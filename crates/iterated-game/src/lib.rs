//! Iterated Game Simulation
//!
//! Repeated two-player matrix games (an iterated Prisoner's Dilemma by
//! default) in which each player's move comes from a memory-based decision
//! agent conditioned on a bounded window of recent history.
//!
//! The decision engine itself is pluggable through [`DecisionAgent`];
//! this crate runs the rounds, applies payoffs, feeds outcomes back and
//! aggregates the results across repetitions.

mod agent;
mod config;
mod error;
mod game;
mod history;
mod moves;
mod payoff;
mod player;
mod random;
mod results;
mod simulation;
mod strategy;

pub use agent::{
    AgentSpec, CandidateOption, DecisionAgent, FixedAgent, Role, Schema, ScriptedAgent, Similarity,
    SimilarityTable, Value, MOVE_ATTRIBUTE,
};
pub use config::SimulationConfig;
pub use error::{ConfigError, ContractViolation, SimError};
pub use game::{GameLoop, Phase, RepetitionResult, RoundResult};
pub use history::{HistoryWindow, Slot};
pub use moves::Move;
pub use payoff::{GameClass, PayoffMatrix, Payoffs};
pub use player::Player;
pub use random::SeededRng;
pub use results::{RepetitionTotals, ResultsAggregator, RoundPayoffs};
pub use simulation::Simulation;
pub use strategy::{Strategy, StrategyAgent, StrategyBase, StrategyParams};
