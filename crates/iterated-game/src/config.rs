//! Simulation configuration

use serde::{Deserialize, Serialize};

use crate::agent::{AgentSpec, Schema, Similarity};
use crate::error::ConfigError;
use crate::payoff::{GameClass, PayoffMatrix, Payoffs};
use crate::random::derive_seed;

/// Every knob of a simulation run
///
/// Missing fields in a JSON document fall back to `Default`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// History window length (K). 0 disables history.
    pub lag: usize,
    pub mismatch_penalty: f64,
    pub noise: f64,
    pub decay: f64,
    /// Similarity of any value to an unknown slot
    pub none_match: f64,
    /// Seed count handed to `DecisionAgent::populate`
    pub prepopulated: u32,
    /// Number of repetitions (participant pairs)
    pub participants: u32,
    pub rounds: u32,
    pub payoffs: Payoffs,
    pub game_class: GameClass,
    /// Also keep own/opponent payoff windows
    pub track_payoffs: bool,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            lag: 10,
            mismatch_penalty: 1.0,
            noise: 0.25,
            decay: 0.75,
            none_match: 0.5,
            prepopulated: 12,
            participants: 200,
            rounds: 100,
            payoffs: Payoffs::new(2.0, 1.0, 0.0, -1.0),
            game_class: GameClass::Dilemma,
            track_payoffs: false,
            seed: 0,
        }
    }
}

impl SimulationConfig {
    /// Single-lag variant with a steeper dilemma
    pub fn alhazen() -> Self {
        Self {
            lag: 1,
            decay: 0.5,
            payoffs: Payoffs::new(10.0, 1.0, -1.0, -10.0),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds == 0 {
            return Err(ConfigError::ZeroRounds);
        }
        if self.participants == 0 {
            return Err(ConfigError::ZeroParticipants);
        }
        for (name, value) in [
            ("mismatch_penalty", self.mismatch_penalty),
            ("noise", self.noise),
            ("decay", self.decay),
            ("none_match", self.none_match),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteParameter { name });
            }
        }
        self.payoff_matrix().map(|_| ())
    }

    pub fn payoff_matrix(&self) -> Result<PayoffMatrix, ConfigError> {
        PayoffMatrix::from_payoffs(self.payoffs, self.game_class)
    }

    pub fn schema(&self) -> Schema {
        Schema::new(self.lag, self.track_payoffs)
    }

    pub fn similarity(&self) -> Similarity {
        Similarity::new(self.none_match)
    }

    /// Agent parameters for `seat`; `repetition` varies the seed
    pub fn agent_spec(&self, seat: usize, repetition: u32) -> AgentSpec {
        AgentSpec {
            seat,
            schema: self.schema(),
            mismatch_penalty: self.mismatch_penalty,
            noise: self.noise,
            decay: self.decay,
            seed: derive_seed(self.seed, repetition),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
        assert!(SimulationConfig::alhazen().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimulationConfig::from_json(r#"{"lag": 3, "rounds": 5}"#).unwrap();
        assert_eq!(config.lag, 3);
        assert_eq!(config.rounds, 5);
        assert_eq!(config.participants, 200);
        assert_eq!(config.payoffs, Payoffs::new(2.0, 1.0, 0.0, -1.0));
    }

    #[test]
    fn test_negative_lag_rejected() {
        let err = SimulationConfig::from_json(r#"{"lag": -1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_misspelled_key_rejected() {
        let err = SimulationConfig::from_json(r#"{"lags": 3}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(msg) if msg.contains("lags")));
    }

    #[test]
    fn test_zero_counts_rejected() {
        let rounds = SimulationConfig { rounds: 0, ..Default::default() };
        assert_eq!(rounds.validate(), Err(ConfigError::ZeroRounds));
        let participants = SimulationConfig { participants: 0, ..Default::default() };
        assert_eq!(participants.validate(), Err(ConfigError::ZeroParticipants));
    }

    #[test]
    fn test_bad_payoffs_rejected_from_json() {
        let json = r#"{"payoffs": {"temptation": 0, "reward": 1, "punishment": 2, "sucker": 3}}"#;
        assert!(matches!(
            SimulationConfig::from_json(json),
            Err(ConfigError::PayoffOrdering { .. })
        ));
    }

    #[test]
    fn test_unvalidated_class_from_json() {
        let json = r#"{"game_class": "Unvalidated",
                       "payoffs": {"temptation": 3, "reward": 4, "punishment": 1, "sucker": 0}}"#;
        let config = SimulationConfig::from_json(json).unwrap();
        assert_eq!(config.game_class, GameClass::Unvalidated);
    }

    #[test]
    fn test_agent_spec_carries_tuning() {
        let config = SimulationConfig { track_payoffs: true, ..SimulationConfig::alhazen() };
        let spec = config.agent_spec(1, 0);
        assert_eq!(spec.seat, 1);
        assert_eq!(spec.schema, Schema::new(1, true));
        assert_eq!(spec.decay, 0.5);
        assert_ne!(config.agent_spec(1, 1).seed, spec.seed);
    }
}
