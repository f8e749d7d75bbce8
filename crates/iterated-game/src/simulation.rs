//! Runs every repetition of a configured simulation

use crate::agent::{AgentSpec, DecisionAgent};
use crate::config::SimulationConfig;
use crate::error::{ConfigError, SimError};
use crate::game::GameLoop;
use crate::payoff::PayoffMatrix;
use crate::player::Player;
use crate::results::ResultsAggregator;

/// A validated configuration ready to run
#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimulationConfig,
    matrix: PayoffMatrix,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let matrix = config.payoff_matrix()?;
        Ok(Self { config, matrix })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn matrix(&self) -> &PayoffMatrix {
        &self.matrix
    }

    /// Build both seats from `factory`, seeding agents for `repetition`
    pub fn seat_players<A, F>(
        &self,
        repetition: u32,
        factory: &F,
    ) -> Result<[Player<A>; 2], SimError>
    where
        A: DecisionAgent,
        F: Fn(&AgentSpec) -> A,
    {
        let seat = |i: usize| {
            let spec = self.config.agent_spec(i, repetition);
            let agent = factory(&spec);
            Player::new(&spec, agent, self.config.similarity(), self.config.prepopulated)
        };
        Ok([seat(0)?, seat(1)?])
    }

    /// Run all repetitions in order with one pair of players
    ///
    /// Players are built once and reset between repetitions, so agents
    /// keep their populated seeds across the whole run.
    pub fn run<A, F>(&self, factory: F) -> Result<ResultsAggregator, SimError>
    where
        A: DecisionAgent,
        F: Fn(&AgentSpec) -> A,
    {
        let players = self.seat_players(0, &factory)?;
        let mut game = GameLoop::new(players, self.matrix.clone(), self.config.rounds)?;
        let mut aggregator = ResultsAggregator::new();
        self.run_with(&mut game, &mut aggregator)?;
        Ok(aggregator)
    }

    /// Run all repetitions on an existing game loop, appending to `aggregator`
    pub fn run_with<A: DecisionAgent>(
        &self,
        game: &mut GameLoop<A>,
        aggregator: &mut ResultsAggregator,
    ) -> Result<(), SimError> {
        self.log_start("sequential");
        for repetition in 1..=self.config.participants {
            let result = game.run_repetition(repetition)?;
            aggregator.record_repetition(result);
        }
        self.log_finish(aggregator);
        Ok(())
    }

    /// Run repetitions on the rayon pool
    ///
    /// Every repetition gets fresh players from `factory`; finished
    /// repetitions are appended under a lock in completion order.
    #[cfg(feature = "parallel")]
    pub fn run_parallel<A, F>(&self, factory: F) -> Result<ResultsAggregator, SimError>
    where
        A: DecisionAgent,
        F: Fn(&AgentSpec) -> A + Sync,
    {
        use rayon::prelude::*;
        use std::sync::{Mutex, PoisonError};

        self.log_start("parallel");
        let sink = Mutex::new(ResultsAggregator::new());
        (1..=self.config.participants)
            .into_par_iter()
            .try_for_each(|repetition| -> Result<(), SimError> {
                let players = self.seat_players(repetition, &factory)?;
                let mut game = GameLoop::new(players, self.matrix.clone(), self.config.rounds)?;
                let result = game.run_repetition(repetition)?;
                sink.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .record_repetition(result);
                Ok(())
            })?;
        let aggregator = sink.into_inner().unwrap_or_else(PoisonError::into_inner);
        self.log_finish(&aggregator);
        Ok(aggregator)
    }

    fn log_start(&self, mode: &str) {
        let p = self.matrix.payoffs();
        log::info!(
            "simulating {} repetitions x {} rounds ({}), lag={} T={} R={} P={} S={}",
            self.config.participants,
            self.config.rounds,
            mode,
            self.config.lag,
            p.temptation,
            p.reward,
            p.punishment,
            p.sucker
        );
    }

    fn log_finish(&self, aggregator: &ResultsAggregator) {
        log::info!(
            "simulation finished: {} rounds recorded, cooperation {:.3}",
            aggregator.len(),
            aggregator.overall_cooperation_rate().unwrap_or(0.0)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::FixedAgent;
    use crate::moves::Move;
    use crate::strategy::{Strategy, StrategyAgent, StrategyBase};

    fn small() -> SimulationConfig {
        SimulationConfig {
            participants: 4,
            rounds: 6,
            lag: 2,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig { participants: 0, ..small() };
        assert!(matches!(Simulation::new(config), Err(ConfigError::ZeroParticipants)));
    }

    #[test]
    fn test_run_records_every_round() {
        let sim = Simulation::new(small()).unwrap();
        let agg = sim.run(|spec| FixedAgent::new(spec, Move::Cooperate)).unwrap();
        assert_eq!(agg.len(), 24);
        assert_eq!(agg.repetitions(), 4);
        assert!(agg.cooperation_rate_by_round().iter().all(|(_, rate)| *rate == 1.0));
    }

    #[test]
    fn test_run_is_deterministic_with_seeded_agents() {
        let sim = Simulation::new(SimulationConfig { seed: 9, ..small() }).unwrap();
        let factory =
            |spec: &AgentSpec| StrategyAgent::new(spec, Strategy::new(StrategyBase::Random));
        let first = sim.run(factory).unwrap();
        let second = sim.run(factory).unwrap();
        assert_eq!(first.results(), second.results());
    }

    #[test]
    fn test_seats_get_their_own_spec() {
        let sim = Simulation::new(small()).unwrap();
        let [a, b] = sim
            .seat_players(0, &|spec: &AgentSpec| FixedAgent::new(spec, Move::Defect))
            .unwrap();
        assert_eq!((a.seat(), b.seat()), (0, 1));
        assert_eq!(a.agent().populated(), 12);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential_statistics() {
        let sim = Simulation::new(small()).unwrap();
        let factory = |spec: &AgentSpec| {
            let base = if spec.seat == 0 {
                StrategyBase::TitForTat
            } else {
                StrategyBase::AlwaysDefect
            };
            StrategyAgent::new(spec, Strategy::new(base))
        };
        let sequential = sim.run(factory).unwrap();
        let parallel = sim.run_parallel(factory).unwrap();
        assert_eq!(parallel.len(), sequential.len());
        assert_eq!(parallel.cooperation_rate_by_round(), sequential.cooperation_rate_by_round());
    }
}
