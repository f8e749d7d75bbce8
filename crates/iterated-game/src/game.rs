//! Repetition execution engine

use serde::{Deserialize, Serialize};

use crate::agent::DecisionAgent;
use crate::error::{ConfigError, ContractViolation};
use crate::moves::Move;
use crate::payoff::PayoffMatrix;
use crate::player::Player;

/// Result of a single round
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub repetition: u32,
    pub round: u32,
    pub move_a: Move,
    pub move_b: Move,
    pub payoff_a: f64,
    pub payoff_b: f64,
}

impl RoundResult {
    /// How many of the two players cooperated
    pub fn cooperators(&self) -> u32 {
        self.move_a.is_cooperative() as u32 + self.move_b.is_cooperative() as u32
    }
}

/// Result of one complete repetition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepetitionResult {
    pub repetition: u32,
    pub rounds: Vec<RoundResult>,
    pub total_a: f64,
    pub total_b: f64,
}

/// Where a game loop is within its current repetition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Resetting,
    /// 1-based round currently being played
    Round(u32),
    Done,
}

/// Both players' moves for a round, committed before anyone observes
struct Simultaneous {
    moves: [Move; 2],
}

impl Simultaneous {
    fn commit<A: DecisionAgent>(players: &mut [Player<A>; 2]) -> Result<Self, ContractViolation> {
        let a = players[0].choose()?;
        let b = players[1].choose()?;
        Ok(Self { moves: [a, b] })
    }

    /// Each player learns the other's move and its own payoff.
    fn reveal<A: DecisionAgent>(self, players: &mut [Player<A>; 2], payoffs: (f64, f64)) {
        let [a, b] = self.moves;
        let (pay_a, pay_b) = payoffs;
        players[0].observe(b, pay_a, Some(pay_b));
        players[1].observe(a, pay_b, Some(pay_a));
    }
}

/// Plays repetitions between two seated players
#[derive(Clone, Debug)]
pub struct GameLoop<A> {
    players: [Player<A>; 2],
    matrix: PayoffMatrix,
    rounds: u32,
    phase: Phase,
}

impl<A: DecisionAgent> GameLoop<A> {
    pub fn new(
        players: [Player<A>; 2],
        matrix: PayoffMatrix,
        rounds: u32,
    ) -> Result<Self, ConfigError> {
        if rounds == 0 {
            return Err(ConfigError::ZeroRounds);
        }
        Ok(Self {
            players,
            matrix,
            rounds,
            phase: Phase::Idle,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn players(&self) -> &[Player<A>; 2] {
        &self.players
    }

    pub fn into_players(self) -> [Player<A>; 2] {
        self.players
    }

    /// Run a complete repetition
    ///
    /// Both players are reset, then exactly `rounds` rounds are played.
    /// Any agent failure aborts the repetition and leaves the phase at the
    /// failing round.
    pub fn run_repetition(
        &mut self,
        repetition: u32,
    ) -> Result<RepetitionResult, ContractViolation> {
        self.phase = Phase::Resetting;
        for player in &mut self.players {
            player.reset_for_new_repetition();
        }

        let mut rounds = Vec::with_capacity(self.rounds as usize);
        let mut total_a = 0.0;
        let mut total_b = 0.0;

        for round in 1..=self.rounds {
            self.phase = Phase::Round(round);
            let result = self.play_round(repetition, round)?;
            total_a += result.payoff_a;
            total_b += result.payoff_b;
            rounds.push(result);
        }
        self.phase = Phase::Done;

        log::debug!(
            "repetition {} finished: totals {:.3} / {:.3}",
            repetition,
            total_a,
            total_b
        );

        Ok(RepetitionResult {
            repetition,
            rounds,
            total_a,
            total_b,
        })
    }

    fn play_round(
        &mut self,
        repetition: u32,
        round: u32,
    ) -> Result<RoundResult, ContractViolation> {
        let choices = Simultaneous::commit(&mut self.players)?;
        let [move_a, move_b] = choices.moves;
        let (payoff_a, payoff_b) = self.matrix.payoffs_for(move_a, move_b);
        choices.reveal(&mut self.players, (payoff_a, payoff_b));

        log::trace!(
            "repetition {} round {}: {}{} -> ({}, {})",
            repetition,
            round,
            move_a,
            move_b,
            payoff_a,
            payoff_b
        );

        Ok(RoundResult {
            repetition,
            round,
            move_a,
            move_b,
            payoff_a,
            payoff_b,
        })
    }
}
