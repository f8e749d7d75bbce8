//! Classic strategies as decision agents
//!
//! These agents read the lag window carried by the candidate options, so
//! they only remember as far back as the configured lag. With lag 0 every
//! history-driven strategy sees an empty past.

use serde::{Deserialize, Serialize};

use crate::agent::{
    option_for, AgentSpec, CandidateOption, DecisionAgent, Role, Schema, Similarity,
    SimilarityTable,
};
use crate::error::ContractViolation;
use crate::history::Slot;
use crate::moves::Move;
use crate::random::SeededRng;

/// Base strategy type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyBase {
    /// Copy opponent's last move. Start with cooperate.
    TitForTat,
    /// Always defect, never cooperate.
    AlwaysDefect,
    /// Always cooperate, never defect.
    AlwaysCooperate,
    /// Cooperate until opponent defects, then always defect.
    GrimTrigger,
    /// Win-stay, lose-switch. Repeat move if opponent cooperated.
    Pavlov,
    /// Tit-for-Tat but start with defect.
    SuspiciousTitForTat,
    /// Random choice each round.
    Random,
    /// Defect only if opponent defected twice in a row.
    TitForTwoTats,
}

/// Strategy parameters for fine-tuning behavior
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyParams {
    /// Percentage chance to cooperate after opponent defects (0-100)
    pub forgiveness: u8,
    /// Number of defections in the window to ignore before triggering (GrimTrigger)
    pub noise_tolerance: u8,
    /// Bias toward cooperation for Random strategy (0-100)
    pub cooperate_bias: u8,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            forgiveness: 0,
            noise_tolerance: 0,
            cooperate_bias: 50,
        }
    }
}

/// Complete strategy with base type and parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    pub base: StrategyBase,
    pub params: StrategyParams,
}

impl Strategy {
    /// Create a new strategy with default parameters
    pub fn new(base: StrategyBase) -> Self {
        Self {
            base,
            params: StrategyParams::default(),
        }
    }

    /// Create with custom parameters
    pub fn with_params(base: StrategyBase, params: StrategyParams) -> Self {
        Self { base, params }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::new(StrategyBase::TitForTat)
    }
}

/// Runs a `Strategy` against the history window of each round's options
#[derive(Clone, Debug)]
pub struct StrategyAgent {
    strategy: Strategy,
    schema: Schema,
    rng: SeededRng,
    table: SimilarityTable,
    triggered: bool,
}

impl StrategyAgent {
    pub fn new(spec: &AgentSpec, strategy: Strategy) -> Self {
        Self {
            strategy,
            schema: spec.schema,
            rng: SeededRng::new(spec.seed, spec.seat as u64),
            table: SimilarityTable::new(spec.attribute_names()),
            triggered: false,
        }
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }
}

impl DecisionAgent for StrategyAgent {
    fn similarity(
        &mut self,
        attributes: &[String],
        similarity: Similarity,
    ) -> Result<(), ContractViolation> {
        self.table.register(attributes, similarity)
    }

    fn populate(&mut self, _options: &[CandidateOption], _count: u32) {}

    fn reset(&mut self, clear_history: bool) {
        if clear_history {
            self.triggered = false;
        }
    }

    fn choose(
        &mut self,
        options: &[CandidateOption],
    ) -> Result<CandidateOption, ContractViolation> {
        // every candidate carries the same history
        let first = options.first().ok_or(ContractViolation::EmptyCandidates)?;
        let opponent = first.moves(&self.schema, Role::OppMove);
        let own = first.moves(&self.schema, Role::OwnMove);
        let mv = self.execute(&opponent, &own);
        option_for(options, mv)
    }

    fn respond(&mut self, _payoff: f64) {}
}

impl StrategyAgent {
    /// Decide from newest-first move windows
    fn execute(&mut self, opponent: &[Slot<Move>], own: &[Slot<Move>]) -> Move {
        let params = self.strategy.params;
        match self.strategy.base {
            StrategyBase::TitForTat => {
                tit_for_tat(last(opponent), Move::Cooperate, &params, &mut self.rng)
            }
            StrategyBase::SuspiciousTitForTat => {
                tit_for_tat(last(opponent), Move::Defect, &params, &mut self.rng)
            }
            StrategyBase::AlwaysDefect => Move::Defect,
            StrategyBase::AlwaysCooperate => Move::Cooperate,
            StrategyBase::GrimTrigger => {
                let defections = opponent
                    .iter()
                    .filter(|s| **s == Slot::Known(Move::Defect))
                    .count();
                if defections > params.noise_tolerance as usize {
                    self.triggered = true;
                }
                if self.triggered {
                    Move::Defect
                } else {
                    Move::Cooperate
                }
            }
            StrategyBase::Pavlov => pavlov(last(opponent), last(own)),
            StrategyBase::Random => {
                if self.rng.next_percent() < params.cooperate_bias {
                    Move::Cooperate
                } else {
                    Move::Defect
                }
            }
            StrategyBase::TitForTwoTats => {
                let both_defected = opponent.len() >= 2
                    && opponent[..2].iter().all(|s| *s == Slot::Known(Move::Defect));
                if both_defected {
                    Move::Defect
                } else {
                    Move::Cooperate
                }
            }
        }
    }
}

fn last(window: &[Slot<Move>]) -> Option<Move> {
    window.first().and_then(|s| s.known().copied())
}

/// Copy the opponent's last move; `opening` when nothing is known
fn tit_for_tat(
    opponent_last: Option<Move>,
    opening: Move,
    params: &StrategyParams,
    rng: &mut SeededRng,
) -> Move {
    match opponent_last {
        None => opening,
        Some(Move::Cooperate) => Move::Cooperate,
        Some(Move::Defect) => {
            // Forgiveness: chance to cooperate anyway
            if params.forgiveness > 0 && rng.next_percent() < params.forgiveness {
                Move::Cooperate
            } else {
                Move::Defect
            }
        }
    }
}

/// Win-stay, lose-switch
///
/// In a dilemma the last round went well (T or R) exactly when the
/// opponent cooperated.
fn pavlov(opponent_last: Option<Move>, own_last: Option<Move>) -> Move {
    match (own_last, opponent_last) {
        (Some(mine), Some(Move::Cooperate)) => mine,
        (Some(mine), Some(Move::Defect)) => mine.other(),
        _ => Move::Cooperate,
    }
}
