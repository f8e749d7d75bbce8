//! A seated player: one decision agent plus its history windows

use crate::agent::{AgentSpec, CandidateOption, DecisionAgent, Schema, Similarity, Value};
use crate::error::ContractViolation;
use crate::history::{HistoryWindow, Slot};
use crate::moves::Move;

#[derive(Clone, Debug)]
struct PayoffWindows {
    opp: HistoryWindow<f64>,
    own: HistoryWindow<f64>,
}

/// One side of the game
///
/// All mutable player state lives in the windows and the owned agent.
#[derive(Clone, Debug)]
pub struct Player<A> {
    seat: usize,
    agent: A,
    schema: Schema,
    opp_moves: HistoryWindow<Move>,
    own_moves: HistoryWindow<Move>,
    payoffs: Option<PayoffWindows>,
}

impl<A: DecisionAgent> Player<A> {
    /// Wire up `agent`: register the similarity rule for every history
    /// attribute, then seed it with `prepopulated` copies of the opening options.
    pub fn new(
        spec: &AgentSpec,
        mut agent: A,
        similarity: Similarity,
        prepopulated: u32,
    ) -> Result<Self, ContractViolation> {
        let schema = spec.schema;
        agent.similarity(&schema.attribute_names(), similarity)?;

        let mut player = Self {
            seat: spec.seat,
            agent,
            schema,
            opp_moves: HistoryWindow::new(schema.lag),
            own_moves: HistoryWindow::new(schema.lag),
            payoffs: schema.track_payoffs.then(|| PayoffWindows {
                opp: HistoryWindow::new(schema.lag),
                own: HistoryWindow::new(schema.lag),
            }),
        };
        player.reset_for_new_repetition();
        let options = player.candidates();
        player.agent.populate(&options, prepopulated);
        Ok(player)
    }

    pub fn seat(&self) -> usize {
        self.seat
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Current feature vector, in schema order
    fn features(&self) -> Vec<Slot<Value>> {
        let mut features = Vec::with_capacity(self.schema.width());
        features.extend(self.opp_moves.snapshot().into_iter().map(|s| s.map(Value::Move)));
        features.extend(self.own_moves.snapshot().into_iter().map(|s| s.map(Value::Move)));
        if let Some(p) = &self.payoffs {
            features.extend(p.opp.snapshot().into_iter().map(|s| s.map(Value::Payoff)));
            features.extend(p.own.snapshot().into_iter().map(|s| s.map(Value::Payoff)));
        }
        features
    }

    /// One option per legal move, each carrying the current history
    pub fn candidates(&self) -> Vec<CandidateOption> {
        let features = self.features();
        Move::ALL
            .iter()
            .map(|&mv| CandidateOption { mv, features: features.clone() })
            .collect()
    }

    /// Ask the agent for a move and remember it as our own.
    pub fn choose(&mut self) -> Result<Move, ContractViolation> {
        let options = self.candidates();
        let chosen = self.agent.choose(&options)?;
        if !options.contains(&chosen) {
            return Err(ContractViolation::ForeignOption { seat: self.seat });
        }
        self.own_moves.push(chosen.mv);
        Ok(chosen.mv)
    }

    /// Record what the opponent did and pay the agent for its last choice.
    pub fn observe(&mut self, opponent_move: Move, own_payoff: f64, opponent_payoff: Option<f64>) {
        self.opp_moves.push(opponent_move);
        if let Some(p) = &mut self.payoffs {
            p.own.push(own_payoff);
            p.opp.push_slot(opponent_payoff.map_or(Slot::Unknown, Slot::Known));
        }
        self.agent.respond(own_payoff);
    }

    pub fn reset_for_new_repetition(&mut self) {
        self.opp_moves.reset();
        self.own_moves.reset();
        if let Some(p) = &mut self.payoffs {
            p.opp.reset();
            p.own.reset();
        }
        self.agent.reset(true);
    }
}
