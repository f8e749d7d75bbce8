//! Decision agent contract
//!
//! The simulation core never decides moves itself. Each player owns a
//! `DecisionAgent` and offers it one `CandidateOption` per legal move, each
//! carrying the player's current history snapshot. Agents are called in a
//! fixed order: `similarity` and `populate` once at construction, `reset`
//! at the start of every repetition, then `choose` and `respond` once per
//! round.

use serde::{Deserialize, Serialize};

use crate::error::ContractViolation;
use crate::history::Slot;
use crate::moves::Move;

/// Name of the move attribute, always first in an agent's attribute list
pub const MOVE_ATTRIBUTE: &str = "move";

/// A value held in one history attribute
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Move(Move),
    Payoff(f64),
}

/// Which history a block of attributes comes from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    OppMove,
    OwnMove,
    OppPayoff,
    OwnPayoff,
}

impl Role {
    fn prefix(self) -> &'static str {
        match self {
            Role::OppMove => "opp",
            Role::OwnMove => "own",
            Role::OppPayoff => "opp-payoff",
            Role::OwnPayoff => "own-payoff",
        }
    }
}

const MOVE_ROLES: [Role; 2] = [Role::OppMove, Role::OwnMove];
const ALL_ROLES: [Role; 4] = [
    Role::OppMove,
    Role::OwnMove,
    Role::OppPayoff,
    Role::OwnPayoff,
];

/// Layout of the history part of a candidate option's feature vector
///
/// Features are grouped by role, each role contributing `lag` slots
/// ordered newest first: `opp-1..opp-K`, `own-1..own-K`, and with payoff
/// tracking `opp-payoff-1..K`, `own-payoff-1..K`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub lag: usize,
    pub track_payoffs: bool,
}

impl Schema {
    pub fn new(lag: usize, track_payoffs: bool) -> Self {
        Self { lag, track_payoffs }
    }

    pub fn roles(&self) -> &'static [Role] {
        if self.track_payoffs {
            &ALL_ROLES
        } else {
            &MOVE_ROLES
        }
    }

    /// Number of history features per option
    pub fn width(&self) -> usize {
        self.roles().len() * self.lag
    }

    /// Feature index of `role` at 1-based `age` (1 = last round)
    pub fn index(&self, role: Role, age: usize) -> Option<usize> {
        if age == 0 || age > self.lag {
            return None;
        }
        let block = self.roles().iter().position(|r| *r == role)?;
        Some(block * self.lag + age - 1)
    }

    /// History attribute names, in feature order
    pub fn attribute_names(&self) -> Vec<String> {
        self.roles()
            .iter()
            .flat_map(|role| (1..=self.lag).map(move |i| format!("{}-{}", role.prefix(), i)))
            .collect()
    }
}

/// One legal move plus the chooser's history at decision time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateOption {
    pub mv: Move,
    pub features: Vec<Slot<Value>>,
}

impl CandidateOption {
    pub fn feature(&self, schema: &Schema, role: Role, age: usize) -> Slot<Value> {
        schema
            .index(role, age)
            .and_then(|i| self.features.get(i).copied())
            .unwrap_or(Slot::Unknown)
    }

    /// Move history for `role`, newest first; payoff slots read as unknown
    pub fn moves(&self, schema: &Schema, role: Role) -> Vec<Slot<Move>> {
        (1..=schema.lag)
            .map(|age| match self.feature(schema, role, age) {
                Slot::Known(Value::Move(m)) => Slot::Known(m),
                _ => Slot::Unknown,
            })
            .collect()
    }
}

/// Three-way similarity over history attributes
///
/// 1 for equal values, `none_match` when either side is unknown, 0 otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Similarity {
    pub none_match: f64,
}

impl Similarity {
    pub fn new(none_match: f64) -> Self {
        Self { none_match }
    }

    pub fn score(&self, x: &Slot<Value>, y: &Slot<Value>) -> f64 {
        if x == y {
            1.0
        } else if x.is_unknown() || y.is_unknown() {
            self.none_match
        } else {
            0.0
        }
    }
}

/// Registry of per-attribute similarity functions
///
/// Agents embed one to honour `DecisionAgent::similarity`.
#[derive(Clone, Debug)]
pub struct SimilarityTable {
    names: Vec<String>,
    functions: Vec<Option<Similarity>>,
}

impl SimilarityTable {
    pub fn new(names: Vec<String>) -> Self {
        let functions = vec![None; names.len()];
        Self { names, functions }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// All names are checked before any is registered.
    pub fn register(
        &mut self,
        attributes: &[String],
        similarity: Similarity,
    ) -> Result<(), ContractViolation> {
        let mut slots = Vec::with_capacity(attributes.len());
        for name in attributes {
            let i = self
                .names
                .iter()
                .position(|n| n == name)
                .ok_or_else(|| ContractViolation::UnknownAttribute { name: name.clone() })?;
            slots.push(i);
        }
        for i in slots {
            self.functions[i] = Some(similarity);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Similarity> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.functions[i])
    }
}

/// Construction parameters handed to agent factories
///
/// The tuning parameters are opaque to the core and passed through as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub seat: usize,
    pub schema: Schema,
    pub mismatch_penalty: f64,
    pub noise: f64,
    pub decay: f64,
    pub seed: u64,
}

impl AgentSpec {
    /// `move` followed by the history attributes
    pub fn attribute_names(&self) -> Vec<String> {
        std::iter::once(MOVE_ATTRIBUTE.to_string())
            .chain(self.schema.attribute_names())
            .collect()
    }
}

/// A stateful source of moves for one player
pub trait DecisionAgent {
    /// Register `similarity` for the given history attributes.
    fn similarity(
        &mut self,
        attributes: &[String],
        similarity: Similarity,
    ) -> Result<(), ContractViolation>;

    /// Seed prior expectations for `options`, `count` times.
    fn populate(&mut self, options: &[CandidateOption], count: u32);

    /// Start a new repetition. With `clear_history`, everything learned in
    /// earlier repetitions is forgotten; populated seeds are kept.
    fn reset(&mut self, clear_history: bool);

    /// Pick one of `options`. The returned option must equal one of them.
    fn choose(
        &mut self,
        options: &[CandidateOption],
    ) -> Result<CandidateOption, ContractViolation>;

    /// Payoff received for the option most recently chosen.
    fn respond(&mut self, payoff: f64);
}

impl<A: DecisionAgent + ?Sized> DecisionAgent for Box<A> {
    fn similarity(
        &mut self,
        attributes: &[String],
        similarity: Similarity,
    ) -> Result<(), ContractViolation> {
        (**self).similarity(attributes, similarity)
    }

    fn populate(&mut self, options: &[CandidateOption], count: u32) {
        (**self).populate(options, count)
    }

    fn reset(&mut self, clear_history: bool) {
        (**self).reset(clear_history)
    }

    fn choose(
        &mut self,
        options: &[CandidateOption],
    ) -> Result<CandidateOption, ContractViolation> {
        (**self).choose(options)
    }

    fn respond(&mut self, payoff: f64) {
        (**self).respond(payoff)
    }
}

/// Select the candidate whose move is `mv`
pub(crate) fn option_for(
    options: &[CandidateOption],
    mv: Move,
) -> Result<CandidateOption, ContractViolation> {
    if options.is_empty() {
        return Err(ContractViolation::EmptyCandidates);
    }
    options
        .iter()
        .find(|o| o.mv == mv)
        .cloned()
        .ok_or(ContractViolation::MissingMove { mv })
}

// ── Stubs ────────────────────────────────────────────────────────────

/// Always plays the same move. Records every payoff it is told about.
#[derive(Clone, Debug)]
pub struct FixedAgent {
    mv: Move,
    table: SimilarityTable,
    populated: u32,
    payoffs: Vec<f64>,
}

impl FixedAgent {
    pub fn new(spec: &AgentSpec, mv: Move) -> Self {
        Self {
            mv,
            table: SimilarityTable::new(spec.attribute_names()),
            populated: 0,
            payoffs: Vec::new(),
        }
    }

    pub fn payoffs(&self) -> &[f64] {
        &self.payoffs
    }

    pub fn populated(&self) -> u32 {
        self.populated
    }

    pub fn similarities(&self) -> &SimilarityTable {
        &self.table
    }
}

impl DecisionAgent for FixedAgent {
    fn similarity(
        &mut self,
        attributes: &[String],
        similarity: Similarity,
    ) -> Result<(), ContractViolation> {
        self.table.register(attributes, similarity)
    }

    fn populate(&mut self, _options: &[CandidateOption], count: u32) {
        self.populated += count;
    }

    fn reset(&mut self, clear_history: bool) {
        if clear_history {
            self.payoffs.clear();
        }
    }

    fn choose(
        &mut self,
        options: &[CandidateOption],
    ) -> Result<CandidateOption, ContractViolation> {
        option_for(options, self.mv)
    }

    fn respond(&mut self, payoff: f64) {
        self.payoffs.push(payoff);
    }
}

/// Plays a fixed script of moves, cycling, restarting on every reset
#[derive(Clone, Debug)]
pub struct ScriptedAgent {
    script: Vec<Move>,
    cursor: usize,
    table: SimilarityTable,
}

impl ScriptedAgent {
    /// An empty script plays `Cooperate`.
    pub fn new(spec: &AgentSpec, script: Vec<Move>) -> Self {
        Self {
            script,
            cursor: 0,
            table: SimilarityTable::new(spec.attribute_names()),
        }
    }
}

impl DecisionAgent for ScriptedAgent {
    fn similarity(
        &mut self,
        attributes: &[String],
        similarity: Similarity,
    ) -> Result<(), ContractViolation> {
        self.table.register(attributes, similarity)
    }

    fn populate(&mut self, _options: &[CandidateOption], _count: u32) {}

    fn reset(&mut self, _clear_history: bool) {
        self.cursor = 0;
    }

    fn choose(
        &mut self,
        options: &[CandidateOption],
    ) -> Result<CandidateOption, ContractViolation> {
        let mv = if self.script.is_empty() {
            Move::Cooperate
        } else {
            self.script[self.cursor % self.script.len()]
        };
        self.cursor += 1;
        option_for(options, mv)
    }

    fn respond(&mut self, _payoff: f64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(lag: usize, track_payoffs: bool) -> AgentSpec {
        AgentSpec {
            seat: 0,
            schema: Schema::new(lag, track_payoffs),
            mismatch_penalty: 1.0,
            noise: 0.0,
            decay: 0.5,
            seed: 7,
        }
    }

    fn options(features: Vec<Slot<Value>>) -> Vec<CandidateOption> {
        Move::ALL
            .iter()
            .map(|&mv| CandidateOption { mv, features: features.clone() })
            .collect()
    }

    #[test]
    fn test_attribute_names_order() {
        assert_eq!(
            spec(2, false).attribute_names(),
            vec!["move", "opp-1", "opp-2", "own-1", "own-2"]
        );
        assert_eq!(
            Schema::new(1, true).attribute_names(),
            vec!["opp-1", "own-1", "opp-payoff-1", "own-payoff-1"]
        );
        assert!(Schema::new(0, true).attribute_names().is_empty());
    }

    #[test]
    fn test_schema_index() {
        let s = Schema::new(3, true);
        assert_eq!(s.width(), 12);
        assert_eq!(s.index(Role::OppMove, 1), Some(0));
        assert_eq!(s.index(Role::OwnMove, 1), Some(3));
        assert_eq!(s.index(Role::OwnPayoff, 3), Some(11));
        assert_eq!(s.index(Role::OwnMove, 0), None);
        assert_eq!(s.index(Role::OwnMove, 4), None);
        assert_eq!(Schema::new(3, false).index(Role::OppPayoff, 1), None);
    }

    #[test]
    fn test_similarity_three_way() {
        let sim = Similarity::new(0.5);
        let c = Slot::Known(Value::Move(Move::Cooperate));
        let d = Slot::Known(Value::Move(Move::Defect));
        assert_eq!(sim.score(&c, &c), 1.0);
        assert_eq!(sim.score(&c, &d), 0.0);
        assert_eq!(sim.score(&c, &Slot::Unknown), 0.5);
        assert_eq!(sim.score(&Slot::Unknown, &d), 0.5);
        assert_eq!(sim.score(&Slot::Unknown, &Slot::Unknown), 1.0);
    }

    #[test]
    fn test_register_unknown_attribute_fails() {
        let mut table = SimilarityTable::new(spec(1, false).attribute_names());
        let err = table
            .register(&["opp-1".to_string(), "opp-9".to_string()], Similarity::new(0.5))
            .unwrap_err();
        assert_eq!(err, ContractViolation::UnknownAttribute { name: "opp-9".to_string() });
        // nothing registered on failure
        assert_eq!(table.get("opp-1"), None);
    }

    #[test]
    fn test_register_known_attributes() {
        let mut table = SimilarityTable::new(spec(1, false).attribute_names());
        table
            .register(&["opp-1".to_string(), "own-1".to_string()], Similarity::new(0.25))
            .unwrap();
        assert_eq!(table.get("own-1"), Some(Similarity::new(0.25)));
        assert_eq!(table.get(MOVE_ATTRIBUTE), None);
    }

    #[test]
    fn test_fixed_agent_picks_its_move() {
        let mut agent = FixedAgent::new(&spec(1, false), Move::Defect);
        let opts = options(vec![Slot::Unknown, Slot::Unknown]);
        assert_eq!(agent.choose(&opts).unwrap().mv, Move::Defect);
        assert_eq!(agent.choose(&[]), Err(ContractViolation::EmptyCandidates));
    }

    #[test]
    fn test_fixed_agent_reports_missing_move() {
        let mut agent = FixedAgent::new(&spec(1, false), Move::Defect);
        let only_cooperate = vec![CandidateOption {
            mv: Move::Cooperate,
            features: vec![Slot::Unknown, Slot::Unknown],
        }];
        assert_eq!(
            agent.choose(&only_cooperate),
            Err(ContractViolation::MissingMove { mv: Move::Defect })
        );
    }

    #[test]
    fn test_fixed_agent_reset_clears_payoffs() {
        let mut agent = FixedAgent::new(&spec(1, false), Move::Cooperate);
        agent.respond(1.0);
        agent.reset(false);
        assert_eq!(agent.payoffs(), &[1.0]);
        agent.reset(true);
        assert!(agent.payoffs().is_empty());
    }

    #[test]
    fn test_scripted_agent_cycles_and_restarts() {
        let mut agent = ScriptedAgent::new(&spec(0, false), vec![Move::Cooperate, Move::Defect]);
        let opts = options(vec![]);
        let picks: Vec<Move> = (0..3).map(|_| agent.choose(&opts).unwrap().mv).collect();
        assert_eq!(picks, vec![Move::Cooperate, Move::Defect, Move::Cooperate]);
        agent.reset(true);
        assert_eq!(agent.choose(&opts).unwrap().mv, Move::Cooperate);
    }

    #[test]
    fn test_option_moves_view() {
        let s = Schema::new(2, false);
        let opt = CandidateOption {
            mv: Move::Cooperate,
            features: vec![
                Slot::Known(Value::Move(Move::Defect)),
                Slot::Unknown,
                Slot::Known(Value::Move(Move::Cooperate)),
                Slot::Unknown,
            ],
        };
        assert_eq!(opt.moves(&s, Role::OppMove), vec![Slot::Known(Move::Defect), Slot::Unknown]);
        assert_eq!(opt.moves(&s, Role::OwnMove), vec![Slot::Known(Move::Cooperate), Slot::Unknown]);
    }
}
