//! Payoff matrix for two-move games

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::moves::Move;

/// The four canonical payoffs of a 2x2 symmetric game
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payoffs {
    /// Defect against a cooperator
    pub temptation: f64,
    /// Mutual cooperation
    pub reward: f64,
    /// Mutual defection
    pub punishment: f64,
    /// Cooperate against a defector
    pub sucker: f64,
}

impl Payoffs {
    pub fn new(temptation: f64, reward: f64, punishment: f64, sucker: f64) -> Self {
        Self { temptation, reward, punishment, sucker }
    }

    /// T > R > P > S
    pub fn is_dilemma(&self) -> bool {
        self.temptation > self.reward
            && self.reward > self.punishment
            && self.punishment > self.sucker
    }

    fn is_finite(&self) -> bool {
        [self.temptation, self.reward, self.punishment, self.sucker]
            .iter()
            .all(|v| v.is_finite())
    }
}

impl Default for Payoffs {
    fn default() -> Self {
        Self::new(2.0, 1.0, 0.0, -1.0)
    }
}

/// How strictly a payoff quadruple is checked when the matrix is built
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameClass {
    /// Must satisfy T > R > P > S
    #[default]
    Dilemma,
    /// Any finite payoffs are accepted
    Unvalidated,
}

/// Lookup table from (move_a, move_b) to (payoff_a, payoff_b)
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PayoffMatrix {
    table: [[(f64, f64); 2]; 2],
    payoffs: Payoffs,
    class: GameClass,
}

impl PayoffMatrix {
    /// Build the matrix, rejecting quadruples that don't fit `class`.
    pub fn from_payoffs(payoffs: Payoffs, class: GameClass) -> Result<Self, ConfigError> {
        if !payoffs.is_finite() {
            return Err(ConfigError::NonFinitePayoff { payoffs });
        }
        match class {
            GameClass::Dilemma if !payoffs.is_dilemma() => {
                return Err(ConfigError::PayoffOrdering { payoffs });
            }
            GameClass::Unvalidated if !payoffs.is_dilemma() => {
                log::warn!(
                    "payoff matrix T={} R={} P={} S={} is not a prisoner's dilemma",
                    payoffs.temptation,
                    payoffs.reward,
                    payoffs.punishment,
                    payoffs.sucker
                );
            }
            _ => {}
        }

        let Payoffs { temptation: t, reward: r, punishment: p, sucker: s } = payoffs;
        // rows: player A's move, columns: player B's move, D before C
        let table = [[(p, p), (t, s)], [(s, t), (r, r)]];
        Ok(Self { table, payoffs, class })
    }

    /// The classic T=5, R=3, P=1, S=0 tournament matrix
    pub fn standard() -> Self {
        Self {
            table: [[(1.0, 1.0), (5.0, 0.0)], [(0.0, 5.0), (3.0, 3.0)]],
            payoffs: Payoffs::new(5.0, 3.0, 1.0, 0.0),
            class: GameClass::Dilemma,
        }
    }

    /// Returns (payoff_a, payoff_b)
    pub fn payoffs_for(&self, a: Move, b: Move) -> (f64, f64) {
        self.table[a.index()][b.index()]
    }

    pub fn payoffs(&self) -> Payoffs {
        self.payoffs
    }

    pub fn class(&self) -> GameClass {
        self.class
    }
}
