//! Legal moves of the two-move matrix game

use serde::{Deserialize, Serialize};

/// A move in the Prisoner's Dilemma
///
/// Ordering matters: `Defect` is index 0 and `Cooperate` index 1 of the
/// payoff matrix, and candidate options are offered in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Move {
    Defect,
    Cooperate,
}

impl Move {
    /// Every legal move, in matrix index order
    pub const ALL: [Move; 2] = [Move::Defect, Move::Cooperate];

    /// The move counted by cooperation statistics
    pub const COOPERATIVE: Move = Move::Cooperate;

    /// Row/column index into the payoff matrix
    pub fn index(self) -> usize {
        match self {
            Move::Defect => 0,
            Move::Cooperate => 1,
        }
    }

    pub fn other(self) -> Move {
        match self {
            Move::Defect => Move::Cooperate,
            Move::Cooperate => Move::Defect,
        }
    }

    pub fn is_cooperative(self) -> bool {
        self == Self::COOPERATIVE
    }
}

impl core::fmt::Display for Move {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Move::Defect => write!(f, "D"),
            Move::Cooperate => write!(f, "C"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, m) in Move::ALL.iter().enumerate() {
            assert_eq!(m.index(), i);
        }
    }

    #[test]
    fn test_other_flips() {
        assert_eq!(Move::Defect.other(), Move::Cooperate);
        assert_eq!(Move::Cooperate.other(), Move::Defect);
    }

    #[test]
    fn test_display_letters() {
        assert_eq!(Move::Defect.to_string(), "D");
        assert_eq!(Move::Cooperate.to_string(), "C");
    }
}
