//! Static positional evaluation.
//!
//! Each visible piece scores its cell's weight: positive for the
//! maximizing side, negative for the minimizing side. Covered pieces and
//! reserves score nothing.

use serde::{Deserialize, Serialize};

use crate::{Board, Position};

/// Geometric class of a cell on the 3×3 board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum CellClass {
    Center,
    /// Midpoint of a side: top, bottom, left or right.
    Edge,
    Corner,
}

impl CellClass {
    pub fn of(position: Position) -> CellClass {
        match (position.x == 1, position.y == 1) {
            (true, true) => CellClass::Center,
            (true, false) | (false, true) => CellClass::Edge,
            (false, false) => CellClass::Corner,
        }
    }
}

/// Weight of each cell class.
///
/// Missing fields fall back to the defaults when deserialized.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CellWeights {
    pub center: i32,
    pub edge: i32,
    pub corner: i32,
}

impl CellWeights {
    #[inline]
    pub fn weight(&self, class: CellClass) -> i32 {
        match class {
            CellClass::Center => self.center,
            CellClass::Edge => self.edge,
            CellClass::Corner => self.corner,
        }
    }
}

impl Default for CellWeights {
    fn default() -> Self {
        CellWeights {
            center: 4,
            edge: 2,
            corner: 3,
        }
    }
}

/// Positional evaluator over a board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Heuristic {
    weights: CellWeights,
}

impl Heuristic {
    pub const fn new(weights: CellWeights) -> Heuristic {
        Heuristic { weights }
    }

    pub fn weights(&self) -> &CellWeights {
        &self.weights
    }

    /// Score the board from the maximizing side's point of view.
    pub fn evaluate(&self, board: &Board) -> i32 {
        Position::all()
            .filter_map(|position| {
                let top = board.top_at(position)?;
                let weight = self.weights.weight(CellClass::of(position));
                Some(if top.owner().is_maximizing() { weight } else { -weight })
            })
            .sum()
    }
}

/// Score the board with the default weights.
pub fn evaluate(board: &Board) -> i32 {
    Heuristic::default().evaluate(board)
}
