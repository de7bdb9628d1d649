//! Moves as values.
//!
//! An [`Action`] names who moves, which piece, and where it goes. Applying it
//! never touches the state it was applied to.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{GameState, InvalidConstruction, Piece, Player, Position, RuleViolation, Size};

/// A move in the game.
///
/// The moved piece always belongs to the acting player, so the piece that
/// lands keeps the owner and size of the piece that was lifted.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Place a piece from reserves onto the board.
    Place {
        player: Player,
        size: Size,
        to: Position,
    },
    /// Move a visible piece from one position to another on the board.
    Slide {
        player: Player,
        size: Size,
        from: Position,
        to: Position,
    },
}

impl Action {
    /// Build an action moving `piece` to `to` on behalf of `player`.
    ///
    /// Fails if `player` does not own the piece.
    pub fn new(player: Player, piece: Piece, to: Position) -> Result<Action, InvalidConstruction> {
        if piece.owner() != player {
            return Err(InvalidConstruction::ForeignPiece { player, piece });
        }
        Ok(Action::moving(piece, to))
    }

    /// Build an action moving `piece` to `to` on behalf of its owner.
    pub fn moving(piece: Piece, to: Position) -> Action {
        let (player, size) = (piece.owner(), piece.size());
        match piece.position() {
            None => Action::Place { player, size, to },
            Some(from) => Action::Slide {
                player,
                size,
                from,
                to,
            },
        }
    }

    #[inline]
    pub fn player(&self) -> Player {
        match *self {
            Action::Place { player, .. } | Action::Slide { player, .. } => player,
        }
    }

    #[inline]
    pub fn size(&self) -> Size {
        match *self {
            Action::Place { size, .. } | Action::Slide { size, .. } => size,
        }
    }

    /// Where the piece starts, or `None` for a reserve placement.
    #[inline]
    pub fn origin(&self) -> Option<Position> {
        match *self {
            Action::Place { .. } => None,
            Action::Slide { from, .. } => Some(from),
        }
    }

    /// Get the destination position of the action.
    #[inline]
    pub fn to(&self) -> Position {
        match *self {
            Action::Place { to, .. } | Action::Slide { to, .. } => to,
        }
    }

    /// The piece as it must be found before the move.
    pub fn source(&self) -> Piece {
        Piece::new(self.player(), self.size(), self.origin())
    }

    /// The piece as it stands after the move.
    pub fn destination(&self) -> Piece {
        Piece::placed(self.player(), self.size(), self.to())
    }

    /// Play this action on a copy of the state's board.
    ///
    /// Returns the successor state with the turn passed on. Fails if the
    /// source piece is not where the action says, or if the destination is
    /// held by an equal or larger piece; `state` is unchanged either way.
    #[instrument(level = "debug", skip_all, fields(action = %self))]
    pub fn apply(&self, state: &GameState) -> Result<GameState, RuleViolation> {
        let mut board = state.board().clone();
        board.remove_piece(self.source())?;
        board.add_piece(self.destination())?;
        Ok(GameState::new(
            board,
            state.max_player(),
            state.min_player(),
            state.player_for_next_turn(),
        ))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin() {
            Some(from) => write!(f, "{}: {} {} -> {}", self.player(), self.size(), from, self.to()),
            None => write!(f, "{}: {} reserve -> {}", self.player(), self.size(), self.to()),
        }
    }
}
