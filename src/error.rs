//! Error types for rule breaches and malformed values.

use crate::{Piece, Player, Position, Size, RESERVE_CAPACITY};

/// A placement or removal that would break a board invariant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("reserve of {player} already holds {} pieces of size {size}", RESERVE_CAPACITY)]
    ReserveFull { player: Player, size: Size },
    #[error("reserve of {player} holds no piece of size {size}")]
    ReserveEmpty { player: Player, size: Size },
    #[error("position {0} out of board's range")]
    OutOfBounds(Position),
    #[error("position {position} occupied with {top}")]
    Occupied { position: Position, top: Piece },
    /// The piece named for removal is not the top occupant of its cell.
    #[error("{piece} is not on top at {position}")]
    NotPresent { piece: Piece, position: Position },
}

/// A value that cannot exist under the game's rules.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidConstruction {
    #[error("piece size {0} outside 0..=2")]
    SizeOutOfRange(i64),
    #[error("{player} cannot move {piece}")]
    ForeignPiece { player: Player, piece: Piece },
    #[error("{piece} cannot sit in slot {slot} at {position}")]
    MisplacedPiece {
        piece: Piece,
        position: Position,
        slot: Size,
    },
    #[error("{piece} cannot sit in reserve slot {slot}")]
    MisplacedReserve { piece: Piece, slot: Size },
    #[error("{max_player} and {min_player} do not hold opposite roles")]
    RoleMismatch { max_player: Player, min_player: Player },
    #[error("{0} is not seated in this game")]
    NotSeated(Player),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Rule(#[from] RuleViolation),
    #[error(transparent)]
    Construction(#[from] InvalidConstruction),
}
