//! Rules engine for a 3×3 stacking game played with nested "matroska" pieces.
//!
//! # Board Layout
//!
//! ```text
//! Positions are (x, y) = (column, row), enumerated row-major:
//!   (0,0) (1,0) (2,0)
//!   (0,1) (1,1) (2,1)
//!   (0,2) (1,2) (2,2)
//!
//! Each cell is a stack indexed by SIZE, not by stacking order:
//!   slot 0: Small piece  (covered by Medium or Large)
//!   slot 1: Medium piece (covered by Large)
//!   slot 2: Large piece
//! The top of a cell is its occupied slot with the largest index.
//! ```
//!
//! # Reserves
//!
//! ```text
//! Each side holds up to 2 pieces per size off the board.
//! A piece whose position is None lives in its owner's reserve.
//! ```
//!
//! The crate stops at the rules: a search driver consumes
//! [`GameState::possible_actions`] and [`GameState::utility`] from outside.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

pub mod action;
pub mod board;
pub mod error;
pub mod heuristic;
pub mod state;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use action::Action;
pub use board::Board;
pub use error::{Error, InvalidConstruction, RuleViolation};
pub use heuristic::{evaluate, CellClass, CellWeights, Heuristic};
pub use state::GameState;

/// Width and height of the board.
pub const BOARD_DIM: usize = 3;

/// Number of piece sizes.
pub const SIZE_COUNT: usize = 3;

/// Pieces of one size a side may hold in reserve.
pub const RESERVE_CAPACITY: usize = 2;

/// A participant in the game.
///
/// Equality and hashing look only at the identifier, so two handles for the
/// same seat compare equal even if built separately.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Player {
    id: u32,
    is_human: bool,
    is_maximizing: bool,
}

impl Player {
    /// Create a player.
    #[inline]
    pub const fn new(id: u32, is_human: bool, is_maximizing: bool) -> Player {
        Player {
            id,
            is_human,
            is_maximizing,
        }
    }

    #[inline]
    pub const fn id(self) -> u32 {
        self.id
    }

    #[inline]
    pub const fn is_human(self) -> bool {
        self.is_human
    }

    /// Whether this player's wins count as positive utility.
    #[inline]
    pub const fn is_maximizing(self) -> bool {
        self.is_maximizing
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = if self.is_maximizing { "max" } else { "min" };
        let kind = if self.is_human { "human" } else { "CPU" };
        write!(f, "P({}, {}, {})", self.id, role, kind)
    }
}

/// Piece size.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Size {
    Small = 0,
    Medium = 1,
    Large = 2,
}

impl Size {
    /// All sizes, smallest first.
    pub const ALL: [Size; SIZE_COUNT] = [Size::Small, Size::Medium, Size::Large];

    /// Check if this size can cover another size.
    #[inline]
    pub fn can_cover(self, other: Size) -> bool {
        (self as u8) > (other as u8)
    }

    /// Convert from index (0, 1, 2) to Size.
    #[inline]
    pub fn from_index(idx: usize) -> Option<Size> {
        match idx {
            0 => Some(Size::Small),
            1 => Some(Size::Medium),
            2 => Some(Size::Large),
            _ => None,
        }
    }

    /// Slot index of this size inside a cell stack.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<i64> for Size {
    type Error = InvalidConstruction;

    fn try_from(raw: i64) -> Result<Size, InvalidConstruction> {
        usize::try_from(raw)
            .ok()
            .and_then(Size::from_index)
            .ok_or(InvalidConstruction::SizeOutOfRange(raw))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Size::Small => "S",
            Size::Medium => "M",
            Size::Large => "L",
        };
        f.write_str(letter)
    }
}

/// A grid coordinate: `x` is the column, `y` the row.
///
/// Any pair can be built; only `0..BOARD_DIM` on both axes is on the board
/// (see [`Board::contains`]).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Position {
        Position { x, y }
    }

    /// Check if both coordinates fall inside the board.
    #[inline]
    pub fn is_on_board(self) -> bool {
        let dim = BOARD_DIM as i32;
        (0..dim).contains(&self.x) && (0..dim).contains(&self.y)
    }

    /// Iterate over all 9 positions in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        let dim = BOARD_DIM as i32;
        (0..dim).flat_map(move |y| (0..dim).map(move |x| Position::new(x, y)))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A matroska: an owned, sized piece, either on the board or in reserve.
///
/// Two pieces are equal when owner and size match. Position is ignored, and
/// so is physical identity: each side has two interchangeable pieces of every
/// size. Track pieces through the board, not by holding on to a `Piece`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Piece {
    owner: Player,
    size: Size,
    position: Option<Position>,
}

impl Piece {
    #[inline]
    pub const fn new(owner: Player, size: Size, position: Option<Position>) -> Piece {
        Piece {
            owner,
            size,
            position,
        }
    }

    /// A piece sitting in its owner's reserve.
    #[inline]
    pub const fn in_reserve(owner: Player, size: Size) -> Piece {
        Piece::new(owner, size, None)
    }

    /// A piece standing on the board at `position`.
    #[inline]
    pub const fn placed(owner: Player, size: Size, position: Position) -> Piece {
        Piece::new(owner, size, Some(position))
    }

    /// Build a piece from an unchecked integer size.
    pub fn from_raw(
        owner: Player,
        size: i64,
        position: Option<Position>,
    ) -> Result<Piece, InvalidConstruction> {
        Ok(Piece::new(owner, Size::try_from(size)?, position))
    }

    #[inline]
    pub const fn owner(&self) -> Player {
        self.owner
    }

    #[inline]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Where the piece stands, or `None` when it is in reserve.
    #[inline]
    pub const fn position(&self) -> Option<Position> {
        self.position
    }

    /// The same owner and size relocated to `position`.
    #[inline]
    pub const fn moved_to(self, position: Option<Position>) -> Piece {
        Piece::new(self.owner, self.size, position)
    }
}

impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.size == other.size
    }
}

impl Eq for Piece {}

impl Hash for Piece {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.size.hash(state);
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(pos) => write!(f, "M({}, {}, {})", self.owner, pos, self.size.index()),
            None => write!(f, "M({}, reserve, {})", self.owner, self.size.index()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const P1: Player = Player::new(1, true, true);
    const P2: Player = Player::new(2, false, false);

    #[test]
    fn test_player_equality_by_id() {
        let same_seat = Player::new(1, false, false);
        assert_eq!(P1, same_seat);
        assert_ne!(P1, P2);

        let mut seen = HashSet::new();
        seen.insert(P1);
        assert!(seen.contains(&same_seat));
    }

    #[test]
    fn test_player_display() {
        assert_eq!(P1.to_string(), "P(1, max, human)");
        assert_eq!(P2.to_string(), "P(2, min, CPU)");
    }

    #[test]
    fn test_size_can_cover() {
        assert!(!Size::Small.can_cover(Size::Small));
        assert!(!Size::Small.can_cover(Size::Medium));
        assert!(!Size::Small.can_cover(Size::Large));

        assert!(Size::Medium.can_cover(Size::Small));
        assert!(!Size::Medium.can_cover(Size::Medium));
        assert!(!Size::Medium.can_cover(Size::Large));

        assert!(Size::Large.can_cover(Size::Small));
        assert!(Size::Large.can_cover(Size::Medium));
        assert!(!Size::Large.can_cover(Size::Large));
    }

    #[test]
    fn test_size_try_from() {
        assert_eq!(Size::try_from(0_i64), Ok(Size::Small));
        assert_eq!(Size::try_from(2_i64), Ok(Size::Large));
        assert_eq!(Size::try_from(3_i64), Err(InvalidConstruction::SizeOutOfRange(3)));
        assert_eq!(Size::try_from(-1_i64), Err(InvalidConstruction::SizeOutOfRange(-1)));
    }

    #[test]
    fn test_position_bounds() {
        assert!(Position::new(0, 0).is_on_board());
        assert!(Position::new(2, 2).is_on_board());
        assert!(!Position::new(3, 0).is_on_board());
        assert!(!Position::new(0, 3).is_on_board());
        assert!(!Position::new(-1, 1).is_on_board());
    }

    #[test]
    fn test_position_all_row_major() {
        let all: Vec<Position> = Position::all().collect();
        assert_eq!(all.len(), 9);
        assert_eq!(all[0], Position::new(0, 0));
        assert_eq!(all[1], Position::new(1, 0));
        assert_eq!(all[3], Position::new(0, 1));
        assert_eq!(all[8], Position::new(2, 2));
    }

    #[test]
    fn test_piece_equality_ignores_position() {
        let a = Piece::placed(P1, Size::Medium, Position::new(0, 0));
        let b = Piece::in_reserve(P1, Size::Medium);
        let c = Piece::placed(P1, Size::Small, Position::new(0, 0));
        let d = Piece::placed(P2, Size::Medium, Position::new(0, 0));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_piece_from_raw() {
        let piece = Piece::from_raw(P1, 1, None).unwrap();
        assert_eq!(piece.size(), Size::Medium);
        assert_eq!(piece.position(), None);

        assert_eq!(
            Piece::from_raw(P1, 5, Some(Position::new(1, 1))).unwrap_err(),
            InvalidConstruction::SizeOutOfRange(5)
        );
    }

    #[test]
    fn test_piece_display() {
        let placed = Piece::placed(P2, Size::Large, Position::new(2, 1));
        assert_eq!(placed.to_string(), "M(P(2, min, CPU), (2, 1), 2)");
        assert_eq!(
            Piece::in_reserve(P1, Size::Small).to_string(),
            "M(P(1, max, human), reserve, 0)"
        );
    }
}
