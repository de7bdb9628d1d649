//! Board state: stacked cells plus each side's off-board reserve.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Error, InvalidConstruction, Piece, Player, Position, RuleViolation, Size, BOARD_DIM,
    RESERVE_CAPACITY, SIZE_COUNT,
};

type Stack = [Option<Piece>; SIZE_COUNT];

/// Authoritative spatial state of a game.
///
/// `grid[y][x][size]` holds the piece of that size stacked at `(x, y)`.
/// Reserves are kept per role, indexed by size. The board changes only
/// through [`Board::add_piece`] and [`Board::remove_piece`]; `clone()` is a
/// full deep copy since pieces are plain values.
///
/// Deserialized snapshots are replayed through [`Board::add_piece`], so a
/// snapshot that breaks the stacking or reserve rules is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardData")]
pub struct Board {
    grid: [[Stack; BOARD_DIM]; BOARD_DIM],
    max_reserve: [Vec<Piece>; SIZE_COUNT],
    min_reserve: [Vec<Piece>; SIZE_COUNT],
}

/// Unchecked wire form of [`Board`].
#[derive(Deserialize)]
struct BoardData {
    grid: [[Stack; BOARD_DIM]; BOARD_DIM],
    max_reserve: [Vec<Piece>; SIZE_COUNT],
    min_reserve: [Vec<Piece>; SIZE_COUNT],
}

impl TryFrom<BoardData> for Board {
    type Error = Error;

    fn try_from(data: BoardData) -> Result<Self, Self::Error> {
        let mut board = Board::new();

        for position in Position::all() {
            let stack = &data.grid[position.y as usize][position.x as usize];
            // Ascending slots, so every piece covers the one below
            for (slot, piece) in Size::ALL.into_iter().zip(stack) {
                let Some(piece) = *piece else { continue };
                if piece.size() != slot || piece.position() != Some(position) {
                    return Err(InvalidConstruction::MisplacedPiece {
                        piece,
                        position,
                        slot,
                    }
                    .into());
                }
                board.add_piece(piece)?;
            }
        }

        for (reserves, maximizing) in [(&data.max_reserve, true), (&data.min_reserve, false)] {
            for (slot, pieces) in Size::ALL.into_iter().zip(reserves) {
                for &piece in pieces {
                    if piece.size() != slot
                        || piece.position().is_some()
                        || piece.owner().is_maximizing() != maximizing
                    {
                        return Err(InvalidConstruction::MisplacedReserve { piece, slot }.into());
                    }
                    board.add_piece(piece)?;
                }
            }
        }

        Ok(board)
    }
}

/// Log and pass through a rule violation.
fn violation(err: RuleViolation) -> RuleViolation {
    debug!(%err, "rule violation");
    err
}

impl Board {
    /// The 8 winning lines in scan order: rows, columns, descending diagonal,
    /// ascending diagonal.
    const WIN_LINES: [[Position; 3]; 8] = [
        [Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)], // Row 0
        [Position::new(0, 1), Position::new(1, 1), Position::new(2, 1)], // Row 1
        [Position::new(0, 2), Position::new(1, 2), Position::new(2, 2)], // Row 2
        [Position::new(0, 0), Position::new(0, 1), Position::new(0, 2)], // Col 0
        [Position::new(1, 0), Position::new(1, 1), Position::new(1, 2)], // Col 1
        [Position::new(2, 0), Position::new(2, 1), Position::new(2, 2)], // Col 2
        [Position::new(0, 0), Position::new(1, 1), Position::new(2, 2)], // Descending
        [Position::new(0, 2), Position::new(1, 1), Position::new(2, 0)], // Ascending
    ];

    /// Create an empty board with empty reserves.
    pub fn new() -> Board {
        Board {
            grid: [[[None; SIZE_COUNT]; BOARD_DIM]; BOARD_DIM],
            max_reserve: Default::default(),
            min_reserve: Default::default(),
        }
    }

    /// Create the starting board: empty grid, every reserve full.
    pub fn with_full_reserves(max_player: Player, min_player: Player) -> Board {
        let mut board = Board::new();
        for size in Size::ALL {
            for _ in 0..RESERVE_CAPACITY {
                board.max_reserve[size.index()].push(Piece::in_reserve(max_player, size));
                board.min_reserve[size.index()].push(Piece::in_reserve(min_player, size));
            }
        }
        board
    }

    /// Check that `position` lies on the board.
    #[inline]
    pub fn contains(&self, position: Position) -> bool {
        position.is_on_board()
    }

    /// The whole stack at a position, slot 0 (small) to slot 2 (large).
    pub fn at(&self, position: Position) -> Option<&[Option<Piece>; SIZE_COUNT]> {
        if !self.contains(position) {
            return None;
        }
        Some(&self.grid[position.y as usize][position.x as usize])
    }

    fn stack_mut(&mut self, position: Position) -> &mut Stack {
        &mut self.grid[position.y as usize][position.x as usize]
    }

    /// Get the top (visible) piece at a position.
    /// Returns None if the cell is empty or off the board.
    pub fn top_at(&self, position: Position) -> Option<Piece> {
        self.at(position)?.iter().rev().find_map(|slot| *slot)
    }

    /// Check if a piece of the given size can be placed at this position.
    /// A piece can be placed if the cell is empty or the top piece is smaller.
    #[inline]
    pub fn can_place(&self, size: Size, position: Position) -> bool {
        if !self.contains(position) {
            return false;
        }
        match self.top_at(position) {
            None => true,
            Some(top) => size.can_cover(top.size()),
        }
    }

    fn reserves(&self, player: Player) -> &[Vec<Piece>; SIZE_COUNT] {
        if player.is_maximizing() {
            &self.max_reserve
        } else {
            &self.min_reserve
        }
    }

    fn reserves_mut(&mut self, player: Player) -> &mut [Vec<Piece>; SIZE_COUNT] {
        if player.is_maximizing() {
            &mut self.max_reserve
        } else {
            &mut self.min_reserve
        }
    }

    /// Pieces of one size waiting in a player's reserve.
    pub fn reserve(&self, player: Player, size: Size) -> &[Piece] {
        &self.reserves(player)[size.index()]
    }

    /// Every piece held by the board: stacks in row-major order, small to
    /// large, then both reserves.
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        let placed = self.grid.iter().flatten().flatten().flatten().copied();
        let held = self.max_reserve.iter().chain(&self.min_reserve).flatten().copied();
        placed.chain(held)
    }

    /// Reserve counts for a player as [small, medium, large].
    pub fn reserve_counts(&self, player: Player) -> [usize; SIZE_COUNT] {
        let reserves = self.reserves(player);
        [reserves[0].len(), reserves[1].len(), reserves[2].len()]
    }

    // ========== Placement & Removal ==========

    /// Add a piece to the board, or to its owner's reserve when it has no
    /// position.
    ///
    /// On error the board is left untouched.
    pub fn add_piece(&mut self, piece: Piece) -> Result<(), RuleViolation> {
        let size = piece.size();
        let Some(position) = piece.position() else {
            let owner = piece.owner();
            let reserve = &mut self.reserves_mut(owner)[size.index()];
            if reserve.len() >= RESERVE_CAPACITY {
                return Err(violation(RuleViolation::ReserveFull {
                    player: owner,
                    size,
                }));
            }
            reserve.push(piece);
            return Ok(());
        };

        if !self.contains(position) {
            return Err(violation(RuleViolation::OutOfBounds(position)));
        }
        match self.top_at(position) {
            Some(top) if !size.can_cover(top.size()) => {
                Err(violation(RuleViolation::Occupied { position, top }))
            }
            _ => {
                self.stack_mut(position)[size.index()] = Some(piece);
                Ok(())
            }
        }
    }

    /// Remove a piece from its owner's reserve, or from the top of the cell at
    /// its position.
    ///
    /// The removed piece must equal `piece` (same owner and size): the most
    /// recently reserved match, or the top occupant of its cell. Returns the
    /// piece that was taken off.
    pub fn remove_piece(&mut self, piece: Piece) -> Result<Piece, RuleViolation> {
        let Some(position) = piece.position() else {
            let (player, size) = (piece.owner(), piece.size());
            let reserve = &mut self.reserves_mut(player)[size.index()];
            let Some(index) = reserve.iter().rposition(|held| *held == piece) else {
                return Err(violation(RuleViolation::ReserveEmpty { player, size }));
            };
            return Ok(reserve.remove(index));
        };

        if !self.contains(position) {
            return Err(violation(RuleViolation::OutOfBounds(position)));
        }
        match self.top_at(position) {
            Some(top) if top == piece => {
                self.pop_top(position);
                Ok(top)
            }
            _ => Err(violation(RuleViolation::NotPresent { piece, position })),
        }
    }

    /// Clear the largest occupied slot at a position.
    fn pop_top(&mut self, position: Position) -> Option<Piece> {
        self.stack_mut(position)
            .iter_mut()
            .rev()
            .find(|slot| slot.is_some())
            .and_then(Option::take)
    }

    // ========== Win Detection ==========

    /// Owner shared by all three top pieces of a line, if the line is full.
    fn line_owner(&self, line: &[Position; 3]) -> Option<Player> {
        let owner = self.top_at(line[0])?.owner();
        for &position in &line[1..] {
            if self.top_at(position)?.owner() != owner {
                return None;
            }
        }
        Some(owner)
    }

    /// Get the first completed line and which of the two players owns it.
    pub fn winning_line(
        &self,
        max_player: Player,
        min_player: Player,
    ) -> Option<(Player, [Position; 3])> {
        Self::WIN_LINES.iter().find_map(|line| {
            let owner = self.line_owner(line)?;
            [max_player, min_player]
                .into_iter()
                .find(|&player| player == owner)
                .map(|player| (player, *line))
        })
    }

    /// Check if either player has a full line of visible pieces.
    /// Returns the winning player, or None if no line is complete.
    pub fn winner(&self, max_player: Player, min_player: Player) -> Option<Player> {
        self.winning_line(max_player, min_player)
            .map(|(player, _)| player)
    }

    // ========== Move Generation ==========

    /// Pieces the player may move: the whole reserve (small to large), then
    /// every visible piece the player owns in row-major order.
    pub fn movement_available_figures(&self, player: Player) -> Vec<Piece> {
        let mut figures: Vec<Piece> = self.reserves(player).iter().flatten().copied().collect();
        figures.extend(
            Position::all()
                .filter_map(|position| self.top_at(position))
                .filter(|top| top.owner() == player),
        );
        figures
    }

    /// Cells the piece may move to, in row-major order, excluding the cell it
    /// already stands on.
    pub fn possible_placement_destinations(&self, piece: Piece) -> Vec<Position> {
        Position::all()
            .filter(|&to| piece.position() != Some(to))
            .filter(|&to| self.can_place(piece.size(), to))
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..BOARD_DIM as i32 {
            for x in 0..BOARD_DIM as i32 {
                let label = match self.top_at(Position::new(x, y)) {
                    Some(top) => format!("{}{}", top.owner().id(), top.size()),
                    None => ".".to_string(),
                };
                write!(f, "{:>3}", label)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
