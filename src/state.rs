//! Per-turn game snapshots exposed to a search driver.

use serde::{Deserialize, Serialize};

use crate::{Action, Board, Error, Heuristic, InvalidConstruction, Player};

/// A board plus whose turn it is.
///
/// A state is never mutated after construction: [`Action::apply`] builds a
/// fresh one. Winner and terminality are derived from the board on every
/// call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameStateData")]
pub struct GameState {
    board: Board,
    max_player: Player,
    min_player: Player,
    player_on_turn: Player,
}

#[derive(Deserialize)]
struct GameStateData {
    board: Board,
    max_player: Player,
    min_player: Player,
    player_on_turn: Player,
}

impl TryFrom<GameStateData> for GameState {
    type Error = Error;

    /// Reject snapshots whose seats disagree with each other or the board.
    fn try_from(data: GameStateData) -> Result<Self, Self::Error> {
        let GameStateData {
            board,
            max_player,
            min_player,
            player_on_turn,
        } = data;

        if max_player == min_player || !max_player.is_maximizing() || min_player.is_maximizing() {
            return Err(InvalidConstruction::RoleMismatch {
                max_player,
                min_player,
            }
            .into());
        }
        let seated = |player: Player| player == max_player || player == min_player;
        if !seated(player_on_turn) {
            return Err(InvalidConstruction::NotSeated(player_on_turn).into());
        }
        if let Some(piece) = board.pieces().find(|piece| !seated(piece.owner())) {
            return Err(InvalidConstruction::NotSeated(piece.owner()).into());
        }

        Ok(GameState::new(board, max_player, min_player, player_on_turn))
    }
}

impl GameState {
    pub fn new(
        board: Board,
        max_player: Player,
        min_player: Player,
        player_on_turn: Player,
    ) -> GameState {
        GameState {
            board,
            max_player,
            min_player,
            player_on_turn,
        }
    }

    /// Starting position: empty grid, full reserves, `first` to move.
    pub fn new_game(max_player: Player, min_player: Player, first: Player) -> GameState {
        GameState::new(
            Board::with_full_reserves(max_player, min_player),
            max_player,
            min_player,
            first,
        )
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn max_player(&self) -> Player {
        self.max_player
    }

    #[inline]
    pub fn min_player(&self) -> Player {
        self.min_player
    }

    #[inline]
    pub fn player_on_turn(&self) -> Player {
        self.player_on_turn
    }

    /// The opponent of the player on turn.
    pub fn player_for_next_turn(&self) -> Player {
        if self.player_on_turn == self.min_player {
            self.max_player
        } else {
            self.min_player
        }
    }

    /// Every action available to the player on turn.
    ///
    /// Pieces come in [`Board::movement_available_figures`] order, each with
    /// its destinations in row-major order. Interchangeable reserve pieces
    /// each contribute their own actions.
    pub fn possible_actions(&self) -> Vec<Action> {
        self.board
            .movement_available_figures(self.player_on_turn)
            .into_iter()
            .flat_map(|piece| {
                self.board
                    .possible_placement_destinations(piece)
                    .into_iter()
                    .map(move |to| Action::moving(piece, to))
            })
            .collect()
    }

    pub fn winner(&self) -> Option<Player> {
        self.board.winner(self.max_player, self.min_player)
    }

    /// True once either player has a complete line.
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }

    /// Score for the search driver: `+∞`/`-∞` for a win by the
    /// maximizing/minimizing player, the default heuristic otherwise.
    pub fn utility(&self) -> f64 {
        self.utility_with(&Heuristic::default())
    }

    /// Like [`GameState::utility`], scoring open positions with `heuristic`.
    pub fn utility_with(&self, heuristic: &Heuristic) -> f64 {
        match self.winner() {
            Some(winner) if winner == self.max_player => f64::INFINITY,
            Some(_) => f64::NEG_INFINITY,
            None => f64::from(heuristic.evaluate(&self.board)),
        }
    }
}
