//! WASM bindings for matroska-core
//!
//! Provides a JavaScript-friendly API over [`GameState`]. Player 1 is the
//! human, maximizing side and moves first; player 2 is the CPU.

use wasm_bindgen::prelude::*;

use crate::{Action, GameState, Player, Position};

const HUMAN: Player = Player::new(1, true, true);
const CPU: Player = Player::new(2, false, false);

fn player_by_id(id: u32) -> Option<Player> {
    [HUMAN, CPU].into_iter().find(|player| player.id() == id)
}

/// WASM-friendly wrapper around GameState
#[wasm_bindgen]
pub struct WasmGame {
    inner: GameState,
}

#[wasm_bindgen]
impl WasmGame {
    /// Start a new game
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame {
            inner: GameState::new_game(HUMAN, CPU, HUMAN),
        }
    }

    /// Id of the player on turn (1 or 2)
    #[wasm_bindgen(js_name = currentPlayer)]
    pub fn current_player(&self) -> u32 {
        self.inner.player_on_turn().id()
    }

    /// Winner id, or 0 while no line is complete
    pub fn winner(&self) -> u32 {
        self.inner.winner().map_or(0, Player::id)
    }

    /// Get winning line as [x, y, x, y, x, y], empty if no winner
    #[wasm_bindgen(js_name = winningLine)]
    pub fn winning_line(&self) -> Vec<i32> {
        self.inner
            .board()
            .winning_line(self.inner.max_player(), self.inner.min_player())
            .map(|(_, line)| line.iter().flat_map(|pos| [pos.x, pos.y]).collect())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = isTerminal)]
    pub fn is_terminal(&self) -> bool {
        self.inner.is_terminal()
    }

    /// Score from player 1's point of view (±Infinity once decided)
    pub fn utility(&self) -> f64 {
        self.inner.utility()
    }

    /// Get legal actions as an array of
    /// { player, size: 1|2|3, from: [x, y] | null, to: [x, y] }
    #[wasm_bindgen(js_name = legalActions)]
    pub fn legal_actions(&self) -> Result<JsValue, JsValue> {
        let actions: Vec<WasmAction> = self
            .inner
            .possible_actions()
            .iter()
            .map(WasmAction::from)
            .collect();
        serde_wasm_bindgen::to_value(&actions).map_err(JsValue::from)
    }

    /// Apply the action at `index` in `legalActions()` order.
    /// Throws if the index is out of range or the move breaks a rule.
    #[wasm_bindgen(js_name = applyAction)]
    pub fn apply_action(&mut self, index: usize) -> Result<(), JsError> {
        let actions = self.inner.possible_actions();
        let action = actions
            .get(index)
            .ok_or_else(|| JsError::new("action index out of range"))?;
        self.inner = action.apply(&self.inner)?;
        Ok(())
    }

    /// Get cell stack at (x, y) as [player, size, player, size, ...]
    /// Bottom to top order, sizes 1=S 2=M 3=L
    #[wasm_bindgen(js_name = cellStack)]
    pub fn cell_stack(&self, x: i32, y: i32) -> Vec<u32> {
        let Some(stack) = self.inner.board().at(Position::new(x, y)) else {
            return vec![];
        };
        stack
            .iter()
            .flatten()
            .flat_map(|piece| [piece.owner().id(), piece.size().index() as u32 + 1])
            .collect()
    }

    /// Get reserves for a player as [small, medium, large], empty for an
    /// unknown id
    pub fn reserves(&self, player: u32) -> Vec<u32> {
        let Some(player) = player_by_id(player) else {
            return vec![];
        };
        self.inner
            .board()
            .reserve_counts(player)
            .iter()
            .map(|&count| count as u32)
            .collect()
    }

    /// Text rendering of the visible pieces
    pub fn render(&self) -> String {
        self.inner.board().to_string()
    }

    /// Clone the game
    #[wasm_bindgen(js_name = clone)]
    pub fn clone_game(&self) -> WasmGame {
        WasmGame {
            inner: self.inner.clone(),
        }
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable action for JavaScript
#[derive(serde::Serialize)]
struct WasmAction {
    player: u32,
    size: u8,
    from: Option<[i32; 2]>,
    to: [i32; 2],
}

impl From<&Action> for WasmAction {
    fn from(action: &Action) -> Self {
        let to = action.to();
        WasmAction {
            player: action.player().id(),
            size: action.size() as u8 + 1,
            from: action.origin().map(|from| [from.x, from.y]),
            to: [to.x, to.y],
        }
    }
}
