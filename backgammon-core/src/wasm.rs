//! WASM bindings for backgammon-core
//!
//! Wraps a board and its match state for JavaScript front ends.

use wasm_bindgen::prelude::*;

use crate::diagram::draw_board;
use crate::fibs;
use crate::geometry::{slot_counts, Layout, Orientation, SLOTS};
use crate::moves::{format_move, format_move_compact, parse_move};
use crate::position_id::{board_from_position_id, position_id};
use crate::{Board, MatchState, Side, Variant};

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}

/// A board plus the match state around it.
#[wasm_bindgen]
pub struct WasmPosition {
    board: Board,
    state: MatchState,
}

#[wasm_bindgen]
impl WasmPosition {
    /// Standard starting position, player one on roll.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmPosition {
        WasmPosition { board: Board::initial(Variant::Standard), state: MatchState::default() }
    }

    /// Decode a `board:` record.
    #[wasm_bindgen(js_name = fromRecord)]
    pub fn from_record(record: &str) -> Result<WasmPosition, JsError> {
        let (board, state) = fibs::decode(record)?;
        Ok(WasmPosition { board, state })
    }

    /// Decode a position ID. The match state is the default one.
    #[wasm_bindgen(js_name = fromPositionId)]
    pub fn from_position_id(id: &str) -> Result<WasmPosition, JsError> {
        let board = board_from_position_id(id)?;
        Ok(WasmPosition { board, state: MatchState::default() })
    }

    /// Encode as a `board:` record.
    #[wasm_bindgen(js_name = toRecord)]
    pub fn to_record(&self) -> String {
        fibs::encode(&self.board, &self.state)
    }

    #[wasm_bindgen(js_name = positionId)]
    pub fn position_id(&self) -> String {
        position_id(&self.board)
    }

    /// Board arrays as [[25 counts], [25 counts]], array 1 on roll.
    pub fn board(&self) -> Result<JsValue, JsError> {
        to_js(&self.board)
    }

    #[wasm_bindgen(js_name = matchState)]
    pub fn match_state(&self) -> Result<JsValue, JsError> {
        to_js(&self.state)
    }

    #[wasm_bindgen(js_name = pipCounts)]
    pub fn pip_counts(&self) -> Vec<u32> {
        vec![self.board.pip_count(Side::Mover), self.board.pip_count(Side::Opponent)]
    }

    /// Format a move given as notation, marking hits.
    #[wasm_bindgen(js_name = formatMove)]
    pub fn format_move(&self, notation: &str, compact: bool) -> Result<String, JsError> {
        let mv = parse_move(notation)?;
        Ok(if compact { format_move_compact(&self.board, &mv) } else { format_move(&self.board, &mv) })
    }

    /// Apply a move and pass the turn. The position is unchanged on error.
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, notation: &str) -> Result<(), JsError> {
        let mv = parse_move(notation)?;
        self.board.apply_move(&mv)?;
        self.board.swap_sides();
        self.state.mover = self.state.mover.opponent();
        self.state.turn = Some(self.state.mover);
        self.state.dice = [0, 0];
        Ok(())
    }

    /// Text diagram with the side on roll at the bottom.
    pub fn diagram(&self, clockwise: bool) -> String {
        draw_board(&self.board, true, Orientation::from_clockwise(clockwise), self.state.variant)
    }

    /// Drawing positions as [x, y, x, y, ...] in board units, one pair per
    /// chequer, slot by slot.
    #[wasm_bindgen(js_name = chequerPositions)]
    pub fn chequer_positions(&self, clockwise: bool) -> Vec<i32> {
        let orientation = Orientation::from_clockwise(clockwise);
        let layout = Layout::default();
        let counts = slot_counts(&self.board.seated(self.state.mover), self.state.variant);
        let mut out = Vec::new();
        for slot in 0..SLOTS {
            for k in 1..=counts[slot] {
                let (x, y) = layout.chequer_position(orientation, slot, k);
                out.push(x);
                out.push(y);
            }
        }
        out
    }

    /// Clone the position
    #[wasm_bindgen(js_name = clone)]
    pub fn clone_position(&self) -> WasmPosition {
        WasmPosition { board: self.board, state: self.state.clone() }
    }
}

impl Default for WasmPosition {
    fn default() -> Self {
        Self::new()
    }
}
