//! WASM bindings for morris-core
//!
//! Provides a JavaScript-friendly API for the game logic. Boards cross the
//! boundary in the stored record shape.

use wasm_bindgen::prelude::*;

use crate::{BoardRecord, Game, Pos};

/// WASM-friendly wrapper around Game
#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
}

#[wasm_bindgen]
impl WasmGame {
    /// Start a new game
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame { inner: Game::new() }
    }

    /// Rebuild a saved game from an array of board records
    #[wasm_bindgen(js_name = fromRecords)]
    pub fn from_records(
        name: Option<String>,
        index: Option<usize>,
        records: JsValue,
    ) -> Result<WasmGame, JsError> {
        let records: Vec<BoardRecord> = serde_wasm_bindgen::from_value(records)
            .map_err(|e| JsError::new(&e.to_string()))?;
        let inner =
            Game::from_records(name, index, records).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(WasmGame { inner })
    }

    /// Handle a click on node `index`. Returns true if the input was accepted.
    #[wasm_bindgen(js_name = applyInput)]
    pub fn apply_input(&mut self, index: u8) -> Result<bool, JsError> {
        let pos = Pos(index);
        if !pos.is_valid() {
            return Err(JsError::new(&format!("node index {} out of range", index)));
        }
        Ok(self.inner.apply_input(pos).is_ok())
    }

    /// Step back one committed input
    pub fn undo(&mut self) {
        self.inner.undo();
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    /// Current board as a record object
    pub fn board(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&BoardRecord::from(self.inner.current()))
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Every committed board as record objects, oldest first
    pub fn history(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.inner.to_records())
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Losing player id (0 = Cat, 1 = Dog), or undefined while the game goes on
    #[wasm_bindgen(js_name = losingPlayer)]
    pub fn losing_player(&self) -> Option<u8> {
        self.inner.check_victory().map(|p| p.id())
    }

    /// Active player id (0 = Cat, 1 = Dog)
    #[wasm_bindgen(js_name = currentPlayer)]
    pub fn current_player(&self) -> u8 {
        self.inner.current().active_player().id()
    }

    /// Current phase (0 = pick up, 1 = place, 2 = capture)
    pub fn phase(&self) -> u8 {
        self.inner.current().phase().id()
    }

    /// Prompt text for the current phase
    pub fn prompt(&self) -> String {
        self.inner.current().phase().prompt().to_string()
    }

    /// Node indices that would accept a click right now
    #[wasm_bindgen(js_name = legalInputs)]
    pub fn legal_inputs(&self) -> Vec<u8> {
        self.inner
            .legal_inputs()
            .into_iter()
            .map(|pos| pos.0)
            .collect()
    }

    /// Saved game name, if any
    pub fn name(&self) -> Option<String> {
        self.inner.name().map(str::to_string)
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
