//! WebAssembly bindings for the board generator.
//!
//! This module exposes board generation to JavaScript through wasm-bindgen.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::generator::{BoardGenerator, GeneratorConfig};
#[cfg(feature = "wasm")]
use rand::rngs::StdRng;
#[cfg(feature = "wasm")]
use rand::SeedableRng;

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed generator owning its own RNG
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmBoardGenerator {
    rng: StdRng,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmBoardGenerator {
    /// Create a generator; pass a seed for reproducible boards
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u32>) -> WasmBoardGenerator {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(u64::from(seed)),
            None => StdRng::from_entropy(),
        };
        WasmBoardGenerator { rng }
    }

    /// Generate a board from an options object such as
    /// `{"randomize_production": true, "randomize_ports": false}`,
    /// returning the board as JSON
    #[wasm_bindgen(js_name = generate)]
    pub fn generate(&mut self, options_json: &str) -> Result<String, JsValue> {
        let options: serde_json::Value = serde_json::from_str(options_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid options JSON: {}", e)))?;
        let config = GeneratorConfig::try_from(&options)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let board = BoardGenerator::classic().generate(&config, &mut self.rng);
        serde_json::to_string(&board).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Generate with both values and ports shuffled
    #[wasm_bindgen(js_name = generateDefault)]
    pub fn generate_default(&mut self) -> String {
        let board = BoardGenerator::classic().generate(&GeneratorConfig::default(), &mut self.rng);
        serde_json::to_string(&board).unwrap_or_else(|_| "{}".to_string())
    }
}
