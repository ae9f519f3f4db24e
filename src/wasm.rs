//! WebAssembly-bindlaag rond de rekenkern.
//!
//! De bindingen vertalen alleen: namen worden geparset, resultaten via
//! `serde_wasm_bindgen` naar JS-waarden omgezet. Alle semantiek blijft
//! in [`crate::engine`].

use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

use crate::engine;
use crate::scene::Mark;
use crate::snapshot::Snapshot;

#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();
}

/// Public entry point for consumers.
#[wasm_bindgen]
pub struct MarkupEngine {
    inner: engine::Engine,
}

#[wasm_bindgen]
impl MarkupEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(dpmm: f64) -> Result<MarkupEngine, JsValue> {
        let inner = engine::Engine::new(dpmm).map_err(to_js_error)?;
        Ok(MarkupEngine { inner })
    }

    /// Plaatst of verplaatst een punt; geeft de delta van deze actie terug.
    #[wasm_bindgen]
    pub fn place_or_move(&mut self, mark: &str, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let mark: Mark = mark.parse().map_err(to_js_error)?;
        let delta = self.inner.place_or_move(mark, x, y).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&delta).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Exporteert de volledige toestand als plat snapshot.
    #[wasm_bindgen]
    pub fn export_state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.export_state())
            .map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Valideert een snapshot en vervangt de huidige toestand pas na
    /// goedkeuring.
    #[wasm_bindgen]
    pub fn import_state(&mut self, snapshot: JsValue) -> Result<(), JsValue> {
        let snapshot: Snapshot = serde_wasm_bindgen::from_value(snapshot)
            .map_err(|err| JsValue::from(JsError::new(&err.to_string())))?;
        self.inner = engine::Engine::import_state(&snapshot).map_err(to_js_error)?;
        Ok(())
    }

    /// Eerste nog niet geplaatste punt uit de vaste plaatsingsvolgorde.
    #[wasm_bindgen]
    pub fn next_expected(&self) -> Option<String> {
        self.inner.next_expected().map(|mark| mark.to_string())
    }

    #[wasm_bindgen]
    pub fn dpmm(&self) -> f64 {
        self.inner.dpmm()
    }
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsError::new(&err.to_string()).into()
}
