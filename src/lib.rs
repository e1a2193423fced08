//! linkdeck - link-directory page for the web
//!
//! Fetches a links spreadsheet and renders it as a searchable card page in
//! the browser via WebAssembly:
//! - Cards grouped from rows by (section, title, color), three layouts
//!   (grid, row, wide)
//! - Client-side substring search over line text and link targets
//! - Hover-expandable wide card with a debounced close
//! - Host-independent rendering: cards map to a renderable tree that a thin
//!   DOM adapter materializes
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { LinkBoard } from 'linkdeck';
//! await init();
//! const board = await LinkBoard.start('/data/links.xlsx');
//! ```

// Data pipeline modules
pub mod aggregate;
pub mod cell_ref;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod reader;
pub mod render;
pub mod types;

// Browser controller (DOM adapter, event wiring)
#[cfg(target_arch = "wasm32")]
pub mod page;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use page::LinkBoard;

pub use types::*;

/// Sheet the workbook is expected to carry; decoding falls back to the
/// first sheet when it is absent.
pub const LINKS_SHEET_NAME: &str = "Links";

/// Run the data pipeline: workbook bytes to aggregated cards.
///
/// # Errors
/// Returns an error if the buffer is not a readable workbook.
pub fn cards_from_workbook(data: &[u8]) -> error::Result<Vec<Card>> {
    let records = reader::read_rows(data, LINKS_SHEET_NAME)?;
    Ok(aggregate::aggregate(normalize::normalize_rows(&records)))
}

/// Parse a links workbook and return the aggregated cards as a JSON string
///
/// # Arguments
/// * `data` - The raw bytes of the XLSX file
///
/// # Errors
/// Returns an error if the workbook is invalid or cannot be decoded.
#[wasm_bindgen]
pub fn parse_links(data: &[u8]) -> Result<String, JsValue> {
    let cards = cards_from_workbook(data).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&cards)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Parse a links workbook and return the cards as a `JsValue`
///
/// This is more efficient than `parse_links` when the result will be
/// used directly in JavaScript.
///
/// # Errors
/// Returns an error if the workbook is invalid or cannot be decoded.
#[wasm_bindgen]
pub fn parse_links_to_js(data: &[u8]) -> Result<JsValue, JsValue> {
    let cards = cards_from_workbook(data).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&cards)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
