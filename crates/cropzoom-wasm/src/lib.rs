//! Cropzoom WASM - WebAssembly bindings for the cropzoom editor
//!
//! This crate exposes the cropzoom-core editor session to JavaScript so a
//! page can show the square crop viewport, forward zoom buttons and mouse
//! drags, and get back the encoded crop plus the edit state to persist.
//!
//! # Module Structure
//!
//! - `editor` - The editor session (`JsImageEditor`) and its result (`JsCropResult`)
//! - `upload` - File checks before an upload reaches the editor
//! - `store` - Storage key helpers for saved crops
//!
//! # Usage
//!
//! ```typescript
//! import init, { validate_upload, JsImageEditor } from '@cropzoom/wasm';
//!
//! await init();
//!
//! validate_upload(file.type, file.size);
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const editor = new JsImageEditor(bytes, savedState);
//!
//! img.style.transform = editor.preview_transform();
//! const crop = editor.save();
//! if (crop) {
//!   await upload(new Blob([crop.bytes()], { type: crop.mime_type }));
//! }
//! ```

use wasm_bindgen::prelude::*;

mod editor;
mod store;
mod upload;

// Re-export public types
pub use editor::{JsCropResult, JsImageEditor};
pub use store::crop_asset_key;
pub use upload::{max_upload_bytes, validate_upload};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Map any displayable error to a JavaScript string error.
pub(crate) fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
