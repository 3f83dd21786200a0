//! Editor session WASM bindings.
//!
//! A `JsImageEditor` owns one editing session: the decoded photo, the zoom
//! and pan the user is adjusting, and the save/cancel lifecycle. The page
//! renders the preview itself (an `<img>` with [`JsImageEditor::preview_transform`]
//! as its CSS transform) and forwards button clicks and mouse events.
//!
//! # Example
//!
//! ```typescript
//! const editor = new JsImageEditor(bytes, profile.photoState, { output_side: 400 });
//!
//! viewport.onmousedown = (e) => editor.pointer_down_event(e);
//! viewport.onmousemove = (e) => {
//!   if (editor.pointer_move_event(e)) img.style.transform = editor.preview_transform();
//! };
//! viewport.onmouseup = () => editor.pointer_up();
//! viewport.onmouseleave = () => editor.pointer_leave();
//!
//! saveButton.onclick = () => {
//!   const crop = editor.save();
//!   if (crop) onSave(crop.bytes(), crop.edit_state());
//! };
//! ```

use cropzoom_core::decode::decode_image;
use cropzoom_core::{CropConfig, CropResult, EditState, EditorSession, Point, SessionOutcome};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use crate::js_error;

/// An interactive crop/zoom session for one photo.
///
/// All controls are ignored once the session has been saved or cancelled.
#[wasm_bindgen]
pub struct JsImageEditor {
    session: EditorSession,
}

#[wasm_bindgen]
impl JsImageEditor {
    /// Open the editor on encoded image bytes.
    ///
    /// # Arguments
    ///
    /// * `bytes` - The picked file's bytes (JPEG, PNG, GIF or WebP)
    /// * `state` - Optional `{ zoom_factor, pan_offset: { x, y } }` from an
    ///   earlier save; a malformed state is logged and ignored
    /// * `config` - Optional partial editor config; missing fields keep
    ///   their defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the bytes cannot be
    /// decoded.
    #[wasm_bindgen(constructor)]
    pub fn new(bytes: &[u8], state: JsValue, config: JsValue) -> Result<JsImageEditor, JsValue> {
        let state = match read_optional::<EditState>(state) {
            Ok(state) => state,
            Err(message) => {
                web_sys::console::warn_1(
                    &format!("cropzoom: ignoring saved edit state: {message}").into(),
                );
                None
            }
        };
        let config = read_optional::<CropConfig>(config)
            .map_err(|message| js_error(format!("Invalid editor config: {message}")))?
            .unwrap_or_default();

        Self::open(bytes, state, config).map_err(js_error)
    }

    /// Open the editor on the contents of an `ArrayBuffer`.
    ///
    /// Same as the constructor, for callers holding `await file.arrayBuffer()`.
    pub fn from_array_buffer(
        buffer: &js_sys::ArrayBuffer,
        state: JsValue,
        config: JsValue,
    ) -> Result<JsImageEditor, JsValue> {
        let bytes = js_sys::Uint8Array::new(buffer).to_vec();
        Self::new(&bytes, state, config)
    }

    /// Current zoom factor (0.5 to 3.0)
    #[wasm_bindgen(getter)]
    pub fn zoom_factor(&self) -> f64 {
        self.session.state().zoom_factor
    }

    /// Horizontal pan in viewport pixels
    #[wasm_bindgen(getter)]
    pub fn pan_x(&self) -> f64 {
        self.session.state().pan_offset.x
    }

    /// Vertical pan in viewport pixels
    #[wasm_bindgen(getter)]
    pub fn pan_y(&self) -> f64 {
        self.session.state().pan_offset.y
    }

    /// Side of the square viewport the preview is laid out in
    #[wasm_bindgen(getter)]
    pub fn viewport_side(&self) -> f64 {
        self.session.config().viewport_side
    }

    #[wasm_bindgen(getter)]
    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging()
    }

    #[wasm_bindgen(getter)]
    pub fn is_ready(&self) -> bool {
        self.session.is_ready()
    }

    /// `"editing"`, `"saving"`, `"saved"` or `"cancelled"`
    #[wasm_bindgen(getter)]
    pub fn status(&self) -> String {
        match self.session.outcome() {
            SessionOutcome::Editing => "editing",
            SessionOutcome::Saving => "saving",
            SessionOutcome::Saved => "saved",
            SessionOutcome::Cancelled => "cancelled",
        }
        .to_string()
    }

    pub fn zoom_in(&mut self) {
        self.session.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.session.zoom_out();
    }

    /// Set the zoom directly (e.g. from a slider); clamped into range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.session.set_zoom(zoom);
    }

    /// Back to zoom 1.0 and no pan.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Start a drag at a pointer position (any fixed coordinate frame).
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.session.begin_drag(Point::new(x, y));
    }

    /// Move the pointer; returns `true` if the pan changed.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.session.update_drag(Point::new(x, y))
    }

    pub fn pointer_up(&mut self) {
        self.session.end_drag();
    }

    /// The pointer left the viewport; ends any drag.
    pub fn pointer_leave(&mut self) {
        self.session.end_drag();
    }

    /// `mousedown` handler using the event's client coordinates.
    pub fn pointer_down_event(&mut self, event: &web_sys::MouseEvent) {
        self.pointer_down(event.client_x() as f64, event.client_y() as f64);
    }

    /// `mousemove` handler.
    ///
    /// While a drag is active the event's default action is prevented so the
    /// browser does not start a text selection or native image drag.
    /// Returns `true` if the pan changed.
    pub fn pointer_move_event(&mut self, event: &web_sys::MouseEvent) -> bool {
        if !self.session.is_dragging() {
            return false;
        }
        event.prevent_default();
        self.pointer_move(event.client_x() as f64, event.client_y() as f64)
    }

    /// CSS transform for the preview image, applied about its center.
    ///
    /// `scale(z) translate(px/z, py/z)` moves the image by exactly the pan
    /// offset on screen after scaling.
    pub fn preview_transform(&self) -> String {
        css_transform(&self.session.state())
    }

    /// Where the image is drawn in the viewport, as `{ x, y, width, height }`.
    ///
    /// Returns `undefined` until the source has dimensions.
    pub fn displayed_rect(&self) -> Result<JsValue, JsValue> {
        match self.session.displayed_rect() {
            Some(rect) => serde_wasm_bindgen::to_value(&rect).map_err(js_error),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// The current `{ zoom_factor, pan_offset }` as a plain object.
    pub fn edit_state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.state()).map_err(js_error)
    }

    /// Render and encode the crop the user sees.
    ///
    /// Returns `undefined` if the image is not ready yet. After a successful
    /// save the session ends and further calls fail.
    ///
    /// # Errors
    ///
    /// Returns an error if the session has ended or encoding fails; after an
    /// encoding failure the session stays open so the user can retry.
    pub fn save(&mut self) -> Result<Option<JsCropResult>, JsValue> {
        match self.session.save() {
            Ok(result) => Ok(result.map(JsCropResult::from_crop)),
            Err(err) => {
                web_sys::console::warn_1(&format!("cropzoom: save failed: {err}").into());
                Err(js_error(err))
            }
        }
    }

    /// Close the editor without saving; returns `false` if already closed.
    pub fn cancel(&mut self) -> bool {
        self.session.cancel()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    /// Call this if you want to immediately release the decoded photo.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsImageEditor {
    /// Decode `bytes` and open a session on them.
    pub(crate) fn open(
        bytes: &[u8],
        state: Option<EditState>,
        config: CropConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let source = decode_image(bytes)?;
        Ok(Self {
            session: EditorSession::new(source, state, config)?,
        })
    }
}

/// Deserialize an optional JS object; `undefined` and `null` mean absent.
fn read_optional<T: DeserializeOwned>(value: JsValue) -> Result<Option<T>, String> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(value)
        .map(Some)
        .map_err(|e| e.to_string())
}

fn css_transform(state: &EditState) -> String {
    let zoom = state.zoom_factor;
    format!(
        "scale({zoom}) translate({}px, {}px)",
        state.pan_offset.x / zoom,
        state.pan_offset.y / zoom
    )
}

/// A saved crop.
///
/// Upload `bytes()` with `mime_type` and store `edit_state()` next to the
/// resulting URL so the editor can be reopened at the same crop.
#[wasm_bindgen]
pub struct JsCropResult {
    inner: CropResult,
}

#[wasm_bindgen]
impl JsCropResult {
    /// Width and height of the encoded square in pixels
    #[wasm_bindgen(getter)]
    pub fn side(&self) -> u32 {
        self.inner.side
    }

    /// MIME type of the encoded bytes (`image/jpeg` or `image/png`)
    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type.to_string()
    }

    /// File extension matching the format (`jpg` or `png`)
    #[wasm_bindgen(getter)]
    pub fn extension(&self) -> String {
        self.inner.format.extension().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.byte_length()
    }

    #[wasm_bindgen(getter)]
    pub fn zoom_factor(&self) -> f64 {
        self.inner.edit_state.zoom_factor
    }

    #[wasm_bindgen(getter)]
    pub fn pan_x(&self) -> f64 {
        self.inner.edit_state.pan_offset.x
    }

    #[wasm_bindgen(getter)]
    pub fn pan_y(&self) -> f64 {
        self.inner.edit_state.pan_offset.y
    }

    /// Returns the encoded image as a Uint8Array.
    ///
    /// Note: This creates a copy of the bytes in JavaScript memory.
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    /// The `{ zoom_factor, pan_offset }` that produced this crop.
    pub fn edit_state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.edit_state).map_err(js_error)
    }
}

impl JsCropResult {
    pub(crate) fn from_crop(inner: CropResult) -> Self {
        Self { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropzoom_core::encode::{encode_png, OutputFormat};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let pixels: Vec<u8> = (0..width * height)
            .flat_map(|i| [(i % 256) as u8, 90, 200])
            .collect();
        encode_png(&pixels, width, height).unwrap()
    }

    fn editor() -> JsImageEditor {
        let mut config = CropConfig::default();
        config.output_side = 64;
        JsImageEditor::open(&png_bytes(40, 30), None, config).unwrap()
    }

    #[test]
    fn test_open_rejects_garbage() {
        assert!(JsImageEditor::open(&[1, 2, 3, 4], None, CropConfig::default()).is_err());
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let mut config = CropConfig::default();
        config.viewport_side = f64::NAN;
        assert!(JsImageEditor::open(&png_bytes(8, 8), None, config).is_err());
    }

    #[test]
    fn test_open_with_saved_state() {
        let state = EditState::new(1.7, Point::new(12.0, -4.0));
        let editor = JsImageEditor::open(&png_bytes(8, 8), Some(state), CropConfig::default()).unwrap();
        assert_eq!(editor.zoom_factor(), 1.7);
        assert_eq!(editor.pan_x(), 12.0);
        assert_eq!(editor.pan_y(), -4.0);
        assert!(editor.is_ready());
        assert_eq!(editor.status(), "editing");
    }

    #[test]
    fn test_zoom_controls() {
        let mut editor = editor();
        editor.zoom_in();
        editor.zoom_in();
        assert_eq!(editor.zoom_factor(), 1.2);
        editor.zoom_out();
        assert_eq!(editor.zoom_factor(), 1.1);
        editor.set_zoom(9.0);
        assert_eq!(editor.zoom_factor(), 3.0);
        editor.reset();
        assert_eq!(editor.zoom_factor(), 1.0);
    }

    #[test]
    fn test_pointer_drag() {
        let mut editor = editor();
        assert!(!editor.pointer_move(50.0, 50.0));

        editor.pointer_down(100.0, 100.0);
        assert!(editor.is_dragging());
        assert!(editor.pointer_move(130.0, 80.0));
        assert_eq!((editor.pan_x(), editor.pan_y()), (30.0, -20.0));

        editor.pointer_leave();
        assert!(!editor.is_dragging());
        assert!(!editor.pointer_move(0.0, 0.0));
        assert_eq!((editor.pan_x(), editor.pan_y()), (30.0, -20.0));
    }

    #[test]
    fn test_preview_transform() {
        assert_eq!(css_transform(&EditState::default()), "scale(1) translate(0px, 0px)");
        assert_eq!(
            css_transform(&EditState::new(2.0, Point::new(30.0, -20.0))),
            "scale(2) translate(15px, -10px)"
        );
    }

    #[test]
    fn test_save_returns_crop() {
        let mut editor = editor();
        editor.zoom_in();
        let crop = editor.save().unwrap().unwrap();

        assert_eq!(crop.side(), 64);
        assert_eq!(crop.mime_type(), "image/jpeg");
        assert_eq!(crop.extension(), "jpg");
        assert_eq!(crop.zoom_factor(), 1.1);
        assert_eq!(&crop.bytes()[0..2], &[0xFF, 0xD8]);
        assert_eq!(crop.byte_length(), crop.bytes().len());
        assert_eq!(editor.status(), "saved");
    }

    #[test]
    fn test_png_output() {
        let mut config = CropConfig::default();
        config.output_side = 16;
        config.format = OutputFormat::Png;
        let mut editor = JsImageEditor::open(&png_bytes(10, 10), None, config).unwrap();
        let crop = editor.save().unwrap().unwrap();
        assert_eq!(crop.mime_type(), "image/png");
        assert_eq!(crop.extension(), "png");
    }

    #[test]
    fn test_cancel() {
        let mut editor = editor();
        assert!(editor.cancel());
        assert!(!editor.cancel());
        assert_eq!(editor.status(), "cancelled");

        editor.zoom_in();
        assert_eq!(editor.zoom_factor(), 1.0);
    }
}
