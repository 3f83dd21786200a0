//! Editor shell: one crop session from open to save or cancel.
//!
//! A session owns its source image, its [`InteractionController`] and its
//! configuration; nothing is shared between sessions. Each session ends in
//! exactly one of two ways: a [`CropResult`] is delivered by a save, or the
//! session is cancelled.
//!
//! # Saving
//!
//! Encoding may run on another task or worker, so saving has three steps:
//!
//! ```text
//! begin_save()   -> PendingSave     (session enters Saving; second save rejected)
//! render()       -> RenderedSave    (pure; may run anywhere)
//! finish_save()  -> CropResult      (session ends, source released)
//! ```
//!
//! [`EditorSession::save`] runs all three synchronously. A render that
//! completes after the session was cancelled is ignored.

use std::sync::Arc;

use thiserror::Error;

use crate::config::{ConfigError, CropConfig};
use crate::decode::SourceImage;
use crate::geometry::{Point, Rect, ViewportGeometry};
use crate::interaction::InteractionController;
use crate::raster::{rasterize, CpuRasterizer, CropResult, RasterError, Rasterizer};
use crate::EditState;

#[derive(Debug, Error)]
pub enum EditorError {
    /// The session was already saved or cancelled.
    #[error("Editor session has ended")]
    SessionEnded,

    /// A save is already in flight for this session.
    #[error("A save is already in progress")]
    SaveInProgress,

    /// Rendering or encoding the crop failed; the session stays open.
    #[error("Failed to render crop: {0}")]
    Raster(#[from] RasterError),

    /// The session was opened with settings that cannot produce a crop.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Editing,
    Saving,
    Saved,
    Cancelled,
}

impl SessionOutcome {
    pub fn is_ended(self) -> bool {
        matches!(self, SessionOutcome::Saved | SessionOutcome::Cancelled)
    }
}

/// A snapshot of everything needed to render a save.
#[derive(Debug)]
pub struct PendingSave {
    id: u64,
    source: Arc<SourceImage>,
    state: EditState,
    config: CropConfig,
}

impl PendingSave {
    /// Render the snapshot with `rasterizer`.
    pub fn render<R: Rasterizer + ?Sized>(self, rasterizer: &R) -> RenderedSave {
        let result = rasterize(rasterizer, &self.source, &self.state, &self.config);
        RenderedSave {
            id: self.id,
            result,
        }
    }
}

/// The completion of a [`PendingSave`], handed back to its session.
#[derive(Debug)]
pub struct RenderedSave {
    id: u64,
    result: Result<Option<CropResult>, RasterError>,
}

/// One crop editing session.
#[derive(Debug)]
pub struct EditorSession<R: Rasterizer = CpuRasterizer> {
    source: Option<Arc<SourceImage>>,
    controller: InteractionController,
    config: CropConfig,
    rasterizer: R,
    outcome: SessionOutcome,
    save_id: u64,
}

impl EditorSession<CpuRasterizer> {
    /// Open a session on `source` using the CPU rasterizer.
    ///
    /// When `initial` is given, the viewport starts at that zoom and pan
    /// instead of the defaults, so a user can fine-tune a previous crop.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Config` if `config` fails validation.
    pub fn new(
        source: impl Into<Arc<SourceImage>>,
        initial: Option<EditState>,
        config: CropConfig,
    ) -> Result<Self, EditorError> {
        let rasterizer = CpuRasterizer::new(config.filter);
        Self::with_rasterizer(source, initial, config, rasterizer)
    }
}

impl<R: Rasterizer> EditorSession<R> {
    /// Open a session that draws through a custom rasterizer backend.
    pub fn with_rasterizer(
        source: impl Into<Arc<SourceImage>>,
        initial: Option<EditState>,
        config: CropConfig,
        rasterizer: R,
    ) -> Result<Self, EditorError> {
        config.validate()?;
        let source = source.into();
        let controller = match initial {
            Some(state) => InteractionController::with_state(state),
            None => InteractionController::new(),
        };
        tracing::debug!(
            width = source.width(),
            height = source.height(),
            seeded = initial.is_some(),
            "opened editor session"
        );
        Ok(Self {
            source: Some(source),
            controller,
            config,
            rasterizer,
            outcome: SessionOutcome::Editing,
            save_id: 0,
        })
    }

    pub fn state(&self) -> EditState {
        self.controller.state()
    }

    pub fn outcome(&self) -> SessionOutcome {
        self.outcome
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    /// Whether a save would produce a crop; hosts enable Save from this.
    pub fn is_ready(&self) -> bool {
        self.geometry().is_some()
    }

    /// The session's coordinate model, if the source is ready and the
    /// session is still open.
    pub fn geometry(&self) -> Option<ViewportGeometry> {
        let source = self.source.as_ref()?;
        ViewportGeometry::new(self.config.viewport_side, source.width(), source.height())
    }

    /// Where the image currently sits in the viewport, for drawing the preview.
    pub fn displayed_rect(&self) -> Option<Rect> {
        self.geometry().map(|g| g.displayed_rect(&self.state()))
    }

    pub fn zoom_in(&mut self) {
        if !self.outcome.is_ended() {
            self.controller.zoom_in();
        }
    }

    pub fn zoom_out(&mut self) {
        if !self.outcome.is_ended() {
            self.controller.zoom_out();
        }
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        if !self.outcome.is_ended() {
            self.controller.set_zoom(zoom);
        }
    }

    pub fn reset(&mut self) {
        if !self.outcome.is_ended() {
            self.controller.reset();
        }
    }

    pub fn begin_drag(&mut self, pointer: Point) {
        if !self.outcome.is_ended() {
            self.controller.begin_drag(pointer);
        }
    }

    /// Returns `true` if a drag consumed the move (see
    /// [`InteractionController::update_drag`]).
    pub fn update_drag(&mut self, pointer: Point) -> bool {
        if self.outcome.is_ended() {
            return false;
        }
        self.controller.update_drag(pointer)
    }

    pub fn end_drag(&mut self) {
        self.controller.end_drag();
    }

    /// Start a save.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(pending))` and the session enters `Saving`
    /// - `Ok(None)` if the source is not ready; nothing happens
    ///
    /// # Errors
    ///
    /// `EditorError::SaveInProgress` while another save is in flight and
    /// `EditorError::SessionEnded` after a save or cancel.
    pub fn begin_save(&mut self) -> Result<Option<PendingSave>, EditorError> {
        match self.outcome {
            SessionOutcome::Saved | SessionOutcome::Cancelled => {
                return Err(EditorError::SessionEnded)
            }
            SessionOutcome::Saving => return Err(EditorError::SaveInProgress),
            SessionOutcome::Editing => {}
        }

        let Some(source) = self.source.as_ref().filter(|s| s.is_ready()) else {
            tracing::debug!("save requested before the source is ready; ignoring");
            return Ok(None);
        };

        self.save_id += 1;
        self.outcome = SessionOutcome::Saving;
        self.controller.end_drag();

        Ok(Some(PendingSave {
            id: self.save_id,
            source: Arc::clone(source),
            state: self.controller.state(),
            config: self.config.clone(),
        }))
    }

    /// Complete a save started by [`begin_save`](Self::begin_save).
    ///
    /// On success the session ends, releases its source and returns the
    /// crop. If the session was cancelled meanwhile (or `rendered` belongs to
    /// an older save) the result is dropped and `Ok(None)` is returned.
    ///
    /// # Errors
    ///
    /// A render failure returns the session to `Editing` so the host can
    /// offer a retry.
    pub fn finish_save(&mut self, rendered: RenderedSave) -> Result<Option<CropResult>, EditorError> {
        if self.outcome != SessionOutcome::Saving || rendered.id != self.save_id {
            tracing::warn!(
                outcome = ?self.outcome,
                "ignoring save result for a session that is no longer saving"
            );
            return Ok(None);
        }

        match rendered.result {
            Ok(Some(result)) => {
                self.outcome = SessionOutcome::Saved;
                self.source = None;
                tracing::debug!(bytes = result.byte_length(), "crop saved");
                Ok(Some(result))
            }
            Ok(None) => {
                self.outcome = SessionOutcome::Editing;
                Ok(None)
            }
            Err(err) => {
                self.outcome = SessionOutcome::Editing;
                tracing::warn!(%err, "failed to render crop");
                Err(err.into())
            }
        }
    }

    /// Save synchronously with the session's rasterizer.
    pub fn save(&mut self) -> Result<Option<CropResult>, EditorError> {
        let Some(pending) = self.begin_save()? else {
            return Ok(None);
        };
        let rendered = pending.render(&self.rasterizer);
        self.finish_save(rendered)
    }

    /// End the session without producing a crop.
    ///
    /// Returns `false` if the session had already ended. Cancelling during a
    /// save makes the pending result be ignored.
    pub fn cancel(&mut self) -> bool {
        if self.outcome.is_ended() {
            return false;
        }
        self.outcome = SessionOutcome::Cancelled;
        self.source = None;
        self.controller.end_drag();
        tracing::debug!("editor session cancelled");
        true
    }
}
