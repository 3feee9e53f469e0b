use std::sync::Arc;

use crate::{
    assets::{decode::decode_image, fonts::FontBook},
    drawing::{
        brush::StylusPoint,
        layer::{DrawingLayer, LayerKind, LayerStack},
        tools::{Gesture, LineTool, Mark, Tool, ToolSettings, rasterize},
    },
    foundation::{
        core::{Point, Rect, Rgba8, Rgba8Premul},
        error::InkResult,
    },
    interaction::config::EditorConfig,
    raster::{
        blend::Blend,
        encode::{ExportFormat, encode_raster},
        painter::Painter,
        surface::Raster,
    },
};

/// Line height of committed text, as a multiple of the font size.
pub const TEXT_LINE_HEIGHT: f64 = 1.2;

/// Notifications returned by drawing input handlers.
#[derive(Clone, Debug)]
pub enum DrawingEvent {
    LayerCreated(DrawingLayer),
    /// The text tool was pressed here; answer with
    /// [`DrawingEngine::commit_text`].
    RequestTextInput(Point),
}

struct Surfaces {
    /// The live gesture, rebuilt from its marks on every composite.
    active: Raster,
    /// Visible layers only; the mask is read from here.
    composite: Raster,
    /// Background, layers and live gesture.
    output: Raster,
}

impl Surfaces {
    fn new(width: u32, height: u32) -> InkResult<Self> {
        Ok(Self {
            active: Raster::new(width, height)?,
            composite: Raster::new(width, height)?,
            output: Raster::new(width, height)?,
        })
    }
}

/// Layered paint engine: brushes, eraser, line and text tools over an
/// optional background image.
///
/// Nothing draws before [`DrawingEngine::attach`] sizes the surfaces.
pub struct DrawingEngine {
    config: EditorConfig,
    settings: ToolSettings,
    surfaces: Option<Surfaces>,
    background: Option<Arc<Raster>>,
    layers: LayerStack,
    gesture: Gesture,
    touch_id: Option<u64>,
    fonts: FontBook,
    generation: u64,
}

impl std::fmt::Debug for DrawingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingEngine")
            .field("settings", &self.settings)
            .field("attached", &self.surfaces.is_some())
            .field("layers", &self.layers.len())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl Default for DrawingEngine {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl DrawingEngine {
    pub fn new(config: EditorConfig) -> Self {
        let layers = LayerStack::new(config.history_limit);
        Self {
            config,
            settings: ToolSettings::default(),
            surfaces: None,
            background: None,
            layers,
            gesture: Gesture::Idle,
            touch_id: None,
            fonts: FontBook::new(),
            generation: 0,
        }
    }

    /// Allocates the surfaces. Re-attaching at a new size drops any gesture
    /// in progress; committed layers keep their original size and are
    /// skipped while it differs.
    pub fn attach(&mut self, width: u32, height: u32) -> InkResult<()> {
        self.surfaces = Some(Surfaces::new(width, height)?);
        self.gesture = Gesture::Idle;
        self.touch_id = None;
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.surfaces.is_some()
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.surfaces
            .as_ref()
            .map(|s| (s.output.width(), s.output.height()))
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    /// Switching tools abandons an unfinished gesture.
    pub fn set_settings(&mut self, settings: ToolSettings) {
        if settings.tool != self.settings.tool {
            self.cancel();
        }
        self.settings = settings;
    }

    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    /// Number of composites run so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_drawing(&self) -> bool {
        !self.gesture.is_idle()
    }

    fn attached(&self, what: &str) -> bool {
        if self.surfaces.is_none() {
            tracing::debug!(what, "drawing input before attach ignored");
            return false;
        }
        true
    }

    pub fn pointer_down(&mut self, p: StylusPoint) -> Vec<DrawingEvent> {
        if !self.attached("pointer_down") {
            return Vec::new();
        }
        let at = p.point();
        match self.settings.tool {
            Tool::Text => return vec![DrawingEvent::RequestTextInput(at)],
            Tool::Brush { .. } | Tool::Eraser => {
                self.gesture = Gesture::begin_stroke(&self.settings, p);
            }
            Tool::Line {
                line: LineTool::Straight,
            } => {
                self.gesture = Gesture::Straight { start: at, end: at };
            }
            Tool::Line {
                line: LineTool::Curve,
            } => match std::mem::take(&mut self.gesture) {
                Gesture::CurveStart { start, .. } => {
                    self.gesture = Gesture::CurveBend {
                        start,
                        end: at,
                        control: start.midpoint(at),
                    };
                }
                Gesture::CurveBend { start, end, .. } => {
                    self.gesture = Gesture::CurveBend {
                        start,
                        end,
                        control: at,
                    };
                    return self.commit();
                }
                _ => {
                    self.gesture = Gesture::CurveStart {
                        start: at,
                        cursor: None,
                    };
                }
            },
            Tool::Line {
                line: LineTool::Polyline,
            } => {
                let mut points = match std::mem::take(&mut self.gesture) {
                    Gesture::Polyline { points, .. } => points,
                    _ => Vec::new(),
                };
                Gesture::push_vertex(&mut points, at);
                self.gesture = Gesture::Polyline {
                    points,
                    cursor: None,
                };
            }
        }
        self.refresh();
        Vec::new()
    }

    pub fn pointer_move(&mut self, p: StylusPoint) {
        if self.surfaces.is_none() {
            return;
        }
        if matches!(self.gesture, Gesture::Stroke { .. }) {
            self.gesture.extend_stroke(&self.settings, p);
        } else {
            let at = p.point();
            match &mut self.gesture {
                Gesture::Straight { end, .. } => *end = at,
                Gesture::CurveStart { cursor, .. } | Gesture::Polyline { cursor, .. } => {
                    *cursor = Some(at);
                }
                Gesture::CurveBend { control, .. } => *control = at,
                Gesture::Idle => return,
                Gesture::Stroke { .. } => {}
            }
        }
        self.refresh();
    }

    /// Ends a drag gesture. Click-driven line tools ignore releases.
    pub fn pointer_up(&mut self, p: StylusPoint) -> Vec<DrawingEvent> {
        if let Gesture::Straight { end, .. } = &mut self.gesture {
            *end = p.point();
        }
        match self.gesture {
            Gesture::Stroke { .. } | Gesture::Straight { .. } => self.commit(),
            _ => Vec::new(),
        }
    }

    /// Pointer left the canvas: drag gestures end as on release.
    pub fn pointer_leave(&mut self) -> Vec<DrawingEvent> {
        match self.gesture {
            Gesture::Stroke { .. } | Gesture::Straight { .. } => self.commit(),
            _ => Vec::new(),
        }
    }

    /// Finishes a polyline. Fewer than two vertices are discarded.
    pub fn double_click(&mut self, _at: Point) -> Vec<DrawingEvent> {
        if matches!(self.gesture, Gesture::Polyline { .. }) {
            return self.commit();
        }
        Vec::new()
    }

    /// Starts tracking `id` unless another touch is already active.
    pub fn touch_start(&mut self, id: u64, p: StylusPoint) -> Vec<DrawingEvent> {
        if self.touch_id.is_some() {
            return Vec::new();
        }
        if !self.attached("touch_start") {
            return Vec::new();
        }
        self.touch_id = Some(id);
        self.pointer_down(p)
    }

    /// Moves shorter than the touch threshold from the last sample are
    /// dropped.
    pub fn touch_move(&mut self, id: u64, p: StylusPoint) {
        if self.touch_id != Some(id) {
            return;
        }
        if let Some(last) = self.gesture.last_sample()
            && last.distance(p.point()) < self.config.touch_move_threshold
        {
            return;
        }
        self.pointer_move(p);
    }

    pub fn touch_end(&mut self, id: u64, p: StylusPoint) -> Vec<DrawingEvent> {
        if self.touch_id != Some(id) {
            return Vec::new();
        }
        self.touch_id = None;
        self.pointer_up(p)
    }

    /// Drops the gesture in progress without committing it.
    pub fn cancel(&mut self) {
        if self.drop_gesture() {
            self.refresh();
        }
    }

    fn drop_gesture(&mut self) -> bool {
        self.touch_id = None;
        if self.gesture.is_idle() {
            return false;
        }
        tracing::debug!("drawing gesture cancelled");
        self.gesture = Gesture::Idle;
        true
    }

    /// Re-runs the composite after a state change so [`DrawingEngine::output`]
    /// stays current. Failures are logged.
    fn refresh(&mut self) {
        if let Err(e) = self.composite() {
            tracing::warn!(error = %e, "composite failed");
        }
    }

    /// Bakes the current gesture into a layer unless it left no pixels.
    fn commit(&mut self) -> Vec<DrawingEvent> {
        let gesture = std::mem::take(&mut self.gesture);
        let marks = gesture.final_marks(&self.settings);
        let kind = gesture.layer_kind(&self.settings);
        let blend = self.settings.layer_blend();
        let events = match self.bake(&marks, kind, blend) {
            Ok(Some(layer)) => vec![DrawingEvent::LayerCreated(layer)],
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "drawing commit failed");
                Vec::new()
            }
        };
        self.refresh();
        events
    }

    fn bake(
        &mut self,
        marks: &[Mark],
        kind: LayerKind,
        blend: Blend,
    ) -> InkResult<Option<DrawingLayer>> {
        let Some((w, h)) = self.size() else {
            return Ok(None);
        };
        if marks.is_empty() {
            tracing::debug!(?kind, "empty commit discarded");
            return Ok(None);
        }
        let raster = rasterize(marks, w, h)?;
        self.push_layer(kind, raster, blend)
    }

    fn push_layer(
        &mut self,
        kind: LayerKind,
        raster: Raster,
        blend: Blend,
    ) -> InkResult<Option<DrawingLayer>> {
        if raster.is_blank() {
            tracing::debug!(?kind, "blank commit discarded");
            return Ok(None);
        }
        let layer = DrawingLayer::new(kind, raster, blend, self.layers.next_z());
        self.layers.push(layer.clone());
        Ok(Some(layer))
    }

    /// Bakes multi-line text with its top-left corner at `at`.
    ///
    /// Returns `None` when nothing visible was produced (empty text, no
    /// registered font, not attached).
    pub fn commit_text(
        &mut self,
        at: Point,
        text: &str,
        size_px: f64,
        color: Rgba8,
    ) -> InkResult<Option<DrawingLayer>> {
        let Some((w, h)) = self.size() else {
            return Ok(None);
        };
        if text.trim().is_empty() {
            return Ok(None);
        }
        let mut p = Painter::new(w, h)?;
        let mut drawn = false;
        for (i, line) in text.split('\n').enumerate() {
            if line.is_empty() {
                continue;
            }
            let Some(shaped) = self.fonts.shape_line("", line, size_px as f32, color)? else {
                tracing::debug!("no fonts registered; text commit skipped");
                return Ok(None);
            };
            let origin = Point::new(at.x, at.y + i as f64 * size_px * TEXT_LINE_HEIGHT);
            p.fill_layout(&shaped.layout, &shaped.font, origin);
            drawn = true;
        }
        if !drawn {
            return Ok(None);
        }
        let layer = self.push_layer(LayerKind::Text, p.finish()?, Blend::Over)?;
        if layer.is_some() {
            self.composite()?;
        }
        Ok(layer)
    }

    pub fn set_background(&mut self, raster: Option<Raster>) {
        self.background = raster.map(Arc::new);
        self.refresh();
    }

    /// Delivers the fetched background bytes, or the fetch error.
    ///
    /// A decoded image replaces the background and triggers one composite;
    /// failures are logged and leave the background blank. Returns whether
    /// the new image was composited.
    pub fn complete_background(&mut self, fetched: Result<&[u8], String>) -> bool {
        let decoded = match fetched {
            Ok(bytes) => decode_image(bytes).map_err(|e| e.to_string()),
            Err(e) => Err(e),
        };
        match decoded {
            Ok(raster) => {
                self.background = Some(Arc::new(raster));
                match self.composite() {
                    Ok(out) => out.is_some(),
                    Err(e) => {
                        tracing::warn!(error = %e, "composite after background load failed");
                        false
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "background image failed to load");
                if self.background.take().is_some() {
                    self.refresh();
                }
                false
            }
        }
    }

    /// Rebuilds the composite and output surfaces. `None` before attach.
    #[tracing::instrument(skip_all, fields(layers = self.layers.len()))]
    pub fn composite(&mut self) -> InkResult<Option<&Raster>> {
        let Some(s) = self.surfaces.as_mut() else {
            return Ok(None);
        };
        let (w, h) = (s.output.width(), s.output.height());

        s.composite.clear(Rgba8Premul::transparent());
        for layer in self.layers.paint_order().into_iter().filter(|l| l.visible) {
            if !layer.raster.same_size(&s.composite) {
                tracing::debug!(layer = %layer.id, "layer size differs from surface; skipped");
                continue;
            }
            s.composite
                .composite(&layer.raster, layer.blend, layer.effective_opacity())?;
        }

        s.active = rasterize(&self.gesture.preview_marks(&self.settings), w, h)?;
        let live_eraser =
            self.settings.tool == Tool::Eraser && matches!(self.gesture, Gesture::Stroke { .. });
        if live_eraser {
            s.composite.composite(&s.active, Blend::DestOut, 1.0)?;
        }

        s.output.clear(Rgba8Premul::transparent());
        if let Some(bg) = &self.background {
            let mut p = Painter::new(w, h)?;
            p.draw_image(bg, Rect::new(0.0, 0.0, f64::from(w), f64::from(h)), 1.0)?;
            s.output.composite(&p.finish()?, Blend::Over, 1.0)?;
        }
        s.output.composite(&s.composite, Blend::Over, 1.0)?;
        if !live_eraser {
            s.output
                .composite(&s.active, self.settings.layer_blend(), 1.0)?;
        }

        self.generation += 1;
        Ok(Some(&s.output))
    }

    /// Last composited output. `None` before attach.
    pub fn output(&self) -> Option<&Raster> {
        self.surfaces.as_ref().map(|s| &s.output)
    }

    pub fn export_image(&mut self, format: ExportFormat) -> InkResult<Option<Vec<u8>>> {
        match self.composite()? {
            Some(out) => encode_raster(out, format).map(Some),
            None => Ok(None),
        }
    }

    /// Layers-only coverage mask: drawn pixels white, the rest black, PNG.
    pub fn export_mask(&mut self) -> InkResult<Option<Vec<u8>>> {
        if self.composite()?.is_none() {
            return Ok(None);
        }
        let Some(s) = &self.surfaces else {
            return Ok(None);
        };
        encode_raster(&s.composite.to_mask(), ExportFormat::Png).map(Some)
    }

    /// Mask raster behind [`DrawingEngine::export_mask`].
    pub fn mask(&mut self) -> InkResult<Option<Raster>> {
        self.composite()?;
        Ok(self.surfaces.as_ref().map(|s| s.composite.to_mask()))
    }

    pub fn set_layer_opacity(&mut self, id: &str, opacity: f32) -> bool {
        let changed = self.layers.set_opacity(id, opacity);
        self.refresh_if(changed)
    }

    pub fn set_layer_visible(&mut self, id: &str, visible: bool) -> bool {
        let changed = self.layers.set_visible(id, visible);
        self.refresh_if(changed)
    }

    pub fn rename_layer(&mut self, id: &str, name: &str) -> bool {
        self.layers.rename(id, name)
    }

    pub fn move_layer_up(&mut self, id: &str) -> bool {
        let changed = self.layers.shift(id, true);
        self.refresh_if(changed)
    }

    pub fn move_layer_down(&mut self, id: &str) -> bool {
        let changed = self.layers.shift(id, false);
        self.refresh_if(changed)
    }

    pub fn delete_layer(&mut self, id: &str) -> bool {
        let changed = self.layers.remove(id).is_some();
        self.refresh_if(changed)
    }

    fn refresh_if(&mut self, changed: bool) -> bool {
        if changed {
            self.refresh();
        }
        changed
    }

    /// Removes every layer and the redo history.
    pub fn clear(&mut self) {
        self.drop_gesture();
        self.layers.clear();
        self.refresh();
    }

    /// Removes the most recently created layer. Returns its id.
    pub fn undo(&mut self) -> Option<String> {
        let dropped = self.drop_gesture();
        let id = self.layers.undo();
        self.refresh_if(dropped || id.is_some());
        id
    }

    pub fn redo(&mut self) -> Option<&DrawingLayer> {
        let dropped = self.drop_gesture();
        let id = self.layers.redo().map(|l| l.id.clone());
        self.refresh_if(dropped || id.is_some());
        self.layers.get(&id?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/drawing/engine.rs"]
mod tests;
