use crate::{
    drawing::{
        brush::StylusPoint,
        engine::{DrawingEngine, DrawingEvent},
        tools::ToolSettings,
    },
    foundation::{
        core::{Point, Rgba8},
        error::{InkError, InkResult},
    },
};

/// One recorded input to replay against a [`DrawingEngine`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// Switch tool settings.
    Tool(ToolSettings),
    Down(StylusPoint),
    Move(StylusPoint),
    Up(StylusPoint),
    /// Down, every intermediate sample as a move, then up on the last point.
    Stroke { points: Vec<StylusPoint> },
    DoubleClick { x: f64, y: f64 },
    Text {
        x: f64,
        y: f64,
        text: String,
        #[serde(default = "default_text_size")]
        size: f64,
        #[serde(default = "default_text_color")]
        color: Rgba8,
    },
    Cancel,
    Undo,
    Redo,
    Clear,
}

fn default_text_size() -> f64 {
    24.0
}

fn default_text_color() -> Rgba8 {
    Rgba8::BLACK
}

/// A canvas size plus the input that draws on it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingDocument {
    pub width: u32,
    pub height: u32,
    /// Background image path, resolved by the caller.
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub ops: Vec<DrawOp>,
}

impl DrawingDocument {
    pub fn from_json(json: &str) -> InkResult<Self> {
        serde_json::from_str(json).map_err(|e| InkError::serde(e.to_string()))
    }

    /// Attaches `engine` at the document size and runs every op in order.
    /// Returns the number of layers created.
    pub fn replay(&self, engine: &mut DrawingEngine) -> InkResult<usize> {
        engine.attach(self.width, self.height)?;
        let mut created = 0;
        for op in &self.ops {
            let events = match op {
                DrawOp::Tool(settings) => {
                    engine.set_settings(settings.clone());
                    Vec::new()
                }
                DrawOp::Down(p) => engine.pointer_down(*p),
                DrawOp::Move(p) => {
                    engine.pointer_move(*p);
                    Vec::new()
                }
                DrawOp::Up(p) => engine.pointer_up(*p),
                DrawOp::Stroke { points } => stroke(engine, points),
                DrawOp::DoubleClick { x, y } => engine.double_click(Point::new(*x, *y)),
                DrawOp::Text {
                    x,
                    y,
                    text,
                    size,
                    color,
                } => engine
                    .commit_text(Point::new(*x, *y), text, *size, *color)?
                    .map(DrawingEvent::LayerCreated)
                    .into_iter()
                    .collect(),
                DrawOp::Cancel => {
                    engine.cancel();
                    Vec::new()
                }
                DrawOp::Undo => {
                    engine.undo();
                    Vec::new()
                }
                DrawOp::Redo => {
                    engine.redo();
                    Vec::new()
                }
                DrawOp::Clear => {
                    engine.clear();
                    Vec::new()
                }
            };
            created += events
                .iter()
                .filter(|ev| matches!(ev, DrawingEvent::LayerCreated(_)))
                .count();
        }
        tracing::debug!(ops = self.ops.len(), created, "drawing replayed");
        Ok(created)
    }
}

fn stroke(engine: &mut DrawingEngine, points: &[StylusPoint]) -> Vec<DrawingEvent> {
    let Some((first, rest)) = points.split_first() else {
        return Vec::new();
    };
    let mut events = engine.pointer_down(*first);
    for p in rest {
        engine.pointer_move(*p);
    }
    let last = rest.last().unwrap_or(first);
    events.extend(engine.pointer_up(*last));
    events
}

#[cfg(test)]
#[path = "../../tests/unit/drawing/document.rs"]
mod tests;
