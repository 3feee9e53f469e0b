use kurbo::Shape;

use crate::{
    drawing::{
        brush::{BrushKind, StylusPoint, next_segment},
        layer::LayerKind,
    },
    foundation::{
        core::{BezPath, Point, Rgba8},
        error::InkResult,
    },
    raster::{
        blend::Blend,
        painter::{Painter, StrokeStyle},
        surface::Raster,
    },
};

/// Dash pattern of the curve tool's first-leg preview.
const CURVE_GUIDE_DASHES: [f64; 2] = [6.0, 4.0];
/// Points closer than this to the previous polyline vertex are dropped.
const POLYLINE_MIN_STEP: f64 = 0.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineTool {
    /// Press, drag, release.
    #[default]
    Straight,
    /// Click start, click end, click to place the control point.
    Curve,
    /// Click each vertex, double-click to finish.
    Polyline,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum Tool {
    Brush { brush: BrushKind },
    Eraser,
    Line { line: LineTool },
    Text,
}

impl Default for Tool {
    fn default() -> Self {
        Self::Brush {
            brush: BrushKind::default(),
        }
    }
}

/// Active tool and its parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolSettings {
    #[serde(flatten)]
    pub tool: Tool,
    pub color: Rgba8,
    /// Base size in px (1..=100 in the editor UI).
    pub size: f64,
    pub opacity: f32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: Tool::default(),
            color: Rgba8::BLACK,
            size: 4.0,
            opacity: 1.0,
        }
    }
}

impl ToolSettings {
    pub fn brush(brush: BrushKind, color: Rgba8, size: f64, opacity: f32) -> Self {
        Self {
            tool: Tool::Brush { brush },
            color,
            size,
            opacity,
        }
    }

    pub fn eraser(size: f64) -> Self {
        Self {
            tool: Tool::Eraser,
            size,
            ..Self::default()
        }
    }

    pub fn line(line: LineTool, color: Rgba8, size: f64, opacity: f32) -> Self {
        Self {
            tool: Tool::Line { line },
            color,
            size,
            opacity,
        }
    }

    /// Blend the committed layer uses.
    pub fn layer_blend(&self) -> Blend {
        match self.tool {
            Tool::Brush { brush } => brush.dab(self.size, self.opacity, 0.5).blend,
            Tool::Eraser => Blend::DestOut,
            Tool::Line { .. } | Tool::Text => Blend::Over,
        }
    }

    fn line_style(&self) -> StrokeStyle {
        StrokeStyle::round(self.size.max(0.0))
    }

    fn line_color(&self) -> Rgba8 {
        self.color.with_opacity(self.opacity)
    }
}

/// A recorded draw call on the active-stroke surface.
#[derive(Clone, Debug)]
pub(crate) enum Mark {
    Fill { path: BezPath, color: Rgba8 },
    Stroke {
        path: BezPath,
        style: StrokeStyle,
        color: Rgba8,
    },
}

impl Mark {
    fn paint(&self, p: &mut Painter) {
        match self {
            Self::Fill { path, color } => p.fill_path(path, *color),
            Self::Stroke { path, style, color } => p.stroke_path(path, style, *color),
        }
    }
}

/// Rasterize `marks` onto a transparent raster of the given size.
pub(crate) fn rasterize(marks: &[Mark], width: u32, height: u32) -> InkResult<Raster> {
    let mut p = Painter::new(width, height)?;
    for m in marks {
        m.paint(&mut p);
    }
    p.finish()
}

fn dot(center: Point, radius: f64, color: Rgba8) -> Mark {
    Mark::Fill {
        path: kurbo::Circle::new(center, radius.max(0.0)).to_path(0.1),
        color,
    }
}

fn polyline_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
    }
    path
}

/// In-progress input between pointer events.
#[derive(Clone, Debug, Default)]
pub(crate) enum Gesture {
    #[default]
    Idle,
    /// Freehand brush or eraser drag; marks accumulate per sample.
    Stroke {
        points: Vec<StylusPoint>,
        marks: Vec<Mark>,
    },
    Straight { start: Point, end: Point },
    CurveStart { start: Point, cursor: Option<Point> },
    CurveBend { start: Point, end: Point, control: Point },
    Polyline {
        points: Vec<Point>,
        cursor: Option<Point>,
    },
}

impl Gesture {
    pub(crate) fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Starts a freehand or eraser stroke with its initial dot.
    pub(crate) fn begin_stroke(settings: &ToolSettings, p: StylusPoint) -> Self {
        let mark = match settings.tool {
            Tool::Brush { brush } => {
                let dab = brush.dab(settings.size, settings.opacity, p.pressure);
                dot(p.point(), dab.width / 2.0, settings.color.with_opacity(dab.alpha))
            }
            _ => dot(p.point(), settings.size / 2.0, Rgba8::BLACK),
        };
        Self::Stroke {
            points: vec![p],
            marks: vec![mark],
        }
    }

    /// Appends a stroke sample and its segment.
    pub(crate) fn extend_stroke(&mut self, settings: &ToolSettings, p: StylusPoint) {
        let Self::Stroke { points, marks } = self else {
            return;
        };
        points.push(p);
        let mark = match settings.tool {
            Tool::Brush { brush } => {
                let dab = brush.dab(settings.size, settings.opacity, p.pressure);
                next_segment(points).map(|path| Mark::Stroke {
                    path,
                    style: dab.stroke_style(),
                    color: settings.color.with_opacity(dab.alpha),
                })
            }
            _ => {
                // The eraser rubs straight from sample to sample.
                let [.., a, b] = points.as_slice() else {
                    return;
                };
                Some(Mark::Stroke {
                    path: polyline_path(&[a.point(), b.point()]),
                    style: StrokeStyle::round(settings.size.max(0.0)),
                    color: Rgba8::BLACK,
                })
            }
        };
        marks.extend(mark);
    }

    /// Last recorded stroke sample, for touch gating.
    pub(crate) fn last_sample(&self) -> Option<Point> {
        match self {
            Self::Stroke { points, .. } => points.last().map(|p| p.point()),
            Self::Straight { end, .. } => Some(*end),
            _ => None,
        }
    }

    /// Marks for the live preview.
    pub(crate) fn preview_marks(&self, settings: &ToolSettings) -> Vec<Mark> {
        let style = settings.line_style();
        let color = settings.line_color();
        match self {
            Self::Idle => Vec::new(),
            Self::Stroke { marks, .. } => marks.clone(),
            Self::Straight { .. } | Self::CurveBend { .. } => self.final_marks(settings),
            Self::CurveStart { start, cursor } => cursor
                .map(|c| Mark::Stroke {
                    path: polyline_path(&[*start, c]),
                    style: style.with_dashes(&CURVE_GUIDE_DASHES),
                    color: settings.color.with_opacity(settings.opacity * 0.5),
                })
                .into_iter()
                .collect(),
            Self::Polyline { points, cursor } => {
                let mut all = points.clone();
                all.extend(*cursor);
                if all.len() < 2 {
                    return Vec::new();
                }
                vec![Mark::Stroke {
                    path: polyline_path(&all),
                    style,
                    color,
                }]
            }
        }
    }

    /// Marks baked into the layer on commit.
    pub(crate) fn final_marks(&self, settings: &ToolSettings) -> Vec<Mark> {
        let style = settings.line_style();
        let color = settings.line_color();
        match self {
            Self::Idle | Self::CurveStart { .. } => Vec::new(),
            Self::Stroke { marks, .. } => marks.clone(),
            Self::Straight { start, end } => vec![Mark::Stroke {
                path: polyline_path(&[*start, *end]),
                style,
                color,
            }],
            Self::CurveBend {
                start,
                end,
                control,
            } => {
                let mut path = BezPath::new();
                path.move_to(*start);
                path.quad_to(*control, *end);
                vec![Mark::Stroke { path, style, color }]
            }
            Self::Polyline { points, .. } => {
                if points.len() < 2 {
                    return Vec::new();
                }
                vec![Mark::Stroke {
                    path: polyline_path(points),
                    style,
                    color,
                }]
            }
        }
    }

    /// Layer kind a commit of this gesture produces.
    pub(crate) fn layer_kind(&self, settings: &ToolSettings) -> LayerKind {
        match (self, settings.tool) {
            (_, Tool::Eraser) => LayerKind::Eraser,
            (Self::Straight { .. }, _) => LayerKind::Straight,
            (Self::CurveStart { .. } | Self::CurveBend { .. }, _) => LayerKind::Curve,
            (Self::Polyline { .. }, _) => LayerKind::Polyline,
            _ => LayerKind::Freehand,
        }
    }

    /// Adds a polyline vertex, skipping repeats from double-click presses.
    pub(crate) fn push_vertex(points: &mut Vec<Point>, p: Point) {
        if points
            .last()
            .is_some_and(|last| last.distance(p) < POLYLINE_MIN_STEP)
        {
            return;
        }
        points.push(p);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/drawing/tools.rs"]
mod tests;
