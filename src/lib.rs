//! Inkpanel renders and edits comic pages.
//!
//! - Procedural speech-bubble outlines with seam-free tails
//! - A page compositor for bubbles, character overlays and selection chrome
//! - [`EditorSession`], a reducer that turns pointer input into page edits
//! - [`DrawingEngine`], a layered paint surface with brushes, line tools and an eraser
//!
//! Everything renders on the CPU into a premultiplied [`Raster`].
#![forbid(unsafe_code)]

mod assets;
mod foundation;

pub(crate) mod geometry;
pub(crate) mod raster;
pub(crate) mod shapes;
/// Page model and compositor.
pub mod bubble;
/// Layered freehand drawing.
pub mod drawing;
/// Direct-manipulation editing of a page.
pub mod interaction;

pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Rgba8Premul, Vec2};
pub use crate::foundation::error::{InkError, InkResult};
pub use crate::foundation::math::{SeedFamily, SeededRng};

pub use crate::assets::Assets;
pub use crate::assets::decode::decode_image;
pub use crate::assets::fonts::{FontBook, approx_advance};
pub use crate::assets::store::{ImageSlot, ImageStore};

pub use crate::raster::blend::Blend;
pub use crate::raster::encode::{ExportFormat, encode_raster};
pub use crate::raster::painter::{Cap, Join, Painter, StrokeStyle};
pub use crate::raster::surface::Raster;

pub use crate::shapes::generate::{
    Accent, AccentInk, AccentLayer, BodyStroke, ShapeGeometry, ShapeSpec, generate_path,
    text_width_fraction,
};
pub use crate::shapes::params::{BubbleStyle, ShapeParams};

pub use crate::geometry::dots::{Dot, tail_dots};
pub use crate::geometry::tail::{
    TailGeometry, default_tail_tip, resolved_tail_tip, tail_geometry,
};

pub use crate::bubble::chrome::{Corner, ResizeHandle, Selection};
pub use crate::bubble::model::{Bubble, BubblePatch, DrawMode, TailDirection, TailStyle};
pub use crate::bubble::overlay::{CharacterOverlay, CharacterPatch};
pub use crate::bubble::page::{Arrange, Drawable, ElementKey, Page};
pub use crate::bubble::render::{RenderSettings, export_image, render_page};
pub use crate::bubble::text::{ApproxMeasure, TextBlock, TextLine, TextMeasure, wrap_text};

pub use crate::interaction::config::EditorConfig;
pub use crate::interaction::hit::{Cursor, DragMode};
pub use crate::interaction::session::{
    EditorCommand, EditorEvent, EditorSession, resize_keep_aspect, resize_rect,
};

pub use crate::drawing::brush::{BrushDab, BrushKind, StylusPoint};
pub use crate::drawing::document::{DrawOp, DrawingDocument};
pub use crate::drawing::engine::{DrawingEngine, DrawingEvent};
pub use crate::drawing::layer::{DrawingLayer, LayerKind, LayerStack};
pub use crate::drawing::tools::{LineTool, Tool, ToolSettings};
