use std::collections::BTreeSet;

use crate::{
    assets::{Assets, fonts::FontBook, store::ImageStore},
    bubble::{
        chrome::{Selection, draw_bubble_selection, draw_character_selection},
        model::Bubble,
        overlay::CharacterOverlay,
        page::{Drawable, Page},
        text::layout_bubble_text,
    },
    foundation::{
        core::{Point, Rect, Rgba8},
        error::InkResult,
    },
    geometry::{
        dots::{Dot, tail_dots},
        tail::{TailGeometry, tail_geometry},
    },
    raster::{
        blend::Blend,
        encode::{ExportFormat, encode_raster},
        painter::{Painter, StrokeStyle},
        surface::Raster,
    },
    shapes::{
        generate::{AccentInk, AccentLayer, BodyStroke, Frame, ShapeGeometry, generate_path},
        params::BubbleStyle,
    },
};

pub const WATERMARK_FONT_SIZE: f64 = 12.0;
pub const WATERMARK_MARGIN: f64 = 8.0;
/// Default distance of the overlay rotate handle above the top edge.
pub const ROTATE_HANDLE_OFFSET: f64 = 16.0;
const DOT_FILL: Rgba8 = Rgba8::rgba(255, 255, 255, 242);
const DOT_STROKE_FACTOR: f64 = 0.8;

/// Page-level render options.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderSettings {
    /// Color the canvas is cleared to before the page background.
    pub clear_color: Rgba8,
    pub show_selection: bool,
    pub selection_color: Rgba8,
    pub handle_fill: Rgba8,
    pub rotate_handle_offset: f64,
    /// Text stamped in the bottom-right corner, if any.
    pub watermark: Option<String>,
    pub watermark_color: Rgba8,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_color: Rgba8::WHITE,
            show_selection: true,
            selection_color: Rgba8::rgb(0x17, 0xcf, 0xb9),
            handle_fill: Rgba8::rgba(255, 255, 255, 245),
            rotate_handle_offset: ROTATE_HANDLE_OFFSET,
            watermark: None,
            watermark_color: Rgba8::rgba(0, 0, 0, 110),
        }
    }
}

/// Renders `page` to a raster of its canvas size.
///
/// Elements paint in z order; bubbles sharing a group id paint together at
/// the slot of their lowest member. Images that are not ready yet render as
/// absent.
#[tracing::instrument(skip_all, fields(page = %page.id, bubbles = page.bubbles.len()))]
pub fn render_page(
    page: &Page,
    selection: &Selection,
    assets: &mut Assets,
    settings: &RenderSettings,
) -> InkResult<Raster> {
    let canvas = page.canvas_size;
    let mut target = Raster::new(canvas.width, canvas.height)?;
    target.clear(settings.clear_color.premul());

    if let Some(bg) = page.background_color {
        paint_layer(&mut target, Blend::Over, 1.0, |p| {
            p.fill_rect(canvas.rect(), bg);
            Ok(())
        })?;
    }
    if let Some(bg) = page
        .background_image
        .as_deref()
        .and_then(|key| assets.images.get(key))
    {
        paint_layer(&mut target, Blend::Over, 1.0, |p| {
            p.draw_image(bg, canvas.rect(), 1.0)
        })?;
    }

    let order = page.paint_order();
    let mut painted_groups = BTreeSet::new();
    for drawable in &order {
        match drawable {
            Drawable::Character(c) => render_character(&mut target, c, &assets.images)?,
            Drawable::Bubble(b) => match b.group_id.as_deref() {
                None => render_bubbles(&mut target, &[*b], assets)?,
                Some(group) => {
                    if !painted_groups.insert(group) {
                        continue;
                    }
                    let members: Vec<&Bubble> = order
                        .iter()
                        .filter_map(|d| match d {
                            Drawable::Bubble(m) if m.group_id.as_deref() == Some(group) => {
                                Some(*m)
                            }
                            _ => None,
                        })
                        .collect();
                    tracing::trace!(group, members = members.len(), "rendering bubble group");
                    render_bubbles(&mut target, &members, assets)?;
                }
            },
        }
    }

    if settings.show_selection && !selection.is_empty() {
        let bubble = selection.bubble.as_deref().and_then(|id| page.bubble(id));
        let character = selection.character.as_deref().and_then(|id| page.character(id));
        paint_layer(&mut target, Blend::Over, 1.0, |p| {
            if let Some(b) = bubble {
                draw_bubble_selection(p, b, settings.selection_color, settings.handle_fill);
            }
            if let Some(c) = character {
                draw_character_selection(
                    p,
                    c,
                    settings.rotate_handle_offset,
                    settings.selection_color,
                    settings.handle_fill,
                );
            }
            Ok(())
        })?;
    }

    if let Some(text) = settings.watermark.as_deref().filter(|t| !t.is_empty()) {
        let color = settings.watermark_color;
        let canvas_rect = canvas.rect();
        let fonts = &mut assets.fonts;
        paint_layer(&mut target, Blend::Over, 1.0, |p| {
            draw_watermark(p, fonts, text, color, canvas_rect)
        })?;
    }

    Ok(target)
}

/// [`render_page`] followed by encoding.
pub fn export_image(
    page: &Page,
    selection: &Selection,
    assets: &mut Assets,
    settings: &RenderSettings,
    format: ExportFormat,
) -> InkResult<Vec<u8>> {
    let raster = render_page(page, selection, assets, settings)?;
    encode_raster(&raster, format)
}

/// Paints `draw` onto a fresh transparent raster the size of `target`.
fn paint_raster(
    target: &Raster,
    draw: impl FnOnce(&mut Painter) -> InkResult<()>,
) -> InkResult<Raster> {
    let mut painter = Painter::new(target.width(), target.height())?;
    draw(&mut painter)?;
    painter.finish()
}

fn paint_layer(
    target: &mut Raster,
    blend: Blend,
    opacity: f32,
    draw: impl FnOnce(&mut Painter) -> InkResult<()>,
) -> InkResult<()> {
    let layer = paint_raster(target, draw)?;
    target.composite(&layer, blend, opacity)
}

fn render_character(
    target: &mut Raster,
    overlay: &CharacterOverlay,
    images: &ImageStore,
) -> InkResult<()> {
    let Some(image) = images.get(&overlay.image_url) else {
        return Ok(());
    };
    paint_layer(target, Blend::Over, 1.0, |p| {
        p.set_transform(overlay.transform());
        p.draw_image(image, overlay.rect(), 1.0)
    })
}

/// A bubble with its solved geometry.
struct Prepared<'a> {
    bubble: &'a Bubble,
    shape: ShapeGeometry,
    tail: Option<TailGeometry>,
    dots: Vec<Dot>,
    frame: Rect,
}

impl<'a> Prepared<'a> {
    fn new(bubble: &'a Bubble) -> Self {
        let shape = generate_path(bubble.rect(), &bubble.shape_spec(), bubble.seed);
        let tail = bubble
            .tail_style
            .is_pointed()
            .then(|| tail_geometry(bubble));
        Self {
            bubble,
            shape,
            tail,
            dots: tail_dots(bubble),
            frame: Frame::new(bubble.rect()).rect,
        }
    }

    fn fills(&self) -> bool {
        self.bubble.draw_mode.fills()
    }

    fn strokes(&self) -> bool {
        self.bubble.draw_mode.strokes()
    }

    /// Body and tail silhouette.
    fn fill_silhouette(&self, p: &mut Painter, color: Rgba8) {
        if self.shape.fill_body {
            p.fill_path(&self.shape.outline, color);
        }
        if let Some(tail) = &self.tail {
            p.fill_path(&tail.outline(), color);
        }
    }

    fn body_stroke(&self) -> Option<StrokeStyle> {
        let base = StrokeStyle::round(self.bubble.stroke_width).with_join(self.shape.join);
        match &self.shape.body_stroke {
            BodyStroke::Solid => Some(base),
            BodyStroke::Dashed(d) => Some(base.with_dashes(d)),
            BodyStroke::Hidden => None,
        }
    }

    /// Filled accents follow the ink's draw mode only when they are plain
    /// fills; stroked accents are skipped whenever strokes are.
    fn draw_accents(&self, p: &mut Painter, layer: AccentLayer) {
        let b = self.bubble;
        for accent in self.shape.accents.iter().filter(|a| a.layer == layer) {
            let color = match accent.ink {
                AccentInk::Fill if !self.fills() => continue,
                AccentInk::Fill => b.fill_color.with_opacity(b.fill_opacity),
                AccentInk::Stroke => b.stroke_color,
            };
            match accent.stroke_width {
                None => p.fill_path(&accent.path, color),
                Some(_) if !self.strokes() => {}
                Some(w) => p.stroke_path(
                    &accent.path,
                    &StrokeStyle::round(w).with_join(self.shape.join),
                    color,
                ),
            }
        }
    }

    fn draw_dots(&self, p: &mut Painter) {
        let style = StrokeStyle::round(self.bubble.stroke_width * DOT_STROKE_FACTOR);
        for dot in &self.dots {
            if self.fills() {
                p.fill_path(&dot.outline, DOT_FILL);
            }
            if self.strokes() {
                p.stroke_path(&dot.outline, &style, self.bubble.stroke_color);
            }
        }
    }
}

/// Paints one bubble, or a group of bubbles as a single seamless shape.
///
/// Each member's stroke layer loses the arc under its own tail and every
/// region covered by another member's fill, so overlaps show no seam.
fn render_bubbles(target: &mut Raster, members: &[&Bubble], assets: &mut Assets) -> InkResult<()> {
    if members.is_empty() {
        return Ok(());
    }
    let prepared: Vec<Prepared<'_>> = members.iter().map(|b| Prepared::new(b)).collect();

    if prepared.iter().any(|m| !m.shape.accents.is_empty()) {
        paint_layer(target, Blend::Over, 1.0, |p| {
            for m in &prepared {
                m.draw_accents(p, AccentLayer::Under);
            }
            Ok(())
        })?;
    }

    for m in prepared.iter().filter(|m| m.bubble.style == BubbleStyle::Image) {
        let template = m
            .bubble
            .template_src
            .as_deref()
            .and_then(|key| assets.images.get(key));
        if let Some(image) = template {
            paint_layer(target, Blend::Over, 1.0, |p| p.draw_image(image, m.frame, 1.0))?;
        }
    }

    if prepared.iter().any(Prepared::fills) {
        paint_layer(target, Blend::Over, 1.0, |p| {
            for m in prepared.iter().filter(|m| m.fills()) {
                let b = m.bubble;
                m.fill_silhouette(p, b.fill_color.with_opacity(b.fill_opacity));
            }
            Ok(())
        })?;
    }

    for (i, m) in prepared.iter().enumerate() {
        if !m.strokes() {
            continue;
        }
        let mut strokes = paint_raster(target, |p| {
            if let Some(style) = m.body_stroke() {
                p.stroke_path(&m.shape.outline, &style, m.bubble.stroke_color);
            }
            Ok(())
        })?;
        if let Some(tail) = &m.tail {
            let wedge = paint_raster(target, |p| {
                p.fill_path(&tail.erase_wedge(), Rgba8::BLACK);
                Ok(())
            })?;
            strokes.composite(&wedge, Blend::DestOut, 1.0)?;
            let sides = paint_raster(target, |p| {
                let style = StrokeStyle::round(m.bubble.stroke_width);
                p.stroke_path(&tail.sides(), &style, m.bubble.stroke_color);
                Ok(())
            })?;
            strokes.composite(&sides, Blend::Over, 1.0)?;
        }
        if prepared.len() > 1 {
            let others = paint_raster(target, |p| {
                for (j, o) in prepared.iter().enumerate() {
                    if j != i && o.fills() {
                        o.fill_silhouette(p, Rgba8::BLACK);
                    }
                }
                Ok(())
            })?;
            strokes.composite(&others, Blend::DestOut, 1.0)?;
        }
        target.composite(&strokes, Blend::Over, 1.0)?;
    }

    paint_layer(target, Blend::Over, 1.0, |p| {
        for m in &prepared {
            m.draw_accents(p, AccentLayer::Over);
            m.draw_dots(p);
        }
        Ok(())
    })?;

    if prepared.iter().any(|m| !m.bubble.text.is_empty()) {
        let fonts = &mut assets.fonts;
        if !fonts.has_fonts() {
            tracing::debug!("no fonts registered; bubble text skipped");
            return Ok(());
        }
        paint_layer(target, Blend::Over, 1.0, |p| {
            for m in &prepared {
                draw_text(p, m.bubble, m.frame, fonts)?;
            }
            Ok(())
        })?;
    }
    Ok(())
}

fn draw_text(p: &mut Painter, bubble: &Bubble, body: Rect, fonts: &mut FontBook) -> InkResult<()> {
    let block = layout_bubble_text(bubble, body, fonts);
    for line in block.lines.iter().filter(|l| !l.text.is_empty()) {
        let Some(shaped) =
            fonts.shape_line(&bubble.font_key, &line.text, block.font_size as f32, Rgba8::INK)?
        else {
            continue;
        };
        let w = f64::from(shaped.layout.width());
        let h = f64::from(shaped.layout.height());
        let origin = Point::new(line.center.x - w / 2.0, line.center.y - h / 2.0);
        p.fill_layout(&shaped.layout, &shaped.font, origin);
    }
    Ok(())
}

fn draw_watermark(
    p: &mut Painter,
    fonts: &mut FontBook,
    text: &str,
    color: Rgba8,
    canvas: Rect,
) -> InkResult<()> {
    let Some(shaped) = fonts.shape_line("", text, WATERMARK_FONT_SIZE as f32, color)? else {
        tracing::debug!("no fonts registered; watermark skipped");
        return Ok(());
    };
    let w = f64::from(shaped.layout.width());
    let h = f64::from(shaped.layout.height());
    let origin = Point::new(
        canvas.x1 - WATERMARK_MARGIN - w,
        canvas.y1 - WATERMARK_MARGIN - h,
    );
    p.fill_layout(&shaped.layout, &shaped.font, origin);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/bubble/render.rs"]
mod tests;
