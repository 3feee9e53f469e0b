use std::sync::Arc;

use kurbo::Shape;

use crate::{
    assets::fonts::TextBrush,
    foundation::{
        core::{Affine, BezPath, Point, Rect, Rgba8},
        error::{InkError, InkResult},
    },
    raster::surface::Raster,
};

pub use kurbo::{Cap, Join};

/// Stroke parameters for [`Painter::stroke_path`].
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f64,
    pub cap: Cap,
    pub join: Join,
    pub dashes: Vec<f64>,
}

impl StrokeStyle {
    pub fn round(width: f64) -> Self {
        Self {
            width,
            cap: Cap::Round,
            join: Join::Round,
            dashes: Vec::new(),
        }
    }

    pub fn with_cap(mut self, cap: Cap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }

    pub fn with_dashes(mut self, dashes: &[f64]) -> Self {
        self.dashes = dashes.to_vec();
        self
    }

    /// Outline of `path` stroked with this style, as a fillable path.
    pub fn outline(&self, path: &BezPath) -> BezPath {
        let mut stroke = kurbo::Stroke::new(self.width.max(0.0))
            .with_caps(self.cap)
            .with_join(self.join);
        if !self.dashes.is_empty() {
            stroke = stroke.with_dashes(0.0, self.dashes.iter().copied());
        }
        kurbo::stroke(
            path.iter(),
            &stroke,
            &kurbo::StrokeOpts::default(),
            STROKE_TOLERANCE,
        )
    }
}

const STROKE_TOLERANCE: f64 = 0.1;

/// Immediate-mode rasterizer over a vello_cpu render context.
///
/// Draw calls accumulate into the context; [`Painter::finish`] renders them
/// onto a transparent raster of the painter's size.
pub struct Painter {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    transform: Affine,
}

impl Painter {
    pub fn new(width: u32, height: u32) -> InkResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| InkError::render("painter width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| InkError::render("painter height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(InkError::render("painter width/height must be > 0"));
        }
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            width: w,
            height: h,
            transform: Affine::IDENTITY,
        })
    }

    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    pub fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    pub fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        if color.a == 0 {
            return;
        }
        self.ctx.set_transform(affine_to_cpu(self.transform));
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    pub fn stroke_path(&mut self, path: &BezPath, style: &StrokeStyle, color: Rgba8) {
        if style.width <= 0.0 {
            return;
        }
        let outline = style.outline(path);
        self.fill_path(&outline, color);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.fill_path(&rect.to_path(0.1), color);
    }

    /// Stretch `image` into `dest`.
    pub fn draw_image(&mut self, image: &Raster, dest: Rect, opacity: f32) -> InkResult<()> {
        if opacity <= 0.0 || dest.width() <= 0.0 || dest.height() <= 0.0 {
            return Ok(());
        }
        let iw = f64::from(image.width());
        let ih = f64::from(image.height());
        let placement = self.transform
            * Affine::translate(dest.origin().to_vec2())
            * Affine::scale_non_uniform(dest.width() / iw, dest.height() / ih);

        let pixmap = raster_to_pixmap(image)?;
        self.ctx.set_transform(affine_to_cpu(placement));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity);
        }
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        if opacity < 1.0 {
            self.ctx.pop_layer();
        }
        Ok(())
    }

    /// Fill every glyph run of a shaped layout with its own brush, placing the
    /// layout's top-left corner at `origin`.
    pub fn fill_layout(
        &mut self,
        layout: &parley::Layout<TextBrush>,
        font: &vello_cpu::peniko::FontData,
        origin: Point,
    ) {
        self.ctx.set_transform(affine_to_cpu(
            self.transform * Affine::translate(origin.to_vec2()),
        ));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Rasterize everything drawn so far onto a transparent raster.
    pub fn finish(mut self) -> InkResult<Raster> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        Raster::from_premul(
            u32::from(self.width),
            u32::from(self.height),
            pixmap.data_as_u8_slice().to_vec(),
        )
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn raster_to_pixmap(raster: &Raster) -> InkResult<vello_cpu::Pixmap> {
    let w: u16 = raster
        .width()
        .try_into()
        .map_err(|_| InkError::render("image width exceeds u16"))?;
    let h: u16 = raster
        .height()
        .try_into()
        .map_err(|_| InkError::render("image height exceeds u16"))?;

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(raster.width() as usize * raster.height() as usize);
    for px in raster.data().chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/painter.rs"]
mod tests;
