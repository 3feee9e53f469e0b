use crate::foundation::{
    core::{Affine, Point, Rect, Vec2},
    error::{InkError, InkResult},
};

/// A placed character image with its own rotation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CharacterOverlay {
    pub id: String,
    /// Key of the image in the page's [`crate::ImageStore`].
    pub image_url: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub original_width: f64,
    pub original_height: f64,
    pub label: String,
    /// Radians, clockwise in canvas space. Unbounded.
    pub rotation: f64,
    pub z_index: i32,
    pub locked: bool,
}

impl Default for CharacterOverlay {
    fn default() -> Self {
        Self {
            id: String::new(),
            image_url: String::new(),
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            original_width: 100.0,
            original_height: 100.0,
            label: String::new(),
            rotation: 0.0,
            z_index: 0,
            locked: false,
        }
    }
}

impl CharacterOverlay {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Maps the unrotated box into canvas space (rotation about the center).
    pub fn transform(&self) -> Affine {
        Affine::rotate_about(self.rotation, self.center())
    }

    /// Corners in canvas space: tl, tr, br, bl.
    pub fn corners(&self) -> [Point; 4] {
        let r = self.rect();
        let t = self.transform();
        [
            t * Point::new(r.x0, r.y0),
            t * Point::new(r.x1, r.y0),
            t * Point::new(r.x1, r.y1),
            t * Point::new(r.x0, r.y1),
        ]
    }

    /// Rotate handle position, `offset` px above the top edge midpoint.
    pub fn rotate_handle(&self, offset: f64) -> Point {
        let top_mid = Point::new(self.center().x, self.y - offset);
        self.transform() * top_mid
    }

    /// `original_width / original_height`, falling back to the current box.
    pub fn aspect(&self) -> f64 {
        let (w, h) = if self.original_width > 0.0 && self.original_height > 0.0 {
            (self.original_width, self.original_height)
        } else {
            (self.width, self.height)
        };
        if h > 0.0 && w.is_finite() && h.is_finite() {
            w / h
        } else {
            1.0
        }
    }

    pub fn translate(&mut self, d: Vec2) {
        self.x += d.x;
        self.y += d.y;
    }

    pub fn validate(&self) -> InkResult<()> {
        if self.id.trim().is_empty() {
            return Err(InkError::validation("character id must be non-empty"));
        }
        for (name, v) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
            ("rotation", self.rotation),
        ] {
            if !v.is_finite() {
                return Err(InkError::validation(format!(
                    "character '{}' {name} must be finite",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CharacterPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub z_index: Option<i32>,
    pub locked: Option<bool>,
}

impl CharacterPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, c: &mut CharacterOverlay) {
        if let Some(v) = self.x {
            c.x = v;
        }
        if let Some(v) = self.y {
            c.y = v;
        }
        if let Some(v) = self.width {
            c.width = v;
        }
        if let Some(v) = self.height {
            c.height = v;
        }
        if let Some(v) = self.rotation {
            c.rotation = v;
        }
        if let Some(z) = self.z_index {
            c.z_index = z;
        }
        if let Some(l) = self.locked {
            c.locked = l;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bubble/overlay.rs"]
mod tests;
