use std::sync::Arc;

use crate::raster::{blend::Blend, surface::Raster};

/// What produced a layer's pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Freehand,
    Straight,
    Curve,
    Polyline,
    Text,
    Eraser,
}

impl LayerKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Freehand => "Brush",
            Self::Straight => "Line",
            Self::Curve => "Curve",
            Self::Polyline => "Polyline",
            Self::Text => "Text",
            Self::Eraser => "Eraser",
        }
    }
}

/// A committed, immutable raster with its stacking properties.
#[derive(Clone, Debug)]
pub struct DrawingLayer {
    pub id: String,
    pub kind: LayerKind,
    pub name: String,
    pub z_index: i32,
    pub opacity: f32,
    pub visible: bool,
    pub blend: Blend,
    pub raster: Arc<Raster>,
}

impl DrawingLayer {
    pub fn new(kind: LayerKind, raster: Raster, blend: Blend, z_index: i32) -> Self {
        let blend = if kind == LayerKind::Eraser {
            Blend::DestOut
        } else {
            blend
        };
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            name: format!("{} {z_index}", kind.label()),
            z_index,
            opacity: 1.0,
            visible: true,
            blend,
            raster: Arc::new(raster),
        }
    }

    /// Opacity used when compositing. Erasers always remove at full strength.
    pub fn effective_opacity(&self) -> f32 {
        if self.kind == LayerKind::Eraser {
            1.0
        } else {
            self.opacity
        }
    }
}

/// Layers in creation order, plus the bounded redo history.
#[derive(Clone, Debug, Default)]
pub struct LayerStack {
    layers: Vec<DrawingLayer>,
    redo: Vec<DrawingLayer>,
    history_limit: usize,
}

impl LayerStack {
    pub fn new(history_limit: usize) -> Self {
        Self {
            layers: Vec::new(),
            redo: Vec::new(),
            history_limit,
        }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Creation order.
    pub fn layers(&self) -> &[DrawingLayer] {
        &self.layers
    }

    pub fn get(&self, id: &str) -> Option<&DrawingLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut DrawingLayer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// `max_z + 1`, starting at 1 on an empty stack.
    pub fn next_z(&self) -> i32 {
        self.layers.iter().map(|l| l.z_index).max().unwrap_or(0) + 1
    }

    /// Ascending z; equal z keeps creation order.
    pub fn paint_order(&self) -> Vec<&DrawingLayer> {
        let mut out: Vec<&DrawingLayer> = self.layers.iter().collect();
        out.sort_by_key(|l| l.z_index);
        out
    }

    /// Adds a freshly committed layer. New work invalidates redo.
    pub fn push(&mut self, layer: DrawingLayer) {
        self.redo.clear();
        self.layers.push(layer);
    }

    /// Removes the most recently created layer, keeping it for redo while
    /// the history has room. Returns the removed id.
    pub fn undo(&mut self) -> Option<String> {
        let layer = self.layers.pop()?;
        let id = layer.id.clone();
        if self.history_limit > 0 {
            if self.redo.len() >= self.history_limit {
                self.redo.remove(0);
            }
            self.redo.push(layer);
        }
        Some(id)
    }

    pub fn redo(&mut self) -> Option<&DrawingLayer> {
        let layer = self.redo.pop()?;
        self.layers.push(layer);
        self.layers.last()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn remove(&mut self, id: &str) -> Option<DrawingLayer> {
        let idx = self.layers.iter().position(|l| l.id == id)?;
        Some(self.layers.remove(idx))
    }

    pub fn clear(&mut self) {
        self.layers.clear();
        self.redo.clear();
    }

    /// No-op for eraser layers. Returns whether the layer changed.
    pub fn set_opacity(&mut self, id: &str, opacity: f32) -> bool {
        match self.get_mut(id) {
            Some(l) if l.kind != LayerKind::Eraser => {
                l.opacity = if opacity.is_finite() {
                    opacity.clamp(0.0, 1.0)
                } else {
                    1.0
                };
                true
            }
            _ => false,
        }
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        self.get_mut(id).map(|l| l.visible = visible).is_some()
    }

    pub fn rename(&mut self, id: &str, name: impl Into<String>) -> bool {
        let name = name.into();
        self.get_mut(id).map(|l| l.name = name).is_some()
    }

    /// Swaps z with the next layer up (`up`) or down in paint order.
    pub fn shift(&mut self, id: &str, up: bool) -> bool {
        let order: Vec<(String, i32)> = self
            .paint_order()
            .iter()
            .map(|l| (l.id.clone(), l.z_index))
            .collect();
        let Some(idx) = order.iter().position(|(lid, _)| lid == id) else {
            return false;
        };
        let other = if up {
            order.get(idx + 1)
        } else {
            idx.checked_sub(1).and_then(|i| order.get(i))
        };
        let Some((other_id, other_z)) = other.cloned() else {
            return false;
        };
        let z = order[idx].1;
        if z == other_z {
            // Equal z: separate them so the swap is visible.
            let nudged = if up { other_z + 1 } else { other_z - 1 };
            if let Some(l) = self.get_mut(id) {
                l.z_index = nudged;
            }
            return true;
        }
        if let Some(l) = self.get_mut(id) {
            l.z_index = other_z;
        }
        if let Some(l) = self.get_mut(&other_id) {
            l.z_index = z;
        }
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/drawing/layer.rs"]
mod tests;
