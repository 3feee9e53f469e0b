use crate::{
    bubble::{
        model::{Bubble, BubblePatch},
        overlay::{CharacterOverlay, CharacterPatch},
    },
    foundation::{
        core::{Canvas, Rect, Rgba8, Vec2},
        error::{InkError, InkResult},
    },
};

/// Offset applied to duplicated elements.
pub const DUPLICATE_OFFSET: f64 = 24.0;

/// A comic page: canvas, optional background and its placed elements.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub canvas_size: Canvas,
    /// Image key of the background raster, stretched to the canvas.
    #[serde(default, alias = "imageDataUrl", skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Rgba8>,
    #[serde(default)]
    pub bubbles: Vec<Bubble>,
    #[serde(default)]
    pub characters: Vec<CharacterOverlay>,
}

/// Identifies one element on a page by kind and id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementKey {
    Bubble(String),
    Character(String),
}

impl ElementKey {
    pub fn id(&self) -> &str {
        match self {
            Self::Bubble(id) | Self::Character(id) => id,
        }
    }
}

/// A borrowed element in paint order.
#[derive(Clone, Copy, Debug)]
pub enum Drawable<'a> {
    Character(&'a CharacterOverlay),
    Bubble(&'a Bubble),
}

impl Drawable<'_> {
    pub fn z_index(&self) -> i32 {
        match self {
            Self::Character(c) => c.z_index,
            Self::Bubble(b) => b.z_index,
        }
    }

    pub fn key(&self) -> ElementKey {
        match self {
            Self::Character(c) => ElementKey::Character(c.id.clone()),
            Self::Bubble(b) => ElementKey::Bubble(b.id.clone()),
        }
    }

    /// Axis-aligned bounds used for hit testing.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Character(c) => c.rect(),
            Self::Bubble(b) => b.rect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arrange {
    BringToFront,
    SendToBack,
    BringForward,
    SendBackward,
}

impl Page {
    pub fn new(id: impl Into<String>, canvas_size: Canvas) -> Self {
        Self {
            id: id.into(),
            name: None,
            canvas_size,
            background_image: None,
            background_color: None,
            bubbles: Vec::new(),
            characters: Vec::new(),
        }
    }

    pub fn from_json(s: &str) -> InkResult<Self> {
        let page: Self = serde_json::from_str(s).map_err(|e| InkError::serde(e.to_string()))?;
        page.validate()?;
        Ok(page)
    }

    pub fn to_json_pretty(&self) -> InkResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| InkError::serde(e.to_string()))
    }

    pub fn validate(&self) -> InkResult<()> {
        Canvas::new(self.canvas_size.width, self.canvas_size.height)?;
        let mut seen = std::collections::BTreeSet::new();
        for b in &self.bubbles {
            b.validate()?;
            if !seen.insert(("b", b.id.as_str())) {
                return Err(InkError::validation(format!("duplicate bubble id '{}'", b.id)));
            }
        }
        for c in &self.characters {
            c.validate()?;
            if !seen.insert(("c", c.id.as_str())) {
                return Err(InkError::validation(format!(
                    "duplicate character id '{}'",
                    c.id
                )));
            }
        }
        Ok(())
    }

    /// Every image key the page references, deduplicated.
    pub fn image_keys(&self) -> std::collections::BTreeSet<&str> {
        let bubbles = self.bubbles.iter().filter_map(|b| b.template_src.as_deref());
        let characters = self
            .characters
            .iter()
            .map(|c| c.image_url.as_str())
            .filter(|k| !k.is_empty());
        self.background_image
            .as_deref()
            .into_iter()
            .chain(bubbles)
            .chain(characters)
            .collect()
    }

    pub fn bubble(&self, id: &str) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    pub fn bubble_mut(&mut self, id: &str) -> Option<&mut Bubble> {
        self.bubbles.iter_mut().find(|b| b.id == id)
    }

    pub fn character(&self, id: &str) -> Option<&CharacterOverlay> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn character_mut(&mut self, id: &str) -> Option<&mut CharacterOverlay> {
        self.characters.iter_mut().find(|c| c.id == id)
    }

    pub fn contains(&self, key: &ElementKey) -> bool {
        match key {
            ElementKey::Bubble(id) => self.bubble(id).is_some(),
            ElementKey::Character(id) => self.character(id).is_some(),
        }
    }

    pub fn is_locked(&self, key: &ElementKey) -> bool {
        match key {
            ElementKey::Bubble(id) => self.bubble(id).is_some_and(|b| b.locked),
            ElementKey::Character(id) => self.character(id).is_some_and(|c| c.locked),
        }
    }

    /// Applies a patch to the bubble with `id`. Unknown ids are a caller bug.
    pub fn update_bubble(&mut self, id: &str, patch: &BubblePatch) -> bool {
        match self.bubble_mut(id) {
            Some(b) => {
                patch.apply_to(b);
                true
            }
            None => {
                debug_assert!(false, "update of unknown bubble '{id}'");
                tracing::warn!(id, "update of unknown bubble ignored");
                false
            }
        }
    }

    pub fn update_character(&mut self, id: &str, patch: &CharacterPatch) -> bool {
        match self.character_mut(id) {
            Some(c) => {
                patch.apply_to(c);
                true
            }
            None => {
                debug_assert!(false, "update of unknown character '{id}'");
                tracing::warn!(id, "update of unknown character ignored");
                false
            }
        }
    }

    /// Elements in ascending z. Ties keep insertion order with characters
    /// ahead of bubbles.
    pub fn paint_order(&self) -> Vec<Drawable<'_>> {
        let mut out: Vec<Drawable<'_>> = self
            .characters
            .iter()
            .map(Drawable::Character)
            .chain(self.bubbles.iter().map(Drawable::Bubble))
            .collect();
        out.sort_by_key(Drawable::z_index);
        out
    }

    /// Topmost element whose unrotated bounds contain `p`.
    pub fn hit(&self, p: kurbo::Point) -> Option<ElementKey> {
        self.paint_order()
            .iter()
            .rev()
            .find(|d| d.bounds().contains(p))
            .map(Drawable::key)
    }

    pub fn remove(&mut self, key: &ElementKey) -> bool {
        let before = self.bubbles.len() + self.characters.len();
        match key {
            ElementKey::Bubble(id) => self.bubbles.retain(|b| &b.id != id),
            ElementKey::Character(id) => self.characters.retain(|c| &c.id != id),
        }
        before != self.bubbles.len() + self.characters.len()
    }

    /// Copies the element under a fresh id, offset by [`DUPLICATE_OFFSET`] and
    /// raised above every element. Returns the new key.
    pub fn duplicate(&mut self, key: &ElementKey) -> Option<ElementKey> {
        let new_id = uuid::Uuid::new_v4().to_string();
        let z = self.top_z() + 1;
        let offset = Vec2::new(DUPLICATE_OFFSET, DUPLICATE_OFFSET);
        match key {
            ElementKey::Bubble(id) => {
                let mut copy = self.bubble(id)?.clone();
                copy.id.clone_from(&new_id);
                copy.x += offset.x;
                copy.y += offset.y;
                if let Some(tip) = copy.tail_tip() {
                    copy.set_tail_tip(Some(tip + offset));
                }
                if let Some(c) = copy.tail_ctrl1() {
                    copy.set_tail_ctrl1(Some(c + offset));
                }
                if let Some(c) = copy.tail_ctrl2() {
                    copy.set_tail_ctrl2(Some(c + offset));
                }
                copy.z_index = z;
                copy.locked = false;
                self.bubbles.push(copy);
                Some(ElementKey::Bubble(new_id))
            }
            ElementKey::Character(id) => {
                let mut copy = self.character(id)?.clone();
                copy.id.clone_from(&new_id);
                copy.translate(offset);
                copy.z_index = z;
                copy.locked = false;
                self.characters.push(copy);
                Some(ElementKey::Character(new_id))
            }
        }
    }

    fn top_z(&self) -> i32 {
        max_z(
            self.bubbles
                .iter()
                .map(|b| b.z_index)
                .chain(self.characters.iter().map(|c| c.z_index)),
        )
    }

    /// Re-stacks the element in the z space shared by bubbles and
    /// characters. Returns every changed `(key, z)` pair; empty when nothing
    /// moved.
    pub fn arrange(&mut self, key: &ElementKey, op: Arrange) -> Vec<(ElementKey, i32)> {
        let order: Vec<(ElementKey, i32)> = self
            .paint_order()
            .iter()
            .map(|d| (d.key(), d.z_index()))
            .collect();
        let changes = restack(&order, key, op).unwrap_or_default();
        for (k, z) in &changes {
            match k {
                ElementKey::Bubble(id) => {
                    if let Some(b) = self.bubble_mut(id) {
                        b.z_index = *z;
                    }
                }
                ElementKey::Character(id) => {
                    if let Some(c) = self.character_mut(id) {
                        c.z_index = *z;
                    }
                }
            }
        }
        changes
    }

    pub fn toggle_lock(&mut self, key: &ElementKey) -> Option<bool> {
        match key {
            ElementKey::Bubble(id) => self.bubble_mut(id).map(|b| {
                b.locked = !b.locked;
                b.locked
            }),
            ElementKey::Character(id) => self.character_mut(id).map(|c| {
                c.locked = !c.locked;
                c.locked
            }),
        }
    }
}

fn max_z(zs: impl Iterator<Item = i32>) -> i32 {
    zs.fold(0, i32::max)
}

/// z changes needed to apply `op` to `key`. `order` is the paint order.
fn restack(
    order: &[(ElementKey, i32)],
    key: &ElementKey,
    op: Arrange,
) -> Option<Vec<(ElementKey, i32)>> {
    let idx = order.iter().position(|(k, _)| k == key)?;
    let current = order[idx].1;
    match op {
        Arrange::BringToFront => {
            let top = max_z(order.iter().map(|(_, z)| *z)) + 1;
            Some(vec![(key.clone(), top)])
        }
        Arrange::SendToBack => {
            let bottom = order.iter().map(|(_, z)| *z).fold(0, i32::min) - 1;
            Some(vec![(key.clone(), bottom)])
        }
        Arrange::BringForward | Arrange::SendBackward => {
            let neighbor = if op == Arrange::BringForward {
                order.get(idx + 1)?
            } else {
                order.get(idx.checked_sub(1)?)?
            };
            Some(vec![
                (key.clone(), neighbor.1),
                (neighbor.0.clone(), current),
            ])
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bubble/page.rs"]
mod tests;
