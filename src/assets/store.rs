use std::{collections::BTreeMap, sync::Arc};

use crate::{assets::decode::decode_image, raster::surface::Raster};

/// Load state of one keyed image (background, overlay art, bubble template).
#[derive(Clone, Debug)]
pub enum ImageSlot {
    /// Requested; the element renders as absent until completion.
    Pending,
    Ready(Arc<Raster>),
    /// Fetch or decode failed; the element renders blank and is never retried.
    Failed(String),
}

/// Decoded images keyed by the reference strings stored in the page model.
///
/// Fetching is the host's job. The host calls [`ImageStore::complete`] once per
/// request; a `true` return means exactly one re-render is due.
#[derive(Debug, Default)]
pub struct ImageStore {
    slots: BTreeMap<String, ImageSlot>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as pending. Returns false if the key is already known.
    pub fn request(&mut self, key: &str) -> bool {
        if self.slots.contains_key(key) {
            return false;
        }
        self.slots.insert(key.to_string(), ImageSlot::Pending);
        true
    }

    /// Resolve a pending request with the fetched bytes or a fetch error.
    ///
    /// Decode failures never escape: they park the slot in
    /// [`ImageSlot::Failed`] and log a warning. Returns whether the visible
    /// state changed.
    pub fn complete(&mut self, key: &str, fetched: Result<&[u8], String>) -> bool {
        match self.slots.get(key) {
            None | Some(ImageSlot::Pending) => {}
            Some(_) => {
                tracing::debug!(key, "ignoring completion for already resolved image");
                return false;
            }
        }

        let slot = match fetched.and_then(|bytes| decode_image(bytes).map_err(|e| e.to_string())) {
            Ok(raster) => ImageSlot::Ready(Arc::new(raster)),
            Err(reason) => {
                tracing::warn!(key, %reason, "image unavailable; rendering blank");
                ImageSlot::Failed(reason)
            }
        };
        self.slots.insert(key.to_string(), slot);
        true
    }

    /// Insert an already decoded raster.
    pub fn insert(&mut self, key: &str, raster: Raster) {
        self.slots
            .insert(key.to_string(), ImageSlot::Ready(Arc::new(raster)));
    }

    pub fn slot(&self, key: &str) -> Option<&ImageSlot> {
        self.slots.get(key)
    }

    /// The decoded raster, if `key` is ready.
    pub fn get(&self, key: &str) -> Option<&Arc<Raster>> {
        match self.slots.get(key) {
            Some(ImageSlot::Ready(r)) => Some(r),
            _ => None,
        }
    }

    pub fn pending_keys(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().filter_map(|(k, v)| match v {
            ImageSlot::Pending => Some(k.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
