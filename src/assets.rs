pub(crate) mod decode;
pub(crate) mod fonts;
pub(crate) mod store;

/// Decoded images and registered fonts a render reads from.
#[derive(Debug, Default)]
pub struct Assets {
    pub images: store::ImageStore,
    pub fonts: fonts::FontBook,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }
}
