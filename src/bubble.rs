pub(crate) mod chrome;
pub(crate) mod model;
pub(crate) mod overlay;
pub(crate) mod page;
pub(crate) mod render;
pub(crate) mod text;
