pub(crate) mod brush;
pub(crate) mod document;
pub(crate) mod engine;
pub(crate) mod layer;
pub(crate) mod tools;
