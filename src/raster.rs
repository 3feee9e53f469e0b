pub(crate) mod blend;
pub(crate) mod encode;
pub(crate) mod painter;
pub(crate) mod surface;
