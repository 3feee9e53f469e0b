pub(crate) mod config;
pub(crate) mod hit;
pub(crate) mod session;
