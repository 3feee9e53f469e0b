pub(crate) mod corners;
pub(crate) mod flash;
pub(crate) mod generate;
pub(crate) mod params;
