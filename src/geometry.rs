pub(crate) mod dots;
pub(crate) mod tail;
