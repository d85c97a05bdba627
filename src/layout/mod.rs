//! Layout core: sizing, candidate generation, collision grid and the per-word search.

pub(crate) mod glyph;
pub(crate) mod grid;
pub(crate) mod placement;
pub(crate) mod radial;
pub(crate) mod rotation;
pub(crate) mod shape;
pub(crate) mod size;
