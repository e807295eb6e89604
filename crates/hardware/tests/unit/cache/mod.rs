/// Geometry derivation and rejection rules.
pub mod geometry;
