//! Spatial primitives for the encounter playfield

pub mod position;

pub use position::{nearest, Position};
