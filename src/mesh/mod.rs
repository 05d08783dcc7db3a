pub mod geometry;
pub mod primitives;

pub use geometry::{Mesh, Vertex, FLOATS_PER_VERTEX};
