//! Procedural layout of the tree
//!
//! Everything here runs once at startup. Each entity gets two fixed
//! positions, one inside the cone and one inside the scatter cube, and
//! the animation only ever blends between them.

pub mod sampling;
pub mod foliage;
pub mod ornaments;

pub use sampling::{entropy_seed, ConeVolume};
pub use foliage::{FoliageCloud, Particle, ParticleCategory, FOLIAGE_FLOATS_PER_PARTICLE};
pub use ornaments::{OrnamentGroup, OrnamentInstance, OrnamentSet};
