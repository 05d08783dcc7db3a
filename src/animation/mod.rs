//! Animation module for the tree/scatter morph
//!
//! A single smoothed progress value drives every particle and ornament.
//! Foliage blending happens per vertex on the GPU; ornament transforms
//! are composed here every frame.

mod morph;
mod mailbox;
mod motion;

pub use morph::{FrameClock, FrameContext, MorphState, TreeMode};
pub use mailbox::ModeMailbox;
pub use motion::{
    compose_instance, drift_offset, foliage_vertex, spin_rotation, FoliageVertex, DRIFT_CUTOFF,
};
