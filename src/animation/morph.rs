//! Morph progress state machine
//!
//! Two logical targets, switched only by an explicit toggle. Progress
//! chases the active target by exponential smoothing and never snaps.

use wasm_bindgen::prelude::*;
use crate::math::lerp;

/// Which formation the tree is heading towards
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeMode {
    /// Assembled cone (progress -> 1)
    TreeShape = 0,
    /// Loose cloud (progress -> 0)
    Scattered = 1,
}

impl Default for TreeMode {
    fn default() -> Self {
        TreeMode::TreeShape
    }
}

impl TreeMode {
    pub fn target_progress(&self) -> f32 {
        match self {
            TreeMode::TreeShape => 1.0,
            TreeMode::Scattered => 0.0,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            TreeMode::TreeShape => TreeMode::Scattered,
            TreeMode::Scattered => TreeMode::TreeShape,
        }
    }
}

/// Per-frame timing handed to the update
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameContext {
    /// Seconds since the scene started
    pub time: f32,
    /// Seconds since the previous frame
    pub dt: f32,
}

impl FrameContext {
    pub fn new(time: f32, dt: f32) -> Self {
        Self { time, dt }
    }
}

/// Accumulates frame deltas into elapsed time.
///
/// The running total is kept in `f64`; an `f32` sum stops advancing at
/// 1/60 s steps after a few days.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    elapsed: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, dt: f32) -> FrameContext {
        // Hosts report a negative or NaN delta after tab suspension
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += f64::from(dt);
        FrameContext::new(self.elapsed as f32, dt)
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

/// The single mutable value behind the whole animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphState {
    progress: f32,
    mode: TreeMode,
    smoothing: f32,
}

impl MorphState {
    /// Starts assembled, heading nowhere
    pub fn new(smoothing: f32) -> Self {
        Self {
            progress: 1.0,
            mode: TreeMode::TreeShape,
            smoothing,
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn mode(&self) -> TreeMode {
        self.mode
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    /// Last write wins. Returns whether the target actually changed.
    pub fn set_mode(&mut self, mode: TreeMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        true
    }

    pub fn target_progress(&self) -> f32 {
        self.mode.target_progress()
    }

    /// One smoothing step. Progress moves monotonically towards the target
    /// and never crosses it.
    pub fn step(&mut self) -> f32 {
        let target = self.target_progress();
        let next = lerp(self.progress, target, self.smoothing);
        self.progress = if target >= self.progress {
            next.clamp(self.progress, target)
        } else {
            next.clamp(target, self.progress)
        };
        self.progress
    }

    /// Whether progress is within `epsilon` of the target
    pub fn is_settled(&self, epsilon: f32) -> bool {
        (self.progress - self.target_progress()).abs() < epsilon
    }
}
