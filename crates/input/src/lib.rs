//! Input: key names mapped to actions, and the fly camera they drive.
//!
//! # Invariants
//! - The camera never registers for events itself; callers feed it key
//!   transitions, pointer deltas and frame ticks.
//! - Pitch stays within the configured limit, so the view basis never
//!   degenerates.
//! - A locked camera ignores pointer motion and keeps its facing, but can
//!   still translate and still runs focus turns.

pub mod action;
pub mod camera;

pub use action::{Action, TrackedKey};
pub use camera::{CameraConfig, CameraController};

pub fn crate_info() -> &'static str {
    "tidescape-input v0.1.0"
}
