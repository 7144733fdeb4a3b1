//! `glint-device` is the lowest layer of the glint stack: the vocabulary a
//! stateful, command-based graphics device understands.
//!
//! This crate provides:
//! - Numeric resource identifiers and kinds (see [`ids`]).
//! - Capability limits captured once at device init (see [`DeviceCaps`]).
//! - The semantic parameter enums and the [`Command`] record of every
//!   operation the device can be asked to perform (see [`cmd`]).
//! - The [`DeviceCommands`] trait, each method mapping 1:1 onto an
//!   underlying graphics-API call.
//! - A recording backend for deterministic tests (see [`TraceDevice`]).
//! - Telemetry counters shared by the state cache and the resource layer
//!   (see [`stats`]).
//!
//! The crate intentionally stays close to dependency-free so the recorded
//! command log remains a stable foundation for the tests of every layer
//! above it.

mod backend;
mod caps;
mod ids;
mod trace;

pub mod cmd;
pub mod stats;

pub use backend::{BuildOutcome, DeviceCommands};
pub use caps::DeviceCaps;
pub use cmd::Command;
pub use ids::{RawId, ResourceKind, INVALID_ID};
pub use stats::{FrameCounters, RenderStats, RenderStatsSnapshot};
pub use trace::TraceDevice;
