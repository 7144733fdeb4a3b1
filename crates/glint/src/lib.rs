//! `glint` ties the stack together: one [`Device`] per graphics context,
//! owning the state cache, the deferred reclaimer, the telemetry counters,
//! and a bounded registry of shared auxiliary surfaces.
//!
//! The lower layers are re-exported so an embedding application depends on
//! this crate alone.

mod device;
mod registry;

pub use device::Device;
pub use registry::SurfaceRegistry;

pub use glint_device::{
    cmd, stats, BuildOutcome, Command, DeviceCaps, DeviceCommands, FrameCounters, RawId,
    RenderStats, RenderStatsSnapshot, ResourceKind, TraceDevice, INVALID_ID,
};
pub use glint_resource::{
    BufferHandle, FramebufferHandle, ProgramHandle, QueryHandle, Reclaimer, RenderToTexture,
    RenderbufferHandle, ResourceContext, ResourceError, RttPath, RttPreference, RttStrategy,
    ShaderHandle, TextureHandle,
};
pub use glint_state::{
    AlphaState, BlendState, CullState, DepthState, FogState, GroupId, Light, MaterialState,
    PolygonOffsetState, ScissorState, SlotId, Spot, StateCache, StateError, StencilState,
    TextureUnit,
};
