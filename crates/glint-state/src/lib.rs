//! `glint-state` mirrors the device's current configuration in host memory
//! and turns "set desired state" requests into the minimal command sequence
//! that brings the device from its last-known configuration to the requested
//! one.
//!
//! The central type is [`StateCache`]. Every mirrored value starts out
//! *unknown* (a distinct state from any real value), so the first
//! application of a slot always reaches the device; afterwards, equal
//! requests are O(1) no-ops. [`StateCache::invalidate_all`] returns the
//! mirror to the unknown state when something outside the cache's knowledge
//! (context reset, buggy driver default) may have desynchronized it.
//!
//! One cache instance is bound to exactly one device context and is only
//! ever used from the device-owning thread.

mod cache;
mod error;
mod slots;

pub use cache::{GroupId, SlotId, StateCache};
pub use error::StateError;
pub use slots::alpha::AlphaState;
pub use slots::blend::BlendState;
pub use slots::depth::DepthState;
pub use slots::fog::FogState;
pub use slots::lights::{Light, Spot};
pub use slots::material::MaterialState;
pub use slots::raster::{CullState, PolygonOffsetState, ScissorState};
pub use slots::stencil::StencilState;
pub use slots::texunits::TextureUnit;
