//! `glint-resource` wraps device-side objects (buffers, textures, programs,
//! framebuffers, renderbuffers, queries) in host-side handles.
//!
//! Every kind follows the same lifecycle: **create** (allocate the device
//! id, register a live instance with zero bytes), **configure** (setters
//! that diff against the last-applied value and skip the device entirely
//! when nothing changed, reporting byte *deltas* to accounting), and
//! **delete** — either explicit and synchronous, or deferred through the
//! [`Reclaimer`] when the last reference goes away on a thread that must
//! not talk to the device.

mod buffer;
mod context;
mod error;
mod framebuffer;
mod program;
mod query;
mod reclaim;
mod renderbuffer;
mod rtt;
mod texture;

pub use buffer::BufferHandle;
pub use context::ResourceContext;
pub use error::ResourceError;
pub use framebuffer::FramebufferHandle;
pub use program::{ProgramHandle, ShaderHandle};
pub use query::QueryHandle;
pub use reclaim::Reclaimer;
pub use renderbuffer::RenderbufferHandle;
pub use rtt::{RenderToTexture, RttPath, RttPreference, RttStrategy};
pub use texture::TextureHandle;
