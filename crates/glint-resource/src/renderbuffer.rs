use glint_device::{DeviceCommands, RawId, ResourceKind, INVALID_ID};
use glint_state::StateCache;

use crate::context::ResourceContext;
use crate::error::ResourceError;

/// Host-side handle for one renderbuffer (off-screen depth or color store).
#[derive(Debug)]
pub struct RenderbufferHandle {
    id: RawId,
    depth: bool,
    width: u32,
    height: u32,
    bytes: u64,
    ctx: ResourceContext,
}

// Both the color and the depth-stencil layout come to four bytes per pixel
// on every device this layer targets.
const BYTES_PER_PIXEL: u64 = 4;

impl RenderbufferHandle {
    pub fn new(dev: &mut dyn DeviceCommands, ctx: &ResourceContext, depth: bool) -> Self {
        let id = dev.create_id(ResourceKind::Renderbuffer);
        ctx.stats().resource_created(ResourceKind::Renderbuffer);
        Self {
            id,
            depth,
            width: 0,
            height: 0,
            bytes: 0,
            ctx: ctx.clone(),
        }
    }

    pub fn id(&self) -> RawId {
        self.id
    }

    pub fn storage(
        &mut self,
        cache: &mut StateCache,
        dev: &mut dyn DeviceCommands,
        width: u32,
        height: u32,
    ) -> Result<(), ResourceError> {
        let limit = cache.caps().max_texture_size;
        if width > limit || height > limit {
            return Err(ResourceError::RenderbufferTooLarge {
                width,
                height,
                limit,
            });
        }
        if (width, height) == (self.width, self.height) && self.bytes != 0 {
            return Ok(());
        }
        cache.bind_renderbuffer(dev, self.id);
        dev.renderbuffer_storage(width, height, self.depth);

        let new_bytes = u64::from(width) * u64::from(height) * BYTES_PER_PIXEL;
        if new_bytes > self.bytes {
            self.ctx
                .stats()
                .bytes_grown(ResourceKind::Renderbuffer, new_bytes - self.bytes);
        } else {
            self.ctx
                .stats()
                .bytes_shrunk(ResourceKind::Renderbuffer, self.bytes - new_bytes);
        }
        self.bytes = new_bytes;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn delete(&mut self, cache: &mut StateCache, dev: &mut dyn DeviceCommands) {
        if self.id == INVALID_ID {
            tracing::warn!("delete called on an already-deleted renderbuffer");
            return;
        }
        cache.forget_resource(ResourceKind::Renderbuffer, self.id);
        dev.delete_resources(ResourceKind::Renderbuffer, &[self.id]);
        self.ctx
            .stats()
            .resource_destroyed(ResourceKind::Renderbuffer, self.bytes);
        self.id = INVALID_ID;
        self.bytes = 0;
    }
}

impl Drop for RenderbufferHandle {
    fn drop(&mut self) {
        if self.id != INVALID_ID {
            self.ctx
                .reclaimer()
                .enqueue(ResourceKind::Renderbuffer, self.id, self.bytes);
        }
    }
}
