use glint_device::cmd::{BufferTarget, BufferUsageHint};
use glint_device::{DeviceCommands, RawId, ResourceKind, INVALID_ID};
use glint_state::StateCache;

use crate::context::ResourceContext;
use crate::error::ResourceError;

/// Host-side handle for one device buffer.
#[derive(Debug)]
pub struct BufferHandle {
    id: RawId,
    target: BufferTarget,
    usage: BufferUsageHint,
    len: u64,
    ctx: ResourceContext,
}

impl BufferHandle {
    pub fn new(
        dev: &mut dyn DeviceCommands,
        ctx: &ResourceContext,
        target: BufferTarget,
        usage: BufferUsageHint,
    ) -> Self {
        let id = dev.create_id(ResourceKind::Buffer);
        ctx.stats().resource_created(ResourceKind::Buffer);
        Self {
            id,
            target,
            usage,
            len: 0,
            ctx: ctx.clone(),
        }
    }

    pub fn id(&self) -> RawId {
        self.id
    }

    pub fn target(&self) -> BufferTarget {
        self.target
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// (Re)allocate device storage. Same length twice is a no-op; a resize
    /// reports only the delta to accounting.
    pub fn allocate(&mut self, cache: &mut StateCache, dev: &mut dyn DeviceCommands, len: u64) {
        if len == self.len {
            return;
        }
        cache.bind_buffer(dev, self.target, self.id);
        dev.buffer_data(self.target, len, self.usage);
        if len > self.len {
            self.ctx
                .stats()
                .bytes_grown(ResourceKind::Buffer, len - self.len);
        } else {
            self.ctx
                .stats()
                .bytes_shrunk(ResourceKind::Buffer, self.len - len);
        }
        self.len = len;
    }

    pub fn upload(
        &mut self,
        cache: &mut StateCache,
        dev: &mut dyn DeviceCommands,
        offset: u64,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        let end = offset + data.len() as u64;
        if end > self.len {
            return Err(ResourceError::UploadOutOfBounds { len: self.len, end });
        }
        cache.bind_buffer(dev, self.target, self.id);
        dev.buffer_sub_data(self.target, offset, data);
        Ok(())
    }

    /// Synchronous delete: the deletion command goes out now, accounting is
    /// decremented, and the id is zeroed so later use is detectable.
    pub fn delete(&mut self, cache: &mut StateCache, dev: &mut dyn DeviceCommands) {
        if self.id == INVALID_ID {
            tracing::warn!("delete called on an already-deleted buffer");
            return;
        }
        cache.forget_resource(ResourceKind::Buffer, self.id);
        dev.delete_resources(ResourceKind::Buffer, &[self.id]);
        self.ctx
            .stats()
            .resource_destroyed(ResourceKind::Buffer, self.len);
        self.id = INVALID_ID;
        self.len = 0;
    }
}

impl Drop for BufferHandle {
    fn drop(&mut self) {
        if self.id != INVALID_ID {
            self.ctx
                .reclaimer()
                .enqueue(ResourceKind::Buffer, self.id, self.len);
        }
    }
}
