use glint_device::cmd::{AttachmentPoint, TextureTarget};
use glint_device::{DeviceCommands, RawId, ResourceKind, INVALID_ID};
use glint_state::StateCache;

use crate::context::ResourceContext;
use crate::renderbuffer::RenderbufferHandle;
use crate::texture::TextureHandle;

/// Host-side handle for one off-screen framebuffer object.
///
/// Attachments are diffed: re-attaching what is already attached emits
/// nothing beyond the (also diffed) framebuffer bind.
#[derive(Debug)]
pub struct FramebufferHandle {
    id: RawId,
    color_texture: Option<(TextureTarget, RawId)>,
    depth_renderbuffer: Option<RawId>,
    ctx: ResourceContext,
}

impl FramebufferHandle {
    pub fn new(dev: &mut dyn DeviceCommands, ctx: &ResourceContext) -> Self {
        let id = dev.create_id(ResourceKind::Framebuffer);
        ctx.stats().resource_created(ResourceKind::Framebuffer);
        Self {
            id,
            color_texture: None,
            depth_renderbuffer: None,
            ctx: ctx.clone(),
        }
    }

    pub fn id(&self) -> RawId {
        self.id
    }

    pub fn attach_color_texture(
        &mut self,
        cache: &mut StateCache,
        dev: &mut dyn DeviceCommands,
        texture: &TextureHandle,
    ) {
        let attachment = (texture.target(), texture.id());
        if self.color_texture == Some(attachment) {
            return;
        }
        cache.bind_framebuffer(dev, self.id);
        dev.attach_texture(AttachmentPoint::Color0, texture.target(), texture.id());
        self.color_texture = Some(attachment);
    }

    pub fn attach_depth_renderbuffer(
        &mut self,
        cache: &mut StateCache,
        dev: &mut dyn DeviceCommands,
        renderbuffer: &RenderbufferHandle,
    ) {
        if self.depth_renderbuffer == Some(renderbuffer.id()) {
            return;
        }
        cache.bind_framebuffer(dev, self.id);
        dev.attach_renderbuffer(AttachmentPoint::Depth, renderbuffer.id());
        self.depth_renderbuffer = Some(renderbuffer.id());
    }

    pub fn delete(&mut self, cache: &mut StateCache, dev: &mut dyn DeviceCommands) {
        if self.id == INVALID_ID {
            tracing::warn!("delete called on an already-deleted framebuffer");
            return;
        }
        cache.forget_resource(ResourceKind::Framebuffer, self.id);
        dev.delete_resources(ResourceKind::Framebuffer, &[self.id]);
        self.ctx
            .stats()
            .resource_destroyed(ResourceKind::Framebuffer, 0);
        self.id = INVALID_ID;
    }
}

impl Drop for FramebufferHandle {
    fn drop(&mut self) {
        if self.id != INVALID_ID {
            self.ctx
                .reclaimer()
                .enqueue(ResourceKind::Framebuffer, self.id, 0);
        }
    }
}
