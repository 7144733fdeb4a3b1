use tracing::debug;

use glint_device::cmd::{MagFilter, MinFilter, TextureTarget, WrapAxis, WrapMode};
use glint_device::{DeviceCommands, RawId, ResourceKind, INVALID_ID};
use glint_state::StateCache;

use crate::context::ResourceContext;
use crate::error::ResourceError;

/// Host-side handle for one device texture.
///
/// Parameter setters follow the same diff-then-apply pattern as the state
/// cache's slots: each remembers the last value actually applied, and an
/// equal request returns before even binding the texture.
#[derive(Debug)]
pub struct TextureHandle {
    id: RawId,
    target: TextureTarget,
    filter: Option<(MinFilter, MagFilter)>,
    wrap_s: Option<WrapMode>,
    wrap_t: Option<WrapMode>,
    wrap_r: Option<WrapMode>,
    anisotropy: Option<f32>,
    width: u32,
    height: u32,
    levels: u32,
    bytes: u64,
    ctx: ResourceContext,
}

impl TextureHandle {
    pub fn new(dev: &mut dyn DeviceCommands, ctx: &ResourceContext, target: TextureTarget) -> Self {
        let id = dev.create_id(ResourceKind::Texture);
        ctx.stats().resource_created(ResourceKind::Texture);
        Self {
            id,
            target,
            filter: None,
            wrap_s: None,
            wrap_t: None,
            wrap_r: None,
            anisotropy: None,
            width: 0,
            height: 0,
            levels: 0,
            bytes: 0,
            ctx: ctx.clone(),
        }
    }

    pub fn id(&self) -> RawId {
        self.id
    }

    pub fn target(&self) -> TextureTarget {
        self.target
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Define the base storage. Accounting receives the delta against the
    /// previous allocation, never the absolute size.
    pub fn storage(
        &mut self,
        cache: &mut StateCache,
        dev: &mut dyn DeviceCommands,
        width: u32,
        height: u32,
        bytes_per_texel: u32,
        levels: u32,
    ) -> Result<(), ResourceError> {
        let limit = cache.caps().max_texture_size;
        if width > limit || height > limit {
            return Err(ResourceError::TextureTooLarge {
                width,
                height,
                limit,
            });
        }
        if (width, height) == (self.width, self.height) && self.bytes != 0 {
            return Ok(());
        }
        cache.bind_texture_for_edit(dev, self.target, self.id);
        dev.texture_storage(self.target, width, height, levels);

        let new_bytes = u64::from(width) * u64::from(height) * u64::from(bytes_per_texel);
        if new_bytes > self.bytes {
            self.ctx
                .stats()
                .bytes_grown(ResourceKind::Texture, new_bytes - self.bytes);
        } else {
            self.ctx
                .stats()
                .bytes_shrunk(ResourceKind::Texture, self.bytes - new_bytes);
        }
        self.bytes = new_bytes;
        self.width = width;
        self.height = height;
        self.levels = levels;
        Ok(())
    }

    pub fn set_filter(
        &mut self,
        cache: &mut StateCache,
        dev: &mut dyn DeviceCommands,
        min: MinFilter,
        mag: MagFilter,
    ) {
        if self.filter == Some((min, mag)) {
            return;
        }
        if min.uses_mipmaps() && self.levels <= 1 {
            debug!(texture = self.id, "mipmapped min filter on a texture with a single level");
        }
        cache.bind_texture_for_edit(dev, self.target, self.id);
        dev.set_texture_filter(self.target, min, mag);
        self.filter = Some((min, mag));
    }

    pub fn set_wrap(
        &mut self,
        cache: &mut StateCache,
        dev: &mut dyn DeviceCommands,
        axis: WrapAxis,
        mode: WrapMode,
    ) {
        let slot = match axis {
            WrapAxis::S => &mut self.wrap_s,
            WrapAxis::T => &mut self.wrap_t,
            WrapAxis::R => &mut self.wrap_r,
        };
        if *slot == Some(mode) {
            return;
        }
        *slot = Some(mode);
        cache.bind_texture_for_edit(dev, self.target, self.id);
        dev.set_texture_wrap(self.target, axis, mode);
    }

    /// Anisotropic filtering level. Values below 1.0 are structural errors;
    /// a device without the capability ignores the request (logged, not an
    /// error). The level is clamped to the advertised maximum.
    pub fn set_anisotropy(
        &mut self,
        cache: &mut StateCache,
        dev: &mut dyn DeviceCommands,
        level: f32,
    ) -> Result<(), ResourceError> {
        if level < 1.0 {
            return Err(ResourceError::InvalidAnisotropy { level });
        }
        if !cache.caps().supports_anisotropic_filter {
            debug!("anisotropic filtering not supported; request ignored");
            return Ok(());
        }
        let level = level.min(cache.caps().max_anisotropy_x16 as f32);
        if self.anisotropy == Some(level) {
            return Ok(());
        }
        cache.bind_texture_for_edit(dev, self.target, self.id);
        dev.set_texture_anisotropy(self.target, level);
        self.anisotropy = Some(level);
        Ok(())
    }

    pub fn delete(&mut self, cache: &mut StateCache, dev: &mut dyn DeviceCommands) {
        if self.id == INVALID_ID {
            tracing::warn!("delete called on an already-deleted texture");
            return;
        }
        cache.forget_resource(ResourceKind::Texture, self.id);
        dev.delete_resources(ResourceKind::Texture, &[self.id]);
        self.ctx
            .stats()
            .resource_destroyed(ResourceKind::Texture, self.bytes);
        self.id = INVALID_ID;
        self.bytes = 0;
    }
}

impl Drop for TextureHandle {
    fn drop(&mut self) {
        if self.id != INVALID_ID {
            self.ctx
                .reclaimer()
                .enqueue(ResourceKind::Texture, self.id, self.bytes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_device::{Command, DeviceCaps, RenderStats, TraceDevice};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    use crate::reclaim::Reclaimer;

    fn setup() -> (TraceDevice, StateCache, ResourceContext) {
        let stats = Arc::new(RenderStats::new());
        let cache = StateCache::new(&DeviceCaps::default(), Arc::clone(&stats));
        let ctx = ResourceContext::new(stats, Arc::new(Reclaimer::new()));
        (TraceDevice::new(), cache, ctx)
    }

    #[test]
    fn repeated_wrap_mode_emits_nothing() {
        let (mut dev, mut cache, ctx) = setup();
        let mut tex = TextureHandle::new(&mut dev, &ctx, TextureTarget::Tex2D);
        tex.set_wrap(&mut cache, &mut dev, WrapAxis::S, WrapMode::Repeat);
        dev.clear();

        // Second identical request: zero device commands, not even a bind.
        tex.set_wrap(&mut cache, &mut dev, WrapAxis::S, WrapMode::Repeat);
        assert!(dev.commands().is_empty());

        tex.set_wrap(&mut cache, &mut dev, WrapAxis::T, WrapMode::Repeat);
        assert_eq!(
            dev.take_commands(),
            vec![Command::SetTextureWrap {
                target: TextureTarget::Tex2D,
                axis: WrapAxis::T,
                mode: WrapMode::Repeat,
            }]
        );
        tex.delete(&mut cache, &mut dev);
    }

    #[test]
    fn oversized_storage_is_rejected_before_any_command() {
        let (mut dev, mut cache, ctx) = setup();
        let mut tex = TextureHandle::new(&mut dev, &ctx, TextureTarget::Tex2D);
        dev.clear();
        let limit = cache.caps().max_texture_size;
        let err = tex
            .storage(&mut cache, &mut dev, limit + 1, 64, 4, 1)
            .unwrap_err();
        assert!(matches!(err, ResourceError::TextureTooLarge { .. }));
        assert!(dev.commands().is_empty());
        tex.delete(&mut cache, &mut dev);
    }

    #[test]
    fn anisotropy_is_validated_and_clamped() {
        let (mut dev, mut cache, ctx) = setup();
        let mut tex = TextureHandle::new(&mut dev, &ctx, TextureTarget::Tex2D);
        assert_eq!(
            tex.set_anisotropy(&mut cache, &mut dev, 0.5),
            Err(ResourceError::InvalidAnisotropy { level: 0.5 })
        );
        dev.clear();

        tex.set_anisotropy(&mut cache, &mut dev, 64.0).unwrap();
        let max = cache.caps().max_anisotropy_x16 as f32;
        assert!(dev.commands().contains(&Command::SetTextureAnisotropy {
            target: TextureTarget::Tex2D,
            level: max,
        }));
        tex.delete(&mut cache, &mut dev);
    }
}
