use tracing::{debug, warn};

use glint_device::cmd::TextureTarget;
use glint_device::{DeviceCommands, RawId};
use glint_state::StateCache;

use crate::context::ResourceContext;
use crate::framebuffer::FramebufferHandle;
use crate::renderbuffer::RenderbufferHandle;
use crate::texture::TextureHandle;

/// The three ways of getting rendered pixels into a texture, in the order a
/// caller would like them tried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RttPath {
    /// Attach the texture to an off-screen framebuffer object.
    OffscreenTarget,
    /// Render into a hidden auxiliary surface; bind it directly as the
    /// texture image when the device can, copy out of it otherwise.
    AuxSurface,
    /// Render to the default surface and copy pixels into the texture.
    CopyFromDefault,
}

/// Ordered strategy preference. All three paths are first-class; a caller
/// that distrusts one on its target hardware reorders or omits it rather
/// than patching the selection logic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RttPreference {
    order: Vec<RttPath>,
}

impl Default for RttPreference {
    fn default() -> Self {
        Self {
            order: vec![
                RttPath::OffscreenTarget,
                RttPath::AuxSurface,
                RttPath::CopyFromDefault,
            ],
        }
    }
}

impl RttPreference {
    pub fn new(order: Vec<RttPath>) -> Self {
        Self { order }
    }
}

/// The strategy actually selected, fixed for the object's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RttStrategy {
    OffscreenTarget,
    AuxSurface { direct: bool },
    CopyFromDefault,
}

/// Render-to-texture helper around one target texture.
///
/// The strategy is chosen once at construction from the device caps and the
/// caller's preference order; an unavailable capability falls through to
/// the next entry and is logged, never surfaced as an error. Losing the
/// auxiliary surface later recreates the surface but never changes the
/// strategy.
#[derive(Debug)]
pub struct RenderToTexture {
    strategy: RttStrategy,
    target: TextureTarget,
    texture: RawId,
    width: u32,
    height: u32,
    framebuffer: Option<FramebufferHandle>,
    depth: Option<RenderbufferHandle>,
    surface: Option<RawId>,
}

impl RenderToTexture {
    pub fn new(
        cache: &mut StateCache,
        dev: &mut dyn DeviceCommands,
        ctx: &ResourceContext,
        texture: &TextureHandle,
        width: u32,
        height: u32,
        preference: &RttPreference,
    ) -> Self {
        let mut rtt = Self {
            strategy: RttStrategy::CopyFromDefault,
            target: texture.target(),
            texture: texture.id(),
            width,
            height,
            framebuffer: None,
            depth: None,
            surface: None,
        };

        for path in &preference.order {
            match path {
                RttPath::OffscreenTarget => {
                    if !cache.caps().supports_offscreen_target {
                        debug!("off-screen target not supported; trying next strategy");
                        continue;
                    }
                    let mut framebuffer = FramebufferHandle::new(dev, ctx);
                    let mut depth = RenderbufferHandle::new(dev, ctx, true);
                    // Caps were checked when the texture storage was defined.
                    if depth.storage(cache, dev, width, height).is_err() {
                        debug!("depth store allocation failed; trying next strategy");
                        depth.delete(cache, dev);
                        framebuffer.delete(cache, dev);
                        continue;
                    }
                    framebuffer.attach_color_texture(cache, dev, texture);
                    framebuffer.attach_depth_renderbuffer(cache, dev, &depth);
                    cache.bind_framebuffer(dev, 0);
                    rtt.framebuffer = Some(framebuffer);
                    rtt.depth = Some(depth);
                    rtt.strategy = RttStrategy::OffscreenTarget;
                    debug!("render-to-texture using an off-screen target");
                    return rtt;
                }
                RttPath::AuxSurface => {
                    if !cache.caps().supports_aux_surface {
                        debug!("auxiliary surfaces not supported; trying next strategy");
                        continue;
                    }
                    match dev.create_aux_surface(width, height) {
                        Some(surface) => {
                            let direct = cache.caps().supports_direct_surface_bind;
                            rtt.surface = Some(surface);
                            rtt.strategy = RttStrategy::AuxSurface { direct };
                            debug!(direct, "render-to-texture using an auxiliary surface");
                            return rtt;
                        }
                        None => {
                            warn!("auxiliary surface creation failed; trying next strategy");
                            continue;
                        }
                    }
                }
                RttPath::CopyFromDefault => {
                    rtt.strategy = RttStrategy::CopyFromDefault;
                    debug!("render-to-texture copying from the default surface");
                    return rtt;
                }
            }
        }

        warn!("no preferred render-to-texture path available; copying from the default surface");
        rtt
    }

    pub fn strategy(&self) -> RttStrategy {
        self.strategy
    }

    /// Route subsequent draws at this object's render target.
    pub fn begin(&mut self, cache: &mut StateCache, dev: &mut dyn DeviceCommands) {
        match self.strategy {
            RttStrategy::OffscreenTarget => {
                if let Some(framebuffer) = &self.framebuffer {
                    cache.bind_framebuffer(dev, framebuffer.id());
                }
            }
            RttStrategy::AuxSurface { .. } => {
                if self.surface.is_none() {
                    // Lost earlier and not recreated yet; try once more.
                    self.surface = dev.create_aux_surface(self.width, self.height);
                }
                match self.surface {
                    Some(surface) => dev.make_surface_current(surface),
                    None => warn!("auxiliary surface unavailable; drawing to the default surface"),
                }
            }
            RttStrategy::CopyFromDefault => {}
        }
    }

    /// Stop rendering to the target and make the results visible in the
    /// texture (a copy-out where the strategy requires one).
    pub fn end(&mut self, cache: &mut StateCache, dev: &mut dyn DeviceCommands) {
        match self.strategy {
            RttStrategy::OffscreenTarget => {
                cache.bind_framebuffer(dev, 0);
            }
            RttStrategy::AuxSurface { direct } => {
                if let Some(surface) = self.surface {
                    if direct {
                        dev.bind_surface_to_texture(surface, self.target, self.texture);
                    } else {
                        cache.bind_texture_for_edit(dev, self.target, self.texture);
                        dev.copy_pixels_to_texture(self.target, 0, 0, self.width, self.height);
                    }
                    dev.make_surface_current(0);
                }
            }
            RttStrategy::CopyFromDefault => {
                cache.bind_texture_for_edit(dev, self.target, self.texture);
                dev.copy_pixels_to_texture(self.target, 0, 0, self.width, self.height);
            }
        }
    }

    /// The windowing system invalidated the auxiliary surface. Recreate it;
    /// the strategy stays what it was.
    pub fn handle_surface_lost(&mut self, dev: &mut dyn DeviceCommands) {
        if !matches!(self.strategy, RttStrategy::AuxSurface { .. }) {
            return;
        }
        if let Some(old) = self.surface.take() {
            dev.destroy_aux_surface(old);
        }
        self.surface = dev.create_aux_surface(self.width, self.height);
        if self.surface.is_none() {
            warn!("auxiliary surface recreation failed");
        }
    }

    /// Tear down everything this object allocated. The framebuffer and the
    /// depth store would also be reclaimed on drop; the auxiliary surface
    /// would not, so explicit release is the clean path.
    pub fn release(&mut self, cache: &mut StateCache, dev: &mut dyn DeviceCommands) {
        if let Some(mut framebuffer) = self.framebuffer.take() {
            framebuffer.delete(cache, dev);
        }
        if let Some(mut depth) = self.depth.take() {
            depth.delete(cache, dev);
        }
        if let Some(surface) = self.surface.take() {
            dev.destroy_aux_surface(surface);
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

    fn setup(caps: DeviceCaps) -> (TraceDevice, StateCache, ResourceContext) {
        let stats = Arc::new(RenderStats::new());
        let cache = StateCache::new(&caps, Arc::clone(&stats));
        let ctx = ResourceContext::new(stats, Arc::new(Reclaimer::new()));
        (TraceDevice::new(), cache, ctx)
    }

    fn texture(
        dev: &mut TraceDevice,
        cache: &mut StateCache,
        ctx: &ResourceContext,
    ) -> TextureHandle {
        let mut tex = TextureHandle::new(dev, ctx, TextureTarget::Tex2D);
        tex.storage(cache, dev, 128, 128, 4, 1).unwrap();
        tex
    }

    #[test]
    fn prefers_the_offscreen_target_when_available() {
        let (mut dev, mut cache, ctx) = setup(DeviceCaps::default());
        let mut tex = texture(&mut dev, &mut cache, &ctx);
        let mut rtt =
            RenderToTexture::new(&mut cache, &mut dev, &ctx, &tex, 128, 128, &RttPreference::default());
        assert_eq!(rtt.strategy(), RttStrategy::OffscreenTarget);
        rtt.release(&mut cache, &mut dev);
        tex.delete(&mut cache, &mut dev);
    }

    #[test]
    fn falls_back_when_capabilities_are_missing() {
        let caps = DeviceCaps {
            supports_offscreen_target: false,
            supports_direct_surface_bind: false,
            ..DeviceCaps::default()
        };
        let (mut dev, mut cache, ctx) = setup(caps);
        let mut tex = texture(&mut dev, &mut cache, &ctx);
        let mut rtt =
            RenderToTexture::new(&mut cache, &mut dev, &ctx, &tex, 128, 128, &RttPreference::default());
        assert_eq!(rtt.strategy(), RttStrategy::AuxSurface { direct: false });
        rtt.release(&mut cache, &mut dev);
        tex.delete(&mut cache, &mut dev);
    }

    #[test]
    fn aux_creation_failure_falls_through_to_copying() {
        let caps = DeviceCaps {
            supports_offscreen_target: false,
            ..DeviceCaps::default()
        };
        let (mut dev, mut cache, ctx) = setup(caps);
        dev.set_aux_surface_unavailable(true);
        let mut tex = texture(&mut dev, &mut cache, &ctx);
        let mut rtt =
            RenderToTexture::new(&mut cache, &mut dev, &ctx, &tex, 128, 128, &RttPreference::default());
        assert_eq!(rtt.strategy(), RttStrategy::CopyFromDefault);

        dev.clear();
        rtt.begin(&mut cache, &mut dev);
        rtt.end(&mut cache, &mut dev);
        assert!(dev.commands().contains(&Command::CopyPixelsToTexture {
            target: TextureTarget::Tex2D,
            x: 0,
            y: 0,
            width: 128,
            height: 128,
        }));
        rtt.release(&mut cache, &mut dev);
        tex.delete(&mut cache, &mut dev);
    }

    #[test]
    fn preference_order_is_honored() {
        let (mut dev, mut cache, ctx) = setup(DeviceCaps::default());
        let mut tex = texture(&mut dev, &mut cache, &ctx);
        // The caller has decided the off-screen path is untrustworthy here.
        let preference = RttPreference::new(vec![RttPath::AuxSurface, RttPath::OffscreenTarget]);
        let mut rtt =
            RenderToTexture::new(&mut cache, &mut dev, &ctx, &tex, 128, 128, &preference);
        assert_eq!(rtt.strategy(), RttStrategy::AuxSurface { direct: true });
        rtt.release(&mut cache, &mut dev);
        tex.delete(&mut cache, &mut dev);
    }

    #[test]
    fn surface_loss_recreates_without_changing_strategy() {
        let caps = DeviceCaps {
            supports_offscreen_target: false,
            ..DeviceCaps::default()
        };
        let (mut dev, mut cache, ctx) = setup(caps);
        let mut tex = texture(&mut dev, &mut cache, &ctx);
        let mut rtt =
            RenderToTexture::new(&mut cache, &mut dev, &ctx, &tex, 128, 128, &RttPreference::default());
        let before = rtt.strategy();

        dev.clear();
        rtt.handle_surface_lost(&mut dev);
        assert_eq!(rtt.strategy(), before);
        assert!(dev
            .commands()
            .iter()
            .any(|c| matches!(c, Command::DestroyAuxSurface(_))));
        assert!(dev
            .commands()
            .iter()
            .any(|c| matches!(c, Command::CreateAuxSurface { .. })));
        rtt.release(&mut cache, &mut dev);
        tex.delete(&mut cache, &mut dev);
    }
}
