use glint_device::cmd::{BlendFactor, Capability};
use glint_device::DeviceCommands;

use crate::cache::StateCache;

/// Desired blend configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendState {
    pub enabled: bool,
    pub src: BlendFactor,
    pub dst: BlendFactor,
}

impl Default for BlendState {
    fn default() -> Self {
        Self {
            enabled: false,
            src: BlendFactor::One,
            dst: BlendFactor::Zero,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BlendMirror {
    pub(crate) enabled: Option<bool>,
    pub(crate) func: Option<(BlendFactor, BlendFactor)>,
    pub(crate) dirty: bool,
}

impl StateCache {
    pub fn apply_blend(&mut self, dev: &mut dyn DeviceCommands, desired: &BlendState) {
        let mut emitted = false;
        if self.blend.enabled != Some(desired.enabled) {
            dev.set_capability(Capability::Blend, desired.enabled);
            self.blend.enabled = Some(desired.enabled);
            emitted = true;
        }
        if desired.enabled {
            let func = (desired.src, desired.dst);
            if self.blend.dirty || self.blend.func != Some(func) {
                dev.set_blend_func(desired.src, desired.dst);
                self.blend.func = Some(func);
                emitted = true;
            }
        }
        self.blend.dirty = false;
        if emitted {
            self.stats.inc_state_changes();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SlotId;
    use glint_device::{Command, DeviceCaps, RenderStats, TraceDevice};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn cache() -> StateCache {
        StateCache::new(&DeviceCaps::default(), Arc::new(RenderStats::new()))
    }

    fn alpha_blend() -> BlendState {
        BlendState {
            enabled: true,
            src: BlendFactor::SrcAlpha,
            dst: BlendFactor::OneMinusSrcAlpha,
        }
    }

    #[test]
    fn first_apply_emits_toggle_and_func() {
        let mut dev = TraceDevice::new();
        let mut cache = cache();
        cache.apply_blend(&mut dev, &alpha_blend());
        assert_eq!(
            dev.take_commands(),
            vec![
                Command::SetCapability {
                    cap: Capability::Blend,
                    enabled: true,
                },
                Command::SetBlendFunc {
                    src: BlendFactor::SrcAlpha,
                    dst: BlendFactor::OneMinusSrcAlpha,
                },
            ]
        );
    }

    #[test]
    fn repeat_apply_is_a_no_op() {
        let mut dev = TraceDevice::new();
        let mut cache = cache();
        cache.apply_blend(&mut dev, &alpha_blend());
        dev.clear();
        cache.apply_blend(&mut dev, &alpha_blend());
        assert!(dev.commands().is_empty());
    }

    #[test]
    fn disabling_skips_parameter_updates() {
        let mut dev = TraceDevice::new();
        let mut cache = cache();
        cache.apply_blend(&mut dev, &alpha_blend());
        dev.clear();
        // Different func while disabling: only the toggle goes out.
        cache.apply_blend(&mut dev, &BlendState::default());
        assert_eq!(
            dev.take_commands(),
            vec![Command::SetCapability {
                cap: Capability::Blend,
                enabled: false,
            }]
        );
        // Re-enabling with the previously applied func: toggle only again.
        cache.apply_blend(&mut dev, &alpha_blend());
        assert_eq!(
            dev.take_commands(),
            vec![Command::SetCapability {
                cap: Capability::Blend,
                enabled: true,
            }]
        );
    }

    #[test]
    fn dirty_forces_func_resend() {
        let mut dev = TraceDevice::new();
        let mut cache = cache();
        cache.apply_blend(&mut dev, &alpha_blend());
        dev.clear();
        cache.mark_dirty(SlotId::Blend);
        cache.apply_blend(&mut dev, &alpha_blend());
        assert_eq!(
            dev.take_commands(),
            vec![Command::SetBlendFunc {
                src: BlendFactor::SrcAlpha,
                dst: BlendFactor::OneMinusSrcAlpha,
            }]
        );
        // The bit is consumed by one reapplication.
        cache.apply_blend(&mut dev, &alpha_blend());
        assert!(dev.commands().is_empty());
    }

    #[test]
    fn invalidate_forces_full_reapply() {
        let mut dev = TraceDevice::new();
        let mut cache = cache();
        cache.apply_blend(&mut dev, &alpha_blend());
        dev.clear();
        cache.invalidate(SlotId::Blend);
        cache.apply_blend(&mut dev, &alpha_blend());
        assert_eq!(dev.commands().len(), 2);
    }
}
