use glint_device::cmd::{Capability, CompareFunc};
use glint_device::DeviceCommands;

use crate::cache::StateCache;

/// Desired alpha-test configuration. `Always` means "test nothing", so the
/// capability toggle is derived from the function alone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlphaState {
    pub func: CompareFunc,
    pub reference: f32,
}

impl Default for AlphaState {
    fn default() -> Self {
        Self {
            func: CompareFunc::Always,
            reference: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct AlphaMirror {
    pub(crate) enabled: Option<bool>,
    pub(crate) func: Option<(CompareFunc, f32)>,
    pub(crate) dirty: bool,
}

impl StateCache {
    pub fn apply_alpha(&mut self, dev: &mut dyn DeviceCommands, desired: &AlphaState) {
        let mut emitted = false;
        let enabled = desired.func != CompareFunc::Always;
        if self.alpha.enabled != Some(enabled) {
            dev.set_capability(Capability::AlphaTest, enabled);
            self.alpha.enabled = Some(enabled);
            emitted = true;
        }
        if enabled {
            let func = (desired.func, desired.reference);
            if self.alpha.dirty || self.alpha.func != Some(func) {
                dev.set_alpha_func(desired.func, desired.reference);
                self.alpha.func = Some(func);
                emitted = true;
            }
        }
        self.alpha.dirty = false;
        if emitted {
            self.stats.inc_state_changes();
        }
    }
}
