use glint_device::cmd::{Capability, CompareFunc};
use glint_device::DeviceCommands;

use crate::cache::StateCache;

/// Desired depth configuration.
///
/// There is no explicit enable: the device's depth capability must be on for
/// either testing or writing to happen, so the toggle is derived as
/// `func != Always || write`. `(Always, write)` keeps the capability on and
/// lets everything pass while still updating the depth buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepthState {
    pub func: CompareFunc,
    pub write: bool,
}

impl Default for DepthState {
    fn default() -> Self {
        Self {
            func: CompareFunc::Less,
            write: true,
        }
    }
}

impl DepthState {
    fn capability_needed(&self) -> bool {
        self.func != CompareFunc::Always || self.write
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct DepthMirror {
    pub(crate) enabled: Option<bool>,
    pub(crate) func: Option<CompareFunc>,
    pub(crate) write: Option<bool>,
    pub(crate) dirty: bool,
}

impl StateCache {
    pub fn apply_depth(&mut self, dev: &mut dyn DeviceCommands, desired: &DepthState) {
        let mut emitted = false;
        let enabled = desired.capability_needed();
        if self.depth.enabled != Some(enabled) {
            dev.set_capability(Capability::DepthTest, enabled);
            self.depth.enabled = Some(enabled);
            emitted = true;
        }
        if enabled {
            if self.depth.dirty || self.depth.func != Some(desired.func) {
                dev.set_depth_func(desired.func);
                self.depth.func = Some(desired.func);
                emitted = true;
            }
            if self.depth.dirty || self.depth.write != Some(desired.write) {
                dev.set_depth_write(desired.write);
                self.depth.write = Some(desired.write);
                emitted = true;
            }
        }
        self.depth.dirty = false;
        if emitted {
            self.stats.inc_state_changes();
        }
    }
}
