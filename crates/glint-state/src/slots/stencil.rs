use glint_device::cmd::{Capability, CompareFunc, StencilOp};
use glint_device::DeviceCommands;

use crate::cache::StateCache;

/// Desired stencil configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StencilState {
    pub enabled: bool,
    pub func: CompareFunc,
    pub reference: i32,
    pub read_mask: u32,
    pub fail: StencilOp,
    pub depth_fail: StencilOp,
    pub pass: StencilOp,
    pub write_mask: u32,
}

impl Default for StencilState {
    fn default() -> Self {
        Self {
            enabled: false,
            func: CompareFunc::Always,
            reference: 0,
            read_mask: u32::MAX,
            fail: StencilOp::Keep,
            depth_fail: StencilOp::Keep,
            pass: StencilOp::Keep,
            write_mask: u32::MAX,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct StencilMirror {
    pub(crate) enabled: Option<bool>,
    pub(crate) func: Option<(CompareFunc, i32, u32)>,
    pub(crate) ops: Option<(StencilOp, StencilOp, StencilOp)>,
    pub(crate) write_mask: Option<u32>,
    pub(crate) dirty: bool,
}

impl StateCache {
    /// Field order: toggle, func/ref/mask, ops, write mask.
    pub fn apply_stencil(&mut self, dev: &mut dyn DeviceCommands, desired: &StencilState) {
        let mut emitted = false;
        if self.stencil.enabled != Some(desired.enabled) {
            dev.set_capability(Capability::StencilTest, desired.enabled);
            self.stencil.enabled = Some(desired.enabled);
            emitted = true;
        }
        if desired.enabled {
            let func = (desired.func, desired.reference, desired.read_mask);
            if self.stencil.dirty || self.stencil.func != Some(func) {
                dev.set_stencil_func(desired.func, desired.reference, desired.read_mask);
                self.stencil.func = Some(func);
                emitted = true;
            }
            let ops = (desired.fail, desired.depth_fail, desired.pass);
            if self.stencil.dirty || self.stencil.ops != Some(ops) {
                dev.set_stencil_op(desired.fail, desired.depth_fail, desired.pass);
                self.stencil.ops = Some(ops);
                emitted = true;
            }
            if self.stencil.dirty || self.stencil.write_mask != Some(desired.write_mask) {
                dev.set_stencil_write_mask(desired.write_mask);
                self.stencil.write_mask = Some(desired.write_mask);
                emitted = true;
            }
        }
        self.stencil.dirty = false;
        if emitted {
            self.stats.inc_state_changes();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_device::{Command, DeviceCaps, RenderStats, TraceDevice};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn only_changed_subfield_is_resent() {
        let mut dev = TraceDevice::new();
        let mut cache = StateCache::new(&DeviceCaps::default(), Arc::new(RenderStats::new()));
        let mut state = StencilState {
            enabled: true,
            ..StencilState::default()
        };
        cache.apply_stencil(&mut dev, &state);
        dev.clear();

        state.pass = StencilOp::Replace;
        cache.apply_stencil(&mut dev, &state);
        assert_eq!(
            dev.take_commands(),
            vec![Command::SetStencilOp {
                fail: StencilOp::Keep,
                depth_fail: StencilOp::Keep,
                pass: StencilOp::Replace,
            }]
        );
    }
}
