use glint_device::cmd::{Capability, FogMode};
use glint_device::DeviceCommands;

use crate::cache::StateCache;

/// Desired fog configuration. `density` matters for the exponential modes,
/// `start`/`end` for the linear one; all are diffed independently so a mode
/// flip does not resend coefficients that are already in place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FogState {
    pub enabled: bool,
    pub mode: FogMode,
    pub color: [f32; 4],
    pub density: f32,
    pub start: f32,
    pub end: f32,
}

impl Default for FogState {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: FogMode::Exp,
            color: [0.0, 0.0, 0.0, 0.0],
            density: 1.0,
            start: 0.0,
            end: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FogMirror {
    pub(crate) enabled: Option<bool>,
    pub(crate) mode: Option<FogMode>,
    pub(crate) color: Option<[f32; 4]>,
    pub(crate) density: Option<f32>,
    pub(crate) range: Option<(f32, f32)>,
    pub(crate) dirty: bool,
}

impl StateCache {
    /// Field order: toggle, mode, color, density, range.
    pub fn apply_fog(&mut self, dev: &mut dyn DeviceCommands, desired: &FogState) {
        let mut emitted = false;
        if self.fog.enabled != Some(desired.enabled) {
            dev.set_capability(Capability::Fog, desired.enabled);
            self.fog.enabled = Some(desired.enabled);
            emitted = true;
        }
        if desired.enabled {
            let force = self.fog.dirty;
            if force || self.fog.mode != Some(desired.mode) {
                dev.set_fog_mode(desired.mode);
                self.fog.mode = Some(desired.mode);
                emitted = true;
            }
            if force || self.fog.color != Some(desired.color) {
                dev.set_fog_color(desired.color);
                self.fog.color = Some(desired.color);
                emitted = true;
            }
            if force || self.fog.density != Some(desired.density) {
                dev.set_fog_density(desired.density);
                self.fog.density = Some(desired.density);
                emitted = true;
            }
            let range = (desired.start, desired.end);
            if force || self.fog.range != Some(range) {
                dev.set_fog_range(desired.start, desired.end);
                self.fog.range = Some(range);
                emitted = true;
            }
        }
        self.fog.dirty = false;
        if emitted {
            self.stats.inc_state_changes();
        }
    }
}
