//! Rasterizer odds and ends: face culling, shading, write masks, scissor,
//! polygon offset. Small slots that share no structure worth factoring.

use glint_device::cmd::{Capability, ColorMask, CullFace, ShadeModel};
use glint_device::DeviceCommands;

use crate::cache::StateCache;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CullState {
    pub enabled: bool,
    pub face: CullFace,
}

impl Default for CullState {
    fn default() -> Self {
        Self {
            enabled: false,
            face: CullFace::Back,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct CullMirror {
    pub(crate) enabled: Option<bool>,
    pub(crate) face: Option<CullFace>,
    pub(crate) dirty: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScissorState {
    pub enabled: bool,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ScissorState {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ScissorMirror {
    pub(crate) enabled: Option<bool>,
    pub(crate) rect: Option<(i32, i32, u32, u32)>,
    pub(crate) dirty: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolygonOffsetState {
    pub enabled: bool,
    pub factor: f32,
    pub units: f32,
}

impl Default for PolygonOffsetState {
    fn default() -> Self {
        Self {
            enabled: false,
            factor: 0.0,
            units: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PolygonOffsetMirror {
    pub(crate) enabled: Option<bool>,
    pub(crate) params: Option<(f32, f32)>,
    pub(crate) dirty: bool,
}

impl StateCache {
    pub fn apply_cull(&mut self, dev: &mut dyn DeviceCommands, desired: &CullState) {
        let mut emitted = false;
        if self.cull.enabled != Some(desired.enabled) {
            dev.set_capability(Capability::CullFace, desired.enabled);
            self.cull.enabled = Some(desired.enabled);
            emitted = true;
        }
        if desired.enabled && (self.cull.dirty || self.cull.face != Some(desired.face)) {
            dev.set_cull_face(desired.face);
            self.cull.face = Some(desired.face);
            emitted = true;
        }
        self.cull.dirty = false;
        if emitted {
            self.stats.inc_state_changes();
        }
    }

    pub fn apply_shade_model(&mut self, dev: &mut dyn DeviceCommands, desired: ShadeModel) {
        if self.shade_model.needs(&desired) {
            dev.set_shade_model(desired);
            self.shade_model.store(desired);
            self.stats.inc_state_changes();
        }
    }

    pub fn apply_color_mask(&mut self, dev: &mut dyn DeviceCommands, desired: ColorMask) {
        if self.color_mask.needs(&desired) {
            dev.set_color_mask(desired);
            self.color_mask.store(desired);
            self.stats.inc_state_changes();
        }
    }

    pub fn apply_scissor(&mut self, dev: &mut dyn DeviceCommands, desired: &ScissorState) {
        let mut emitted = false;
        if self.scissor.enabled != Some(desired.enabled) {
            dev.set_capability(Capability::ScissorTest, desired.enabled);
            self.scissor.enabled = Some(desired.enabled);
            emitted = true;
        }
        if desired.enabled {
            let rect = (desired.x, desired.y, desired.width, desired.height);
            if self.scissor.dirty || self.scissor.rect != Some(rect) {
                dev.set_scissor_rect(desired.x, desired.y, desired.width, desired.height);
                self.scissor.rect = Some(rect);
                emitted = true;
            }
        }
        self.scissor.dirty = false;
        if emitted {
            self.stats.inc_state_changes();
        }
    }

    pub fn apply_polygon_offset(
        &mut self,
        dev: &mut dyn DeviceCommands,
        desired: &PolygonOffsetState,
    ) {
        let mut emitted = false;
        if self.polygon_offset.enabled != Some(desired.enabled) {
            dev.set_capability(Capability::PolygonOffsetFill, desired.enabled);
            self.polygon_offset.enabled = Some(desired.enabled);
            emitted = true;
        }
        if desired.enabled {
            let params = (desired.factor, desired.units);
            if self.polygon_offset.dirty || self.polygon_offset.params != Some(params) {
                dev.set_polygon_offset(desired.factor, desired.units);
                self.polygon_offset.params = Some(params);
                emitted = true;
            }
        }
        self.polygon_offset.dirty = false;
        if emitted {
            self.stats.inc_state_changes();
        }
    }
}
