use glint_device::cmd::{Capability, MaterialComponent, MaterialFace};
use glint_device::DeviceCommands;

use crate::cache::StateCache;

/// Desired surface material.
///
/// `color_material` routes the given component through the per-vertex color
/// instead of the material constant; `None` turns that path off.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialState {
    pub face: MaterialFace,
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub emissive: [f32; 4],
    pub shininess: f32,
    pub color_material: Option<MaterialComponent>,
}

impl Default for MaterialState {
    fn default() -> Self {
        Self {
            face: MaterialFace::FrontAndBack,
            ambient: [0.2, 0.2, 0.2, 1.0],
            diffuse: [0.8, 0.8, 0.8, 1.0],
            specular: [0.0, 0.0, 0.0, 1.0],
            emissive: [0.0, 0.0, 0.0, 1.0],
            shininess: 0.0,
            color_material: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct MaterialMirror {
    pub(crate) face: Option<MaterialFace>,
    pub(crate) ambient: Option<[f32; 4]>,
    pub(crate) diffuse: Option<[f32; 4]>,
    pub(crate) specular: Option<[f32; 4]>,
    pub(crate) emissive: Option<[f32; 4]>,
    pub(crate) shininess: Option<f32>,
    pub(crate) color_material_on: Option<bool>,
    pub(crate) color_material: Option<(MaterialFace, MaterialComponent)>,
    pub(crate) dirty: bool,
}

impl StateCache {
    /// Field order: color-material toggle/routing, ambient, diffuse,
    /// specular, emissive, shininess. A face change invalidates every
    /// component (the face is baked into each device call).
    pub fn apply_material(&mut self, dev: &mut dyn DeviceCommands, desired: &MaterialState) {
        let mut emitted = false;
        if self.material.face != Some(desired.face) {
            self.material.ambient = None;
            self.material.diffuse = None;
            self.material.specular = None;
            self.material.emissive = None;
            self.material.shininess = None;
            self.material.face = Some(desired.face);
        }
        let force = self.material.dirty;

        let cm_on = desired.color_material.is_some();
        if self.material.color_material_on != Some(cm_on) {
            dev.set_capability(Capability::ColorMaterial, cm_on);
            self.material.color_material_on = Some(cm_on);
            emitted = true;
        }
        if let Some(component) = desired.color_material {
            let routing = (desired.face, component);
            if force || self.material.color_material != Some(routing) {
                dev.set_color_material(desired.face, component);
                self.material.color_material = Some(routing);
                emitted = true;
            }
        }

        if force || self.material.ambient != Some(desired.ambient) {
            dev.set_material_color(desired.face, MaterialComponent::Ambient, desired.ambient);
            self.material.ambient = Some(desired.ambient);
            emitted = true;
        }
        if force || self.material.diffuse != Some(desired.diffuse) {
            dev.set_material_color(desired.face, MaterialComponent::Diffuse, desired.diffuse);
            self.material.diffuse = Some(desired.diffuse);
            emitted = true;
        }
        if force || self.material.specular != Some(desired.specular) {
            dev.set_material_color(desired.face, MaterialComponent::Specular, desired.specular);
            self.material.specular = Some(desired.specular);
            emitted = true;
        }
        if force || self.material.emissive != Some(desired.emissive) {
            dev.set_material_color(desired.face, MaterialComponent::Emissive, desired.emissive);
            self.material.emissive = Some(desired.emissive);
            emitted = true;
        }
        if force || self.material.shininess != Some(desired.shininess) {
            dev.set_shininess(desired.face, desired.shininess);
            self.material.shininess = Some(desired.shininess);
            emitted = true;
        }

        self.material.dirty = false;
        if emitted {
            self.stats.inc_state_changes();
        }
    }
}
