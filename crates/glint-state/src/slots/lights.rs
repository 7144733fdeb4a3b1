use glint_device::cmd::{Capability, LightComponent, MatrixMode};
use glint_device::DeviceCommands;

use crate::cache::{GroupId, StateCache};
use crate::error::StateError;

/// Desired configuration of one fixed-function light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// `w == 0` is directional, `w == 1` positional.
    pub position: [f32; 4],
    /// Constant, linear, quadratic.
    pub attenuation: [f32; 3],
    pub spot: Option<Spot>,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            ambient: [0.0, 0.0, 0.0, 1.0],
            diffuse: [1.0, 1.0, 1.0, 1.0],
            specular: [1.0, 1.0, 1.0, 1.0],
            position: [0.0, 0.0, 1.0, 0.0],
            attenuation: [1.0, 0.0, 0.0],
            spot: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spot {
    pub direction: [f32; 3],
    pub exponent: f32,
    pub cutoff: f32,
}

/// What "no spot" means to the device: full-sphere cutoff, default axis.
const NO_SPOT: Spot = Spot {
    direction: [0.0, 0.0, -1.0],
    exponent: 0.0,
    cutoff: 180.0,
};

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LightMirror {
    pub(crate) enabled: Option<bool>,
    pub(crate) ambient: Option<[f32; 4]>,
    pub(crate) diffuse: Option<[f32; 4]>,
    pub(crate) specular: Option<[f32; 4]>,
    pub(crate) position: Option<[f32; 4]>,
    pub(crate) attenuation: Option<[f32; 3]>,
    pub(crate) spot: Option<Spot>,
    pub(crate) dirty: bool,
}

impl StateCache {
    /// Apply lights `first..first+len`; indices outside that range, up to
    /// the group's high-water mark, are disabled.
    ///
    /// The device transforms light positions and spot directions by the
    /// model-view matrix at write time, so those writes happen inside a
    /// single push-identity/pop bracket per call — opened lazily before the
    /// first such write, closed once at the end, never per light.
    ///
    /// Per-light field order: toggle, ambient, diffuse, specular,
    /// attenuation, position, spot. The master lighting capability is
    /// toggled first of all.
    pub fn apply_lights(
        &mut self,
        dev: &mut dyn DeviceCommands,
        first: u32,
        lights: &[Option<Light>],
    ) -> Result<(), StateError> {
        let limit = self.lights.units.len();
        let start = first as usize;
        if start + lights.len() > limit {
            return Err(StateError::GroupIndexOutOfRange {
                group: GroupId::Lights,
                index: (start + lights.len()).saturating_sub(1) as u32,
                limit: limit as u32,
            });
        }

        let mut emitted = false;

        let master = lights.iter().any(Option::is_some);
        if self.lighting.needs(&master) {
            dev.set_capability(Capability::Lighting, master);
            self.lighting.store(master);
            emitted = true;
        }

        let end = self.lights.touched.max(start + lights.len());
        let mut neutral = false;
        for i in 0..end {
            let desired = if i >= start && i < start + lights.len() {
                lights[i - start].as_ref()
            } else {
                None
            };
            let mut m = self.lights.units[i];
            let index = i as u8;
            match desired {
                None => {
                    if m.enabled != Some(false) {
                        dev.set_capability(Capability::Light(index), false);
                        m.enabled = Some(false);
                        emitted = true;
                    }
                }
                Some(light) => {
                    if m.enabled != Some(true) {
                        dev.set_capability(Capability::Light(index), true);
                        m.enabled = Some(true);
                        emitted = true;
                    }
                    let force = m.dirty;
                    if force || m.ambient != Some(light.ambient) {
                        dev.set_light_color(index, LightComponent::Ambient, light.ambient);
                        m.ambient = Some(light.ambient);
                        emitted = true;
                    }
                    if force || m.diffuse != Some(light.diffuse) {
                        dev.set_light_color(index, LightComponent::Diffuse, light.diffuse);
                        m.diffuse = Some(light.diffuse);
                        emitted = true;
                    }
                    if force || m.specular != Some(light.specular) {
                        dev.set_light_color(index, LightComponent::Specular, light.specular);
                        m.specular = Some(light.specular);
                        emitted = true;
                    }
                    if force || m.attenuation != Some(light.attenuation) {
                        dev.set_light_attenuation(
                            index,
                            light.attenuation[0],
                            light.attenuation[1],
                            light.attenuation[2],
                        );
                        m.attenuation = Some(light.attenuation);
                        emitted = true;
                    }
                    if force || m.position != Some(light.position) {
                        if !neutral {
                            self.select_matrix(dev, MatrixMode::ModelView);
                            dev.push_matrix();
                            dev.load_identity();
                            neutral = true;
                        }
                        dev.set_light_position(index, light.position);
                        m.position = Some(light.position);
                        emitted = true;
                    }
                    let spot = light.spot.unwrap_or(NO_SPOT);
                    if force || m.spot != Some(spot) {
                        if !neutral {
                            self.select_matrix(dev, MatrixMode::ModelView);
                            dev.push_matrix();
                            dev.load_identity();
                            neutral = true;
                        }
                        dev.set_light_spot(index, spot.direction, spot.exponent, spot.cutoff);
                        m.spot = Some(spot);
                        emitted = true;
                    }
                }
            }
            m.dirty = false;
            self.lights.units[i] = m;
        }
        if neutral {
            dev.pop_matrix();
        }
        self.lights.touched = start + lights.len();

        if emitted {
            self.stats.inc_state_changes();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_device::{Command, DeviceCaps, RenderStats, TraceDevice};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn cache() -> StateCache {
        StateCache::new(&DeviceCaps::default(), Arc::new(RenderStats::new()))
    }

    #[test]
    fn positional_writes_share_one_neutralization_bracket() {
        let mut dev = TraceDevice::new();
        let mut cache = cache();
        let positional = Light {
            position: [1.0, 2.0, 3.0, 1.0],
            ..Light::default()
        };
        cache
            .apply_lights(&mut dev, 0, &[Some(positional), Some(positional)])
            .unwrap();

        let cmds = dev.take_commands();
        let pushes = cmds.iter().filter(|c| **c == Command::PushMatrix).count();
        let pops = cmds.iter().filter(|c| **c == Command::PopMatrix).count();
        assert_eq!((pushes, pops), (1, 1));
        // The bracket closes after every positional write.
        assert_eq!(cmds.last(), Some(&Command::PopMatrix));
    }

    #[test]
    fn color_only_change_needs_no_matrix_work() {
        let mut dev = TraceDevice::new();
        let mut cache = cache();
        let mut light = Light::default();
        cache.apply_lights(&mut dev, 0, &[Some(light)]).unwrap();
        dev.clear();

        light.diffuse = [0.5, 0.5, 0.5, 1.0];
        cache.apply_lights(&mut dev, 0, &[Some(light)]).unwrap();
        assert_eq!(
            dev.take_commands(),
            vec![Command::SetLightColor {
                index: 0,
                component: LightComponent::Diffuse,
                color: [0.5, 0.5, 0.5, 1.0],
            }]
        );
    }

    #[test]
    fn shrinking_request_disables_tail_once() {
        let mut dev = TraceDevice::new();
        let mut cache = cache();
        let l = Light::default();
        cache
            .apply_lights(&mut dev, 0, &[Some(l), Some(l), Some(l)])
            .unwrap();
        dev.clear();

        cache.apply_lights(&mut dev, 0, &[Some(l)]).unwrap();
        assert_eq!(
            dev.take_commands(),
            vec![
                Command::SetCapability {
                    cap: Capability::Light(1),
                    enabled: false,
                },
                Command::SetCapability {
                    cap: Capability::Light(2),
                    enabled: false,
                },
            ]
        );

        // Same request again: the mark has shrunk, nothing to do.
        cache.apply_lights(&mut dev, 0, &[Some(l)]).unwrap();
        assert!(dev.commands().is_empty());
    }

    #[test]
    fn empty_request_turns_lighting_master_off() {
        let mut dev = TraceDevice::new();
        let mut cache = cache();
        cache
            .apply_lights(&mut dev, 0, &[Some(Light::default())])
            .unwrap();
        dev.clear();

        cache.apply_lights(&mut dev, 0, &[]).unwrap();
        assert_eq!(
            dev.take_commands(),
            vec![
                Command::SetCapability {
                    cap: Capability::Lighting,
                    enabled: false,
                },
                Command::SetCapability {
                    cap: Capability::Light(0),
                    enabled: false,
                },
            ]
        );
    }

    #[test]
    fn unit_dirty_bit_forces_one_full_resend() {
        let mut dev = TraceDevice::new();
        let mut cache = cache();
        let light = Light::default();
        cache.apply_lights(&mut dev, 0, &[Some(light)]).unwrap();
        dev.clear();

        cache.mark_unit_dirty(GroupId::Lights, 0).unwrap();
        cache.apply_lights(&mut dev, 0, &[Some(light)]).unwrap();
        // Colors, attenuation, position and spot all go out again (plus the
        // matrix bracket for the positional writes); the toggles do not.
        assert!(!dev.commands().is_empty());
        assert!(!dev
            .commands()
            .iter()
            .any(|c| matches!(c, Command::SetCapability { .. })));

        dev.clear();
        cache.apply_lights(&mut dev, 0, &[Some(light)]).unwrap();
        assert!(dev.commands().is_empty());
    }

    #[test]
    fn out_of_range_request_is_rejected_before_any_command() {
        let mut dev = TraceDevice::new();
        let mut cache = cache();
        let max = cache.caps().max_fixed_lights;
        let lights = vec![Some(Light::default()); max as usize + 1];
        let err = cache.apply_lights(&mut dev, 0, &lights).unwrap_err();
        assert!(matches!(err, StateError::GroupIndexOutOfRange { .. }));
        assert!(dev.commands().is_empty());
    }
}
