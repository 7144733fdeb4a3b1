use glint_device::cmd::{Capability, EnvMode, TextureTarget};
use glint_device::{DeviceCommands, RawId};

use crate::cache::{Cached, GroupId, StateCache};
use crate::error::StateError;

/// Desired configuration of one texture unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureUnit {
    pub target: TextureTarget,
    pub texture: RawId,
    pub env_mode: EnvMode,
    pub env_color: [f32; 4],
}

impl TextureUnit {
    pub fn new(target: TextureTarget, texture: RawId) -> Self {
        Self {
            target,
            texture,
            env_mode: EnvMode::Modulate,
            env_color: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct UnitMirror {
    pub(crate) enabled: Option<bool>,
    pub(crate) binding: Cached<(TextureTarget, RawId)>,
    pub(crate) env_mode: Option<EnvMode>,
    pub(crate) env_color: Option<[f32; 4]>,
    pub(crate) dirty: bool,
}

impl StateCache {
    /// Apply texture units `first..first+len`; units beyond the request, up
    /// to the group's high-water mark, are disabled.
    ///
    /// Every emission for unit `i` is preceded by a unit select, but the
    /// select itself is diffed: a batch that only changes unit 2 selects
    /// unit 2 once and touches nothing else.
    pub fn apply_texture_units(
        &mut self,
        dev: &mut dyn DeviceCommands,
        first: u32,
        units: &[Option<TextureUnit>],
    ) -> Result<(), StateError> {
        let limit = self.tex_units.units.len();
        let start = first as usize;
        if start + units.len() > limit {
            return Err(StateError::GroupIndexOutOfRange {
                group: GroupId::TextureUnits,
                index: (start + units.len()).saturating_sub(1) as u32,
                limit: limit as u32,
            });
        }
        for (offset, unit) in units.iter().enumerate() {
            if let Some(u) = unit {
                if u.texture == 0 {
                    return Err(StateError::ReservedTextureId {
                        unit: (start + offset) as u32,
                    });
                }
            }
        }

        let mut emitted = false;
        let end = self.tex_units.touched.max(start + units.len());
        for i in 0..end {
            let desired = if i >= start && i < start + units.len() {
                units[i - start].as_ref().copied()
            } else {
                None
            };
            let mut m = self.tex_units.units[i];
            let unit = i as u32;
            let enabled = desired.is_some();
            if m.enabled != Some(enabled) {
                self.select_unit(dev, unit);
                dev.set_capability(Capability::Texture2D, enabled);
                m.enabled = Some(enabled);
                emitted = true;
            }
            if let Some(u) = desired {
                let force = m.dirty;
                let binding = (u.target, u.texture);
                if force || m.binding.value != Some(binding) {
                    self.select_unit(dev, unit);
                    dev.bind_texture(u.target, u.texture);
                    m.binding.store(binding);
                    self.stats.inc_texture_binds();
                    emitted = true;
                }
                if force || m.env_mode != Some(u.env_mode) {
                    self.select_unit(dev, unit);
                    dev.set_env_mode(u.env_mode);
                    m.env_mode = Some(u.env_mode);
                    emitted = true;
                }
                if force || m.env_color != Some(u.env_color) {
                    self.select_unit(dev, unit);
                    dev.set_env_color(u.env_color);
                    m.env_color = Some(u.env_color);
                    emitted = true;
                }
            }
            m.dirty = false;
            self.tex_units.units[i] = m;
        }
        self.tex_units.touched = start + units.len();

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
    fn unit_select_is_skipped_when_already_active() {
        let mut dev = TraceDevice::new();
        let mut cache = cache();
        let u0 = TextureUnit::new(TextureTarget::Tex2D, 7);
        cache.apply_texture_units(&mut dev, 0, &[Some(u0)]).unwrap();
        dev.clear();

        // Unit 0 is still the active unit, so rebinding it needs no select.
        let mut changed = u0;
        changed.texture = 8;
        cache
            .apply_texture_units(&mut dev, 0, &[Some(changed)])
            .unwrap();
        assert_eq!(
            dev.take_commands(),
            vec![Command::BindTexture {
                target: TextureTarget::Tex2D,
                id: 8,
            }]
        );
    }

    #[test]
    fn only_the_changed_unit_is_selected() {
        let mut dev = TraceDevice::new();
        let mut cache = cache();
        let u = |id| Some(TextureUnit::new(TextureTarget::Tex2D, id));
        cache
            .apply_texture_units(&mut dev, 0, &[u(1), u(2)])
            .unwrap();
        dev.clear();

        // Unit 1 is the active one after the first batch; rebinding unit 0
        // needs exactly one select, and unit 1 is not touched at all.
        cache
            .apply_texture_units(&mut dev, 0, &[u(9), u(2)])
            .unwrap();
        assert_eq!(
            dev.take_commands(),
            vec![
                Command::SelectTextureUnit(0),
                Command::BindTexture {
                    target: TextureTarget::Tex2D,
                    id: 9,
                },
            ]
        );
    }

    #[test]
    fn shorter_request_disables_stale_units_exactly_once() {
        let mut dev = TraceDevice::new();
        let mut cache = cache();
        let u = |id| Some(TextureUnit::new(TextureTarget::Tex2D, id));
        cache
            .apply_texture_units(&mut dev, 0, &[u(1), u(2), u(3)])
            .unwrap();
        dev.clear();

        cache.apply_texture_units(&mut dev, 0, &[u(1)]).unwrap();
        assert_eq!(
            dev.take_commands(),
            vec![
                Command::SelectTextureUnit(1),
                Command::SetCapability {
                    cap: Capability::Texture2D,
                    enabled: false,
                },
                Command::SelectTextureUnit(2),
                Command::SetCapability {
                    cap: Capability::Texture2D,
                    enabled: false,
                },
            ]
        );

        cache.apply_texture_units(&mut dev, 0, &[u(1)]).unwrap();
        assert!(dev.commands().is_empty());
    }

    #[test]
    fn reserved_texture_id_is_a_configuration_error() {
        let mut dev = TraceDevice::new();
        let mut cache = cache();
        let bad = TextureUnit::new(TextureTarget::Tex2D, 0);
        let err = cache
            .apply_texture_units(&mut dev, 1, &[Some(bad)])
            .unwrap_err();
        assert_eq!(err, StateError::ReservedTextureId { unit: 1 });
        assert!(dev.commands().is_empty());
    }
}
