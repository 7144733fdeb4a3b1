use glint_device::cmd::{AttribPointer, BufferTarget};
use glint_device::DeviceCommands;

use crate::cache::{GroupId, StateCache};
use crate::error::StateError;

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ArrayMirror {
    pub(crate) enabled: Option<bool>,
    pub(crate) pointer: crate::cache::Cached<AttribPointer>,
    pub(crate) dirty: bool,
}

fn validate(pointers: &[Option<AttribPointer>]) -> Result<(), StateError> {
    for pointer in pointers.iter().flatten() {
        if pointer.size == 0 || pointer.size > 4 {
            return Err(StateError::InvalidPointerSize {
                size: pointer.size,
            });
        }
        if pointer.buffer == 0 {
            return Err(StateError::ReservedBufferId);
        }
        // Stride 0 means tightly packed; anything else must cover one element.
        let needed = u32::from(pointer.size) * pointer.ty.byte_width();
        if pointer.stride != 0 && pointer.stride < needed {
            return Err(StateError::PointerStrideTooSmall {
                stride: pointer.stride,
                needed,
            });
        }
    }
    Ok(())
}

impl StateCache {
    /// Apply vertex attribute arrays `first..first+len`; arrays beyond the
    /// request, up to the high-water mark, are disabled. A pointer write
    /// needs its source buffer bound, so each one goes through the diffed
    /// buffer bind first.
    pub fn apply_attrib_arrays(
        &mut self,
        dev: &mut dyn DeviceCommands,
        first: u32,
        arrays: &[Option<AttribPointer>],
    ) -> Result<(), StateError> {
        let limit = self.attrib_arrays.units.len();
        let start = first as usize;
        if start + arrays.len() > limit {
            return Err(StateError::GroupIndexOutOfRange {
                group: GroupId::AttribArrays,
                index: (start + arrays.len()).saturating_sub(1) as u32,
                limit: limit as u32,
            });
        }
        validate(arrays)?;

        let mut emitted = false;
        let end = self.attrib_arrays.touched.max(start + arrays.len());
        for i in 0..end {
            let desired = if i >= start && i < start + arrays.len() {
                arrays[i - start]
            } else {
                None
            };
            let mut m = self.attrib_arrays.units[i];
            let index = i as u32;
            let enabled = desired.is_some();
            if m.enabled != Some(enabled) {
                dev.set_attrib_array_enabled(index, enabled);
                m.enabled = Some(enabled);
                emitted = true;
            }
            if let Some(pointer) = desired {
                if m.dirty || m.pointer.value != Some(pointer) {
                    self.bind_buffer(dev, BufferTarget::Array, pointer.buffer);
                    dev.set_attrib_pointer(index, pointer);
                    m.pointer.store(pointer);
                    emitted = true;
                }
            }
            m.dirty = false;
            self.attrib_arrays.units[i] = m;
        }
        self.attrib_arrays.touched = start + arrays.len();

        if emitted {
            self.stats.inc_state_changes();
        }
        Ok(())
    }

    /// Texture-coordinate arrays are per texture unit; the client-side unit
    /// select is diffed the same way the server-side one is.
    pub fn apply_texcoord_arrays(
        &mut self,
        dev: &mut dyn DeviceCommands,
        first: u32,
        arrays: &[Option<AttribPointer>],
    ) -> Result<(), StateError> {
        let limit = self.texcoord_arrays.units.len();
        let start = first as usize;
        if start + arrays.len() > limit {
            return Err(StateError::GroupIndexOutOfRange {
                group: GroupId::TexcoordArrays,
                index: (start + arrays.len()).saturating_sub(1) as u32,
                limit: limit as u32,
            });
        }
        validate(arrays)?;

        let mut emitted = false;
        let end = self.texcoord_arrays.touched.max(start + arrays.len());
        for i in 0..end {
            let desired = if i >= start && i < start + arrays.len() {
                arrays[i - start]
            } else {
                None
            };
            let mut m = self.texcoord_arrays.units[i];
            let unit = i as u32;
            let enabled = desired.is_some();
            if m.enabled != Some(enabled) {
                self.select_client_unit(dev, unit);
                dev.set_texcoord_array_enabled(enabled);
                m.enabled = Some(enabled);
                emitted = true;
            }
            if let Some(pointer) = desired {
                if m.dirty || m.pointer.value != Some(pointer) {
                    self.select_client_unit(dev, unit);
                    self.bind_buffer(dev, BufferTarget::Array, pointer.buffer);
                    dev.set_texcoord_pointer(pointer);
                    m.pointer.store(pointer);
                    emitted = true;
                }
            }
            m.dirty = false;
            self.texcoord_arrays.units[i] = m;
        }
        self.texcoord_arrays.touched = start + arrays.len();

        if emitted {
            self.stats.inc_state_changes();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_device::cmd::AttribType;
    use glint_device::{Command, DeviceCaps, RenderStats, TraceDevice};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn pointer(buffer: u32) -> AttribPointer {
        AttribPointer {
            buffer,
            size: 3,
            ty: AttribType::F32,
            normalized: false,
            stride: 12,
            offset: 0,
        }
    }

    #[test]
    fn pointer_write_binds_its_buffer_first() {
        let mut dev = TraceDevice::new();
        let mut cache = StateCache::new(&DeviceCaps::default(), Arc::new(RenderStats::new()));
        cache
            .apply_attrib_arrays(&mut dev, 0, &[Some(pointer(5))])
            .unwrap();
        assert_eq!(
            dev.take_commands(),
            vec![
                Command::SetAttribArrayEnabled {
                    index: 0,
                    enabled: true,
                },
                Command::BindBuffer {
                    target: BufferTarget::Array,
                    id: 5,
                },
                Command::SetAttribPointer {
                    index: 0,
                    pointer: pointer(5),
                },
            ]
        );
    }

    #[test]
    fn shared_buffer_is_bound_once_across_arrays() {
        let mut dev = TraceDevice::new();
        let mut cache = StateCache::new(&DeviceCaps::default(), Arc::new(RenderStats::new()));
        let mut second = pointer(5);
        second.offset = 12;
        cache
            .apply_attrib_arrays(&mut dev, 0, &[Some(pointer(5)), Some(second)])
            .unwrap();
        let binds = dev
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::BindBuffer { .. }))
            .count();
        assert_eq!(binds, 1);
    }

    #[test]
    fn undersized_stride_is_rejected() {
        let mut dev = TraceDevice::new();
        let mut cache = StateCache::new(&DeviceCaps::default(), Arc::new(RenderStats::new()));
        let mut bad = pointer(5);
        bad.stride = 8;
        let err = cache
            .apply_attrib_arrays(&mut dev, 0, &[Some(bad)])
            .unwrap_err();
        assert_eq!(
            err,
            StateError::PointerStrideTooSmall {
                stride: 8,
                needed: 12,
            }
        );
    }

    #[test]
    fn invalid_component_count_is_rejected() {
        let mut dev = TraceDevice::new();
        let mut cache = StateCache::new(&DeviceCaps::default(), Arc::new(RenderStats::new()));
        let mut bad = pointer(5);
        bad.size = 5;
        let err = cache
            .apply_attrib_arrays(&mut dev, 0, &[Some(bad)])
            .unwrap_err();
        assert_eq!(err, StateError::InvalidPointerSize { size: 5 });
        assert!(dev.commands().is_empty());
    }

    #[test]
    fn texcoord_arrays_select_client_units() {
        let mut dev = TraceDevice::new();
        let mut cache = StateCache::new(&DeviceCaps::default(), Arc::new(RenderStats::new()));
        cache
            .apply_texcoord_arrays(&mut dev, 0, &[Some(pointer(2)), Some(pointer(3))])
            .unwrap();
        let selects: Vec<_> = dev
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::SelectClientTextureUnit(_)))
            .collect();
        assert_eq!(
            selects,
            vec![
                &Command::SelectClientTextureUnit(0),
                &Command::SelectClientTextureUnit(1),
            ]
        );
    }
}
