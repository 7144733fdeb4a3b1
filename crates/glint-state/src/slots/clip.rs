use glint_device::cmd::{Capability, MatrixMode};
use glint_device::DeviceCommands;

use crate::cache::{GroupId, StateCache};
use crate::error::StateError;

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ClipPlaneMirror {
    pub(crate) enabled: Option<bool>,
    pub(crate) plane: Option<[f64; 4]>,
    pub(crate) dirty: bool,
}

impl StateCache {
    /// Apply user clip planes `first..first+len`; the rest of the touched
    /// range is disabled. Plane equations are transformed by the model-view
    /// matrix at write time, so equation writes share one
    /// push-identity/pop bracket per call, like light positions.
    pub fn apply_clip_planes(
        &mut self,
        dev: &mut dyn DeviceCommands,
        first: u32,
        planes: &[Option<[f64; 4]>],
    ) -> Result<(), StateError> {
        let limit = self.clip_planes.units.len();
        let start = first as usize;
        if start + planes.len() > limit {
            return Err(StateError::GroupIndexOutOfRange {
                group: GroupId::ClipPlanes,
                index: (start + planes.len()).saturating_sub(1) as u32,
                limit: limit as u32,
            });
        }

        let mut emitted = false;
        let end = self.clip_planes.touched.max(start + planes.len());
        let mut neutral = false;
        for i in 0..end {
            let desired = if i >= start && i < start + planes.len() {
                planes[i - start]
            } else {
                None
            };
            let mut m = self.clip_planes.units[i];
            let index = i as u8;
            match desired {
                None => {
                    if m.enabled != Some(false) {
                        dev.set_capability(Capability::ClipPlane(index), false);
                        m.enabled = Some(false);
                        emitted = true;
                    }
                }
                Some(plane) => {
                    if m.enabled != Some(true) {
                        dev.set_capability(Capability::ClipPlane(index), true);
                        m.enabled = Some(true);
                        emitted = true;
                    }
                    if m.dirty || m.plane != Some(plane) {
                        if !neutral {
                            self.select_matrix(dev, MatrixMode::ModelView);
                            dev.push_matrix();
                            dev.load_identity();
                            neutral = true;
                        }
                        dev.set_clip_plane(index, plane);
                        m.plane = Some(plane);
                        emitted = true;
                    }
                }
            }
            m.dirty = false;
            self.clip_planes.units[i] = m;
        }
        if neutral {
            dev.pop_matrix();
        }
        self.clip_planes.touched = start + planes.len();

        if emitted {
            self.stats.inc_state_changes();
        }
        Ok(())
    }
}
