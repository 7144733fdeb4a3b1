use std::fmt;
use std::sync::Arc;

use tracing::debug;

use glint_device::cmd::{BufferTarget, ColorMask, MatrixMode, ShadeModel, TextureTarget};
use glint_device::stats::RenderStats;
use glint_device::{DeviceCaps, DeviceCommands, RawId};

use crate::error::StateError;
use crate::slots::alpha::AlphaMirror;
use crate::slots::arrays::ArrayMirror;
use crate::slots::blend::BlendMirror;
use crate::slots::clip::ClipPlaneMirror;
use crate::slots::depth::DepthMirror;
use crate::slots::fog::FogMirror;
use crate::slots::lights::LightMirror;
use crate::slots::material::MaterialMirror;
use crate::slots::raster::{CullMirror, PolygonOffsetMirror, ScissorMirror};
use crate::slots::stencil::StencilMirror;
use crate::slots::texunits::UnitMirror;

/// Addressable non-indexed slots, for [`StateCache::invalidate`] and
/// [`StateCache::mark_dirty`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotId {
    Blend,
    Depth,
    Stencil,
    AlphaTest,
    Fog,
    Cull,
    ShadeModel,
    ColorMask,
    Scissor,
    PolygonOffset,
    Material,
    Transform(MatrixMode),
}

/// Addressable indexed slot groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupId {
    Lights,
    ClipPlanes,
    TextureUnits,
    AttribArrays,
    TexcoordArrays,
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GroupId::Lights => "light",
            GroupId::ClipPlanes => "clip plane",
            GroupId::TextureUnits => "texture unit",
            GroupId::AttribArrays => "attribute array",
            GroupId::TexcoordArrays => "texcoord array",
        };
        f.write_str(s)
    }
}

/// One mirrored value plus its producer-side dirty bit.
///
/// `value == None` is the unknown sentinel: nothing is assumed about the
/// device, so the next apply emits unconditionally. `dirty` forces one
/// reapplication while keeping the mirrored value (used when a producer
/// mutated a shared value in place without going through the cache).
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cached<T> {
    pub(crate) value: Option<T>,
    pub(crate) dirty: bool,
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self {
            value: None,
            dirty: false,
        }
    }
}

impl<T: PartialEq + Copy> Cached<T> {
    pub(crate) fn needs(&self, desired: &T) -> bool {
        self.dirty || self.value.as_ref() != Some(desired)
    }

    pub(crate) fn store(&mut self, value: T) {
        self.value = Some(value);
        self.dirty = false;
    }

    pub(crate) fn invalidate(&mut self) {
        self.value = None;
        self.dirty = false;
    }
}

/// A family of identical slots indexed 0..N-1.
///
/// `touched` is the high-water mark of indices ever applied since the last
/// full invalidation; shorter requests disable the tail up to that mark
/// exactly once, then the mark shrinks to the request length.
#[derive(Debug)]
pub(crate) struct IndexedGroup<M> {
    pub(crate) units: Vec<M>,
    pub(crate) touched: usize,
}

impl<M: Default> IndexedGroup<M> {
    fn with_len(len: usize) -> Self {
        Self {
            units: (0..len).map(|_| M::default()).collect(),
            touched: 0,
        }
    }

    pub(crate) fn invalidate(&mut self) {
        for unit in &mut self.units {
            *unit = M::default();
        }
        self.touched = 0;
    }
}

/// Host-side mirror of the device's configuration.
///
/// Exactly one instance is bound to a device context; all methods run on the
/// device-owning thread. The cache holds only non-owning numeric ids for
/// resources — it never extends a resource handle's lifetime.
pub struct StateCache {
    caps: DeviceCaps,
    pub(crate) stats: Arc<RenderStats>,

    // Auxiliary device modes that some writes implicitly depend on.
    pub(crate) active_unit: Option<u32>,
    pub(crate) client_active_unit: Option<u32>,
    pub(crate) matrix_mode: Option<MatrixMode>,

    // Bind points.
    bound_buffers: [Option<RawId>; 2],
    bound_framebuffer: Option<RawId>,
    bound_renderbuffer: Option<RawId>,
    current_program: Option<RawId>,

    pub(crate) blend: BlendMirror,
    pub(crate) depth: DepthMirror,
    pub(crate) stencil: StencilMirror,
    pub(crate) alpha: AlphaMirror,
    pub(crate) fog: FogMirror,
    pub(crate) cull: CullMirror,
    pub(crate) shade_model: Cached<ShadeModel>,
    pub(crate) color_mask: Cached<ColorMask>,
    pub(crate) scissor: ScissorMirror,
    pub(crate) polygon_offset: PolygonOffsetMirror,
    pub(crate) material: MaterialMirror,
    // Indexed by MatrixMode order: model-view, projection, texture.
    pub(crate) transforms: [Cached<[f32; 16]>; 3],

    pub(crate) lighting: Cached<bool>,
    pub(crate) lights: IndexedGroup<LightMirror>,
    pub(crate) clip_planes: IndexedGroup<ClipPlaneMirror>,
    pub(crate) tex_units: IndexedGroup<UnitMirror>,
    pub(crate) attrib_arrays: IndexedGroup<ArrayMirror>,
    pub(crate) texcoord_arrays: IndexedGroup<ArrayMirror>,
}

pub(crate) fn matrix_index(mode: MatrixMode) -> usize {
    match mode {
        MatrixMode::ModelView => 0,
        MatrixMode::Projection => 1,
        MatrixMode::Texture => 2,
    }
}

fn buffer_index(target: BufferTarget) -> usize {
    match target {
        BufferTarget::Array => 0,
        BufferTarget::ElementArray => 1,
    }
}

impl StateCache {
    /// Group sizes come from the capability limits captured at device init.
    pub fn new(caps: &DeviceCaps, stats: Arc<RenderStats>) -> Self {
        Self {
            caps: *caps,
            stats,
            active_unit: None,
            client_active_unit: None,
            matrix_mode: None,
            bound_buffers: [None; 2],
            bound_framebuffer: None,
            bound_renderbuffer: None,
            current_program: None,
            blend: BlendMirror::default(),
            depth: DepthMirror::default(),
            stencil: StencilMirror::default(),
            alpha: AlphaMirror::default(),
            fog: FogMirror::default(),
            cull: CullMirror::default(),
            shade_model: Cached::default(),
            color_mask: Cached::default(),
            scissor: ScissorMirror::default(),
            polygon_offset: PolygonOffsetMirror::default(),
            material: MaterialMirror::default(),
            transforms: [Cached::default(); 3],
            lighting: Cached::default(),
            lights: IndexedGroup::with_len(caps.max_fixed_lights as usize),
            clip_planes: IndexedGroup::with_len(caps.max_clip_planes as usize),
            tex_units: IndexedGroup::with_len(caps.max_texture_units as usize),
            attrib_arrays: IndexedGroup::with_len(caps.max_vertex_attribs as usize),
            texcoord_arrays: IndexedGroup::with_len(caps.max_texture_units as usize),
        }
    }

    pub fn caps(&self) -> &DeviceCaps {
        &self.caps
    }

    // -- invalidation ------------------------------------------------------

    /// Forget the mirrored value of one slot; the next apply re-emits the
    /// full command set for it even when the value is unchanged.
    pub fn invalidate(&mut self, slot: SlotId) {
        match slot {
            SlotId::Blend => self.blend = BlendMirror::default(),
            SlotId::Depth => self.depth = DepthMirror::default(),
            SlotId::Stencil => self.stencil = StencilMirror::default(),
            SlotId::AlphaTest => self.alpha = AlphaMirror::default(),
            SlotId::Fog => self.fog = FogMirror::default(),
            SlotId::Cull => self.cull = CullMirror::default(),
            SlotId::ShadeModel => self.shade_model.invalidate(),
            SlotId::ColorMask => self.color_mask.invalidate(),
            SlotId::Scissor => self.scissor = ScissorMirror::default(),
            SlotId::PolygonOffset => self.polygon_offset = PolygonOffsetMirror::default(),
            SlotId::Material => self.material = MaterialMirror::default(),
            SlotId::Transform(mode) => self.transforms[matrix_index(mode)].invalidate(),
        }
    }

    /// Forget a whole indexed group, including its high-water mark.
    pub fn invalidate_group(&mut self, group: GroupId) {
        match group {
            GroupId::Lights => {
                self.lights.invalidate();
                self.lighting.invalidate();
            }
            GroupId::ClipPlanes => self.clip_planes.invalidate(),
            GroupId::TextureUnits => self.tex_units.invalidate(),
            GroupId::AttribArrays => self.attrib_arrays.invalidate(),
            GroupId::TexcoordArrays => self.texcoord_arrays.invalidate(),
        }
    }

    /// Return every mirror to the unknown state, including the auxiliary
    /// mode and bind-point caches. Used after context resets and whenever
    /// the device may have been touched behind the cache's back.
    pub fn invalidate_all(&mut self) {
        debug!("state cache invalidated");
        self.active_unit = None;
        self.client_active_unit = None;
        self.matrix_mode = None;
        self.bound_buffers = [None; 2];
        self.bound_framebuffer = None;
        self.bound_renderbuffer = None;
        self.current_program = None;
        for slot in [
            SlotId::Blend,
            SlotId::Depth,
            SlotId::Stencil,
            SlotId::AlphaTest,
            SlotId::Fog,
            SlotId::Cull,
            SlotId::ShadeModel,
            SlotId::ColorMask,
            SlotId::Scissor,
            SlotId::PolygonOffset,
            SlotId::Material,
            SlotId::Transform(MatrixMode::ModelView),
            SlotId::Transform(MatrixMode::Projection),
            SlotId::Transform(MatrixMode::Texture),
        ] {
            self.invalidate(slot);
        }
        for group in [
            GroupId::Lights,
            GroupId::ClipPlanes,
            GroupId::TextureUnits,
            GroupId::AttribArrays,
            GroupId::TexcoordArrays,
        ] {
            self.invalidate_group(group);
        }
    }

    // -- producer-side dirty bits ------------------------------------------

    /// Force one reapplication of `slot` even if the next requested value
    /// compares equal to the mirror. Unlike [`invalidate`](Self::invalidate)
    /// the mirrored value is kept, so sub-fields that really are in sync are
    /// still skipped where the slot's contract allows it.
    pub fn mark_dirty(&mut self, slot: SlotId) {
        match slot {
            SlotId::Blend => self.blend.dirty = true,
            SlotId::Depth => self.depth.dirty = true,
            SlotId::Stencil => self.stencil.dirty = true,
            SlotId::AlphaTest => self.alpha.dirty = true,
            SlotId::Fog => self.fog.dirty = true,
            SlotId::Cull => self.cull.dirty = true,
            SlotId::ShadeModel => self.shade_model.dirty = true,
            SlotId::ColorMask => self.color_mask.dirty = true,
            SlotId::Scissor => self.scissor.dirty = true,
            SlotId::PolygonOffset => self.polygon_offset.dirty = true,
            SlotId::Material => self.material.dirty = true,
            SlotId::Transform(mode) => self.transforms[matrix_index(mode)].dirty = true,
        }
    }

    /// Same as [`mark_dirty`](Self::mark_dirty) for one index of a group.
    pub fn mark_unit_dirty(&mut self, group: GroupId, index: u32) -> Result<(), StateError> {
        let (len, limit) = match group {
            GroupId::Lights => (self.lights.units.len(), self.caps.max_fixed_lights),
            GroupId::ClipPlanes => (self.clip_planes.units.len(), self.caps.max_clip_planes),
            GroupId::TextureUnits => (self.tex_units.units.len(), self.caps.max_texture_units),
            GroupId::AttribArrays => (self.attrib_arrays.units.len(), self.caps.max_vertex_attribs),
            GroupId::TexcoordArrays => {
                (self.texcoord_arrays.units.len(), self.caps.max_texture_units)
            }
        };
        if index as usize >= len {
            return Err(StateError::GroupIndexOutOfRange {
                group,
                index,
                limit,
            });
        }
        let index = index as usize;
        match group {
            GroupId::Lights => self.lights.units[index].dirty = true,
            GroupId::ClipPlanes => self.clip_planes.units[index].dirty = true,
            GroupId::TextureUnits => self.tex_units.units[index].dirty = true,
            GroupId::AttribArrays => self.attrib_arrays.units[index].dirty = true,
            GroupId::TexcoordArrays => self.texcoord_arrays.units[index].dirty = true,
        }
        Ok(())
    }

    // -- auxiliary mode selection ------------------------------------------
    //
    // Re-selecting a mode the device is already in is the classic source of
    // redundant calls; every path that needs a unit or matrix stack goes
    // through these.

    pub(crate) fn select_unit(&mut self, dev: &mut dyn DeviceCommands, unit: u32) {
        if self.active_unit != Some(unit) {
            dev.select_texture_unit(unit);
            self.active_unit = Some(unit);
            self.stats.inc_mode_switches();
        }
    }

    pub(crate) fn select_client_unit(&mut self, dev: &mut dyn DeviceCommands, unit: u32) {
        if self.client_active_unit != Some(unit) {
            dev.select_client_texture_unit(unit);
            self.client_active_unit = Some(unit);
            self.stats.inc_mode_switches();
        }
    }

    pub(crate) fn select_matrix(&mut self, dev: &mut dyn DeviceCommands, mode: MatrixMode) {
        if self.matrix_mode != Some(mode) {
            dev.select_matrix_mode(mode);
            self.matrix_mode = Some(mode);
            self.stats.inc_mode_switches();
        }
    }

    // -- bind points -------------------------------------------------------

    /// Diffed buffer bind; also used by the resource layer before uploads.
    pub fn bind_buffer(&mut self, dev: &mut dyn DeviceCommands, target: BufferTarget, id: RawId) {
        let slot = &mut self.bound_buffers[buffer_index(target)];
        if *slot != Some(id) {
            dev.bind_buffer(target, id);
            *slot = Some(id);
            self.stats.inc_buffer_binds();
        }
    }

    pub fn bind_framebuffer(&mut self, dev: &mut dyn DeviceCommands, id: RawId) {
        if self.bound_framebuffer != Some(id) {
            dev.bind_framebuffer(id);
            self.bound_framebuffer = Some(id);
        }
    }

    pub fn bind_renderbuffer(&mut self, dev: &mut dyn DeviceCommands, id: RawId) {
        if self.bound_renderbuffer != Some(id) {
            dev.bind_renderbuffer(id);
            self.bound_renderbuffer = Some(id);
        }
    }

    pub fn use_program(&mut self, dev: &mut dyn DeviceCommands, id: RawId) {
        if self.current_program != Some(id) {
            dev.use_program(id);
            self.current_program = Some(id);
        }
    }

    /// Bind `id` on the active unit so its parameters can be edited.
    ///
    /// Selects unit 0 first if no unit is known to be active. The unit's
    /// binding mirror is updated, so a later `apply_texture_units` sees the
    /// changed binding and re-binds only if it actually wants a different
    /// texture there.
    pub fn bind_texture_for_edit(
        &mut self,
        dev: &mut dyn DeviceCommands,
        target: TextureTarget,
        id: RawId,
    ) {
        if self.active_unit.is_none() {
            self.select_unit(dev, 0);
        }
        let unit = self.active_unit.unwrap_or(0) as usize;
        let mut mirror = self.tex_units.units[unit];
        if mirror.binding.value != Some((target, id)) {
            dev.bind_texture(target, id);
            mirror.binding.store((target, id));
            self.stats.inc_texture_binds();
        }
        self.tex_units.units[unit] = mirror;
    }

    /// Notify the cache that `id` of the given kind is being deleted.
    ///
    /// Any mirror slot referring to the id is returned to the unknown state
    /// so a later bind of a recycled id is not skipped as "already bound".
    pub fn forget_resource(&mut self, kind: glint_device::ResourceKind, id: RawId) {
        use glint_device::ResourceKind;
        match kind {
            ResourceKind::Buffer => {
                for slot in &mut self.bound_buffers {
                    if *slot == Some(id) {
                        *slot = None;
                    }
                }
                for unit in &mut self.attrib_arrays.units {
                    if unit.pointer.value.is_some_and(|p| p.buffer == id) {
                        unit.pointer.invalidate();
                    }
                }
                for unit in &mut self.texcoord_arrays.units {
                    if unit.pointer.value.is_some_and(|p| p.buffer == id) {
                        unit.pointer.invalidate();
                    }
                }
            }
            ResourceKind::Texture => {
                for unit in &mut self.tex_units.units {
                    if unit.binding.value.is_some_and(|(_, bound)| bound == id) {
                        unit.binding.invalidate();
                    }
                }
            }
            ResourceKind::Program => {
                if self.current_program == Some(id) {
                    self.current_program = None;
                }
            }
            ResourceKind::Framebuffer => {
                if self.bound_framebuffer == Some(id) {
                    self.bound_framebuffer = None;
                }
            }
            ResourceKind::Renderbuffer => {
                if self.bound_renderbuffer == Some(id) {
                    self.bound_renderbuffer = None;
                }
            }
            ResourceKind::Shader | ResourceKind::Query => {}
        }
    }
}
