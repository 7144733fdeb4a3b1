/// Capability limits and feature bits advertised by the device.
///
/// Captured once when the context comes up; re-initializing the device means
/// building a fresh `DeviceCaps` (and a fresh cache bound to it). Nothing in
/// the stack re-queries the device afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceCaps {
    pub max_texture_units: u32,
    pub max_fixed_lights: u32,
    pub max_clip_planes: u32,
    pub max_vertex_attribs: u32,
    pub max_texture_size: u32,
    /// Maximum anisotropic filtering level, in the device's own units
    /// (1 = isotropic). Only meaningful when
    /// [`supports_anisotropic_filter`](Self::supports_anisotropic_filter) is set.
    pub max_anisotropy_x16: u32,
    /// Off-screen framebuffer objects are available as render targets.
    pub supports_offscreen_target: bool,
    /// Hidden auxiliary surfaces (pbuffer-style) can be created.
    pub supports_aux_surface: bool,
    /// An auxiliary surface can be bound directly as a texture image,
    /// skipping the copy-back.
    pub supports_direct_surface_bind: bool,
    pub supports_anisotropic_filter: bool,
}

impl Default for DeviceCaps {
    /// Conservative baseline used by tests: the minimums a fixed-function
    /// context guarantees, with every optional render-target path available.
    fn default() -> Self {
        Self {
            max_texture_units: 4,
            max_fixed_lights: 8,
            max_clip_planes: 6,
            max_vertex_attribs: 16,
            max_texture_size: 2048,
            max_anisotropy_x16: 16,
            supports_offscreen_target: true,
            supports_aux_surface: true,
            supports_direct_surface_bind: true,
            supports_anisotropic_filter: true,
        }
    }
}
