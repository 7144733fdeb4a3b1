use crate::cmd::{
    AttachmentPoint, AttribPointer, BlendFactor, BufferTarget, BufferUsageHint, Capability,
    ColorMask, CompareFunc, CullFace, EnvMode, FogMode, LightComponent, MagFilter, MaterialComponent,
    MaterialFace, MatrixMode, MinFilter, QueryTarget, ShadeModel, ShaderStage, StencilOp,
    TextureTarget, WrapAxis, WrapMode,
};
use crate::ids::{RawId, ResourceKind};

/// Result of a shader compile or program link.
///
/// Build failures are not errors: the device keeps running and the caller
/// decides policy based on `success` plus the retained diagnostic log.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildOutcome {
    pub success: bool,
    pub log: String,
}

impl BuildOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            log: String::new(),
        }
    }

    pub fn failed(log: impl Into<String>) -> Self {
        Self {
            success: false,
            log: log.into(),
        }
    }
}

/// The device command interface.
///
/// Each method maps 1:1 onto one call of the underlying graphics API and is
/// assumed to complete synchronously and successfully; compile/link report
/// their outcome as data rather than as an error. The state cache and the
/// resource handles are the only callers. All calls happen on the single
/// device-owning thread.
///
/// Unit-scoped operations (`bind_texture`, `set_env_*`, texture parameter
/// setters, the client texcoord array setters) address whichever unit the
/// most recent `select_texture_unit` / `select_client_texture_unit` chose;
/// matrix ops address the stack chosen by `select_matrix_mode`. Keeping
/// those selections minimal is the cache's job, not the backend's.
pub trait DeviceCommands {
    /// Allocate a fresh device name for `kind`. Never returns 0.
    fn create_id(&mut self, kind: ResourceKind) -> RawId;

    fn set_capability(&mut self, cap: Capability, enabled: bool);

    fn set_blend_func(&mut self, src: BlendFactor, dst: BlendFactor);
    fn set_depth_func(&mut self, func: CompareFunc);
    fn set_depth_write(&mut self, enabled: bool);
    fn set_stencil_func(&mut self, func: CompareFunc, reference: i32, mask: u32);
    fn set_stencil_op(&mut self, fail: StencilOp, depth_fail: StencilOp, pass: StencilOp);
    fn set_stencil_write_mask(&mut self, mask: u32);
    fn set_alpha_func(&mut self, func: CompareFunc, reference: f32);
    fn set_fog_mode(&mut self, mode: FogMode);
    fn set_fog_color(&mut self, color: [f32; 4]);
    fn set_fog_density(&mut self, density: f32);
    fn set_fog_range(&mut self, start: f32, end: f32);
    fn set_cull_face(&mut self, face: CullFace);
    fn set_shade_model(&mut self, model: ShadeModel);
    fn set_color_mask(&mut self, mask: ColorMask);
    fn set_scissor_rect(&mut self, x: i32, y: i32, width: u32, height: u32);
    fn set_polygon_offset(&mut self, factor: f32, units: f32);
    fn set_material_color(
        &mut self,
        face: MaterialFace,
        component: MaterialComponent,
        color: [f32; 4],
    );
    fn set_shininess(&mut self, face: MaterialFace, value: f32);
    fn set_color_material(&mut self, face: MaterialFace, component: MaterialComponent);
    fn set_light_color(&mut self, index: u8, component: LightComponent, color: [f32; 4]);
    fn set_light_position(&mut self, index: u8, position: [f32; 4]);
    fn set_light_attenuation(&mut self, index: u8, constant: f32, linear: f32, quadratic: f32);
    fn set_light_spot(&mut self, index: u8, direction: [f32; 3], exponent: f32, cutoff: f32);
    fn set_clip_plane(&mut self, index: u8, plane: [f64; 4]);

    fn select_texture_unit(&mut self, unit: u32);
    fn select_client_texture_unit(&mut self, unit: u32);
    fn select_matrix_mode(&mut self, mode: MatrixMode);
    fn load_matrix(&mut self, matrix: [f32; 16]);
    fn load_identity(&mut self);
    fn push_matrix(&mut self);
    fn pop_matrix(&mut self);

    fn bind_texture(&mut self, target: TextureTarget, id: RawId);
    fn bind_buffer(&mut self, target: BufferTarget, id: RawId);
    fn bind_framebuffer(&mut self, id: RawId);
    fn bind_renderbuffer(&mut self, id: RawId);

    fn set_env_mode(&mut self, mode: EnvMode);
    fn set_env_color(&mut self, color: [f32; 4]);
    fn set_texture_filter(&mut self, target: TextureTarget, min: MinFilter, mag: MagFilter);
    fn set_texture_wrap(&mut self, target: TextureTarget, axis: WrapAxis, mode: WrapMode);
    fn set_texture_anisotropy(&mut self, target: TextureTarget, level: f32);
    fn texture_storage(&mut self, target: TextureTarget, width: u32, height: u32, levels: u32);

    fn buffer_data(&mut self, target: BufferTarget, len: u64, usage: BufferUsageHint);
    fn buffer_sub_data(&mut self, target: BufferTarget, offset: u64, data: &[u8]);
    fn renderbuffer_storage(&mut self, width: u32, height: u32, depth: bool);

    fn set_attrib_array_enabled(&mut self, index: u32, enabled: bool);
    fn set_attrib_pointer(&mut self, index: u32, pointer: AttribPointer);
    fn set_texcoord_array_enabled(&mut self, enabled: bool);
    fn set_texcoord_pointer(&mut self, pointer: AttribPointer);

    fn attach_shader(&mut self, program: RawId, shader: RawId);
    fn detach_shader(&mut self, program: RawId, shader: RawId);
    fn link_program(&mut self, program: RawId) -> BuildOutcome;
    fn use_program(&mut self, id: RawId);
    fn compile_shader(&mut self, shader: RawId, stage: ShaderStage, source: &str) -> BuildOutcome;

    fn attach_texture(&mut self, attachment: AttachmentPoint, target: TextureTarget, texture: RawId);
    fn attach_renderbuffer(&mut self, attachment: AttachmentPoint, renderbuffer: RawId);

    /// Create a hidden auxiliary surface. `None` when the device cannot
    /// provide one (callers fall back to the next render-to-texture
    /// strategy; this is not an error).
    fn create_aux_surface(&mut self, width: u32, height: u32) -> Option<RawId>;
    fn destroy_aux_surface(&mut self, surface: RawId);
    /// Make `surface` the current draw surface; 0 selects the default one.
    fn make_surface_current(&mut self, surface: RawId);
    fn bind_surface_to_texture(&mut self, surface: RawId, target: TextureTarget, texture: RawId);
    fn copy_pixels_to_texture(
        &mut self,
        target: TextureTarget,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    );

    fn begin_query(&mut self, target: QueryTarget, id: RawId);
    fn end_query(&mut self, target: QueryTarget);

    /// Delete a batch of resources of one kind in a single device call.
    fn delete_resources(&mut self, kind: ResourceKind, ids: &[RawId]);
}
