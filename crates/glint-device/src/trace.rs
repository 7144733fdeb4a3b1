use std::collections::HashMap;

use crate::backend::{BuildOutcome, DeviceCommands};
use crate::cmd::{
    AttachmentPoint, AttribPointer, BlendFactor, BufferTarget, BufferUsageHint, Capability,
    ColorMask, Command, CompareFunc, CullFace, EnvMode, FogMode, LightComponent, MagFilter,
    MaterialComponent, MaterialFace, MatrixMode, MinFilter, QueryTarget, ShadeModel, ShaderStage,
    StencilOp, TextureTarget, WrapAxis, WrapMode,
};
use crate::ids::{RawId, ResourceKind};

/// Recording backend: every issued operation is appended to an in-memory
/// command log instead of reaching a real driver.
///
/// Two calls with identical desired state must produce identical logs, so
/// tests compare entire [`Command`] sequences. Ids are handed out
/// sequentially per kind starting at 1 to keep recordings deterministic.
/// Compile/link outcomes (and aux-surface availability) are scriptable so
/// failure paths can be exercised.
#[derive(Debug, Default)]
pub struct TraceDevice {
    commands: Vec<Command>,
    next_id: [RawId; ResourceKind::COUNT],
    next_surface_id: RawId,
    link_failures: HashMap<RawId, String>,
    compile_failures: HashMap<RawId, String>,
    aux_surface_unavailable: bool,
}

impl TraceDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Drain the log, leaving it empty. Tests usually clear after setup and
    /// assert on what one operation under test emitted.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Script the next `link_program(program)` calls to fail with `log`.
    pub fn fail_link(&mut self, program: RawId, log: impl Into<String>) {
        self.link_failures.insert(program, log.into());
    }

    /// Script the next `compile_shader(shader, ..)` calls to fail with `log`.
    pub fn fail_compile(&mut self, shader: RawId, log: impl Into<String>) {
        self.compile_failures.insert(shader, log.into());
    }

    /// Make `create_aux_surface` return `None`, as a device without
    /// auxiliary surfaces would.
    pub fn set_aux_surface_unavailable(&mut self, unavailable: bool) {
        self.aux_surface_unavailable = unavailable;
    }

    fn push(&mut self, cmd: Command) {
        self.commands.push(cmd);
    }
}

impl DeviceCommands for TraceDevice {
    fn create_id(&mut self, kind: ResourceKind) -> RawId {
        let slot = &mut self.next_id[kind.index()];
        *slot += 1;
        *slot
    }

    fn set_capability(&mut self, cap: Capability, enabled: bool) {
        self.push(Command::SetCapability { cap, enabled });
    }

    fn set_blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.push(Command::SetBlendFunc { src, dst });
    }

    fn set_depth_func(&mut self, func: CompareFunc) {
        self.push(Command::SetDepthFunc(func));
    }

    fn set_depth_write(&mut self, enabled: bool) {
        self.push(Command::SetDepthWrite(enabled));
    }

    fn set_stencil_func(&mut self, func: CompareFunc, reference: i32, mask: u32) {
        self.push(Command::SetStencilFunc {
            func,
            reference,
            mask,
        });
    }

    fn set_stencil_op(&mut self, fail: StencilOp, depth_fail: StencilOp, pass: StencilOp) {
        self.push(Command::SetStencilOp {
            fail,
            depth_fail,
            pass,
        });
    }

    fn set_stencil_write_mask(&mut self, mask: u32) {
        self.push(Command::SetStencilWriteMask(mask));
    }

    fn set_alpha_func(&mut self, func: CompareFunc, reference: f32) {
        self.push(Command::SetAlphaFunc { func, reference });
    }

    fn set_fog_mode(&mut self, mode: FogMode) {
        self.push(Command::SetFogMode(mode));
    }

    fn set_fog_color(&mut self, color: [f32; 4]) {
        self.push(Command::SetFogColor(color));
    }

    fn set_fog_density(&mut self, density: f32) {
        self.push(Command::SetFogDensity(density));
    }

    fn set_fog_range(&mut self, start: f32, end: f32) {
        self.push(Command::SetFogRange { start, end });
    }

    fn set_cull_face(&mut self, face: CullFace) {
        self.push(Command::SetCullFace(face));
    }

    fn set_shade_model(&mut self, model: ShadeModel) {
        self.push(Command::SetShadeModel(model));
    }

    fn set_color_mask(&mut self, mask: ColorMask) {
        self.push(Command::SetColorMask(mask));
    }

    fn set_scissor_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.push(Command::SetScissorRect {
            x,
            y,
            width,
            height,
        });
    }

    fn set_polygon_offset(&mut self, factor: f32, units: f32) {
        self.push(Command::SetPolygonOffset { factor, units });
    }

    fn set_material_color(
        &mut self,
        face: MaterialFace,
        component: MaterialComponent,
        color: [f32; 4],
    ) {
        self.push(Command::SetMaterialColor {
            face,
            component,
            color,
        });
    }

    fn set_shininess(&mut self, face: MaterialFace, value: f32) {
        self.push(Command::SetShininess { face, value });
    }

    fn set_color_material(&mut self, face: MaterialFace, component: MaterialComponent) {
        self.push(Command::SetColorMaterial { face, component });
    }

    fn set_light_color(&mut self, index: u8, component: LightComponent, color: [f32; 4]) {
        self.push(Command::SetLightColor {
            index,
            component,
            color,
        });
    }

    fn set_light_position(&mut self, index: u8, position: [f32; 4]) {
        self.push(Command::SetLightPosition { index, position });
    }

    fn set_light_attenuation(&mut self, index: u8, constant: f32, linear: f32, quadratic: f32) {
        self.push(Command::SetLightAttenuation {
            index,
            constant,
            linear,
            quadratic,
        });
    }

    fn set_light_spot(&mut self, index: u8, direction: [f32; 3], exponent: f32, cutoff: f32) {
        self.push(Command::SetLightSpot {
            index,
            direction,
            exponent,
            cutoff,
        });
    }

    fn set_clip_plane(&mut self, index: u8, plane: [f64; 4]) {
        self.push(Command::SetClipPlane { index, plane });
    }

    fn select_texture_unit(&mut self, unit: u32) {
        self.push(Command::SelectTextureUnit(unit));
    }

    fn select_client_texture_unit(&mut self, unit: u32) {
        self.push(Command::SelectClientTextureUnit(unit));
    }

    fn select_matrix_mode(&mut self, mode: MatrixMode) {
        self.push(Command::SelectMatrixMode(mode));
    }

    fn load_matrix(&mut self, matrix: [f32; 16]) {
        self.push(Command::LoadMatrix(matrix));
    }

    fn load_identity(&mut self) {
        self.push(Command::LoadIdentity);
    }

    fn push_matrix(&mut self) {
        self.push(Command::PushMatrix);
    }

    fn pop_matrix(&mut self) {
        self.push(Command::PopMatrix);
    }

    fn bind_texture(&mut self, target: TextureTarget, id: RawId) {
        self.push(Command::BindTexture { target, id });
    }

    fn bind_buffer(&mut self, target: BufferTarget, id: RawId) {
        self.push(Command::BindBuffer { target, id });
    }

    fn bind_framebuffer(&mut self, id: RawId) {
        self.push(Command::BindFramebuffer(id));
    }

    fn bind_renderbuffer(&mut self, id: RawId) {
        self.push(Command::BindRenderbuffer(id));
    }

    fn set_env_mode(&mut self, mode: EnvMode) {
        self.push(Command::SetEnvMode(mode));
    }

    fn set_env_color(&mut self, color: [f32; 4]) {
        self.push(Command::SetEnvColor(color));
    }

    fn set_texture_filter(&mut self, target: TextureTarget, min: MinFilter, mag: MagFilter) {
        self.push(Command::SetTextureFilter { target, min, mag });
    }

    fn set_texture_wrap(&mut self, target: TextureTarget, axis: WrapAxis, mode: WrapMode) {
        self.push(Command::SetTextureWrap { target, axis, mode });
    }

    fn set_texture_anisotropy(&mut self, target: TextureTarget, level: f32) {
        self.push(Command::SetTextureAnisotropy { target, level });
    }

    fn texture_storage(&mut self, target: TextureTarget, width: u32, height: u32, levels: u32) {
        self.push(Command::TextureStorage {
            target,
            width,
            height,
            levels,
        });
    }

    fn buffer_data(&mut self, target: BufferTarget, len: u64, usage: BufferUsageHint) {
        self.push(Command::BufferData { target, len, usage });
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: u64, data: &[u8]) {
        // The log records shape, not payload; blobs would swamp the
        // comparisons tests do on these sequences.
        self.push(Command::BufferSubData {
            target,
            offset,
            len: data.len(),
        });
    }

    fn renderbuffer_storage(&mut self, width: u32, height: u32, depth: bool) {
        self.push(Command::RenderbufferStorage {
            width,
            height,
            depth,
        });
    }

    fn set_attrib_array_enabled(&mut self, index: u32, enabled: bool) {
        self.push(Command::SetAttribArrayEnabled { index, enabled });
    }

    fn set_attrib_pointer(&mut self, index: u32, pointer: AttribPointer) {
        self.push(Command::SetAttribPointer { index, pointer });
    }

    fn set_texcoord_array_enabled(&mut self, enabled: bool) {
        self.push(Command::SetTexcoordArrayEnabled(enabled));
    }

    fn set_texcoord_pointer(&mut self, pointer: AttribPointer) {
        self.push(Command::SetTexcoordPointer(pointer));
    }

    fn attach_shader(&mut self, program: RawId, shader: RawId) {
        self.push(Command::AttachShader { program, shader });
    }

    fn detach_shader(&mut self, program: RawId, shader: RawId) {
        self.push(Command::DetachShader { program, shader });
    }

    fn link_program(&mut self, program: RawId) -> BuildOutcome {
        self.push(Command::LinkProgram(program));
        match self.link_failures.get(&program) {
            Some(log) => BuildOutcome::failed(log.clone()),
            None => BuildOutcome::ok(),
        }
    }

    fn use_program(&mut self, id: RawId) {
        self.push(Command::UseProgram(id));
    }

    fn compile_shader(&mut self, shader: RawId, stage: ShaderStage, _source: &str) -> BuildOutcome {
        self.push(Command::CompileShader { shader, stage });
        match self.compile_failures.get(&shader) {
            Some(log) => BuildOutcome::failed(log.clone()),
            None => BuildOutcome::ok(),
        }
    }

    fn attach_texture(
        &mut self,
        attachment: AttachmentPoint,
        target: TextureTarget,
        texture: RawId,
    ) {
        self.push(Command::AttachTexture {
            attachment,
            target,
            texture,
        });
    }

    fn attach_renderbuffer(&mut self, attachment: AttachmentPoint, renderbuffer: RawId) {
        self.push(Command::AttachRenderbuffer {
            attachment,
            renderbuffer,
        });
    }

    fn create_aux_surface(&mut self, width: u32, height: u32) -> Option<RawId> {
        self.push(Command::CreateAuxSurface { width, height });
        if self.aux_surface_unavailable {
            return None;
        }
        self.next_surface_id += 1;
        Some(self.next_surface_id)
    }

    fn destroy_aux_surface(&mut self, surface: RawId) {
        self.push(Command::DestroyAuxSurface(surface));
    }

    fn make_surface_current(&mut self, surface: RawId) {
        self.push(Command::MakeSurfaceCurrent(surface));
    }

    fn bind_surface_to_texture(&mut self, surface: RawId, target: TextureTarget, texture: RawId) {
        self.push(Command::BindSurfaceToTexture {
            surface,
            target,
            texture,
        });
    }

    fn copy_pixels_to_texture(
        &mut self,
        target: TextureTarget,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) {
        self.push(Command::CopyPixelsToTexture {
            target,
            x,
            y,
            width,
            height,
        });
    }

    fn begin_query(&mut self, target: QueryTarget, id: RawId) {
        self.push(Command::BeginQuery { target, id });
    }

    fn end_query(&mut self, target: QueryTarget) {
        self.push(Command::EndQuery(target));
    }

    fn delete_resources(&mut self, kind: ResourceKind, ids: &[RawId]) {
        self.push(Command::DeleteResources {
            kind,
            ids: ids.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ids_are_sequential_per_kind_and_never_zero() {
        let mut dev = TraceDevice::new();
        assert_eq!(dev.create_id(ResourceKind::Texture), 1);
        assert_eq!(dev.create_id(ResourceKind::Texture), 2);
        assert_eq!(dev.create_id(ResourceKind::Buffer), 1);
        assert_eq!(dev.create_id(ResourceKind::Texture), 3);
    }

    #[test]
    fn commands_are_recorded_in_issue_order() {
        let mut dev = TraceDevice::new();
        dev.set_depth_func(CompareFunc::Less);
        dev.set_depth_write(true);
        assert_eq!(
            dev.take_commands(),
            vec![
                Command::SetDepthFunc(CompareFunc::Less),
                Command::SetDepthWrite(true),
            ]
        );
        assert!(dev.commands().is_empty());
    }

    #[test]
    fn scripted_link_failure_is_reported() {
        let mut dev = TraceDevice::new();
        let program = dev.create_id(ResourceKind::Program);
        dev.fail_link(program, "varying count exceeds limit");
        let outcome = dev.link_program(program);
        assert!(!outcome.success);
        assert_eq!(outcome.log, "varying count exceeds limit");
    }

    #[test]
    fn aux_surface_can_be_scripted_unavailable() {
        let mut dev = TraceDevice::new();
        assert!(dev.create_aux_surface(64, 64).is_some());
        dev.set_aux_surface_unavailable(true);
        assert!(dev.create_aux_surface(64, 64).is_none());
    }
}
