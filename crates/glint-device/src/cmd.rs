//! Semantic parameter enums and the [`Command`] record.
//!
//! These are intentionally "semantic" enums (not raw API constants) so the
//! rest of the stack stays independent of any one binding; a production
//! backend maps each onto its API's constants at the call site.

use bitflags::bitflags;

use crate::ids::{RawId, ResourceKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareFunc {
    Never,
    Less,
    Equal,
    LessOrEqual,
    Greater,
    NotEqual,
    GreaterOrEqual,
    Always,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StencilOp {
    Keep,
    Zero,
    Replace,
    Increment,
    Decrement,
    Invert,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CullFace {
    Front,
    Back,
    FrontAndBack,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShadeModel {
    Flat,
    Smooth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FogMode {
    Linear,
    Exp,
    Exp2,
}

/// Which matrix stack subsequent matrix ops address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatrixMode {
    ModelView,
    Projection,
    Texture,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    Tex2D,
    Tex3D,
    CubeMap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WrapAxis {
    S,
    T,
    R,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WrapMode {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
    ClampToBorder,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MinFilter {
    Nearest,
    Linear,
    NearestMipNearest,
    LinearMipNearest,
    NearestMipLinear,
    LinearMipLinear,
}

impl MinFilter {
    /// Whether this filter samples mip levels beyond the base image.
    pub fn uses_mipmaps(self) -> bool {
        !matches!(self, MinFilter::Nearest | MinFilter::Linear)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MagFilter {
    Nearest,
    Linear,
}

/// Per-unit texture environment function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnvMode {
    Modulate,
    Replace,
    Decal,
    Blend,
    Add,
    Combine,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialFace {
    Front,
    Back,
    FrontAndBack,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialComponent {
    Ambient,
    Diffuse,
    Specular,
    Emissive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightComponent {
    Ambient,
    Diffuse,
    Specular,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Array,
    ElementArray,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferUsageHint {
    StaticDraw,
    DynamicDraw,
    StreamDraw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttribType {
    F32,
    I16,
    U8,
}

impl AttribType {
    pub fn byte_width(self) -> u32 {
        match self {
            AttribType::F32 => 4,
            AttribType::I16 => 2,
            AttribType::U8 => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttachmentPoint {
    Color0,
    Depth,
    Stencil,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryTarget {
    SamplesPassed,
}

/// Togglable device capabilities.
///
/// `Texture2D` is scoped to the currently selected texture unit; `Light` and
/// `ClipPlane` carry their index directly (the device addresses them as
/// distinct capability names).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    Blend,
    DepthTest,
    StencilTest,
    AlphaTest,
    Fog,
    CullFace,
    ScissorTest,
    PolygonOffsetFill,
    Lighting,
    ColorMaterial,
    Texture2D,
    Light(u8),
    ClipPlane(u8),
}

bitflags! {
    /// Which color channels writes are applied to.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct ColorMask: u32 {
        const RED = 1 << 0;
        const GREEN = 1 << 1;
        const BLUE = 1 << 2;
        const ALPHA = 1 << 3;
    }
}

impl ColorMask {
    pub const RGBA: ColorMask = ColorMask::all();
}

/// Layout of one client-side vertex array pointer.
///
/// `buffer` is the device buffer the pointer reads from (never 0 here; the
/// array slot is disabled instead of pointed at nothing).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttribPointer {
    pub buffer: RawId,
    /// Components per element, 1..=4.
    pub size: u8,
    pub ty: AttribType,
    pub normalized: bool,
    pub stride: u32,
    pub offset: u64,
}

/// One issued device operation.
///
/// `Command` is the tagged mirror of [`DeviceCommands`](crate::DeviceCommands):
/// every trait method appends exactly one variant. The recording backend and
/// the tests compare whole sequences of these, which is what makes the fixed
/// field ordering of the cache observable.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    SetCapability {
        cap: Capability,
        enabled: bool,
    },
    SetBlendFunc {
        src: BlendFactor,
        dst: BlendFactor,
    },
    SetDepthFunc(CompareFunc),
    SetDepthWrite(bool),
    SetStencilFunc {
        func: CompareFunc,
        reference: i32,
        mask: u32,
    },
    SetStencilOp {
        fail: StencilOp,
        depth_fail: StencilOp,
        pass: StencilOp,
    },
    SetStencilWriteMask(u32),
    SetAlphaFunc {
        func: CompareFunc,
        reference: f32,
    },
    SetFogMode(FogMode),
    SetFogColor([f32; 4]),
    SetFogDensity(f32),
    SetFogRange {
        start: f32,
        end: f32,
    },
    SetCullFace(CullFace),
    SetShadeModel(ShadeModel),
    SetColorMask(ColorMask),
    SetScissorRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    SetPolygonOffset {
        factor: f32,
        units: f32,
    },
    SetMaterialColor {
        face: MaterialFace,
        component: MaterialComponent,
        color: [f32; 4],
    },
    SetShininess {
        face: MaterialFace,
        value: f32,
    },
    SetColorMaterial {
        face: MaterialFace,
        component: MaterialComponent,
    },
    SetLightColor {
        index: u8,
        component: LightComponent,
        color: [f32; 4],
    },
    SetLightPosition {
        index: u8,
        position: [f32; 4],
    },
    SetLightAttenuation {
        index: u8,
        constant: f32,
        linear: f32,
        quadratic: f32,
    },
    SetLightSpot {
        index: u8,
        direction: [f32; 3],
        exponent: f32,
        cutoff: f32,
    },
    SetClipPlane {
        index: u8,
        plane: [f64; 4],
    },
    SelectTextureUnit(u32),
    SelectClientTextureUnit(u32),
    SelectMatrixMode(MatrixMode),
    LoadMatrix([f32; 16]),
    LoadIdentity,
    PushMatrix,
    PopMatrix,
    BindTexture {
        target: TextureTarget,
        id: RawId,
    },
    BindBuffer {
        target: BufferTarget,
        id: RawId,
    },
    BindFramebuffer(RawId),
    BindRenderbuffer(RawId),
    SetEnvMode(EnvMode),
    SetEnvColor([f32; 4]),
    SetTextureFilter {
        target: TextureTarget,
        min: MinFilter,
        mag: MagFilter,
    },
    SetTextureWrap {
        target: TextureTarget,
        axis: WrapAxis,
        mode: WrapMode,
    },
    SetTextureAnisotropy {
        target: TextureTarget,
        level: f32,
    },
    TextureStorage {
        target: TextureTarget,
        width: u32,
        height: u32,
        levels: u32,
    },
    BufferData {
        target: BufferTarget,
        len: u64,
        usage: BufferUsageHint,
    },
    BufferSubData {
        target: BufferTarget,
        offset: u64,
        len: usize,
    },
    RenderbufferStorage {
        width: u32,
        height: u32,
        depth: bool,
    },
    SetAttribArrayEnabled {
        index: u32,
        enabled: bool,
    },
    SetAttribPointer {
        index: u32,
        pointer: AttribPointer,
    },
    SetTexcoordArrayEnabled(bool),
    SetTexcoordPointer(AttribPointer),
    AttachShader {
        program: RawId,
        shader: RawId,
    },
    DetachShader {
        program: RawId,
        shader: RawId,
    },
    LinkProgram(RawId),
    UseProgram(RawId),
    CompileShader {
        shader: RawId,
        stage: ShaderStage,
    },
    AttachTexture {
        attachment: AttachmentPoint,
        target: TextureTarget,
        texture: RawId,
    },
    AttachRenderbuffer {
        attachment: AttachmentPoint,
        renderbuffer: RawId,
    },
    CreateAuxSurface {
        width: u32,
        height: u32,
    },
    DestroyAuxSurface(RawId),
    MakeSurfaceCurrent(RawId),
    BindSurfaceToTexture {
        surface: RawId,
        target: TextureTarget,
        texture: RawId,
    },
    CopyPixelsToTexture {
        target: TextureTarget,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    BeginQuery {
        target: QueryTarget,
        id: RawId,
    },
    EndQuery(QueryTarget),
    DeleteResources {
        kind: ResourceKind,
        ids: Vec<RawId>,
    },
}
