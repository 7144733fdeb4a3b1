use std::fmt;

/// Device-assigned name for one device-side resource.
///
/// Id 0 is reserved: it never identifies a live resource, and a deleted
/// handle's id is zeroed so use-after-delete shows up as a bind of the
/// reserved id rather than silently aliasing another live object.
pub type RawId = u32;

/// The reserved "no resource" id.
pub const INVALID_ID: RawId = 0;

/// Kinds of device-side resources tracked by handles and accounting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Buffer,
    Texture,
    Program,
    Shader,
    Framebuffer,
    Renderbuffer,
    Query,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Buffer,
        ResourceKind::Texture,
        ResourceKind::Program,
        ResourceKind::Shader,
        ResourceKind::Framebuffer,
        ResourceKind::Renderbuffer,
        ResourceKind::Query,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Dense index, used for per-kind counter arrays.
    pub fn index(self) -> usize {
        match self {
            ResourceKind::Buffer => 0,
            ResourceKind::Texture => 1,
            ResourceKind::Program => 2,
            ResourceKind::Shader => 3,
            ResourceKind::Framebuffer => 4,
            ResourceKind::Renderbuffer => 5,
            ResourceKind::Query => 6,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceKind::Buffer => "buffer",
            ResourceKind::Texture => "texture",
            ResourceKind::Program => "program",
            ResourceKind::Shader => "shader",
            ResourceKind::Framebuffer => "framebuffer",
            ResourceKind::Renderbuffer => "renderbuffer",
            ResourceKind::Query => "query",
        };
        f.write_str(s)
    }
}
