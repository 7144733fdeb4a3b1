use tracing::warn;

use glint_device::cmd::ShaderStage;
use glint_device::{DeviceCommands, RawId, ResourceKind, INVALID_ID};
use glint_state::StateCache;

use crate::context::ResourceContext;

/// Host-side handle for one compiled shader stage.
#[derive(Debug)]
pub struct ShaderHandle {
    id: RawId,
    stage: ShaderStage,
    compiled: bool,
    log: String,
    ctx: ResourceContext,
}

impl ShaderHandle {
    pub fn new(dev: &mut dyn DeviceCommands, ctx: &ResourceContext, stage: ShaderStage) -> Self {
        let id = dev.create_id(ResourceKind::Shader);
        ctx.stats().resource_created(ResourceKind::Shader);
        Self {
            id,
            stage,
            compiled: false,
            log: String::new(),
            ctx: ctx.clone(),
        }
    }

    pub fn id(&self) -> RawId {
        self.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Compile `source`. Failure is not an error: the diagnostic log is
    /// retained and the caller decides whether a non-compiling stage is
    /// fatal.
    pub fn compile(&mut self, dev: &mut dyn DeviceCommands, source: &str) -> bool {
        let outcome = dev.compile_shader(self.id, self.stage, source);
        self.compiled = outcome.success;
        self.log = outcome.log;
        if !self.compiled {
            warn!(stage = ?self.stage, log = %self.log, "shader compile failed");
        }
        self.compiled
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    pub fn log(&self) -> &str {
        &self.log
    }

    pub fn delete(&mut self, dev: &mut dyn DeviceCommands) {
        if self.id == INVALID_ID {
            warn!("delete called on an already-deleted shader");
            return;
        }
        dev.delete_resources(ResourceKind::Shader, &[self.id]);
        self.ctx.stats().resource_destroyed(ResourceKind::Shader, 0);
        self.id = INVALID_ID;
    }
}

impl Drop for ShaderHandle {
    fn drop(&mut self) {
        if self.id != INVALID_ID {
            self.ctx
                .reclaimer()
                .enqueue(ResourceKind::Shader, self.id, 0);
        }
    }
}

/// Host-side handle for one device program (vertex + fragment stage).
///
/// Stage setters only record the desired stage; [`relink`](Self::relink)
/// emits attach/detach commands for the stage that actually changed, then
/// always links.
#[derive(Debug)]
pub struct ProgramHandle {
    id: RawId,
    attached_vertex: Option<RawId>,
    attached_fragment: Option<RawId>,
    desired_vertex: Option<RawId>,
    desired_fragment: Option<RawId>,
    linked: bool,
    log: String,
    ctx: ResourceContext,
}

impl ProgramHandle {
    pub fn new(dev: &mut dyn DeviceCommands, ctx: &ResourceContext) -> Self {
        let id = dev.create_id(ResourceKind::Program);
        ctx.stats().resource_created(ResourceKind::Program);
        Self {
            id,
            attached_vertex: None,
            attached_fragment: None,
            desired_vertex: None,
            desired_fragment: None,
            linked: false,
            log: String::new(),
            ctx: ctx.clone(),
        }
    }

    pub fn id(&self) -> RawId {
        self.id
    }

    pub fn set_vertex_stage(&mut self, shader: Option<&ShaderHandle>) {
        self.desired_vertex = shader.map(ShaderHandle::id);
    }

    pub fn set_fragment_stage(&mut self, shader: Option<&ShaderHandle>) {
        self.desired_fragment = shader.map(ShaderHandle::id);
    }

    /// Attach/detach whichever stage changed since the last relink, then
    /// link. Returns the link result; on failure the program keeps running
    /// with its previous binary (device semantics) and the log says why.
    pub fn relink(&mut self, dev: &mut dyn DeviceCommands) -> bool {
        if self.attached_vertex != self.desired_vertex {
            if let Some(old) = self.attached_vertex {
                dev.detach_shader(self.id, old);
            }
            if let Some(new) = self.desired_vertex {
                dev.attach_shader(self.id, new);
            }
            self.attached_vertex = self.desired_vertex;
        }
        if self.attached_fragment != self.desired_fragment {
            if let Some(old) = self.attached_fragment {
                dev.detach_shader(self.id, old);
            }
            if let Some(new) = self.desired_fragment {
                dev.attach_shader(self.id, new);
            }
            self.attached_fragment = self.desired_fragment;
        }

        let outcome = dev.link_program(self.id);
        self.linked = outcome.success;
        self.log = outcome.log;
        if !self.linked {
            warn!(program = self.id, log = %self.log, "program link failed");
        }
        self.linked
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn log(&self) -> &str {
        &self.log
    }

    pub fn delete(&mut self, cache: &mut StateCache, dev: &mut dyn DeviceCommands) {
        if self.id == INVALID_ID {
            warn!("delete called on an already-deleted program");
            return;
        }
        cache.forget_resource(ResourceKind::Program, self.id);
        dev.delete_resources(ResourceKind::Program, &[self.id]);
        self.ctx
            .stats()
            .resource_destroyed(ResourceKind::Program, 0);
        self.id = INVALID_ID;
    }
}

impl Drop for ProgramHandle {
    fn drop(&mut self) {
        if self.id != INVALID_ID {
            self.ctx
                .reclaimer()
                .enqueue(ResourceKind::Program, self.id, 0);
        }
    }
}
