use glint_device::cmd::QueryTarget;
use glint_device::{DeviceCommands, RawId, ResourceKind, INVALID_ID};

use crate::context::ResourceContext;

/// Host-side handle for one occlusion/timing query object.
#[derive(Debug)]
pub struct QueryHandle {
    id: RawId,
    target: QueryTarget,
    active: bool,
    ctx: ResourceContext,
}

impl QueryHandle {
    pub fn new(dev: &mut dyn DeviceCommands, ctx: &ResourceContext, target: QueryTarget) -> Self {
        let id = dev.create_id(ResourceKind::Query);
        ctx.stats().resource_created(ResourceKind::Query);
        Self {
            id,
            target,
            active: false,
            ctx: ctx.clone(),
        }
    }

    pub fn id(&self) -> RawId {
        self.id
    }

    pub fn begin(&mut self, dev: &mut dyn DeviceCommands) {
        if self.active {
            return;
        }
        dev.begin_query(self.target, self.id);
        self.active = true;
    }

    pub fn end(&mut self, dev: &mut dyn DeviceCommands) {
        if !self.active {
            return;
        }
        dev.end_query(self.target);
        self.active = false;
    }

    pub fn delete(&mut self, dev: &mut dyn DeviceCommands) {
        if self.id == INVALID_ID {
            tracing::warn!("delete called on an already-deleted query");
            return;
        }
        dev.delete_resources(ResourceKind::Query, &[self.id]);
        self.ctx.stats().resource_destroyed(ResourceKind::Query, 0);
        self.id = INVALID_ID;
    }
}

impl Drop for QueryHandle {
    fn drop(&mut self) {
        if self.id != INVALID_ID {
            self.ctx.reclaimer().enqueue(ResourceKind::Query, self.id, 0);
        }
    }
}
