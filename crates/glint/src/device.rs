use std::sync::Arc;

use tracing::debug;

use glint_device::stats::FrameCounters;
use glint_device::{DeviceCaps, DeviceCommands, RenderStats, ResourceKind};
use glint_resource::{Reclaimer, ResourceContext};
use glint_state::StateCache;

use crate::registry::SurfaceRegistry;

const DEFAULT_SURFACE_CAPACITY: usize = 8;

/// One graphics context, from initialization to shutdown.
///
/// Exactly one state cache is bound to the context for its whole life;
/// re-initializing the device (new capabilities, new driver state) means
/// building a fresh `Device`. The backend itself is not owned here — every
/// operation takes it as an argument, which keeps the single
/// device-owning-thread discipline visible at the call sites.
pub struct Device {
    caps: DeviceCaps,
    stats: Arc<RenderStats>,
    reclaimer: Arc<Reclaimer>,
    cache: StateCache,
    surfaces: SurfaceRegistry,
}

impl Device {
    pub fn new(caps: DeviceCaps) -> Self {
        debug!(?caps, "device context created");
        let stats = Arc::new(RenderStats::new());
        Self {
            caps,
            stats: Arc::clone(&stats),
            reclaimer: Arc::new(Reclaimer::new()),
            cache: StateCache::new(&caps, stats),
            surfaces: SurfaceRegistry::new(DEFAULT_SURFACE_CAPACITY),
        }
    }

    pub fn caps(&self) -> &DeviceCaps {
        &self.caps
    }

    pub fn cache(&mut self) -> &mut StateCache {
        &mut self.cache
    }

    pub fn surfaces(&mut self) -> &mut SurfaceRegistry {
        &mut self.surfaces
    }

    /// Plumbing bundle for creating resource handles.
    pub fn resource_context(&self) -> ResourceContext {
        ResourceContext::new(Arc::clone(&self.stats), Arc::clone(&self.reclaimer))
    }

    pub fn stats(&self) -> &Arc<RenderStats> {
        &self.stats
    }

    // -- accounting accessors ----------------------------------------------

    pub fn live_count(&self, kind: ResourceKind) -> u64 {
        self.stats.live_count(kind)
    }

    pub fn live_bytes(&self, kind: ResourceKind) -> u64 {
        self.stats.live_bytes(kind)
    }

    pub fn frame_stats(&self) -> FrameCounters {
        self.stats.frame()
    }

    pub fn reset_frame_stats(&self) {
        self.stats.reset_frame();
    }

    // -- per-frame maintenance ---------------------------------------------

    /// Flush deferred deletions. Call from the device thread at a point
    /// guaranteed not to be mid-draw. Returns the number of resources
    /// deleted.
    pub fn drain_pending(&mut self, dev: &mut dyn DeviceCommands) -> usize {
        self.reclaimer.drain(dev, &self.stats)
    }

    /// End-of-frame maintenance: drain deferred deletions, then zero the
    /// per-frame counters.
    pub fn end_frame(&mut self, dev: &mut dyn DeviceCommands) {
        self.drain_pending(dev);
        self.stats.reset_frame();
    }

    /// The context was reset behind our back: drop every mirrored
    /// assumption and the shared surfaces tied to the old context.
    pub fn handle_context_reset(&mut self, dev: &mut dyn DeviceCommands) {
        self.surfaces.clear(dev);
        self.cache.invalidate_all();
    }
}
