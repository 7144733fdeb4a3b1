use std::sync::Arc;

use glint_device::RenderStats;

use crate::reclaim::Reclaimer;

/// Shared accounting and reclamation plumbing handed to every handle at
/// creation. Cloning is two `Arc` bumps; handles keep a clone so their
/// `Drop` can reach the reclaimer from any thread.
#[derive(Clone, Debug)]
pub struct ResourceContext {
    stats: Arc<RenderStats>,
    reclaimer: Arc<Reclaimer>,
}

impl ResourceContext {
    pub fn new(stats: Arc<RenderStats>, reclaimer: Arc<Reclaimer>) -> Self {
        Self { stats, reclaimer }
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    pub fn reclaimer(&self) -> &Arc<Reclaimer> {
        &self.reclaimer
    }
}
