use std::collections::VecDeque;

use hashbrown::HashMap;
use tracing::debug;

use glint_device::{DeviceCommands, RawId};

type SurfaceKey = (u32, u32);

/// Bounded cache of shared auxiliary surfaces, keyed by size.
///
/// Render-to-texture objects of the same dimensions can share one hidden
/// surface; this registry hands them out and evicts the least recently used
/// one once the cap is reached. Eviction destroys the surface through the
/// backend — there is no reliance on finalization order.
#[derive(Debug)]
pub struct SurfaceRegistry {
    capacity: usize,
    surfaces: HashMap<SurfaceKey, RawId>,
    order: VecDeque<SurfaceKey>,
}

impl SurfaceRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            surfaces: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Get or create the shared surface for `width`x`height`. `None` means
    /// the device could not provide one; callers fall back the same way
    /// they would for a dedicated surface.
    pub fn acquire(
        &mut self,
        dev: &mut dyn DeviceCommands,
        width: u32,
        height: u32,
    ) -> Option<RawId> {
        let key = (width, height);
        if let Some(&surface) = self.surfaces.get(&key) {
            self.touch(key);
            return Some(surface);
        }

        let surface = dev.create_aux_surface(width, height)?;
        if self.surfaces.len() >= self.capacity {
            self.evict_lru(dev);
        }
        self.surfaces.insert(key, surface);
        self.order.push_back(key);
        Some(surface)
    }

    /// Destroy every cached surface (context reset, surface loss).
    pub fn clear(&mut self, dev: &mut dyn DeviceCommands) {
        for (_, surface) in self.surfaces.drain() {
            dev.destroy_aux_surface(surface);
        }
        self.order.clear();
    }

    fn touch(&mut self, key: SurfaceKey) {
        if let Some(pos) = self.order.iter().position(|k| *k == key) {
            self.order.remove(pos);
        }
        self.order.push_back(key);
    }

    fn evict_lru(&mut self, dev: &mut dyn DeviceCommands) {
        if let Some(key) = self.order.pop_front() {
            if let Some(surface) = self.surfaces.remove(&key) {
                debug!(width = key.0, height = key.1, "evicting shared surface");
                dev.destroy_aux_surface(surface);
            }
        }
    }
}
