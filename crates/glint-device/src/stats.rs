//! Telemetry counters for the state cache and the resource layer.
//!
//! Counters are cheap to update on the device thread and safe to read from
//! another thread. Lifetime gauges (live object counts and byte totals per
//! resource kind) persist across frames; per-frame counters are zeroed by
//! [`RenderStats::reset_frame`].

use std::sync::atomic::{AtomicU64, Ordering};

use crate::ids::ResourceKind;

#[derive(Debug)]
pub struct RenderStats {
    live_count: [AtomicU64; ResourceKind::COUNT],
    live_bytes: [AtomicU64; ResourceKind::COUNT],

    draw_calls: AtomicU64,
    primitives: AtomicU64,
    texture_binds: AtomicU64,
    buffer_binds: AtomicU64,
    state_changes: AtomicU64,
    mode_switches: AtomicU64,
}

impl Default for RenderStats {
    fn default() -> Self {
        Self {
            live_count: std::array::from_fn(|_| AtomicU64::new(0)),
            live_bytes: std::array::from_fn(|_| AtomicU64::new(0)),
            draw_calls: AtomicU64::new(0),
            primitives: AtomicU64::new(0),
            texture_binds: AtomicU64::new(0),
            buffer_binds: AtomicU64::new(0),
            state_changes: AtomicU64::new(0),
            mode_switches: AtomicU64::new(0),
        }
    }
}

impl RenderStats {
    pub fn new() -> Self {
        Self::default()
    }

    // -- lifetime gauges ---------------------------------------------------

    pub fn resource_created(&self, kind: ResourceKind) {
        self.live_count[kind.index()].fetch_add(1, Ordering::Relaxed);
    }

    /// One resource of `kind` is gone, together with its last-known bytes.
    pub fn resource_destroyed(&self, kind: ResourceKind, bytes: u64) {
        self.live_count[kind.index()].fetch_sub(1, Ordering::Relaxed);
        self.live_bytes[kind.index()].fetch_sub(bytes, Ordering::Relaxed);
    }

    /// A whole drained batch is gone. Equivalent to `count` calls of
    /// [`resource_destroyed`](Self::resource_destroyed) but one update per gauge.
    pub fn resources_reclaimed(&self, kind: ResourceKind, count: u64, bytes: u64) {
        self.live_count[kind.index()].fetch_sub(count, Ordering::Relaxed);
        self.live_bytes[kind.index()].fetch_sub(bytes, Ordering::Relaxed);
    }

    /// Size-affecting operations report the delta, not the new total.
    pub fn bytes_grown(&self, kind: ResourceKind, delta: u64) {
        self.live_bytes[kind.index()].fetch_add(delta, Ordering::Relaxed);
    }

    pub fn bytes_shrunk(&self, kind: ResourceKind, delta: u64) {
        self.live_bytes[kind.index()].fetch_sub(delta, Ordering::Relaxed);
    }

    pub fn live_count(&self, kind: ResourceKind) -> u64 {
        self.live_count[kind.index()].load(Ordering::Relaxed)
    }

    pub fn live_bytes(&self, kind: ResourceKind) -> u64 {
        self.live_bytes[kind.index()].load(Ordering::Relaxed)
    }

    // -- per-frame counters ------------------------------------------------

    pub fn note_draw(&self, primitives: u64) {
        self.draw_calls.fetch_add(1, Ordering::Relaxed);
        self.primitives.fetch_add(primitives, Ordering::Relaxed);
    }

    pub fn inc_texture_binds(&self) {
        self.texture_binds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_buffer_binds(&self) {
        self.buffer_binds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_state_changes(&self) {
        self.state_changes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_mode_switches(&self) {
        self.mode_switches.fetch_add(1, Ordering::Relaxed);
    }

    /// Zero the per-frame counters. Lifetime gauges are untouched.
    pub fn reset_frame(&self) {
        self.draw_calls.store(0, Ordering::Relaxed);
        self.primitives.store(0, Ordering::Relaxed);
        self.texture_binds.store(0, Ordering::Relaxed);
        self.buffer_binds.store(0, Ordering::Relaxed);
        self.state_changes.store(0, Ordering::Relaxed);
        self.mode_switches.store(0, Ordering::Relaxed);
    }

    pub fn frame(&self) -> FrameCounters {
        FrameCounters {
            draw_calls: self.draw_calls.load(Ordering::Relaxed),
            primitives: self.primitives.load(Ordering::Relaxed),
            texture_binds: self.texture_binds.load(Ordering::Relaxed),
            buffer_binds: self.buffer_binds.load(Ordering::Relaxed),
            state_changes: self.state_changes.load(Ordering::Relaxed),
            mode_switches: self.mode_switches.load(Ordering::Relaxed),
        }
    }

    pub fn snapshot(&self) -> RenderStatsSnapshot {
        RenderStatsSnapshot {
            live_count: std::array::from_fn(|i| self.live_count[i].load(Ordering::Relaxed)),
            live_bytes: std::array::from_fn(|i| self.live_bytes[i].load(Ordering::Relaxed)),
            frame: self.frame(),
        }
    }
}

/// Values of the per-frame counters at one point in time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameCounters {
    pub draw_calls: u64,
    pub primitives: u64,
    pub texture_binds: u64,
    pub buffer_binds: u64,
    pub state_changes: u64,
    pub mode_switches: u64,
}

/// Point-in-time copy of every counter, suitable for diagnostics readers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderStatsSnapshot {
    live_count: [u64; ResourceKind::COUNT],
    live_bytes: [u64; ResourceKind::COUNT],
    pub frame: FrameCounters,
}

impl RenderStatsSnapshot {
    pub fn live_count(&self, kind: ResourceKind) -> u64 {
        self.live_count[kind.index()]
    }

    pub fn live_bytes(&self, kind: ResourceKind) -> u64 {
        self.live_bytes[kind.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_reset_preserves_lifetime_gauges() {
        let stats = RenderStats::new();
        stats.resource_created(ResourceKind::Texture);
        stats.bytes_grown(ResourceKind::Texture, 4096);
        stats.note_draw(300);
        stats.inc_texture_binds();

        stats.reset_frame();

        assert_eq!(stats.frame(), FrameCounters::default());
        assert_eq!(stats.live_count(ResourceKind::Texture), 1);
        assert_eq!(stats.live_bytes(ResourceKind::Texture), 4096);
    }

    #[test]
    fn byte_deltas_accumulate_per_kind() {
        let stats = RenderStats::new();
        stats.resource_created(ResourceKind::Buffer);
        stats.bytes_grown(ResourceKind::Buffer, 100);
        stats.bytes_grown(ResourceKind::Buffer, 50);
        stats.bytes_shrunk(ResourceKind::Buffer, 30);
        assert_eq!(stats.live_bytes(ResourceKind::Buffer), 120);
        assert_eq!(stats.live_bytes(ResourceKind::Texture), 0);

        stats.resource_destroyed(ResourceKind::Buffer, 120);
        assert_eq!(stats.live_count(ResourceKind::Buffer), 0);
        assert_eq!(stats.live_bytes(ResourceKind::Buffer), 0);
    }

    #[test]
    fn snapshot_matches_live_values() {
        let stats = RenderStats::new();
        stats.resource_created(ResourceKind::Program);
        stats.inc_mode_switches();
        let snap = stats.snapshot();
        assert_eq!(snap.live_count(ResourceKind::Program), 1);
        assert_eq!(snap.frame.mode_switches, 1);
    }
}
