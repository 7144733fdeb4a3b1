use std::sync::Mutex;

use tracing::trace;

use glint_device::{DeviceCommands, RawId, RenderStats, ResourceKind};

/// Ids (and their last-known byte totals) waiting to be deleted on the
/// device thread, grouped by kind so the drain can issue one batched
/// deletion call per kind.
#[derive(Debug, Default)]
struct PendingDeletes {
    ids: [Vec<RawId>; ResourceKind::COUNT],
    bytes: [u64; ResourceKind::COUNT],
}

impl PendingDeletes {
    fn is_empty(&self) -> bool {
        self.ids.iter().all(Vec::is_empty)
    }
}

/// Cross-thread hand-off point for deferred resource deletion.
///
/// A handle dropped on a thread that must not issue device commands
/// enqueues its id here and returns immediately; the device thread drains
/// the queue at a point guaranteed not to be mid-draw (typically once per
/// frame). The lock is held only for the append and for the swap at drain
/// time, never across a device call.
///
/// Accounting decrements happen at drain time, not at enqueue time, so
/// live counts stay accurate until the device object is actually gone.
#[derive(Debug, Default)]
pub struct Reclaimer {
    pending: Mutex<PendingDeletes>,
}

impl Reclaimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Safe to call from any thread; never blocks on device work. Each
    /// handle enqueues itself at most once (its id is zeroed on explicit
    /// delete), so an id cannot appear twice for one kind.
    pub fn enqueue(&self, kind: ResourceKind, id: RawId, bytes: u64) {
        let mut pending = self.lock();
        pending.ids[kind.index()].push(id);
        pending.bytes[kind.index()] += bytes;
    }

    /// Number of ids currently waiting, for diagnostics.
    pub fn pending_count(&self) -> usize {
        self.lock().ids.iter().map(Vec::len).sum()
    }

    /// Device thread only. Swaps the queue for an empty one under the lock,
    /// then issues one batched deletion per kind and applies the accounting
    /// decrements. An empty queue is a no-op with zero device calls.
    ///
    /// Returns the number of resources deleted.
    pub fn drain(&self, dev: &mut dyn DeviceCommands, stats: &RenderStats) -> usize {
        let pending = std::mem::take(&mut *self.lock());
        if pending.is_empty() {
            return 0;
        }

        let mut total = 0;
        for kind in ResourceKind::ALL {
            let ids = &pending.ids[kind.index()];
            if ids.is_empty() {
                continue;
            }
            dev.delete_resources(kind, ids);
            stats.resources_reclaimed(kind, ids.len() as u64, pending.bytes[kind.index()]);
            trace!(
                kind = %kind,
                count = ids.len(),
                bytes = pending.bytes[kind.index()],
                "drained deferred deletions"
            );
            total += ids.len();
        }
        total
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PendingDeletes> {
        // A poisoned queue just means some other thread panicked mid-append;
        // the data itself is still a list of ids.
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
