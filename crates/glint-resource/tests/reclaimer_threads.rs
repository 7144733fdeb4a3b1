//! Cross-thread reclaimer properties: enqueues from many threads survive
//! into exactly one drained batch per kind, with accounting decrements
//! matching the enqueued totals.

use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;

use glint_device::{Command, RenderStats, ResourceKind, TraceDevice};
use glint_resource::Reclaimer;

const THREADS: u32 = 8;
const PER_THREAD: u32 = 250;

#[test]
fn concurrent_enqueues_drain_exactly_once_each() {
    let stats = RenderStats::new();
    let reclaimer = Arc::new(Reclaimer::new());

    let total = THREADS * PER_THREAD;
    for _ in 0..total {
        stats.resource_created(ResourceKind::Texture);
    }
    stats.bytes_grown(ResourceKind::Texture, u64::from(total) * 16);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let reclaimer = Arc::clone(&reclaimer);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    // Ids are globally unique across threads, as device ids are.
                    let id = t * PER_THREAD + i + 1;
                    reclaimer.enqueue(ResourceKind::Texture, id, 16);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(reclaimer.pending_count(), total as usize);

    let mut dev = TraceDevice::new();
    let drained = reclaimer.drain(&mut dev, &stats);
    assert_eq!(drained, total as usize);

    // One batched deletion command, containing every id exactly once.
    let commands = dev.take_commands();
    assert_eq!(commands.len(), 1);
    let Command::DeleteResources { kind, ids } = &commands[0] else {
        panic!("expected a batched delete, got {commands:?}");
    };
    assert_eq!(*kind, ResourceKind::Texture);
    assert_eq!(ids.len(), total as usize);
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), total as usize, "duplicate ids in the batch");

    assert_eq!(stats.live_count(ResourceKind::Texture), 0);
    assert_eq!(stats.live_bytes(ResourceKind::Texture), 0);

    // The queue was swapped out: a second drain has nothing to do.
    assert_eq!(reclaimer.drain(&mut dev, &stats), 0);
    assert!(dev.commands().is_empty());
}

#[test]
fn enqueue_then_drain_interleaved_with_more_enqueues() {
    let stats = RenderStats::new();
    let reclaimer = Arc::new(Reclaimer::new());
    for _ in 0..3 {
        stats.resource_created(ResourceKind::Buffer);
    }

    reclaimer.enqueue(ResourceKind::Buffer, 1, 0);
    reclaimer.enqueue(ResourceKind::Buffer, 2, 0);

    let mut dev = TraceDevice::new();
    assert_eq!(reclaimer.drain(&mut dev, &stats), 2);

    // A deletion enqueued after the swap lands in the next drain.
    reclaimer.enqueue(ResourceKind::Buffer, 3, 0);
    assert_eq!(reclaimer.drain(&mut dev, &stats), 1);
    assert_eq!(stats.live_count(ResourceKind::Buffer), 0);
}
