//! Selection rules shared by several policies.

use crate::{ControlBlockTable, Pid, ProcessControlBlock, ReadyQueueSet};

/// Head of queue `queue`
pub fn head_of(queues: &ReadyQueueSet, queue: usize) -> Option<Pid> {
    queues.queue(queue).front().copied()
}

/// Head of the highest priority queue that has anything in it
pub fn head_of_first_nonempty(queues: &ReadyQueueSet) -> Option<Pid> {
    queues.iter().find_map(|queue| queue.front().copied())
}

/// The pid in queue `queue` with the strictly smallest `key`
///
/// Scans from head to tail, so on ties the earliest queued pid wins.
pub fn smallest_in_queue<F>(
    queues: &ReadyQueueSet,
    queue: usize,
    pcbs: &ControlBlockTable,
    key: F,
) -> Option<Pid>
where
    F: Fn(&ProcessControlBlock) -> u64,
{
    let mut best: Option<(Pid, u64)> = None;

    for pid in queues.queue(queue).iter().copied() {
        let value = key(pcbs.get(pid));

        match best {
            Some((_, smallest)) if value >= smallest => (),
            _ => best = Some((pid, value)),
        }
    }

    best.map(|(pid, _)| pid)
}
