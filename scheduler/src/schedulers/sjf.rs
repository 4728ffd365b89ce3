use crate::common_funcs::smallest_in_queue;
use crate::{ControlBlockTable, DispatchPolicy, Pid, QueueLayout, ReadyQueueSet};

/// Non-preemptive shortest job first
///
/// Picks the ready process with the smallest total burst; the earliest
/// queued one wins ties.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShortestJobFirst;

impl ShortestJobFirst {
    pub fn new() -> ShortestJobFirst {
        ShortestJobFirst
    }
}

impl DispatchPolicy for ShortestJobFirst {
    fn name(&self) -> &'static str {
        "SJF"
    }

    fn initialize_queues(&self) -> QueueLayout {
        QueueLayout::single()
    }

    fn get_scheduled_process(
        &self,
        queues: &ReadyQueueSet,
        pcbs: &ControlBlockTable,
    ) -> Option<Pid> {
        smallest_in_queue(queues, 0, pcbs, |pcb| pcb.burst_time())
    }
}
