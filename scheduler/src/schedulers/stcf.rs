use crate::common_funcs::smallest_in_queue;
use crate::{
    ControlBlockTable, DispatchPolicy, Pid, ProcessControlBlock, QueueLayout, ReadyQueueSet,
};

/// Preemptive shortest time to completion first
///
/// The running process gives the CPU back after every tick so the choice is
/// re-evaluated against everything that became ready in the meantime.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShortestTimeToCompletion;

impl ShortestTimeToCompletion {
    pub fn new() -> ShortestTimeToCompletion {
        ShortestTimeToCompletion
    }
}

impl DispatchPolicy for ShortestTimeToCompletion {
    fn name(&self) -> &'static str {
        "STCF"
    }

    fn initialize_queues(&self) -> QueueLayout {
        QueueLayout::sliced(1)
    }

    /// Never consulted while the quantum is one tick, since the CPU is already
    /// free whenever a process arrives; kept so the policy is complete on its own
    fn should_preempt_on_arrival(
        &self,
        arriving: &ProcessControlBlock,
        running: &ProcessControlBlock,
    ) -> bool {
        arriving.remaining_burst() < running.remaining_burst()
    }

    fn get_scheduled_process(
        &self,
        queues: &ReadyQueueSet,
        pcbs: &ControlBlockTable,
    ) -> Option<Pid> {
        smallest_in_queue(queues, 0, pcbs, |pcb| pcb.remaining_burst())
    }

    fn should_yield_on_quantum_expiry(&self) -> bool {
        true
    }
}
