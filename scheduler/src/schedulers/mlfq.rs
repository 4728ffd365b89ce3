use std::num::NonZeroU64;

use crate::common_funcs::head_of_first_nonempty;
use crate::error::ConfigError;
use crate::{
    ControlBlockTable, DispatchPolicy, Pid, ProcessControlBlock, QueueLayout, ReadyQueueSet,
};

/// Multi-level feedback queue
///
/// * new processes and processes returning from I/O start in queue 0
/// * a process that uses up the quantum of its queue drops one level, never
///   below the last queue
/// * every `allotment` ticks all ready processes are boosted back to queue 0
/// * an arrival preempts a running process from a lower queue
#[derive(Clone, Debug)]
pub struct MultiLevelFeedbackQueue {
    quantums: Vec<u64>,
    allotment: NonZeroU64,
}

impl MultiLevelFeedbackQueue {
    /// Creates a scheduler with one queue per entry of `quantums`
    ///
    /// * `quantums` - quantum of each queue, highest priority first
    /// * `allotment` - ticks between two priority boosts
    pub fn new(
        quantums: Vec<NonZeroU64>,
        allotment: NonZeroU64,
    ) -> Result<MultiLevelFeedbackQueue, ConfigError> {
        if quantums.is_empty() {
            return Err(ConfigError::NoQueues(0));
        }

        Ok(MultiLevelFeedbackQueue {
            quantums: quantums.into_iter().map(NonZeroU64::get).collect(),
            allotment,
        })
    }
}

impl DispatchPolicy for MultiLevelFeedbackQueue {
    fn name(&self) -> &'static str {
        "MLFQ"
    }

    fn initialize_queues(&self) -> QueueLayout {
        QueueLayout::multilevel(&self.quantums, self.allotment.get())
    }

    fn should_preempt_on_arrival(
        &self,
        arriving: &ProcessControlBlock,
        running: &ProcessControlBlock,
    ) -> bool {
        arriving.priority() < running.priority()
    }

    fn get_scheduled_process(&self, queues: &ReadyQueueSet, _: &ControlBlockTable) -> Option<Pid> {
        head_of_first_nonempty(queues)
    }

    fn should_yield_on_quantum_expiry(&self) -> bool {
        true
    }

    fn priority_after_quantum(&self, pcb: &ProcessControlBlock, queues: &ReadyQueueSet) -> usize {
        (pcb.priority() + 1).min(queues.lowest())
    }

    fn priority_after_io(&self, _: &ProcessControlBlock) -> usize {
        0
    }
}
