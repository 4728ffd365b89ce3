use std::fmt;

use crate::{ControlBlockTable, Pid, ProcessControlBlock, QueueLayout, ReadyQueueSet};

/// The decisions that differ between scheduling algorithms
///
/// The engine runs the same tick loop for every algorithm and asks the
/// policy whenever a choice has to be made. Defaults describe a
/// non-preemptive single-queue scheduler.
pub trait DispatchPolicy: fmt::Debug {
    /// Short upper-case name, as used in requests
    fn name(&self) -> &'static str;

    /// Number of ready queues, their quanta and the boost interval
    fn initialize_queues(&self) -> QueueLayout;

    /// Queue that newly arrived processes join
    fn initial_priority(&self) -> usize {
        0
    }

    /// Prepares a process that arrives this tick
    fn init_new_process(&self, pcb: &mut ProcessControlBlock) {
        pcb.set_priority(self.initial_priority());
    }

    /// Whether `arriving` takes the CPU away from `running`
    #[allow(unused_variables)]
    fn should_preempt_on_arrival(
        &self,
        arriving: &ProcessControlBlock,
        running: &ProcessControlBlock,
    ) -> bool {
        false
    }

    /// Picks the next process to run, or `None` when nothing is ready
    fn get_scheduled_process(
        &self,
        queues: &ReadyQueueSet,
        pcbs: &ControlBlockTable,
    ) -> Option<Pid>;

    /// Whether a running process has to give up the CPU once its quantum is used
    fn should_yield_on_quantum_expiry(&self) -> bool {
        false
    }

    /// Queue a process joins after using up its quantum
    #[allow(unused_variables)]
    fn priority_after_quantum(&self, pcb: &ProcessControlBlock, queues: &ReadyQueueSet) -> usize {
        pcb.priority()
    }

    /// Queue a process joins when it comes back from I/O
    fn priority_after_io(&self, pcb: &ProcessControlBlock) -> usize {
        pcb.priority()
    }
}
