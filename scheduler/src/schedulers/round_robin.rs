use std::num::NonZeroU64;

use crate::common_funcs::head_of;
use crate::{ControlBlockTable, DispatchPolicy, Pid, QueueLayout, ReadyQueueSet};

/// Round robin over a single queue
#[derive(Clone, Copy, Debug)]
pub struct RoundRobin {
    /// The time quanta a process can run before it goes back to the tail
    quantum: NonZeroU64,
}

impl RoundRobin {
    pub fn new(quantum: NonZeroU64) -> RoundRobin {
        RoundRobin { quantum }
    }
}

impl DispatchPolicy for RoundRobin {
    fn name(&self) -> &'static str {
        "RR"
    }

    fn initialize_queues(&self) -> QueueLayout {
        QueueLayout::sliced(self.quantum.get())
    }

    fn get_scheduled_process(&self, queues: &ReadyQueueSet, _: &ControlBlockTable) -> Option<Pid> {
        head_of(queues, 0)
    }

    fn should_yield_on_quantum_expiry(&self) -> bool {
        true
    }
}
