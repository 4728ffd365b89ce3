use crate::common_funcs::head_of;
use crate::{ControlBlockTable, DispatchPolicy, Pid, QueueLayout, ReadyQueueSet};

/// Runs processes to completion in arrival order
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstComeFirstServed;

impl FirstComeFirstServed {
    pub fn new() -> FirstComeFirstServed {
        FirstComeFirstServed
    }
}

impl DispatchPolicy for FirstComeFirstServed {
    fn name(&self) -> &'static str {
        "FCFS"
    }

    fn initialize_queues(&self) -> QueueLayout {
        QueueLayout::single()
    }

    fn get_scheduled_process(&self, queues: &ReadyQueueSet, _: &ControlBlockTable) -> Option<Pid> {
        head_of(queues, 0)
    }
}
