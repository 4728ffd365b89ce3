use crate::trace::{GraphicRow, ProcessReport};
use crate::{ControlBlockTable, Pid, ProcessState};

/// Read-only views over the control blocks, used to build trace records
pub trait Collector {
    /// Returns the pids blocked on I/O
    fn collect_waiting(&self) -> Vec<Pid>;

    /// Returns the pids that have not arrived yet
    fn collect_new(&self) -> Vec<Pid>;

    /// Returns one table row per process
    fn collect_rows(&self) -> Vec<GraphicRow>;

    /// Returns the final metrics of every finished process
    fn collect_reports(&self) -> Vec<ProcessReport>;
}

impl Collector for ControlBlockTable {
    fn collect_waiting(&self) -> Vec<Pid> {
        self.pids_where(|pcb| pcb.wake_tick().is_some())
    }

    fn collect_new(&self) -> Vec<Pid> {
        self.pids_where(|pcb| pcb.state() == ProcessState::New)
    }

    fn collect_rows(&self) -> Vec<GraphicRow> {
        self.iter()
            .map(|pcb| GraphicRow {
                pid: pcb.pid(),
                arrival: pcb.arrival_time(),
                state: pcb.state(),
                priority: pcb.priority(),
                scheduled_time: pcb.scheduled_time(),
                end_time: pcb.completion_time(),
                waiting_time: pcb.has_arrived().then(|| pcb.waiting_time()),
                turnaround_time: pcb.turnaround_time(),
            })
            .collect()
    }

    fn collect_reports(&self) -> Vec<ProcessReport> {
        let mut reports = Vec::new();

        for pcb in self.iter() {
            let (Some(scheduled_time), Some(end_time)) =
                (pcb.scheduled_time(), pcb.completion_time())
            else {
                continue;
            };

            reports.push(ProcessReport {
                pid: pcb.pid(),
                input_index: pcb.input_index(),
                arrival: pcb.arrival_time(),
                burst: pcb.burst_time(),
                scheduled_time,
                end_time,
                io_time: pcb.io_time(),
                waiting_time: pcb.waiting_time(),
                turnaround_time: end_time.since(pcb.arrival_time()),
            });
        }

        reports
    }
}
