//! What a simulation run hands back to its caller.

use serde::Serialize;

use crate::{Event, Pid, ProcessState, Timestamp};

/// Per-process line of the table shown at every step
///
/// Fields stay `None` until the event behind them has happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicRow {
    pub pid: Pid,
    pub arrival: Timestamp,
    pub state: ProcessState,
    pub priority: usize,
    pub scheduled_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    /// Ticks spent ready so far, once the process has arrived
    pub waiting_time: Option<u64>,
    pub turnaround_time: Option<u64>,
}

/// Everything the engine observed during one tick
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub tick: Timestamp,
    /// End of the covered time range, exclusive; `tick + 1` unless idle ticks were skipped
    pub until: Timestamp,
    /// The process that executed during this tick
    pub running: Option<Pid>,
    pub explanation: String,
    pub events: Vec<Event>,
    pub ready_queues: Vec<Vec<Pid>>,
    pub wait_queue: Vec<Pid>,
    pub new_processes: Vec<Pid>,
    pub graphic_table: Vec<GraphicRow>,
}

/// An uninterrupted stretch of CPU time, `start` inclusive, `end` exclusive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ExecutionSpan {
    pub pid: Pid,
    pub start: Timestamp,
    pub end: Timestamp,
}

impl ExecutionSpan {
    pub fn len(&self) -> u64 {
        self.end.since(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Final metrics of one process
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReport {
    pub pid: Pid,
    /// Position of the process in the caller's list
    pub input_index: usize,
    pub arrival: Timestamp,
    pub burst: u64,
    pub scheduled_time: Timestamp,
    pub end_time: Timestamp,
    pub io_time: u64,
    pub waiting_time: u64,
    pub turnaround_time: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub average_waiting_time: f64,
    pub average_turnaround_time: f64,
    /// Busy ticks over total ticks, in percent
    pub cpu_utilization: f64,
    /// Completed processes per tick
    pub throughput: f64,
    pub total_time: u64,
    pub total_burst: u64,
}

impl Summary {
    pub fn from_reports(reports: &[ProcessReport]) -> Summary {
        let count = reports.len() as f64;
        let total_time = reports
            .iter()
            .map(|report| report.end_time.get())
            .max()
            .unwrap_or(0);
        let total_burst: u64 = reports.iter().map(|report| report.burst).sum();
        let total_waiting: u64 = reports.iter().map(|report| report.waiting_time).sum();
        let total_turnaround: u64 = reports.iter().map(|report| report.turnaround_time).sum();

        Summary {
            average_waiting_time: ratio(total_waiting as f64, count),
            average_turnaround_time: ratio(total_turnaround as f64, count),
            cpu_utilization: ratio(total_burst as f64, total_time as f64) * 100.0,
            throughput: ratio(count, total_time as f64),
            total_time,
            total_burst,
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// The complete, eagerly computed outcome of a run
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub algorithm: String,
    pub steps: Vec<StepRecord>,
    pub timeline: Vec<ExecutionSpan>,
    pub processes: Vec<ProcessReport>,
    pub summary: Summary,
}

impl SimulationResult {
    pub fn report(&self, pid: Pid) -> Option<&ProcessReport> {
        self.processes.iter().find(|report| report.pid == pid)
    }

    /// Pids in the order they completed
    pub fn completion_order(&self) -> Vec<Pid> {
        let mut reports: Vec<&ProcessReport> = self.processes.iter().collect();
        reports.sort_by_key(|report| (report.end_time, report.pid));
        reports.into_iter().map(|report| report.pid).collect()
    }

    /// Pids in the order they first got the CPU
    pub fn dispatch_order(&self) -> Vec<Pid> {
        let mut reports: Vec<&ProcessReport> = self.processes.iter().collect();
        reports.sort_by_key(|report| (report.scheduled_time, report.pid));
        reports.into_iter().map(|report| report.pid).collect()
    }
}
