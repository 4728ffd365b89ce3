use std::collections::VecDeque;

use serde::Serialize;

use crate::input::{IoRequest, Process};
use crate::{Pid, Timestamp};

/// The lifecycle state of a simulated process
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProcessState {
    /// Not arrived yet
    New,
    Ready,
    Running,
    /// Blocked on I/O until `wake`
    Wait { wake: Timestamp },
    Done,
}

/// The runtime record the engine keeps for every process
///
/// All transitions go through the methods below, which assert the state they
/// start from. A failed assertion means the engine itself is broken.
#[derive(Clone, Debug)]
pub struct ProcessControlBlock {
    pid: Pid,
    input_index: usize,
    arrival_time: Timestamp,
    burst_time: u64,
    remaining_burst: u64,
    consumed_burst: u64,
    /// Current ready queue index, 0 is the highest priority
    priority: usize,
    state: ProcessState,
    scheduled_time: Option<Timestamp>,
    completion_time: Option<Timestamp>,
    io_list: VecDeque<IoRequest>,
    /// Ticks spent blocked on I/O that already completed or started
    io_time: u64,
    /// Ticks spent in the ready state
    waiting_ticks: u64,
    ticks_in_quantum: u64,
}

impl ProcessControlBlock {
    /// Creates a new Process Control Block in the `New` state
    ///
    /// * `pid` - pid of the new process
    /// * `process` - the validated description it is built from
    pub fn new(pid: Pid, process: &Process) -> ProcessControlBlock {
        ProcessControlBlock {
            pid,
            input_index: process.input_index,
            arrival_time: process.arrival_time,
            burst_time: process.burst_time,
            remaining_burst: process.burst_time,
            consumed_burst: 0,
            priority: 0,
            state: ProcessState::New,
            scheduled_time: None,
            completion_time: None,
            io_list: process.io.iter().copied().collect(),
            io_time: 0,
            waiting_ticks: 0,
            ticks_in_quantum: 0,
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn input_index(&self) -> usize {
        self.input_index
    }

    pub fn arrival_time(&self) -> Timestamp {
        self.arrival_time
    }

    pub fn burst_time(&self) -> u64 {
        self.burst_time
    }

    pub fn remaining_burst(&self) -> u64 {
        self.remaining_burst
    }

    pub fn consumed_burst(&self) -> u64 {
        self.consumed_burst
    }

    pub fn priority(&self) -> usize {
        self.priority
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn scheduled_time(&self) -> Option<Timestamp> {
        self.scheduled_time
    }

    pub fn completion_time(&self) -> Option<Timestamp> {
        self.completion_time
    }

    pub fn io_time(&self) -> u64 {
        self.io_time
    }

    pub fn waiting_time(&self) -> u64 {
        self.waiting_ticks
    }

    pub fn ticks_in_quantum(&self) -> u64 {
        self.ticks_in_quantum
    }

    pub fn pending_io(&self) -> usize {
        self.io_list.len()
    }

    pub fn is_done(&self) -> bool {
        self.state == ProcessState::Done
    }

    pub fn has_arrived(&self) -> bool {
        self.state != ProcessState::New
    }

    /// Turnaround time, once the process has completed
    pub fn turnaround_time(&self) -> Option<u64> {
        self.completion_time
            .map(|completion| completion.since(self.arrival_time))
    }

    pub fn set_priority(&mut self, priority: usize) {
        self.priority = priority;
    }

    /// `New` -> `Ready`
    pub fn admit(&mut self) {
        self.expect_state(ProcessState::New, "admit");
        self.state = ProcessState::Ready;
    }

    /// `Ready` -> `Running`
    ///
    /// * `now` - the dispatch tick, recorded as the scheduled time on the
    ///           first dispatch only
    pub fn dispatch(&mut self, now: Timestamp) {
        self.expect_state(ProcessState::Ready, "dispatch");
        self.state = ProcessState::Running;
        self.ticks_in_quantum = 0;

        if self.scheduled_time.is_none() {
            self.scheduled_time = Some(now);
        }
    }

    /// Runs the process for one tick
    pub fn execute(&mut self) {
        self.expect_state(ProcessState::Running, "execute");
        assert!(self.remaining_burst > 0, "{} executed with no burst left", self.pid);

        self.remaining_burst -= 1;
        self.consumed_burst += 1;
        self.ticks_in_quantum += 1;
    }

    /// Counts one tick spent waiting in a ready queue
    pub fn wait_in_queue(&mut self) {
        self.expect_state(ProcessState::Ready, "wait in queue");
        self.waiting_ticks += 1;
    }

    /// `Running` -> `Done`
    pub fn finish(&mut self, at: Timestamp) {
        self.expect_state(ProcessState::Running, "finish");
        assert_eq!(self.remaining_burst, 0, "{} finished with burst left", self.pid);

        self.state = ProcessState::Done;
        self.completion_time = Some(at);
    }

    /// Consumes the next I/O interruption if the process has reached it
    pub fn take_due_io(&mut self) -> Option<IoRequest> {
        match self.io_list.front() {
            Some(io) if io.start == self.consumed_burst => self.io_list.pop_front(),
            _ => None,
        }
    }

    /// `Running` -> `Wait`
    ///
    /// * `io` - the interruption being served
    /// * `wake` - the tick at which the process becomes ready again
    pub fn block(&mut self, io: IoRequest, wake: Timestamp) {
        self.expect_state(ProcessState::Running, "block");
        self.state = ProcessState::Wait { wake };
        self.io_time += io.duration;
        self.ticks_in_quantum = 0;
    }

    /// The tick this process wakes at, if it is blocked
    pub fn wake_tick(&self) -> Option<Timestamp> {
        match self.state {
            ProcessState::Wait { wake } => Some(wake),
            _ => None,
        }
    }

    /// `Wait` -> `Ready`, landing in queue `priority`
    pub fn wake(&mut self, priority: usize) {
        assert!(
            self.wake_tick().is_some(),
            "cannot wake {}: state is {:?}",
            self.pid,
            self.state
        );

        self.state = ProcessState::Ready;
        self.priority = priority;
        self.ticks_in_quantum = 0;
    }

    /// `Running` -> `Ready`, keeping the current priority
    pub fn preempt(&mut self) {
        self.expect_state(ProcessState::Running, "preempt");
        self.state = ProcessState::Ready;
    }

    /// `Running` -> `Ready` after a used-up quantum, landing in queue `priority`
    pub fn expire_quantum(&mut self, priority: usize) {
        self.expect_state(ProcessState::Running, "expire quantum");
        self.state = ProcessState::Ready;
        self.priority = priority;
        self.ticks_in_quantum = 0;
    }

    /// Moves the process to the top queue and restarts its quantum
    pub fn boost(&mut self) {
        self.priority = 0;
        self.ticks_in_quantum = 0;
    }

    fn expect_state(&self, expected: ProcessState, action: &str) {
        assert_eq!(
            self.state, expected,
            "cannot {} {}: state is {:?}",
            action, self.pid, self.state
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process(burst: u64, io: &[(u64, u64)]) -> Process {
        Process {
            input_index: 0,
            arrival_time: Timestamp::new(0),
            burst_time: burst,
            io: io
                .iter()
                .map(|&(start, duration)| IoRequest { start, duration })
                .collect(),
        }
    }

    #[test]
    fn runs_to_completion() {
        let mut pcb = ProcessControlBlock::new(Pid::new(1), &process(2, &[]));
        pcb.admit();
        pcb.dispatch(Timestamp::new(3));
        pcb.execute();
        pcb.execute();
        pcb.finish(Timestamp::new(5));

        assert_eq!(pcb.state(), ProcessState::Done);
        assert_eq!(pcb.scheduled_time(), Some(Timestamp::new(3)));
        assert_eq!(pcb.consumed_burst(), 2);
        assert_eq!(pcb.turnaround_time(), Some(5));
    }

    #[test]
    fn scheduled_time_is_set_once() {
        let mut pcb = ProcessControlBlock::new(Pid::new(1), &process(3, &[]));
        pcb.admit();
        pcb.dispatch(Timestamp::new(1));
        pcb.execute();
        pcb.preempt();
        pcb.dispatch(Timestamp::new(4));

        assert_eq!(pcb.scheduled_time(), Some(Timestamp::new(1)));
        assert_eq!(pcb.ticks_in_quantum(), 0);
    }

    #[test]
    fn io_is_due_only_at_its_offset() {
        let mut pcb = ProcessControlBlock::new(Pid::new(1), &process(3, &[(1, 4)]));
        pcb.admit();
        pcb.dispatch(Timestamp::new(0));
        assert_eq!(pcb.take_due_io(), None);

        pcb.execute();
        let io = pcb.take_due_io().unwrap();
        pcb.block(io, Timestamp::new(6));
        assert_eq!(pcb.wake_tick(), Some(Timestamp::new(6)));
        assert_eq!(pcb.io_time(), 4);
        assert_eq!(pcb.pending_io(), 0);

        pcb.wake(0);
        assert_eq!(pcb.state(), ProcessState::Ready);
    }

    #[test]
    #[should_panic(expected = "cannot execute")]
    fn executing_a_ready_process_is_a_bug() {
        let mut pcb = ProcessControlBlock::new(Pid::new(1), &process(1, &[]));
        pcb.admit();
        pcb.execute();
    }

    #[test]
    #[should_panic(expected = "cannot wake")]
    fn waking_a_running_process_is_a_bug() {
        let mut pcb = ProcessControlBlock::new(Pid::new(1), &process(1, &[]));
        pcb.admit();
        pcb.dispatch(Timestamp::new(0));
        pcb.wake(0);
    }
}
