use std::mem;

use tracing::{debug, info, info_span};

use crate::collector::Collector;
use crate::common_types::explain;
use crate::input::Process;
use crate::trace::{ExecutionSpan, SimulationResult, StepRecord, Summary};
use crate::{
    Clock, ControlBlockTable, DispatchPolicy, Event, Pid, ProcessState, ReadyQueueSet, Timestamp,
};

/// Drives the tick loop for one simulation run
///
/// Every tick goes through the same phases in a fixed order: admission,
/// I/O completion, priority boost, dispatch, execution, post-execution
/// checks and step recording. All algorithm-specific choices are delegated
/// to the policy.
pub struct SimulationEngine {
    clock: Clock,
    pcbs: ControlBlockTable,
    queues: ReadyQueueSet,
    policy: Box<dyn DispatchPolicy>,
    /// The process currently holding the CPU
    running: Option<Pid>,
    /// The process that executed during the current tick
    executed: Option<Pid>,
    events: Vec<Event>,
    steps: Vec<StepRecord>,
    timeline: Vec<ExecutionSpan>,
}

impl SimulationEngine {
    /// Creates an engine for an already validated workload
    ///
    /// * `processes` - the workload, in the caller's order
    /// * `policy` - the algorithm to run it under
    pub fn new(processes: &[Process], policy: Box<dyn DispatchPolicy>) -> SimulationEngine {
        let queues = ReadyQueueSet::new(policy.initialize_queues());

        SimulationEngine {
            clock: Clock::new(),
            pcbs: ControlBlockTable::new(processes),
            queues,
            policy,
            running: None,
            executed: None,
            events: Vec::new(),
            steps: Vec::new(),
            timeline: Vec::new(),
        }
    }

    pub fn control_blocks(&self) -> &ControlBlockTable {
        &self.pcbs
    }

    pub fn ready_queues(&self) -> &ReadyQueueSet {
        &self.queues
    }

    pub fn now(&self) -> Timestamp {
        self.clock.value()
    }

    /// Runs every tick until all processes are done
    pub fn run(mut self) -> SimulationResult {
        let span = info_span!("simulate", algorithm = self.policy.name(), processes = self.pcbs.len());
        let _guard = span.enter();

        self.clock.reset();
        while !self.pcbs.all_done() {
            self.step();
        }

        let result = self.into_result();
        info!(
            total_time = result.summary.total_time,
            average_waiting_time = result.summary.average_waiting_time,
            average_turnaround_time = result.summary.average_turnaround_time,
            cpu_utilization = result.summary.cpu_utilization,
            "simulation finished"
        );

        result
    }

    /// Simulates a single tick and moves the clock forward
    ///
    /// Returns the record of the tick that was simulated.
    ///
    /// When the CPU has nothing to do until some later tick, that whole idle
    /// stretch is simulated at once and covered by a single record.
    pub fn step(&mut self) -> &StepRecord {
        if let Some(until) = self.idle_until() {
            self.skip_idle(until);
        } else {
            let next = self.clock.value() + 1;
            self.admit_arrivals();
            self.complete_io();
            self.boost_priorities();
            self.dispatch();
            self.execute();
            self.check_running();
            self.record_step(next);
            self.clock.advance();
        }

        &self.steps[self.steps.len() - 1]
    }

    /// The next tick at which anything can happen, if it is more than one tick away
    ///
    /// Only applies while nothing runs and every ready queue is empty. The
    /// candidates are the next arrival, the next I/O completion and the next
    /// priority boost.
    fn idle_until(&self) -> Option<Timestamp> {
        if self.running.is_some() || !self.queues.is_empty() {
            return None;
        }

        let now = self.clock.value();
        let allotment = self.queues.allotment();
        if allotment.is_some_and(|allotment| now.get() > 0 && now.get() % allotment == 0) {
            return None;
        }

        let next_arrival = self
            .pcbs
            .iter()
            .filter(|pcb| pcb.state() == ProcessState::New)
            .map(|pcb| pcb.arrival_time())
            .min();
        let next_wake = self.pcbs.iter().filter_map(|pcb| pcb.wake_tick()).min();
        let next_boost =
            allotment.map(|allotment| Timestamp::new((now.get() / allotment + 1) * allotment));

        let next = [next_arrival, next_wake, next_boost].into_iter().flatten().min()?;
        (next > now + 1).then_some(next)
    }

    fn skip_idle(&mut self, until: Timestamp) {
        let now = self.clock.value();
        self.executed = None;
        self.events.push(Event::IdleUntil { until });
        debug!(tick = now.get(), until = until.get(), "cpu idle, skipping ahead");

        self.record_step(until);
        self.clock.advance_to(until);
    }

    fn admit_arrivals(&mut self) {
        let now = self.clock.value();
        let arrivals = self
            .pcbs
            .pids_where(|pcb| pcb.state() == ProcessState::New && pcb.arrival_time() == now);

        for pid in arrivals {
            let pcb = self.pcbs.get_mut(pid);
            self.policy.init_new_process(pcb);
            pcb.admit();

            let queue = pcb.priority();
            self.queues.enqueue(queue, pid);
            self.events.push(Event::Arrived { pid, queue });
            debug!(tick = now.get(), %pid, queue, "process arrived");

            if let Some(running) = self.running {
                let arriving = self.pcbs.get(pid);
                if self.policy.should_preempt_on_arrival(arriving, self.pcbs.get(running)) {
                    self.preempt(running, pid);
                }
            }
        }
    }

    fn preempt(&mut self, running: Pid, by: Pid) {
        let pcb = self.pcbs.get_mut(running);
        pcb.preempt();
        self.queues.enqueue(pcb.priority(), running);
        self.running = None;

        self.events.push(Event::Preempted { pid: running, by });
        debug!(tick = self.clock.value().get(), pid = %running, by = %by, "process preempted");
    }

    fn complete_io(&mut self) {
        let now = self.clock.value();
        let woken = self.pcbs.pids_where(|pcb| pcb.wake_tick() == Some(now));

        for pid in woken {
            let pcb = self.pcbs.get_mut(pid);
            let queue = self.policy.priority_after_io(pcb);
            pcb.wake(queue);
            self.queues.enqueue(queue, pid);

            self.events.push(Event::IoCompleted { pid, queue });
            debug!(tick = now.get(), %pid, queue, "process returned from I/O");
        }
    }

    fn boost_priorities(&mut self) {
        let Some(allotment) = self.queues.allotment() else {
            return;
        };

        let now = self.clock.value().get();
        if now == 0 || now % allotment != 0 {
            return;
        }

        let moved = self.queues.merge_into_top();
        for pcb in self.pcbs.iter_mut() {
            if matches!(pcb.state(), ProcessState::Ready | ProcessState::Running) {
                pcb.boost();
            }
        }

        self.events.push(Event::PriorityBoost { moved });
        debug!(tick = now, moved, "priority boost");
    }

    fn dispatch(&mut self) {
        if self.running.is_some() {
            return;
        }

        assert!(
            self.pcbs.iter().all(|pcb| pcb.state() != ProcessState::Running),
            "dispatching while a process holds the CPU"
        );

        let now = self.clock.value();
        while let Some(pid) = self.policy.get_scheduled_process(&self.queues, &self.pcbs) {
            let queue = match self.queues.dequeue_by_pid(pid) {
                Some(queue) => queue,
                None => panic!("{} picked {pid}, which is not queued", self.policy.name()),
            };

            let pcb = self.pcbs.get_mut(pid);
            pcb.dispatch(now);
            self.events.push(Event::Dispatched { pid, queue });
            debug!(tick = now.get(), %pid, queue, "process dispatched");

            // I/O at offset 0 blocks before the first tick of execution
            if let Some(io) = pcb.take_due_io() {
                let wake = now + io.duration;
                pcb.block(io, wake);
                self.events.push(Event::Blocked {
                    pid,
                    duration: io.duration,
                    wake,
                });
                debug!(tick = now.get(), %pid, wake = wake.get(), "process blocked on I/O");
                continue;
            }

            self.running = Some(pid);
            return;
        }
    }

    fn execute(&mut self) {
        for pcb in self.pcbs.iter_mut() {
            if pcb.state() == ProcessState::Ready {
                pcb.wait_in_queue();
            }
        }

        self.executed = self.running;
        let Some(pid) = self.running else {
            self.events.push(Event::Idle);
            return;
        };

        let now = self.clock.value();
        let pcb = self.pcbs.get_mut(pid);
        pcb.execute();
        self.events.push(Event::Executed {
            pid,
            remaining: pcb.remaining_burst(),
        });

        match self.timeline.last_mut() {
            Some(span) if span.pid == pid && span.end == now => span.end = now + 1,
            _ => self.timeline.push(ExecutionSpan {
                pid,
                start: now,
                end: now + 1,
            }),
        }
    }

    /// Completion, I/O and quantum checks, at most one of which applies
    fn check_running(&mut self) {
        let Some(pid) = self.running else {
            return;
        };

        let now = self.clock.value();
        let pcb = self.pcbs.get_mut(pid);

        if pcb.remaining_burst() == 0 {
            let at = now + 1;
            pcb.finish(at);
            self.running = None;

            self.events.push(Event::Finished { pid, at });
            debug!(tick = now.get(), %pid, "process completed");
            return;
        }

        if let Some(io) = pcb.take_due_io() {
            let wake = now + 1 + io.duration;
            pcb.block(io, wake);
            self.running = None;

            self.events.push(Event::Blocked {
                pid,
                duration: io.duration,
                wake,
            });
            debug!(tick = now.get(), %pid, wake = wake.get(), "process blocked on I/O");
            return;
        }

        if !self.policy.should_yield_on_quantum_expiry() {
            return;
        }

        let Some(quantum) = self.queues.quantum(pcb.priority()) else {
            return;
        };

        if pcb.ticks_in_quantum() >= quantum {
            let queue = self.policy.priority_after_quantum(pcb, &self.queues);
            pcb.expire_quantum(queue);
            self.queues.enqueue(queue, pid);
            self.running = None;

            self.events.push(Event::QuantumExpired { pid, queue });
            debug!(tick = now.get(), %pid, queue, "quantum expired");
        }
    }

    fn record_step(&mut self, until: Timestamp) {
        let events = mem::take(&mut self.events);

        self.steps.push(StepRecord {
            tick: self.clock.value(),
            until,
            running: self.executed,
            explanation: explain(&events),
            events,
            ready_queues: self.queues.snapshot(),
            wait_queue: self.pcbs.collect_waiting(),
            new_processes: self.pcbs.collect_new(),
            graphic_table: self.pcbs.collect_rows(),
        });
    }

    fn into_result(self) -> SimulationResult {
        let processes = self.pcbs.collect_reports();
        let summary = Summary::from_reports(&processes);

        SimulationResult {
            algorithm: self.policy.name().to_string(),
            steps: self.steps,
            timeline: self.timeline,
            processes,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::IoRequest;
    use crate::schedulers::{FirstComeFirstServed, MultiLevelFeedbackQueue, RoundRobin};
    use std::num::NonZeroU64;

    fn process(arrival: u64, burst: u64, io: &[(u64, u64)]) -> Process {
        Process {
            input_index: 0,
            arrival_time: Timestamp::new(arrival),
            burst_time: burst,
            io: io
                .iter()
                .map(|&(start, duration)| IoRequest { start, duration })
                .collect(),
        }
    }

    #[test]
    fn single_step_admits_dispatches_and_executes() {
        let mut engine = SimulationEngine::new(
            &[process(0, 3, &[])],
            Box::new(FirstComeFirstServed::new()),
        );

        let step = engine.step().clone();
        assert_eq!(step.tick, Timestamp::new(0));
        assert_eq!(step.running, Some(Pid::new(1)));
        assert_eq!(engine.now(), Timestamp::new(1));
        assert_eq!(engine.control_blocks().get(Pid::new(1)).remaining_burst(), 2);
        assert!(engine.ready_queues().is_empty());
    }

    #[test]
    fn idle_ticks_before_first_arrival() {
        let mut engine = SimulationEngine::new(
            &[process(2, 1, &[])],
            Box::new(FirstComeFirstServed::new()),
        );

        let step = engine.step().clone();
        assert_eq!(step.running, None);
        assert_eq!(step.events, vec![Event::IdleUntil { until: Timestamp::new(2) }]);
        assert_eq!(step.until, Timestamp::new(2));
        assert_eq!(step.new_processes, vec![Pid::new(1)]);
        assert_eq!(engine.now(), Timestamp::new(2));

        let step = engine.step().clone();
        assert_eq!(step.tick, Timestamp::new(2));
        assert_eq!(step.running, Some(Pid::new(1)));
    }

    #[test]
    fn single_idle_tick_is_simulated_normally() {
        let mut engine = SimulationEngine::new(
            &[process(1, 1, &[])],
            Box::new(FirstComeFirstServed::new()),
        );

        let step = engine.step().clone();
        assert_eq!(step.events, vec![Event::Idle]);
        assert_eq!(step.until, Timestamp::new(1));
        assert_eq!(engine.now(), Timestamp::new(1));
    }

    #[test]
    fn long_io_is_skipped_in_one_step() {
        let engine = SimulationEngine::new(
            &[process(0, 2, &[(1, 1_000_000_000)])],
            Box::new(FirstComeFirstServed::new()),
        );

        let result = engine.run();
        assert_eq!(result.steps.len(), 3);
        assert_eq!(result.steps[1].tick, Timestamp::new(1));
        assert_eq!(result.steps[1].until, Timestamp::new(1_000_000_001));
        assert_eq!(result.steps[1].wait_queue, vec![Pid::new(1)]);
        assert_eq!(
            result.report(Pid::new(1)).map(|report| report.end_time),
            Some(Timestamp::new(1_000_000_002))
        );
    }

    #[test]
    fn idle_skip_stops_at_every_boost() {
        let quantums = vec![NonZeroU64::new(2).unwrap(), NonZeroU64::new(4).unwrap()];
        let policy = MultiLevelFeedbackQueue::new(quantums, NonZeroU64::new(10).unwrap()).unwrap();
        let engine = SimulationEngine::new(&[process(25, 1, &[])], Box::new(policy));

        let result = engine.run();
        let ticks: Vec<_> = result.steps.iter().map(|step| step.tick.get()).collect();
        assert_eq!(ticks, vec![0, 10, 11, 20, 21, 25]);

        let boosts: Vec<_> = result
            .steps
            .iter()
            .filter(|step| step.events.contains(&Event::PriorityBoost { moved: 0 }))
            .map(|step| step.tick.get())
            .collect();
        assert_eq!(boosts, vec![10, 20]);
    }

    #[test]
    #[should_panic(expected = "dispatching while a process holds the CPU")]
    fn dispatch_refuses_a_second_running_process() {
        let mut engine = SimulationEngine::new(
            &[process(0, 3, &[]), process(0, 3, &[])],
            Box::new(FirstComeFirstServed::new()),
        );

        engine.step();
        // P1 is still RUNNING; losing track of it must not hand the CPU to P2
        engine.running = None;
        engine.dispatch();
    }

    #[test]
    fn quantum_expiry_requeues_at_the_tail() {
        let quantum = NonZeroU64::new(1).unwrap();
        let mut engine = SimulationEngine::new(
            &[process(0, 2, &[]), process(0, 2, &[])],
            Box::new(RoundRobin::new(quantum)),
        );

        engine.step();
        assert_eq!(engine.ready_queues().snapshot(), vec![vec![Pid::new(2), Pid::new(1)]]);
    }

    #[test]
    fn blocked_process_frees_the_cpu() {
        let mut engine = SimulationEngine::new(
            &[process(0, 2, &[(1, 3)]), process(0, 1, &[])],
            Box::new(FirstComeFirstServed::new()),
        );

        let step = engine.step().clone();
        assert_eq!(step.wait_queue, vec![Pid::new(1)]);
        assert_eq!(
            engine.control_blocks().get(Pid::new(1)).wake_tick(),
            Some(Timestamp::new(4))
        );

        let step = engine.step().clone();
        assert_eq!(step.running, Some(Pid::new(2)));
    }
}
