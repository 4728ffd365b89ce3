//! A CPU scheduling simulator.
//!
//! This library computes, tick by tick, how a set of processes is scheduled
//! on a single CPU under one of five classic policies: first come first
//! served, shortest job first, round robin, shortest time to completion
//! first and a multi-level feedback queue.
//!
//! ```
//! use scheduler::{simulate, AlgorithmConfig, ProcessSpec};
//!
//! let processes = vec![ProcessSpec::new(0, 2), ProcessSpec::new(0, 4)];
//! let result = simulate(&processes, &AlgorithmConfig::Fcfs).unwrap();
//!
//! assert_eq!(result.summary.total_time, 6);
//! ```

use std::num::NonZeroU64;

mod common_types;
pub use crate::common_types::{Event, Pid, Timestamp};

mod clock;
pub use crate::clock::Clock;

mod process_control_block;
pub use crate::process_control_block::{ProcessControlBlock, ProcessState};

mod control_block_table;
pub use crate::control_block_table::ControlBlockTable;

mod ready_queue;
pub use crate::ready_queue::{QueueLayout, ReadyQueueSet};

mod dispatch_policy;
pub use crate::dispatch_policy::DispatchPolicy;

mod common_funcs;

mod schedulers;
pub use crate::schedulers::{
    FirstComeFirstServed, MultiLevelFeedbackQueue, RoundRobin, ShortestJobFirst,
    ShortestTimeToCompletion,
};

mod collector;
pub use crate::collector::Collector;

mod engine;
pub use crate::engine::SimulationEngine;

pub mod config;
pub use crate::config::AlgorithmConfig;

pub mod error;
pub use crate::error::{ConfigError, InputError, SimulationError};

pub mod input;
pub use crate::input::{IoSpec, ProcessSpec, SimulationRequest};

pub mod trace;
pub use crate::trace::{
    ExecutionSpan, GraphicRow, ProcessReport, SimulationResult, StepRecord, Summary,
};

/// Returns a first come first served policy
pub fn fcfs() -> impl DispatchPolicy {
    FirstComeFirstServed::new()
}

/// Returns a non-preemptive shortest job first policy
pub fn sjf() -> impl DispatchPolicy {
    ShortestJobFirst::new()
}

/// Returns a round robin policy
///
/// * `quantum` - the ticks a process can run before it goes back to the tail
///               of the ready queue
///
/// ```
/// use std::num::NonZeroU64;
/// use scheduler::{round_robin, DispatchPolicy, QueueLayout};
///
/// let policy = round_robin(NonZeroU64::new(3).unwrap());
/// assert_eq!(policy.name(), "RR");
/// assert_eq!(policy.initialize_queues(), QueueLayout::sliced(3));
/// ```
pub fn round_robin(quantum: NonZeroU64) -> impl DispatchPolicy {
    RoundRobin::new(quantum)
}

/// Returns a preemptive shortest time to completion first policy
pub fn stcf() -> impl DispatchPolicy {
    ShortestTimeToCompletion::new()
}

/// Returns a multi-level feedback queue policy
///
/// * `quantums` - quantum of every queue, highest priority first; the number
///                of entries is the number of queues
/// * `allotment` - ticks between two boosts that move every ready process
///                 back to the highest priority queue
///
/// ```
/// use std::num::NonZeroU64;
/// use scheduler::{mlfq, ConfigError, DispatchPolicy, QueueLayout};
///
/// let quantums = [2, 4].map(|quantum| NonZeroU64::new(quantum).unwrap());
/// let allotment = NonZeroU64::new(10).unwrap();
///
/// let policy = mlfq(quantums.to_vec(), allotment).unwrap();
/// assert_eq!(policy.initialize_queues(), QueueLayout::multilevel(&[2, 4], 10));
/// assert!(matches!(mlfq(Vec::new(), allotment), Err(ConfigError::NoQueues(0))));
/// ```
pub fn mlfq(
    quantums: Vec<NonZeroU64>,
    allotment: NonZeroU64,
) -> Result<impl DispatchPolicy, ConfigError> {
    MultiLevelFeedbackQueue::new(quantums, allotment)
}

/// Validates a workload and runs it to completion under `algorithm`
///
/// Configuration is checked before the processes, and nothing is simulated
/// unless both are valid.
pub fn simulate(
    processes: &[ProcessSpec],
    algorithm: &AlgorithmConfig,
) -> Result<SimulationResult, SimulationError> {
    let policy = algorithm.build()?;
    let processes = input::validate_processes(processes)?;

    Ok(SimulationEngine::new(&processes, policy).run())
}

/// Runs a full [`SimulationRequest`]
pub fn run(request: &SimulationRequest) -> Result<SimulationResult, SimulationError> {
    simulate(&request.processes, &request.algorithm)
}
