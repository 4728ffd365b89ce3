//! Caller-facing process descriptions and their validation.

use serde::{Deserialize, Serialize};

use crate::config::AlgorithmConfig;
use crate::error::InputError;
use crate::Timestamp;

/// One I/O interruption as supplied by the caller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoSpec {
    /// CPU ticks consumed before the process blocks
    pub start: i64,
    /// Ticks spent blocked
    pub duration: i64,
}

/// A process as supplied by the caller, before validation
///
/// Fields are signed so that bad values can be reported precisely instead
/// of failing to deserialize.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSpec {
    pub arrival_time: i64,
    pub burst_time: i64,
    #[serde(default)]
    pub io: Vec<IoSpec>,
}

impl ProcessSpec {
    pub fn new(arrival_time: i64, burst_time: i64) -> ProcessSpec {
        ProcessSpec {
            arrival_time,
            burst_time,
            io: Vec::new(),
        }
    }

    pub fn with_io(mut self, start: i64, duration: i64) -> ProcessSpec {
        self.io.push(IoSpec { start, duration });
        self
    }
}

/// A full simulation request: the workload plus the policy to run it under
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub processes: Vec<ProcessSpec>,
    #[serde(flatten)]
    pub algorithm: AlgorithmConfig,
}

/// A validated I/O interruption
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct IoRequest {
    pub start: u64,
    pub duration: u64,
}

/// A validated process, ready to be turned into a control block
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Process {
    /// Position of the process in the caller's list
    pub input_index: usize,
    pub arrival_time: Timestamp,
    pub burst_time: u64,
    pub io: Vec<IoRequest>,
}

/// Checks every process and converts the list into its validated form
///
/// The returned list keeps the caller's order; pid assignment happens later.
pub fn validate_processes(specs: &[ProcessSpec]) -> Result<Vec<Process>, InputError> {
    if specs.is_empty() {
        return Err(InputError::EmptyProcessList);
    }

    specs
        .iter()
        .enumerate()
        .map(|(index, spec)| validate_process(index, spec))
        .collect()
}

fn validate_process(index: usize, spec: &ProcessSpec) -> Result<Process, InputError> {
    if spec.arrival_time < 0 {
        return Err(InputError::NegativeArrival {
            process: index,
            value: spec.arrival_time,
        });
    }

    if spec.burst_time <= 0 {
        return Err(InputError::NonPositiveBurst {
            process: index,
            value: spec.burst_time,
        });
    }

    let mut io = Vec::with_capacity(spec.io.len());
    let mut previous_start: Option<i64> = None;

    for (entry, request) in spec.io.iter().enumerate() {
        if request.start < 0 {
            return Err(InputError::NegativeIoStart {
                process: index,
                entry,
                value: request.start,
            });
        }

        if request.duration <= 0 {
            return Err(InputError::NonPositiveIoDuration {
                process: index,
                entry,
                value: request.duration,
            });
        }

        if request.start >= spec.burst_time {
            return Err(InputError::IoStartBeyondBurst {
                process: index,
                entry,
                start: request.start,
                burst: spec.burst_time,
            });
        }

        if let Some(previous) = previous_start {
            if request.start <= previous {
                return Err(InputError::UnorderedIo {
                    process: index,
                    entry,
                    start: request.start,
                    previous,
                });
            }
        }
        previous_start = Some(request.start);

        io.push(IoRequest {
            start: request.start as u64,
            duration: request.duration as u64,
        });
    }

    Ok(Process {
        input_index: index,
        arrival_time: Timestamp::new(spec.arrival_time as u64),
        burst_time: spec.burst_time as u64,
        io,
    })
}
