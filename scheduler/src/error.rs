use thiserror::Error;

/// A policy that cannot be built from the parameters it was given
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{algorithm} requires a quantum")]
    MissingQuantum { algorithm: &'static str },

    #[error("{algorithm} quantum must be positive, got {value}")]
    NonPositiveQuantum { algorithm: &'static str, value: i64 },

    #[error("MLFQ needs at least one queue, got {0}")]
    NoQueues(i64),

    #[error("MLFQ is configured with {queues} queues but {quantums} quantums")]
    QuantumCountMismatch { queues: i64, quantums: usize },

    #[error("MLFQ quantum for queue {queue} must be positive, got {value}")]
    NonPositiveQueueQuantum { queue: usize, value: i64 },

    #[error("MLFQ requires a priority boost allotment")]
    MissingAllotment,

    #[error("MLFQ allotment must be positive, got {0}")]
    NonPositiveAllotment(i64),
}

/// A workload the engine refuses to simulate
///
/// `process` is the position in the caller's list and `entry` the position
/// in that process's I/O list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("no processes to schedule")]
    EmptyProcessList,

    #[error("process {process}: arrival time must not be negative, got {value}")]
    NegativeArrival { process: usize, value: i64 },

    #[error("process {process}: burst time must be positive, got {value}")]
    NonPositiveBurst { process: usize, value: i64 },

    #[error("process {process}, I/O {entry}: start must not be negative, got {value}")]
    NegativeIoStart {
        process: usize,
        entry: usize,
        value: i64,
    },

    #[error("process {process}, I/O {entry}: duration must be positive, got {value}")]
    NonPositiveIoDuration {
        process: usize,
        entry: usize,
        value: i64,
    },

    #[error("process {process}, I/O {entry}: start {start} is not below burst time {burst}")]
    IoStartBeyondBurst {
        process: usize,
        entry: usize,
        start: i64,
        burst: i64,
    },

    #[error("process {process}, I/O {entry}: start {start} does not follow previous start {previous}")]
    UnorderedIo {
        process: usize,
        entry: usize,
        start: i64,
        previous: i64,
    },
}

/// Everything that can stop a simulation before its first tick
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("invalid scheduler configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid input: {0}")]
    Input(#[from] InputError),
}
