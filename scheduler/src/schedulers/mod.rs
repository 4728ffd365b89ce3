//! One `DispatchPolicy` per scheduling algorithm.

mod fcfs;
pub use fcfs::FirstComeFirstServed;

mod sjf;
pub use sjf::ShortestJobFirst;

mod round_robin;
pub use round_robin::RoundRobin;

mod stcf;
pub use stcf::ShortestTimeToCompletion;

mod mlfq;
pub use mlfq::MultiLevelFeedbackQueue;
