use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Identifier of a simulated process
///
/// Pids are dense: the engine hands out `1..=N` after ordering the input
/// processes by arrival time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pid(usize);

impl Pid {
    /// Creates a new Pid
    ///
    /// * `pid` - the numeric value of the pid
    pub fn new(pid: usize) -> Pid {
        Pid(pid)
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Add<usize> for Pid {
    type Output = Pid;

    fn add(self, rhs: usize) -> Self::Output {
        Pid::new(self.0 + rhs)
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// A point on the simulated time line, counted in ticks
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a new Timestamp object
    ///
    /// * `time` - inital value of the Timestamp
    pub fn new(time: u64) -> Timestamp {
        Timestamp(time)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Number of ticks elapsed since `earlier`
    ///
    /// Panics if `earlier` lies in the future, which would mean a process
    /// was accounted for before it arrived.
    pub fn since(&self, earlier: Timestamp) -> u64 {
        match self.0.checked_sub(earlier.0) {
            Some(elapsed) => elapsed,
            None => panic!("timestamp {} is before {}", self.0, earlier.0),
        }
    }
}

impl Add<u64> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: u64) -> Self::Output {
        Timestamp::new(self.0 + rhs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Something that happened to a process during one tick
///
/// The engine records these in phase order and renders them into the
/// human-readable explanation of each step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Event {
    Arrived { pid: Pid, queue: usize },
    Preempted { pid: Pid, by: Pid },
    IoCompleted { pid: Pid, queue: usize },
    PriorityBoost { moved: usize },
    Dispatched { pid: Pid, queue: usize },
    Executed { pid: Pid, remaining: u64 },
    Blocked { pid: Pid, duration: u64, wake: Timestamp },
    QuantumExpired { pid: Pid, queue: usize },
    Finished { pid: Pid, at: Timestamp },
    Idle,
    /// Nothing can happen before `until`, so the ticks up to it were skipped
    IdleUntil { until: Timestamp },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Arrived { pid, queue } => write!(f, "{pid} arrived and joined queue {queue}"),
            Event::Preempted { pid, by } => write!(f, "{by} preempted {pid}"),
            Event::IoCompleted { pid, queue } => {
                write!(f, "{pid} finished I/O and joined queue {queue}")
            }
            Event::PriorityBoost { moved } => {
                write!(f, "priority boost moved {moved} process(es) up to queue 0")
            }
            Event::Dispatched { pid, queue } => write!(f, "{pid} dispatched from queue {queue}"),
            Event::Executed { pid, remaining } => {
                write!(f, "{pid} ran, {remaining} tick(s) left")
            }
            Event::Blocked { pid, duration, wake } => write!(
                f,
                "{pid} blocked on I/O for {duration} tick(s) until tick {wake}"
            ),
            Event::QuantumExpired { pid, queue } => {
                write!(f, "{pid} used up its quantum and moved to queue {queue}")
            }
            Event::Finished { pid, at } => write!(f, "{pid} completed at tick {at}"),
            Event::Idle => write!(f, "CPU idle"),
            Event::IdleUntil { until } => write!(f, "CPU idle until tick {until}"),
        }
    }
}

/// Joins the events of one tick into a single sentence list
pub fn explain(events: &[Event]) -> String {
    if events.is_empty() {
        return Event::Idle.to_string();
    }

    events
        .iter()
        .map(|event| event.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_counts_elapsed_ticks() {
        assert_eq!(Timestamp::new(7).since(Timestamp::new(3)), 4);
        assert_eq!(Timestamp::new(3).since(Timestamp::new(3)), 0);
    }

    #[test]
    #[should_panic(expected = "is before")]
    fn since_rejects_future_origin() {
        Timestamp::new(1).since(Timestamp::new(2));
    }

    #[test]
    fn explanation_joins_events_in_order() {
        let events = [
            Event::Arrived { pid: Pid::new(1), queue: 0 },
            Event::Dispatched { pid: Pid::new(1), queue: 0 },
            Event::Executed { pid: Pid::new(1), remaining: 1 },
        ];

        assert_eq!(
            explain(&events),
            "P1 arrived and joined queue 0; P1 dispatched from queue 0; P1 ran, 1 tick(s) left"
        );
        assert_eq!(explain(&[]), "CPU idle");
        assert_eq!(
            explain(&[Event::IdleUntil { until: Timestamp::new(40) }]),
            "CPU idle until tick 40"
        );
    }

    #[test]
    fn events_serialize_with_kind_tag() {
        let json = serde_json::to_value(Event::Blocked {
            pid: Pid::new(2),
            duration: 3,
            wake: Timestamp::new(9),
        })
        .unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "kind": "blocked", "pid": 2, "duration": 3, "wake": 9 })
        );
    }
}
