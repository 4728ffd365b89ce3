use std::collections::VecDeque;

use crate::Pid;

/// Shape of the ready queues a policy asks for
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueLayout {
    /// One entry per queue; `None` when the queue has no quantum
    pub quantums: Vec<Option<u64>>,
    /// Ticks between priority boosts
    pub allotment: Option<u64>,
}

impl QueueLayout {
    /// A single FIFO queue without time slicing
    pub fn single() -> QueueLayout {
        QueueLayout {
            quantums: vec![None],
            allotment: None,
        }
    }

    /// A single FIFO queue whose processes yield after `quantum` ticks
    pub fn sliced(quantum: u64) -> QueueLayout {
        QueueLayout {
            quantums: vec![Some(quantum)],
            allotment: None,
        }
    }

    /// One queue per quantum, boosted every `allotment` ticks
    pub fn multilevel(quantums: &[u64], allotment: u64) -> QueueLayout {
        QueueLayout {
            quantums: quantums.iter().copied().map(Some).collect(),
            allotment: Some(allotment),
        }
    }
}

/// Priority-ordered ready queues; index 0 is the highest priority
///
/// A pid sits in at most one queue at a time.
#[derive(Clone, Debug)]
pub struct ReadyQueueSet {
    queues: Vec<VecDeque<Pid>>,
    quantums: Vec<Option<u64>>,
    allotment: Option<u64>,
}

impl ReadyQueueSet {
    pub fn new(layout: QueueLayout) -> ReadyQueueSet {
        assert!(!layout.quantums.is_empty(), "a queue layout needs at least one queue");

        ReadyQueueSet {
            queues: vec![VecDeque::new(); layout.quantums.len()],
            quantums: layout.quantums,
            allotment: layout.allotment.filter(|allotment| *allotment > 0),
        }
    }

    /// Number of queues
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    /// Index of the lowest priority queue
    pub fn lowest(&self) -> usize {
        self.queues.len() - 1
    }

    pub fn quantum(&self, queue: usize) -> Option<u64> {
        self.check_index(queue);
        self.quantums[queue]
    }

    pub fn allotment(&self) -> Option<u64> {
        self.allotment
    }

    /// Appends `pid` to the tail of queue `queue`
    pub fn enqueue(&mut self, queue: usize, pid: Pid) {
        self.check_index(queue);
        debug_assert!(!self.contains(pid), "{pid} is already queued");

        self.queues[queue].push_back(pid);
    }

    /// Removes `pid` from whichever queue holds it
    ///
    /// Returns the queue it was found in, or `None` when it was not queued.
    pub fn dequeue_by_pid(&mut self, pid: Pid) -> Option<usize> {
        for (index, queue) in self.queues.iter_mut().enumerate() {
            if let Some(position) = queue.iter().position(|queued| *queued == pid) {
                queue.remove(position);
                return Some(index);
            }
        }

        None
    }

    pub fn queue(&self, queue: usize) -> &VecDeque<Pid> {
        self.check_index(queue);
        &self.queues[queue]
    }

    /// Queues from highest to lowest priority
    pub fn iter(&self) -> impl Iterator<Item = &VecDeque<Pid>> {
        self.queues.iter()
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.queues.iter().any(|queue| queue.contains(&pid))
    }

    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(|queue| queue.is_empty())
    }

    /// Moves every queued pid into queue 0
    ///
    /// Queue 0 keeps its contents and the lower queues follow in priority
    /// order, each keeping its FIFO order. Returns how many pids moved up.
    pub fn merge_into_top(&mut self) -> usize {
        let (top, lower) = self.queues.split_at_mut(1);
        let mut moved = 0;

        for queue in lower.iter_mut() {
            moved += queue.len();
            top[0].extend(queue.drain(..));
        }

        moved
    }

    /// Contents of every queue, highest priority first
    pub fn snapshot(&self) -> Vec<Vec<Pid>> {
        self.queues
            .iter()
            .map(|queue| queue.iter().copied().collect())
            .collect()
    }

    fn check_index(&self, queue: usize) {
        assert!(
            queue < self.queues.len(),
            "queue index {} out of range, {} queues configured",
            queue,
            self.queues.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pids(values: &[usize]) -> Vec<Pid> {
        values.iter().copied().map(Pid::new).collect()
    }

    #[test]
    fn keeps_fifo_order_per_queue() {
        let mut queues = ReadyQueueSet::new(QueueLayout::multilevel(&[2, 4], 10));
        queues.enqueue(1, Pid::new(3));
        queues.enqueue(0, Pid::new(1));
        queues.enqueue(0, Pid::new(2));

        assert_eq!(queues.snapshot(), vec![pids(&[1, 2]), pids(&[3])]);
        assert_eq!(queues.quantum(1), Some(4));
        assert_eq!(queues.allotment(), Some(10));
    }

    #[test]
    fn dequeue_by_pid_is_a_no_op_when_absent() {
        let mut queues = ReadyQueueSet::new(QueueLayout::single());
        queues.enqueue(0, Pid::new(1));
        queues.enqueue(0, Pid::new(2));

        assert_eq!(queues.dequeue_by_pid(Pid::new(1)), Some(0));
        assert_eq!(queues.dequeue_by_pid(Pid::new(1)), None);
        assert_eq!(queues.snapshot(), vec![pids(&[2])]);
    }

    #[test]
    fn merge_keeps_priority_then_fifo_order() {
        let mut queues = ReadyQueueSet::new(QueueLayout::multilevel(&[1, 2, 4], 5));
        queues.enqueue(2, Pid::new(5));
        queues.enqueue(1, Pid::new(3));
        queues.enqueue(0, Pid::new(1));
        queues.enqueue(1, Pid::new(4));

        assert_eq!(queues.merge_into_top(), 3);
        assert_eq!(
            queues.snapshot(),
            vec![pids(&[1, 3, 4, 5]), Vec::new(), Vec::new()]
        );
    }

    #[test]
    fn zero_allotment_disables_boosting() {
        let queues = ReadyQueueSet::new(QueueLayout::multilevel(&[1], 0));
        assert_eq!(queues.allotment(), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn enqueue_outside_layout_is_a_bug() {
        let mut queues = ReadyQueueSet::new(QueueLayout::sliced(2));
        queues.enqueue(1, Pid::new(1));
    }
}
