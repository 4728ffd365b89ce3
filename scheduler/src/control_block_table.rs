use crate::input::Process;
use crate::{Pid, ProcessControlBlock};

/// One control block per process, addressed by pid
///
/// Pids are assigned `1..=N` in arrival order, ties keeping the caller's
/// order, so the block for pid `n` lives at index `n - 1`.
#[derive(Clone, Debug)]
pub struct ControlBlockTable {
    blocks: Vec<ProcessControlBlock>,
}

impl ControlBlockTable {
    pub fn new(processes: &[Process]) -> ControlBlockTable {
        let mut ordered: Vec<&Process> = processes.iter().collect();
        // stable, so equal arrivals keep input order
        ordered.sort_by_key(|process| process.arrival_time);

        let first = Pid::new(1);
        let blocks = ordered
            .into_iter()
            .enumerate()
            .map(|(offset, process)| ProcessControlBlock::new(first + offset, process))
            .collect();

        ControlBlockTable { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Panics if `pid` was never assigned
    pub fn get(&self, pid: Pid) -> &ProcessControlBlock {
        match self.index_of(pid).and_then(|index| self.blocks.get(index)) {
            Some(pcb) => pcb,
            None => panic!("unknown pid {pid}"),
        }
    }

    /// Panics if `pid` was never assigned
    pub fn get_mut(&mut self, pid: Pid) -> &mut ProcessControlBlock {
        match self.index_of(pid) {
            Some(index) if index < self.blocks.len() => &mut self.blocks[index],
            _ => panic!("unknown pid {pid}"),
        }
    }

    /// Control blocks in pid order
    pub fn iter(&self) -> impl Iterator<Item = &ProcessControlBlock> {
        self.blocks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ProcessControlBlock> {
        self.blocks.iter_mut()
    }

    pub fn all_done(&self) -> bool {
        self.blocks.iter().all(|pcb| pcb.is_done())
    }

    /// Pids matching `filter`, ascending
    pub fn pids_where<F>(&self, filter: F) -> Vec<Pid>
    where
        F: Fn(&ProcessControlBlock) -> bool,
    {
        self.blocks
            .iter()
            .filter(|pcb| filter(pcb))
            .map(|pcb| pcb.pid())
            .collect()
    }

    fn index_of(&self, pid: Pid) -> Option<usize> {
        pid.get().checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Timestamp;

    fn process(input_index: usize, arrival: u64) -> Process {
        Process {
            input_index,
            arrival_time: Timestamp::new(arrival),
            burst_time: 1,
            io: Vec::new(),
        }
    }

    #[test]
    fn assigns_pids_by_arrival_then_input_order() {
        let table = ControlBlockTable::new(&[process(0, 5), process(1, 0), process(2, 5), process(3, 0)]);

        let order: Vec<usize> = table.iter().map(|pcb| pcb.input_index()).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
        assert_eq!(table.get(Pid::new(3)).input_index(), 0);
        assert_eq!(table.get(Pid::new(3)).arrival_time(), Timestamp::new(5));
    }

    #[test]
    #[should_panic(expected = "unknown pid")]
    fn unknown_pid_is_a_bug() {
        let table = ControlBlockTable::new(&[process(0, 0)]);
        table.get(Pid::new(2));
    }

    #[test]
    #[should_panic(expected = "unknown pid")]
    fn pid_zero_is_never_assigned() {
        let mut table = ControlBlockTable::new(&[process(0, 0)]);
        table.get_mut(Pid::new(0));
    }
}
