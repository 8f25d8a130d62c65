use super::{
    process::{accrue_waiting, admit_arrivals, Process, Time},
    Scheduler,
};
use log::{debug, trace};
use std::num::NonZeroU64;

/// Visits processes in input order, wrapping around, and gives each ready
/// one a slice of at most `quantum` units per visit.
pub struct RoundRobinScheduler {
    processes: Vec<Process>,
    current_process: Option<usize>,
    cursor: usize,
    quantum: NonZeroU64,
    clock: Time,
}

impl RoundRobinScheduler {
    pub fn with_processes(processes: Vec<Process>, quantum: NonZeroU64) -> Self {
        Self {
            processes,
            current_process: None,
            cursor: 0,
            quantum,
            clock: 0,
        }
    }

    fn poll_process(&mut self) {
        self.cursor += 1;
        if self.cursor >= self.processes.len() {
            self.cursor = 0;
        }
    }
}

impl Scheduler for RoundRobinScheduler {
    const NAME: &'static str = "Round Robin";

    fn processes(&self) -> &[Process] {
        &self.processes
    }

    fn into_processes(self) -> Vec<Process> {
        self.processes
    }

    fn clock(&self) -> Time {
        self.clock
    }

    fn current_process(&self) -> Option<&Process> {
        self.current_process
            .and_then(|index| self.processes.get(index))
    }

    fn schedule(&mut self) -> Option<usize> {
        admit_arrivals(&mut self.processes, self.clock);

        // One full sweep at most; the cursor ends up past the picked process
        for _ in 0..self.processes.len() {
            let index = self.cursor;
            self.poll_process();
            if self.processes[index].is_ready() {
                return Some(index);
            }
        }
        None
    }

    fn dispatch(&mut self, index: usize) {
        let start = self.clock;
        let slice = self.processes[index]
            .remaining_time()
            .min(self.quantum.get());
        let end = start + slice;

        self.processes[index].set_running();
        accrue_waiting(&mut self.processes, index, start, end);
        self.clock = end;

        let process = &mut self.processes[index];
        process.record(start, end);
        self.current_process = Some(index);
        debug!(
            "P[{}] runs [{}, {}), {} left",
            process.pid(),
            start,
            end,
            process.remaining_time()
        );
    }

    fn idle(&mut self) {
        trace!("{}: CPU idle at {}", Self::NAME, self.clock);
        // An unproductive sweep restarts from the first process
        self.cursor = 0;
        self.current_process = None;
        self.clock += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{run_to_completion, ExecInterval};

    fn scheduler(processes: &[(i64, Time, Time)], quantum: u64) -> RoundRobinScheduler {
        RoundRobinScheduler::with_processes(
            processes
                .iter()
                .map(|&(pid, arrival, burst)| Process::new(pid, arrival, burst))
                .collect(),
            NonZeroU64::new(quantum).unwrap(),
        )
    }

    fn interval(start: Time, end: Time) -> ExecInterval {
        ExecInterval { start, end }
    }

    #[test]
    fn test_cyclic_dispatch_with_truncated_slices() {
        let report = run_to_completion(scheduler(&[(1, 0, 5), (2, 1, 3), (3, 2, 1)], 2));

        assert_eq!(
            report.entries[0].intervals,
            vec![interval(0, 2), interval(5, 7), interval(8, 9)]
        );
        assert_eq!(report.entries[1].intervals, vec![interval(2, 4), interval(7, 8)]);
        assert_eq!(report.entries[2].intervals, vec![interval(4, 5)]);
        assert_eq!(report.completion_order, vec![3, 2, 1]);

        let waits: Vec<Time> = report.entries.iter().map(|entry| entry.waiting_time).collect();
        assert_eq!(waits, vec![4, 4, 2]);
        assert_eq!(format!("{:.2}", report.average_waiting_time), "3.33");
    }

    #[test]
    fn test_mid_slice_arrival_waits_only_after_arriving() {
        let mut rr = scheduler(&[(1, 0, 6), (2, 3, 2)], 4);

        assert_eq!(rr.schedule(), Some(0));
        rr.dispatch(0);
        assert_eq!(rr.clock(), 4);
        assert_eq!(rr.processes()[1].waiting_time(), 1);
    }

    #[test]
    fn test_skips_unarrived_and_finished_processes() {
        let mut rr = scheduler(&[(1, 0, 1), (2, 9, 1), (3, 0, 3)], 2);

        assert_eq!(rr.schedule(), Some(0));
        rr.dispatch(0);
        assert_eq!(rr.schedule(), Some(2));
        rr.dispatch(2);
        assert_eq!(rr.clock(), 3);
        assert_eq!(rr.schedule(), Some(2));
        rr.dispatch(2);
        assert_eq!(rr.schedule(), None);
    }

    #[test]
    fn test_idle_sweep_restarts_from_first_process() {
        let mut rr = scheduler(&[(1, 3, 2), (2, 0, 1), (3, 3, 2)], 2);

        assert_eq!(rr.schedule(), Some(1));
        rr.dispatch(1);
        assert_eq!(rr.schedule(), None);
        rr.idle();
        rr.idle();
        assert_eq!(rr.clock(), 3);
        assert_eq!(rr.schedule(), Some(0));
    }

    #[test]
    fn test_single_process_keeps_getting_slices() {
        let report = run_to_completion(scheduler(&[(4, 1, 5)], 2));

        assert_eq!(
            report.entries[0].intervals,
            vec![interval(1, 3), interval(3, 5), interval(5, 6)]
        );
        assert_eq!(report.entries[0].waiting_time, 0);
    }
}
