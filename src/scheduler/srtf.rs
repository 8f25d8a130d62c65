use super::{
    process::{accrue_waiting, admit_arrivals, Process, Time},
    Scheduler,
};
use log::{debug, trace};

/// Preemptive shortest remaining time first.
///
/// The selected process runs one unit at a time and keeps the CPU until it
/// finishes or some ready process has a strictly smaller remaining burst.
/// Each such uninterrupted run becomes one ledger interval.
pub struct SrtfScheduler {
    processes: Vec<Process>,
    current_process: Option<usize>,
    clock: Time,
}

impl SrtfScheduler {
    pub fn with_processes(processes: Vec<Process>) -> Self {
        Self {
            processes,
            current_process: None,
            clock: 0,
        }
    }

    fn is_preempted(&self, running: usize, remaining: Time) -> bool {
        self.processes
            .iter()
            .enumerate()
            .any(|(index, process)| {
                index != running && process.is_ready() && process.remaining_time() < remaining
            })
    }
}

impl Scheduler for SrtfScheduler {
    const NAME: &'static str = "Shortest Remaining Time First";

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

        // Ties go to the earliest arrival, then to the lowest index
        self.processes
            .iter()
            .enumerate()
            .filter(|(_, process)| process.is_ready())
            .min_by_key(|&(index, process)| {
                (process.remaining_time(), process.arrival_time(), index)
            })
            .map(|(index, _)| index)
    }

    fn dispatch(&mut self, index: usize) {
        let start = self.clock;
        let mut remaining = self.processes[index].remaining_time();
        self.processes[index].set_running();

        loop {
            remaining -= 1;
            self.clock += 1;
            admit_arrivals(&mut self.processes, self.clock);
            if remaining == 0 || self.is_preempted(index, remaining) {
                break;
            }
        }

        accrue_waiting(&mut self.processes, index, start, self.clock);
        let process = &mut self.processes[index];
        process.record(start, self.clock);
        self.current_process = Some(index);

        if process.is_done() {
            debug!(
                "P[{}] runs [{}, {}) and completes, waited {}",
                process.pid(),
                start,
                self.clock,
                process.waiting_time()
            );
        } else {
            debug!(
                "P[{}] runs [{}, {}) and is preempted with {} left",
                process.pid(),
                start,
                self.clock,
                remaining
            );
        }
    }

    fn idle(&mut self) {
        trace!("{}: CPU idle at {}", Self::NAME, self.clock);
        self.current_process = None;
        self.clock += 1;
    }
}
