use super::{
    process::{admit_arrivals, Process, Time},
    run_whole_burst, Scheduler,
};
use log::trace;

/// Runs ready processes to completion in order of arrival.
pub struct FcfsScheduler {
    processes: Vec<Process>,
    current_process: Option<usize>,
    clock: Time,
}

impl FcfsScheduler {
    pub fn with_processes(processes: Vec<Process>) -> Self {
        Self {
            processes,
            current_process: None,
            clock: 0,
        }
    }
}

impl Scheduler for FcfsScheduler {
    const NAME: &'static str = "First Come First Served";

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

        // Earliest arrival wins, the first one in input order on ties
        self.processes
            .iter()
            .enumerate()
            .filter(|(_, process)| process.is_ready())
            .min_by_key(|&(index, process)| (process.arrival_time(), index))
            .map(|(index, _)| index)
    }

    fn dispatch(&mut self, index: usize) {
        self.clock = run_whole_burst(&mut self.processes[index], self.clock);
        self.current_process = Some(index);
    }

    fn idle(&mut self) {
        trace!("{}: CPU idle at {}", Self::NAME, self.clock);
        self.current_process = None;
        self.clock += 1;
    }
}
