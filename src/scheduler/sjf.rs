use super::{
    process::{admit_arrivals, Process, Time},
    run_whole_burst, Scheduler,
};
use log::trace;

/// Non-preemptive shortest job first. Once picked, a process keeps the CPU
/// until its burst is over, even if a shorter job shows up meanwhile.
pub struct SjfScheduler {
    processes: Vec<Process>,
    current_process: Option<usize>,
    clock: Time,
}

impl SjfScheduler {
    pub fn with_processes(processes: Vec<Process>) -> Self {
        Self {
            processes,
            current_process: None,
            clock: 0,
        }
    }
}

impl Scheduler for SjfScheduler {
    const NAME: &'static str = "Shortest Job First";

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
        self.clock = run_whole_burst(&mut self.processes[index], self.clock);
        self.current_process = Some(index);
    }

    fn idle(&mut self) {
        trace!("{}: CPU idle at {}", Self::NAME, self.clock);
        self.current_process = None;
        self.clock += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{run_to_completion, ExecInterval};

    fn scheduler(processes: &[(i64, Time, Time)]) -> SjfScheduler {
        SjfScheduler::with_processes(
            processes
                .iter()
                .map(|&(pid, arrival, burst)| Process::new(pid, arrival, burst))
                .collect(),
        )
    }

    #[test]
    fn test_running_job_is_not_preempted() {
        let report = run_to_completion(scheduler(&[
            (1, 0, 7),
            (2, 1, 4),
            (3, 2, 1),
            (4, 3, 4),
        ]));

        assert_eq!(report.completion_order, vec![1, 3, 2, 4]);
        assert_eq!(
            report.entries[0].intervals,
            vec![ExecInterval { start: 0, end: 7 }]
        );
        assert_eq!(
            report.entries[2].intervals,
            vec![ExecInterval { start: 7, end: 8 }]
        );
        let waits: Vec<Time> = report.entries.iter().map(|entry| entry.waiting_time).collect();
        assert_eq!(waits, vec![0, 7, 5, 9]);
        assert_eq!(report.average_waiting_time, 5.25);
    }

    #[test]
    fn test_equal_bursts_prefer_earlier_arrival() {
        let mut sjf = scheduler(&[(1, 0, 5), (2, 3, 2), (3, 1, 2)]);

        assert_eq!(sjf.schedule(), Some(0));
        sjf.dispatch(0);
        assert_eq!(sjf.schedule(), Some(2));
    }

    #[test]
    fn test_only_arrived_jobs_are_candidates() {
        let mut sjf = scheduler(&[(1, 0, 6), (2, 1, 1)]);

        assert_eq!(sjf.schedule(), Some(0));
        sjf.dispatch(0);
        assert_eq!(sjf.schedule(), Some(1));
        sjf.dispatch(1);
        assert_eq!(sjf.processes()[1].waiting_time(), 5);
        assert!(sjf.is_finished());
    }
}
