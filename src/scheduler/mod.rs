mod display;
mod error;
mod fcfs;
mod process;
mod report;
mod round_robin;
mod runner;
mod sjf;
mod srtf;

use log::debug;
use std::{fmt, num::NonZeroU64, time::Duration};

#[cfg(test)]
use error::InvalidWorkload;
pub use error::ScheduleError;
pub use fcfs::FcfsScheduler;
#[cfg(test)]
use process::{ExecInterval, Pid};
pub use process::{validate, Process, ProcessDescriptor, ProcessState, Time};
pub use report::Report;
pub use round_robin::RoundRobinScheduler;
pub use runner::{run_to_completion, ProcessRunner};
pub use sjf::SjfScheduler;
pub use srtf::SrtfScheduler;

pub const DEFAULT_TICK_RATE: Duration = Duration::from_millis(200);

/// One scheduling discipline together with the process set it owns for a
/// single run.
pub trait Scheduler {
    const NAME: &'static str;

    fn processes(&self) -> &[Process];
    fn into_processes(self) -> Vec<Process>;
    fn clock(&self) -> Time;
    /// The process picked by the last decision, if the CPU was not idle.
    fn current_process(&self) -> Option<&Process>;
    /// Picks the index of the next process to run, or `None` if nothing is
    /// ready at the current clock.
    fn schedule(&mut self) -> Option<usize>;
    fn dispatch(&mut self, index: usize);
    fn idle(&mut self);

    fn is_finished(&self) -> bool {
        self.processes().iter().all(Process::is_done)
    }

    // Returns false once every process has completed
    fn step(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        match self.schedule() {
            Some(index) => self.dispatch(index),
            None => self.idle(),
        }
        true
    }
}

/// Runs a process for its whole remaining burst starting at `clock` and
/// returns the clock after it finishes.
fn run_whole_burst(process: &mut Process, clock: Time) -> Time {
    let end = clock + process.remaining_time();
    process.set_waiting_time(clock - process.arrival_time());
    process.set_running();
    process.record(clock, end);
    debug!(
        "P[{}] runs [{}, {}), waited {}",
        process.pid(),
        clock,
        end,
        process.waiting_time()
    );
    end
}

pub fn check_quantum(quantum: i64) -> Result<NonZeroU64, ScheduleError> {
    u64::try_from(quantum)
        .ok()
        .and_then(NonZeroU64::new)
        .ok_or(ScheduleError::InvalidQuantum(quantum))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Fcfs,
    Sjf,
    Srtf,
    RoundRobin(NonZeroU64),
}

impl Algorithm {
    /// Maps the workload header selector (0 FCFS, 1 SJF, 2 SRTF, 3 RR) to an
    /// algorithm. The quantum is only checked for round robin.
    pub fn from_selector(selector: i64, quantum: i64) -> Result<Self, ScheduleError> {
        match selector {
            0 => Ok(Algorithm::Fcfs),
            1 => Ok(Algorithm::Sjf),
            2 => Ok(Algorithm::Srtf),
            3 => Algorithm::round_robin(quantum),
            other => Err(ScheduleError::UnsupportedAlgorithm(other)),
        }
    }

    pub fn round_robin(quantum: i64) -> Result<Self, ScheduleError> {
        check_quantum(quantum).map(Algorithm::RoundRobin)
    }

    pub fn all(quantum: NonZeroU64) -> [Algorithm; 4] {
        [
            Algorithm::Fcfs,
            Algorithm::Sjf,
            Algorithm::Srtf,
            Algorithm::RoundRobin(quantum),
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Fcfs => FcfsScheduler::NAME,
            Algorithm::Sjf => SjfScheduler::NAME,
            Algorithm::Srtf => SrtfScheduler::NAME,
            Algorithm::RoundRobin(_) => RoundRobinScheduler::NAME,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Algorithm::RoundRobin(quantum) => write!(f, "{} (quantum {})", self.name(), quantum),
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// Validates the workload, gives the chosen discipline its own copy of the
/// processes and runs it to completion.
pub fn simulate(
    algorithm: Algorithm,
    descriptors: &[ProcessDescriptor],
) -> Result<Report, ScheduleError> {
    let processes = process::validate(descriptors)?;

    let report = match algorithm {
        Algorithm::Fcfs => run_to_completion(FcfsScheduler::with_processes(processes)),
        Algorithm::Sjf => run_to_completion(SjfScheduler::with_processes(processes)),
        Algorithm::Srtf => run_to_completion(SrtfScheduler::with_processes(processes)),
        Algorithm::RoundRobin(quantum) => {
            run_to_completion(RoundRobinScheduler::with_processes(processes, quantum))
        }
    };
    Ok(report.with_algorithm(algorithm.to_string()))
}
