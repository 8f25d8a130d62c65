use super::process::Pid;
use std::{error::Error, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidWorkload {
    Empty,
    NonPositiveBurst { pid: Pid, burst_time: i64 },
    NegativeArrival { pid: Pid, arrival_time: i64 },
    DuplicateId { pid: Pid },
    TimeOverflow,
}

/// Errors raised before a simulation is started. A run never produces a
/// partial schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    InvalidWorkload(InvalidWorkload),
    InvalidQuantum(i64),
    UnsupportedAlgorithm(i64),
}

impl fmt::Display for InvalidWorkload {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvalidWorkload::Empty => write!(f, "the workload contains no processes"),
            InvalidWorkload::NonPositiveBurst { pid, burst_time } => {
                write!(f, "P[{}] has a non-positive burst time ({})", pid, burst_time)
            }
            InvalidWorkload::NegativeArrival { pid, arrival_time } => {
                write!(f, "P[{}] has a negative arrival time ({})", pid, arrival_time)
            }
            InvalidWorkload::DuplicateId { pid } => {
                write!(f, "process id {} appears more than once", pid)
            }
            InvalidWorkload::TimeOverflow => write!(
                f,
                "the latest arrival plus the total burst time does not fit in the clock"
            ),
        }
    }
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScheduleError::InvalidWorkload(reason) => write!(f, "invalid workload: {}", reason),
            ScheduleError::InvalidQuantum(quantum) => {
                write!(f, "round robin needs a positive quantum, got {}", quantum)
            }
            ScheduleError::UnsupportedAlgorithm(selector) => write!(
                f,
                "unsupported algorithm selector {} (expected 0 FCFS, 1 SJF, 2 SRTF or 3 RR)",
                selector
            ),
        }
    }
}

impl Error for ScheduleError {}

impl From<InvalidWorkload> for ScheduleError {
    fn from(reason: InvalidWorkload) -> Self {
        ScheduleError::InvalidWorkload(reason)
    }
}
