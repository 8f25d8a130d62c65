use super::error::{InvalidWorkload, ScheduleError};
use std::{collections::HashSet, fmt};

pub type Pid = i64;
pub type Time = u64;

/// A process as handed over by the caller, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessDescriptor {
    pub id: Pid,
    pub arrival_time: i64,
    pub burst_time: i64,
}

impl ProcessDescriptor {
    pub fn new(id: Pid, arrival_time: i64, burst_time: i64) -> Self {
        Self {
            id,
            arrival_time,
            burst_time,
        }
    }
}

/// A half-open `[start, end)` span during which a process held the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecInterval {
    pub start: Time,
    pub end: Time,
}

impl ExecInterval {
    pub fn duration(&self) -> Time {
        self.end - self.start
    }
}

impl fmt::Display for ExecInterval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    NotArrived,
    Ready,
    Running,
    Done,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProcessState::NotArrived => write!(f, "not arrived"),
            ProcessState::Ready => write!(f, "ready"),
            ProcessState::Running => write!(f, "running"),
            ProcessState::Done => write!(f, "done"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pid: Pid,
    arrival_time: Time,
    burst_time: Time,
    remaining_time: Time,
    waiting_time: Time,
    state: ProcessState,
    ledger: Vec<ExecInterval>,
}

impl Process {
    pub fn new(pid: Pid, arrival_time: Time, burst_time: Time) -> Self {
        Self {
            pid,
            arrival_time,
            burst_time,
            remaining_time: burst_time,
            waiting_time: 0,
            state: ProcessState::NotArrived,
            ledger: Vec::new(),
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn arrival_time(&self) -> Time {
        self.arrival_time
    }

    pub fn burst_time(&self) -> Time {
        self.burst_time
    }

    pub fn remaining_time(&self) -> Time {
        self.remaining_time
    }

    pub fn waiting_time(&self) -> Time {
        self.waiting_time
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn ledger(&self) -> &[ExecInterval] {
        &self.ledger
    }

    pub fn is_ready(&self) -> bool {
        self.state == ProcessState::Ready
    }

    pub fn is_done(&self) -> bool {
        self.state == ProcessState::Done
    }

    /// Moves the process into the ready set once the clock reaches its
    /// arrival time.
    pub fn admit(&mut self, clock: Time) {
        if self.state == ProcessState::NotArrived && self.arrival_time <= clock {
            self.state = ProcessState::Ready;
        }
    }

    pub fn set_running(&mut self) {
        self.state = ProcessState::Running;
    }

    /// Appends `[start, end)` to the ledger and charges it against the
    /// remaining burst.
    pub fn record(&mut self, start: Time, end: Time) {
        debug_assert!(start >= self.arrival_time);
        debug_assert!(end - start <= self.remaining_time);

        let interval = ExecInterval { start, end };
        self.remaining_time -= interval.duration();
        self.ledger.push(interval);
        self.state = if self.remaining_time == 0 {
            ProcessState::Done
        } else {
            ProcessState::Ready
        };
    }

    pub fn set_waiting_time(&mut self, waiting_time: Time) {
        self.waiting_time = waiting_time;
    }

    pub fn add_waiting_time(&mut self, waiting_time: Time) {
        self.waiting_time += waiting_time;
    }

    pub fn completion_time(&self) -> Option<Time> {
        if self.is_done() {
            self.ledger.last().map(|interval| interval.end)
        } else {
            None
        }
    }
}

pub fn admit_arrivals(processes: &mut [Process], clock: Time) {
    processes.iter_mut().for_each(|process| process.admit(clock));
}

/// Charges the span `[from, to)` as waiting time to every unfinished process
/// other than `running`, counting only the units after each one's arrival.
pub fn accrue_waiting(processes: &mut [Process], running: usize, from: Time, to: Time) {
    for (index, process) in processes.iter_mut().enumerate() {
        if index == running || process.is_done() {
            continue;
        }
        let waiting_from = from.max(process.arrival_time);
        if waiting_from < to {
            process.add_waiting_time(to - waiting_from);
        }
    }
}

/// Checks the caller's descriptors and builds a fresh process set from them.
///
/// The clock never passes the latest arrival plus the total work, so that
/// horizon has to fit in `Time`.
pub fn validate(descriptors: &[ProcessDescriptor]) -> Result<Vec<Process>, ScheduleError> {
    if descriptors.is_empty() {
        return Err(InvalidWorkload::Empty.into());
    }

    let mut seen = HashSet::with_capacity(descriptors.len());
    let processes = descriptors
        .iter()
        .map(|descriptor| {
            if !seen.insert(descriptor.id) {
                return Err(InvalidWorkload::DuplicateId { pid: descriptor.id });
            }
            if descriptor.arrival_time < 0 {
                return Err(InvalidWorkload::NegativeArrival {
                    pid: descriptor.id,
                    arrival_time: descriptor.arrival_time,
                });
            }
            if descriptor.burst_time <= 0 {
                return Err(InvalidWorkload::NonPositiveBurst {
                    pid: descriptor.id,
                    burst_time: descriptor.burst_time,
                });
            }
            Ok(Process::new(
                descriptor.id,
                descriptor.arrival_time as Time,
                descriptor.burst_time as Time,
            ))
        })
        .collect::<Result<Vec<_>, InvalidWorkload>>()?;

    let latest_arrival = processes
        .iter()
        .map(Process::arrival_time)
        .max()
        .unwrap_or_default();
    processes
        .iter()
        .try_fold(latest_arrival, |horizon, process| {
            horizon.checked_add(process.burst_time())
        })
        .ok_or(InvalidWorkload::TimeOverflow)?;

    Ok(processes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_builds_fresh_processes() {
        let processes = validate(&[
            ProcessDescriptor::new(1, 0, 5),
            ProcessDescriptor::new(2, 3, 2),
        ])
        .unwrap();

        assert_eq!(processes.len(), 2);
        assert_eq!(processes[1].pid(), 2);
        assert_eq!(processes[1].arrival_time(), 3);
        assert_eq!(processes[1].remaining_time(), 2);
        assert_eq!(processes[1].waiting_time(), 0);
        assert_eq!(processes[1].state(), ProcessState::NotArrived);
        assert!(processes[1].ledger().is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_workloads() {
        assert_eq!(validate(&[]), Err(InvalidWorkload::Empty.into()));
        assert_eq!(
            validate(&[ProcessDescriptor::new(1, 0, 0)]),
            Err(InvalidWorkload::NonPositiveBurst {
                pid: 1,
                burst_time: 0
            }
            .into())
        );
        assert_eq!(
            validate(&[ProcessDescriptor::new(1, -2, 3)]),
            Err(InvalidWorkload::NegativeArrival {
                pid: 1,
                arrival_time: -2
            }
            .into())
        );
        assert_eq!(
            validate(&[
                ProcessDescriptor::new(7, 0, 3),
                ProcessDescriptor::new(7, 1, 3)
            ]),
            Err(InvalidWorkload::DuplicateId { pid: 7 }.into())
        );
    }

    #[test]
    fn test_validate_rejects_unrepresentable_horizon() {
        assert_eq!(
            validate(&[
                ProcessDescriptor::new(1, 0, i64::MAX),
                ProcessDescriptor::new(2, 0, i64::MAX),
                ProcessDescriptor::new(3, 0, i64::MAX),
            ]),
            Err(InvalidWorkload::TimeOverflow.into())
        );
        assert_eq!(
            validate(&[
                ProcessDescriptor::new(1, i64::MAX, 1),
                ProcessDescriptor::new(2, 0, i64::MAX),
                ProcessDescriptor::new(3, 0, 2),
            ]),
            Err(InvalidWorkload::TimeOverflow.into())
        );

        let processes = validate(&[
            ProcessDescriptor::new(1, i64::MAX, i64::MAX),
            ProcessDescriptor::new(2, 0, 1),
        ])
        .unwrap();
        assert_eq!(processes.len(), 2);
    }

    #[test]
    fn test_record_moves_to_done() {
        let mut process = Process::new(1, 0, 3);
        process.admit(0);
        assert!(process.is_ready());

        process.set_running();
        process.record(0, 2);
        assert_eq!(process.state(), ProcessState::Ready);
        assert_eq!(process.remaining_time(), 1);
        assert_eq!(process.completion_time(), None);

        process.record(4, 5);
        assert!(process.is_done());
        assert_eq!(process.completion_time(), Some(5));
        assert_eq!(process.ledger().len(), 2);
    }

    #[test]
    fn test_admit_waits_for_arrival() {
        let mut process = Process::new(1, 4, 1);
        process.admit(3);
        assert_eq!(process.state(), ProcessState::NotArrived);
        process.admit(4);
        assert_eq!(process.state(), ProcessState::Ready);
    }

    #[test]
    fn test_accrue_waiting_counts_only_after_arrival() {
        let mut processes = vec![
            Process::new(1, 0, 4),
            Process::new(2, 0, 4),
            Process::new(3, 3, 4),
            Process::new(4, 9, 4),
        ];

        accrue_waiting(&mut processes, 0, 2, 6);

        assert_eq!(processes[0].waiting_time(), 0);
        assert_eq!(processes[1].waiting_time(), 4);
        assert_eq!(processes[2].waiting_time(), 3);
        assert_eq!(processes[3].waiting_time(), 0);
    }
}
