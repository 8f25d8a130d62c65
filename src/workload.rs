//! Reader for the plain-text workload format.
//!
//! A workload file holds whitespace separated integers: a header
//! `<algorithm> <process count> <quantum>` followed by one
//! `<id> <arrival time> <burst time>` triple per process. The quantum is only
//! meaningful for round robin (algorithm 3) but is always present.

use crate::scheduler::{Algorithm, ProcessDescriptor, ScheduleError};
use std::{error::Error, fmt, fs, io, path::Path};

#[derive(Debug)]
pub enum WorkloadError {
    Io(io::Error),
    MissingValue { what: &'static str },
    InvalidNumber { what: &'static str, token: String },
    NegativeCount(i64),
    TrailingData(String),
}

impl fmt::Display for WorkloadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WorkloadError::Io(err) => write!(f, "failed to read workload: {}", err),
            WorkloadError::MissingValue { what } => write!(f, "missing {}", what),
            WorkloadError::InvalidNumber { what, token } => {
                write!(f, "invalid {}: \"{}\" is not an integer", what, token)
            }
            WorkloadError::NegativeCount(count) => {
                write!(f, "process count must not be negative, got {}", count)
            }
            WorkloadError::TrailingData(token) => {
                write!(f, "unexpected data after the last process: \"{}\"", token)
            }
        }
    }
}

impl Error for WorkloadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorkloadError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for WorkloadError {
    fn from(err: io::Error) -> Self {
        WorkloadError::Io(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    pub selector: i64,
    pub quantum: i64,
    pub processes: Vec<ProcessDescriptor>,
}

impl Workload {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WorkloadError> {
        let contents = fs::read_to_string(path)?;
        Workload::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, WorkloadError> {
        let mut tokens = contents.split_whitespace();
        let mut next = |what: &'static str| -> Result<i64, WorkloadError> {
            let token = tokens.next().ok_or(WorkloadError::MissingValue { what })?;
            token.parse().map_err(|_| WorkloadError::InvalidNumber {
                what,
                token: token.to_owned(),
            })
        };

        let selector = next("algorithm selector")?;
        let count = next("process count")?;
        let quantum = next("time quantum")?;
        if count < 0 {
            return Err(WorkloadError::NegativeCount(count));
        }

        let processes = (0..count)
            .map(|_| -> Result<ProcessDescriptor, WorkloadError> {
                Ok(ProcessDescriptor::new(
                    next("process id")?,
                    next("arrival time")?,
                    next("burst time")?,
                ))
            })
            .collect::<Result<Vec<_>, WorkloadError>>()?;

        if let Some(token) = tokens.next() {
            return Err(WorkloadError::TrailingData(token.to_owned()));
        }

        Ok(Self {
            selector,
            quantum,
            processes,
        })
    }

    /// The algorithm requested by the file header.
    pub fn algorithm(&self) -> Result<Algorithm, ScheduleError> {
        Algorithm::from_selector(self.selector, self.quantum)
    }
}
