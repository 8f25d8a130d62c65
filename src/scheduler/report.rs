use super::process::{ExecInterval, Pid, Process, Time};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub id: Pid,
    pub arrival_time: Time,
    pub burst_time: Time,
    pub intervals: Vec<ExecInterval>,
    pub waiting_time: Time,
    pub completion_time: Time,
    pub turnaround_time: Time,
}

/// Outcome of one finished run. Entries keep the input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub algorithm: String,
    pub entries: Vec<ReportEntry>,
    pub completion_order: Vec<Pid>,
    pub makespan: Time,
    pub average_waiting_time: f64,
    pub average_turnaround_time: f64,
}

impl Report {
    pub fn new(algorithm: &str, processes: &[Process]) -> Self {
        let entries: Vec<ReportEntry> = processes
            .iter()
            .map(|process| {
                let completion_time = process.completion_time().unwrap_or_default();
                ReportEntry {
                    id: process.pid(),
                    arrival_time: process.arrival_time(),
                    burst_time: process.burst_time(),
                    intervals: process.ledger().to_vec(),
                    waiting_time: process.waiting_time(),
                    completion_time,
                    turnaround_time: completion_time.saturating_sub(process.arrival_time()),
                }
            })
            .collect();

        // Sorting is stable, so equal completion times keep input order
        let mut finished: Vec<&ReportEntry> = entries.iter().collect();
        finished.sort_by_key(|entry| entry.completion_time);
        let completion_order = finished.iter().map(|entry| entry.id).collect();

        let makespan = entries
            .iter()
            .map(|entry| entry.completion_time)
            .max()
            .unwrap_or_default();

        Self {
            algorithm: algorithm.to_owned(),
            average_waiting_time: mean(entries.iter().map(|entry| entry.waiting_time)),
            average_turnaround_time: mean(entries.iter().map(|entry| entry.turnaround_time)),
            completion_order,
            makespan,
            entries,
        }
    }

    pub fn with_algorithm(mut self, algorithm: String) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// A single summary line, used when several algorithms are compared.
    pub fn summary(&self) -> String {
        format!(
            "{:<40} avg waiting {:>8.2} | avg turnaround {:>8.2} | makespan {}",
            self.algorithm, self.average_waiting_time, self.average_turnaround_time, self.makespan
        )
    }
}

fn mean(values: impl ExactSizeIterator<Item = Time>) -> f64 {
    let count = values.len();
    if count == 0 {
        return 0.0;
    }
    values.map(|value| value as f64).sum::<f64>() / count as f64
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.algorithm)?;
        for entry in &self.entries {
            write!(f, "P[{}] ", entry.id)?;
            for interval in &entry.intervals {
                write!(
                    f,
                    "Start Time: {} End Time: {} | ",
                    interval.start, interval.end
                )?;
            }
            writeln!(f, "Waiting time: {}", entry.waiting_time)?;
        }
        write!(f, "Average waiting time: {:.2}", self.average_waiting_time)
    }
}
