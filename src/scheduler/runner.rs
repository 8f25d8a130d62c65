use super::{display::DisplayTerminal, Report, Scheduler};
use log::info;
use std::{io, time::Duration};

pub enum RunnerEvent {
    Quit,
    Pause,
    Resume,
    Step,
    None,
}

/// Drives a scheduler until every process has completed.
pub fn run_to_completion<S: Scheduler>(mut scheduler: S) -> Report {
    while scheduler.step() {}

    let clock = scheduler.clock();
    let report = Report::new(S::NAME, &scheduler.into_processes());
    info!(
        "{} finished at t={}, average waiting time {:.2}",
        S::NAME,
        clock,
        report.average_waiting_time
    );
    report
}

/// Steps a scheduler once per tick and shows its state in the terminal.
pub struct ProcessRunner<S> {
    terminal: DisplayTerminal,
    scheduler: S,
    paused: bool,
}

impl<S: Scheduler> ProcessRunner<S> {
    pub fn new(scheduler: S, tick_rate: Duration) -> Result<Self, io::Error> {
        let terminal = DisplayTerminal::new(tick_rate)?;

        Ok(Self {
            terminal,
            scheduler,
            paused: false,
        })
    }

    fn step(&mut self) {
        if self.scheduler.step() && self.scheduler.is_finished() {
            info!("{} finished at t={}", S::NAME, self.scheduler.clock());
        }
    }

    // Returns false if the program should quit
    pub fn run(&mut self) -> Result<bool, io::Error> {
        if !self.paused {
            self.step();
        }
        self.terminal.draw(&self.scheduler, self.paused)?;

        match self.terminal.get_input() {
            RunnerEvent::Quit => return Ok(false),
            RunnerEvent::Pause if !self.paused => self.paused = true,
            RunnerEvent::Resume if self.paused => self.paused = false,
            RunnerEvent::Step if self.paused => self.step(),
            _ => {}
        }
        Ok(true)
    }

    /// The final report, or `None` if the view was closed mid-run.
    pub fn into_report(self) -> Option<Report> {
        if self.scheduler.is_finished() {
            Some(Report::new(S::NAME, self.scheduler.processes()))
        } else {
            None
        }
    }
}
