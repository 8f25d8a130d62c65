use super::{runner::RunnerEvent, Process, ProcessState, Scheduler};
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use std::{
    io::{self, Stdout},
    sync::mpsc::{self, Receiver},
    thread,
    time::{Duration, Instant},
};
use tui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
    Terminal,
};

pub enum DisplayEvent {
    Input(KeyEvent),
    Tick,
}

pub struct DisplayTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    input_rx: Receiver<DisplayEvent>,
}

impl DisplayTerminal {
    pub fn new(tick_rate: Duration) -> Result<Self, io::Error> {
        crossterm::terminal::enable_raw_mode()?;

        // Set up the input handling thread
        let (input_tx, input_rx) = mpsc::channel();
        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                match event::poll(timeout) {
                    Ok(true) => {
                        if let Ok(Event::Key(key)) = event::read() {
                            if input_tx.send(DisplayEvent::Input(key)).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(_) => break,
                }

                if last_tick.elapsed() >= tick_rate {
                    if input_tx.send(DisplayEvent::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        // Set up the terminal-user-interface
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal, input_rx })
    }

    pub fn draw<S>(&mut self, scheduler: &S, paused: bool) -> Result<(), io::Error>
    where
        S: Scheduler,
    {
        let status = status_line(scheduler, paused);
        let current_pid = scheduler.current_process().map(Process::pid);

        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(5),
                    Constraint::Length(1),
                ])
                .split(f.size());

            let header = Paragraph::new(status)
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .fg(Color::LightBlue),
                )
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Clock")
                        .border_type(BorderType::Rounded),
                );

            f.render_widget(header, chunks[0]);

            let items = scheduler.processes().iter().map(|process| {
                let style = match process.state() {
                    ProcessState::Done => Style::default().fg(Color::DarkGray),
                    _ if Some(process.pid()) == current_pid => {
                        Style::default().fg(Color::LightYellow)
                    }
                    _ => Style::default(),
                };
                let ledger = process
                    .ledger()
                    .iter()
                    .map(|interval| interval.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");

                Row::new(vec![
                    Cell::from(process.pid().to_string())
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                    Cell::from("|"),
                    Cell::from(process.arrival_time().to_string()),
                    Cell::from("|"),
                    Cell::from(process.burst_time().to_string()),
                    Cell::from("|"),
                    Cell::from(process.remaining_time().to_string()),
                    Cell::from("|"),
                    Cell::from(process.waiting_time().to_string()),
                    Cell::from("|"),
                    Cell::from(process.state().to_string()),
                    Cell::from("|"),
                    Cell::from(ledger),
                ])
                .style(style)
            });

            let table = Table::new(items)
                .header(
                    Row::new(vec![
                        "PID", "|", "Arrival", "|", "Burst", "|", "Left", "|", "Waiting", "|",
                        "State", "|", "Ledger",
                    ])
                    .style(Style::default().add_modifier(Modifier::BOLD)),
                )
                .widths(&[
                    Constraint::Length(5),
                    Constraint::Length(1),
                    Constraint::Length(7),
                    Constraint::Length(1),
                    Constraint::Length(5),
                    Constraint::Length(1),
                    Constraint::Length(5),
                    Constraint::Length(1),
                    Constraint::Length(7),
                    Constraint::Length(1),
                    Constraint::Length(11),
                    Constraint::Length(1),
                    Constraint::Min(20),
                ])
                .block(Block::default().title(S::NAME).borders(Borders::ALL))
                .style(Style::default().fg(Color::LightGreen))
                .column_spacing(1);

            f.render_widget(table, chunks[1]);

            let help = Paragraph::new("q: quit | p: pause | r: resume | s: step (while paused)")
                .style(Style::default().fg(Color::Gray));

            f.render_widget(help, chunks[2]);
        })?;
        Ok(())
    }

    pub fn get_input(&self) -> RunnerEvent {
        // The input thread only goes away if the terminal does
        let event = match self.input_rx.recv() {
            Ok(event) => event,
            Err(_) => return RunnerEvent::Quit,
        };

        match event {
            DisplayEvent::Input(key) => {
                if key.modifiers.is_empty() {
                    match key.code {
                        KeyCode::Char('q') => return RunnerEvent::Quit,
                        KeyCode::Char('p') => return RunnerEvent::Pause,
                        KeyCode::Char('r') => return RunnerEvent::Resume,
                        KeyCode::Char('s') => return RunnerEvent::Step,
                        _ => {}
                    };
                }
            }
            DisplayEvent::Tick => {}
        }
        RunnerEvent::None
    }
}

impl Drop for DisplayTerminal {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

fn status_line<S: Scheduler>(scheduler: &S, paused: bool) -> String {
    let clock = scheduler.clock();
    let mut status = if scheduler.is_finished() {
        let processes = scheduler.processes();
        let total: f64 = processes
            .iter()
            .map(|process| process.waiting_time() as f64)
            .sum();
        format!(
            "t = {} | All processes completed | Average waiting time: {:.2}",
            clock,
            total / processes.len().max(1) as f64
        )
    } else {
        match scheduler.current_process() {
            Some(process) => match process.ledger().last() {
                Some(interval) => format!(
                    "t = {} | P[{}] ran {} | {} left",
                    clock,
                    process.pid(),
                    interval,
                    process.remaining_time()
                ),
                None => format!("t = {} | P[{}] dispatched", clock, process.pid()),
            },
            None => format!("t = {} | CPU idle", clock),
        }
    };

    if paused {
        status.push_str(" | paused");
    }
    status
}
