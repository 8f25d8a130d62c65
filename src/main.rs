mod scheduler;
mod workload;

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use env_logger::Builder;
use log::warn;
use scheduler::{
    check_quantum, simulate, validate, Algorithm, FcfsScheduler, ProcessDescriptor,
    ProcessRunner, Report, RoundRobinScheduler, ScheduleError, Scheduler, SjfScheduler,
    SrtfScheduler, DEFAULT_TICK_RATE,
};
use std::{
    io::{self, Write},
    time::Duration,
};
use workload::Workload;

fn main() -> Result<()> {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    let matches = Command::new("cpu-scheduling-simulator")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Simulates FCFS, SJF, SRTF and Round Robin scheduling of a fixed workload")
        .arg(
            Arg::new("input")
                .value_name("FILE")
                .help("Workload file; prompted for when omitted"),
        )
        .arg(
            Arg::new("algorithm")
                .short('a')
                .long("algorithm")
                .value_parser(["fcfs", "sjf", "srtf", "rr"])
                .help("Overrides the algorithm selected by the file header"),
        )
        .arg(
            Arg::new("quantum")
                .short('q')
                .long("quantum")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64))
                .help("Overrides the round robin quantum from the file header"),
        )
        .arg(
            Arg::new("all")
                .long("all")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["algorithm", "tui"])
                .help("Runs all four algorithms and compares them"),
        )
        .arg(
            Arg::new("tui")
                .long("tui")
                .action(ArgAction::SetTrue)
                .help("Steps through the schedule in an interactive view"),
        )
        .arg(
            Arg::new("tick-rate")
                .long("tick-rate")
                .value_name("MS")
                .value_parser(value_parser!(u64))
                .help("Milliseconds between steps of the interactive view"),
        )
        .get_matches();

    let path = match matches.get_one::<String>("input") {
        Some(path) => path.clone(),
        None => prompt_file_name()?,
    };
    let workload = Workload::from_file(&path)
        .with_context(|| format!("failed to load workload from {}", path))?;

    let quantum = matches
        .get_one::<i64>("quantum")
        .copied()
        .unwrap_or(workload.quantum);

    if matches.get_flag("all") {
        let algorithms = Algorithm::all(check_quantum(quantum)?);
        return compare(&workload.processes, algorithms);
    }

    let algorithm = match matches.get_one::<String>("algorithm").map(String::as_str) {
        Some("fcfs") => Algorithm::Fcfs,
        Some("sjf") => Algorithm::Sjf,
        Some("srtf") => Algorithm::Srtf,
        Some("rr") => Algorithm::round_robin(quantum)?,
        Some(other) => bail!("unknown algorithm {}", other),
        None if !matches.contains_id("quantum") => workload.algorithm()?,
        None => Algorithm::from_selector(workload.selector, quantum)?,
    };
    if matches.contains_id("quantum") && !matches!(algorithm, Algorithm::RoundRobin(_)) {
        warn!("{} does not use a time quantum, ignoring it", algorithm);
    }

    if matches.get_flag("tui") {
        let tick_rate = matches
            .get_one::<u64>("tick-rate")
            .map(|millis| Duration::from_millis(*millis))
            .unwrap_or(DEFAULT_TICK_RATE);
        if let Some(report) = interactive(algorithm, &workload.processes, tick_rate)? {
            println!("{}", report);
        }
        return Ok(());
    }

    let report = simulate(algorithm, &workload.processes)?;
    println!("{}", report);
    Ok(())
}

fn prompt_file_name() -> Result<String> {
    print!("Input filename (w/o .txt): ");
    io::stdout().flush()?;

    let mut name = String::new();
    io::stdin()
        .read_line(&mut name)
        .context("failed to read the file name")?;
    let name = name.trim();
    if name.is_empty() {
        bail!("no workload file given");
    }
    Ok(format!("{}.txt", name))
}

// Every algorithm gets its own copy of the workload
fn compare(processes: &[ProcessDescriptor], algorithms: [Algorithm; 4]) -> Result<()> {
    let reports = algorithms
        .iter()
        .map(|&algorithm| simulate(algorithm, processes))
        .collect::<Result<Vec<Report>, ScheduleError>>()?;

    for report in &reports {
        println!("{}\n", report);
    }
    for report in &reports {
        println!("{}", report.summary());
    }
    Ok(())
}

fn interactive(
    algorithm: Algorithm,
    processes: &[ProcessDescriptor],
    tick_rate: Duration,
) -> Result<Option<Report>> {
    let processes = validate(processes)?;

    let report = match algorithm {
        Algorithm::Fcfs => step_through(FcfsScheduler::with_processes(processes), tick_rate)?,
        Algorithm::Sjf => step_through(SjfScheduler::with_processes(processes), tick_rate)?,
        Algorithm::Srtf => step_through(SrtfScheduler::with_processes(processes), tick_rate)?,
        Algorithm::RoundRobin(quantum) => step_through(
            RoundRobinScheduler::with_processes(processes, quantum),
            tick_rate,
        )?,
    };
    Ok(report.map(|report| report.with_algorithm(algorithm.to_string())))
}

fn step_through<S: Scheduler>(scheduler: S, tick_rate: Duration) -> Result<Option<Report>> {
    execute!(io::stdout(), Clear(ClearType::All))?;

    let mut runner = ProcessRunner::new(scheduler, tick_rate)?;
    while runner.run()? {}
    let report = runner.into_report();

    execute!(io::stdout(), Clear(ClearType::All))?;
    Ok(report)
}
