use std::io::Read;

use anyhow::Context;
use fsm_minimize::prelude::*;

use tracing::{debug, error, info, trace};
use tracing_subscriber::{filter, prelude::*};

use clap::{Arg, ArgAction, ArgMatches, Command};

fn cli() -> clap::Command {
    Command::new("fsm-minimize")
    .about("Minimizes a deterministic state machine with the implication table method")
    .arg(
        Arg::new("verbosity")
        .short('v')
        .long("verbosity")
        .num_args(0..=1)
        .require_equals(true)
        .value_parser(["info", "debug", "trace"])
        .default_missing_value("info")
    )
    .arg(
        Arg::new("table")
        .short('t')
        .long("table")
        .action(ArgAction::SetTrue)
        .help("also print the transition tables, the implication table and the classes")
    )
    .arg(
        Arg::new("input")
        .value_name("FILE")
        .help("file containing the machine description, read from stdin if absent")
    )
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

fn read_description(matches: &ArgMatches) -> std::io::Result<String> {
    match matches.get_one::<String>("input") {
        Some(path) => {
            debug!("reading machine description from {path}");
            std::fs::read_to_string(path)
        }
        None => {
            debug!("reading machine description from stdin");
            let mut buf = String::new();
            std::io::stdin().lock().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let description = read_description(matches).context("could not read machine description")?;
    let model = parse_description(&description)?;
    let show_tables = matches.get_flag("table");

    let start = std::time::Instant::now();
    let table = EliminationEngine::new(&model)?.run();
    let minimization = EquivalenceClassBuilder::build(&table);
    info!(
        "minimized {} states into {} classes in {}µs",
        model.num_states(),
        minimization.classes().size(),
        start.elapsed().as_micros()
    );

    if show_tables {
        println!("{}", model.show());
        println!("{}", table.show());
    }
    print!("{minimization}");
    if show_tables {
        let quotient = minimization.quotient(&model)?;
        println!("{}", minimization.class_table());
        println!("{}", quotient.show());
    }
    Ok(())
}

pub fn main() {
    let matches = cli().get_matches();

    setup_logging(&matches);

    if let Err(e) = run(&matches) {
        error!("{e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
