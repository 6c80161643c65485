mod commands;
mod logging;
mod preview;
mod progress;

use std::io::{self, Write};
use std::process;

use anyhow::Context;
use bookmark_duper_core::{AppConfig, ChromiumBookmarks, DedupeEngine, ScanOutcome};
use clap::{CommandFactory, Parser};
use commands::{Cli, Commands};
use dotenv::dotenv;
use progress::CliReporter;
use tracing::error;

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match bookmark_duper_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let result = match args.command {
        Some(Commands::Scan) => run_scan(&config, args.file.as_deref()),
        Some(Commands::Dedupe { yes }) => run_dedupe(&config, args.file.as_deref(), yes),
        Some(Commands::PrintConfig) => print_config(&config, args.file.as_deref()),
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn open_store(config: &AppConfig, file: Option<&str>) -> anyhow::Result<ChromiumBookmarks> {
    let path = config.resolve_bookmarks_path(file)?;
    ChromiumBookmarks::open(&path)
        .with_context(|| format!("could not load bookmarks from {}", path.display()))
}

fn run_scan(config: &AppConfig, file: Option<&str>) -> anyhow::Result<()> {
    let store = open_store(config, file)?;
    let mut engine = DedupeEngine::new();

    match engine.scan(&store, &CliReporter::new())? {
        ScanOutcome::NoDuplicates => preview::print_no_duplicates(),
        ScanOutcome::Duplicates(report) => preview::print_report(&report),
    }
    Ok(())
}

fn run_dedupe(config: &AppConfig, file: Option<&str>, yes: bool) -> anyhow::Result<()> {
    let mut store = open_store(config, file)?;
    let mut engine = DedupeEngine::new();
    let reporter = CliReporter::new();

    let report = match engine.scan(&store, &reporter)? {
        ScanOutcome::NoDuplicates => {
            preview::print_no_duplicates();
            return Ok(());
        }
        ScanOutcome::Duplicates(report) => report,
    };
    preview::print_report(&report);
    println!();

    let confirmed = yes
        || prompt_confirm(
            &format!("Delete {} duplicate(s)?", report.total_duplicates()),
            Some(false),
        )?;
    if !confirmed {
        engine.cancel();
        println!("Cancelled, nothing was deleted.");
        return Ok(());
    }

    let outcome = engine.confirm(&mut store, &reporter);
    if outcome.deleted > 0 {
        store.save(config.backup)?;
    }
    preview::print_outcome(&outcome);
    Ok(())
}

fn print_config(config: &AppConfig, file: Option<&str>) -> anyhow::Result<()> {
    println!("Configuration: {:?}", config);
    match config.resolve_bookmarks_path(file) {
        Ok(path) => println!("Bookmarks file: {}", path.display()),
        Err(err) => println!("Bookmarks file: <unresolved> ({})", err),
    }
    Ok(())
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(default.unwrap_or(false));
        }

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
