//! Command-line entry point over a records database file.
//!
//! # Responsibility
//! - Provide a smoke check that verifies `marksheet_core` linkage.
//! - Expose summary, export, import and clear over a database file.
//!
//! The database path comes from `--db`, then `MARKSHEET_DB`, then
//! `marksheet.sqlite3`. File logging starts only when a log directory is
//! given through `--log-dir` or `MARKSHEET_LOG_DIR`.

use clap::{Parser, Subcommand};
use log::info;
use marksheet_core::db::open_db;
use marksheet_core::{
    core_version, dashboard_summary, default_log_level, init_logging, ping, RecordsStore,
    SqliteCollectionRepository,
};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "marksheet_cli", version, about = "Assessment records tools")]
struct Cli {
    /// Records database file
    #[arg(
        long = "db",
        global = true,
        env = "MARKSHEET_DB",
        default_value = "marksheet.sqlite3"
    )]
    db: PathBuf,

    /// Absolute directory for rolling log files
    #[arg(long = "log-dir", global = true, env = "MARKSHEET_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print core linkage and version
    Ping,
    /// Print record counts, pass rate and grade distribution
    Summary,
    /// Write the export document to a file, or stdout when omitted
    Export { file: Option<PathBuf> },
    /// Replace collections from an export document
    Import { file: PathBuf },
    /// Remove all trades, trainees, modules and marks
    Clear,
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let command = cli.command.unwrap_or(Command::Ping);
    if command == Command::Ping {
        println!("marksheet_core ping={}", ping());
        println!("marksheet_core version={}", core_version());
        return Ok(());
    }

    let conn = open_db(&cli.db)?;
    let repo = SqliteCollectionRepository::try_new(&conn)?;
    let mut store = RecordsStore::open(repo)?;

    match command {
        Command::Ping => {}
        Command::Summary => {
            let summary = dashboard_summary(&store);
            println!("trades={}", summary.trade_count);
            println!("trainees={}", summary.trainee_count);
            println!("modules={}", summary.module_count);
            println!("marks={}", summary.mark_count);
            println!("passing_rate={:.1}", summary.passing_rate);
            println!(
                "grades excellent={} good={} average={} poor={}",
                summary.grades.excellent,
                summary.grades.good,
                summary.grades.average,
                summary.grades.poor
            );
        }
        Command::Export { file } => {
            let document = store.export_json()?;
            match file {
                Some(path) => fs::write(path, document)?,
                None => println!("{document}"),
            }
        }
        Command::Import { file } => {
            let document = fs::read_to_string(file)?;
            store.import_json(&document)?;
            println!("import ok");
        }
        Command::Clear => {
            store.clear_all()?;
            println!("clear ok");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = init_logging(default_log_level(), log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    info!("event=cli_command module=cli status=start");
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
