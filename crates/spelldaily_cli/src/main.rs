//! `spelldaily` command-line entry point.
//!
//! # Responsibility
//! - Bootstrap config, logging and the database for one invocation.
//! - `rotate` is what the timer trigger runs; it reports `Success` whenever
//!   the job ran, however many words were rotated in.
//!
//! # Invariants
//! - Only bootstrap failures (config, logging, database) exit non-zero.

use clap::{Parser, Subcommand};
use log::info;
use spelldaily_core::db::open_db;
use spelldaily_core::{
    init_logging, run_daily_rotation, NewCatalogWord, RotationConfig, SqliteActiveSetRepository,
    SqliteCatalogRepository, DATABASE_ENV_VAR,
};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const SUCCESS_SIGNAL: &str = "Success";

#[derive(Debug, Parser)]
#[command(name = "spelldaily", version, about = "Daily spelling-word rotation")]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true, env = "SPELLDAILY_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database path; overrides SPELLDAILY_DB and the config file.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the daily rotation once (default).
    Rotate,
    /// Import catalog words from a JSON array.
    Import { file: PathBuf },
    /// Print the active daily set, oldest first.
    Active,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("spelldaily: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => RotationConfig::load(path)?,
        None => RotationConfig::default(),
    };

    let db_path = config.resolve_database_path(cli.db.as_deref(), DATABASE_ENV_VAR);
    let level = cli.log_level.as_deref().unwrap_or(config.log_level.as_str());
    let log_dir = match cli.log_dir.clone().or_else(|| config.log_dir.clone()) {
        Some(dir) => absolutize(&dir)?,
        None => default_log_dir(&db_path)?,
    };
    init_logging(level, &log_dir)?;
    info!(
        "event=cli_start module=cli status=ok db={} command={:?}",
        db_path.display(),
        cli.command
    );

    let mut conn = open_db(&db_path)?;
    match cli.command.unwrap_or(Command::Rotate) {
        Command::Rotate => {
            let report = run_daily_rotation(&conn, &config.schedule)?;
            info!(
                "event=cli_rotate module=cli status=ok inserted={} requested={}",
                report.inserted.len(),
                report.requested()
            );
            println!("{SUCCESS_SIGNAL}");
        }
        Command::Import { file } => {
            let text = std::fs::read_to_string(&file)?;
            let words: Vec<NewCatalogWord> = serde_json::from_str(&text)?;

            let tx = conn.transaction()?;
            {
                let catalog = SqliteCatalogRepository::try_new(&tx)?;
                for word in &words {
                    catalog.import_word(word)?;
                }
            }
            tx.commit()?;

            info!(
                "event=cli_import module=cli status=ok file={} words={}",
                file.display(),
                words.len()
            );
            println!("imported {} words", words.len());
        }
        Command::Active => {
            let active = SqliteActiveSetRepository::try_new(&conn)?;
            for entry in active.list_entries()? {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    entry.created_at,
                    entry.difficulty,
                    entry.syllable_count,
                    entry.word,
                    entry.narration_asset
                );
            }
        }
    }

    Ok(())
}

fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

/// `<database dir>/logs`, absolute.
fn default_log_dir(db_path: &Path) -> std::io::Result<PathBuf> {
    let parent = db_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    absolutize(&parent.join("logs"))
}
