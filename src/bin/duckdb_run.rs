//! Run SQL statements against a DuckDB profile.
//!
//! Usage: `duckdb-run [--profile <file>] [--threads <n>] <sql>...`
//!
//! Without `--profile` the default profile location is used if it exists,
//! otherwise an in-memory database.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use duckdb_adapter::services::database::traits::Connection;
use duckdb_adapter::{DuckDbConnectionManager, Profile, ResultTable};

#[derive(Parser)]
#[command(name = "duckdb-run")]
#[command(version, about = "Run SQL statements against a DuckDB profile", long_about = None)]
struct Cli {
    /// Profile file (JSON)
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Worker threads; anything above 1 is rejected
    #[arg(long)]
    threads: Option<u32>,

    /// SQL statements, run in order
    #[arg(required = true)]
    statements: Vec<String>,
}

fn load_profile(path: Option<PathBuf>) -> Result<Profile> {
    match path {
        Some(path) => Profile::load(&path),
        None => match Profile::default_path().filter(|p| p.exists()) {
            Some(path) => {
                tracing::info!("Using profile {}", path.display());
                Profile::load(&path)
            }
            None => Ok(Profile::default()),
        },
    }
}

fn print_table(table: &ResultTable) {
    if table.columns.is_empty() {
        return;
    }
    println!("{}", table.column_names().collect::<Vec<_>>().join("\t"));
    for row in &table.rows {
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        println!("{}", cells.join("\t"));
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Cli::parse();
    let mut profile = load_profile(args.profile)?;
    if let Some(threads) = args.threads {
        profile = profile.with_threads(threads);
    }

    let manager = DuckDbConnectionManager::duckdb(&profile, tracing::info_span!("duckdb"))?;
    let mut connection = Connection::new("master", profile.credentials.clone());
    manager.open(&mut connection)?;

    for sql in &args.statements {
        let (response, table) = manager
            .execute(&mut connection, sql, true)
            .with_context(|| format!("Failed to run: {}", sql))?;
        print_table(&table);
        tracing::info!("{} ({} rows)", response, table.row_count());
    }

    manager.close(&mut connection)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_and_statements() {
        let cli = Cli::try_parse_from([
            "duckdb-run",
            "--profile",
            "profile.json",
            "--threads",
            "1",
            "SELECT 1",
            "SELECT 2",
        ])
        .unwrap();
        assert_eq!(cli.profile, Some(PathBuf::from("profile.json")));
        assert_eq!(cli.threads, Some(1));
        assert_eq!(cli.statements, ["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn test_help_is_not_sql() {
        let err = Cli::try_parse_from(["duckdb-run", "--help"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_statements_required() {
        let err = Cli::try_parse_from(["duckdb-run", "--threads", "1"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_threads_must_be_numeric() {
        let err = Cli::try_parse_from(["duckdb-run", "--threads", "many", "SELECT 1"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }
}
