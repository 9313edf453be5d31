//! tablesift CLI - compile table requests to SQL
//!
//! Usage:
//!   tablesift compile --table <def.toml> [--params <json>] [--dialect <dialect>]
//!   tablesift run --table <def.toml> --db <file.sqlite> [--params <json>]
//!
//! Examples:
//!   tablesift compile --table users.toml --params '{"filter": {"1": "frank"}}'
//!   tablesift compile --table users.toml --params '{"sort": {"0": "1"}}' --dialect mysql
//!   tablesift run --table users.toml --db app.sqlite --params '{"page": "1", "size": "25"}'

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tablesift::config::Settings;
use tablesift::executor::{CountResult, QueryExecutor, SqliteExecutor};
use tablesift::sql::{BoundSql, Dialect, Query, Value};
use tablesift::table::filter::apply_filters;
use tablesift::table::{
    apply_sort, paginate, ColumnRegistry, RequestParams, TableDefinition, TableQuery,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tablesift")]
#[command(about = "tablesift - compile paginated-table requests to parameterized SQL")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to tablesift.toml, $TABLESIFT_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the records query for a request without running it
    Compile {
        /// Path to the table definition (.toml)
        #[arg(short, long)]
        table: PathBuf,

        /// Request parameters as JSON
        #[arg(short, long, default_value = "{}")]
        params: String,

        /// SQL dialect to generate (defaults to the configured dialect)
        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        output: OutputFormat,
    },

    /// Run a request against a SQLite database and print counts and rows
    Run {
        /// Path to the table definition (.toml)
        #[arg(short, long)]
        table: PathBuf,

        /// SQLite database file (defaults to database.path from settings)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Request parameters as JSON
        #[arg(short, long, default_value = "{}")]
        params: String,
    },
}

#[derive(Clone, ValueEnum)]
enum DialectArg {
    Postgres,
    Duckdb,
    Mysql,
    Sqlite,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Duckdb => Dialect::DuckDb,
            DialectArg::Mysql => Dialect::MySql,
            DialectArg::Sqlite => Dialect::Sqlite,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// SQL followed by its parameters
    Sql,
    /// JSON object with sql and params
    Json,
}

/// Store used by `compile`: there is none.
struct Offline;

#[derive(Debug, thiserror::Error)]
#[error("this request needs a database (HAVING column under a global filter); use `tablesift run`")]
struct NeedsDatabase;

impl QueryExecutor for Offline {
    type Error = NeedsDatabase;

    fn count(&self, _query: &Query) -> Result<CountResult, NeedsDatabase> {
        Err(NeedsDatabase)
    }

    fn select_ids(&self, _query: &Query) -> Result<Vec<Value>, NeedsDatabase> {
        Err(NeedsDatabase)
    }
}

#[derive(Serialize)]
struct RunOutput {
    total_rows: u64,
    filtered_rows: u64,
    /// `null` rather than an empty list, so table widgets keep their rows.
    rows: Option<Vec<Map<String, JsonValue>>>,
}

fn main() -> ExitCode {
    let filter =
        EnvFilter::try_from_env("TABLESIFT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Compile {
            table,
            params,
            dialect,
            output,
        } => {
            let dialect = dialect.map(Dialect::from).unwrap_or(settings.query.dialect);
            cmd_compile(&settings, table, &params, dialect, output)
        }
        Commands::Run { table, db, params } => cmd_run(&settings, table, db, &params),
    }
}

/// Load the definition, registry, base query and request parameters.
fn load_request(
    settings: &Settings,
    table: &Path,
    params: &str,
) -> Result<(ColumnRegistry, Query, RequestParams), String> {
    let definition = TableDefinition::from_file(table)
        .map_err(|e| format!("Error loading table '{}': {}", table.display(), e))?;
    let primary_key = &settings.query.primary_key;
    let registry = definition
        .registry(primary_key)
        .map_err(|e| format!("Error in table '{}': {}", table.display(), e))?;
    let base = definition.base_query(primary_key);
    let params = RequestParams::from_json(params, settings.query.default_page_size)
        .map_err(|e| format!("Error parsing params: {}", e))?;
    Ok((registry, base, params))
}

fn cmd_compile(
    settings: &Settings,
    table: PathBuf,
    params: &str,
    dialect: Dialect,
    output: OutputFormat,
) -> ExitCode {
    let (registry, base, params) = match load_request(settings, &table, params) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut filters = params.filter.clone();
    let filtered = match apply_filters(&registry, base, &mut filters, &Offline) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Row counts are unknown offline; page as if the table were larger.
    let sorted = apply_sort(&registry, filtered, &params.sort);
    let records = paginate(sorted, params.page, params.size, u64::MAX);
    let BoundSql { sql, params } = records.to_bound_sql(dialect);

    match output {
        OutputFormat::Sql => {
            println!("{}", sql);
            if !params.is_empty() {
                println!();
                for (i, value) in params.iter().enumerate() {
                    println!("-- param {}: {}", i + 1, value);
                }
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({ "sql": sql, "params": params });
            println!("{}", json);
        }
    }
    ExitCode::SUCCESS
}

fn cmd_run(settings: &Settings, table: PathBuf, db: Option<PathBuf>, params: &str) -> ExitCode {
    let (registry, base, params) = match load_request(settings, &table, params) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let db = match db.map(Ok).or_else(|| settings.database.resolved_path().transpose()) {
        Some(Ok(path)) => path,
        Some(Err(e)) => {
            eprintln!("Error resolving database path: {}", e);
            return ExitCode::FAILURE;
        }
        None => {
            eprintln!("No database given: pass --db or set database.path");
            return ExitCode::FAILURE;
        }
    };

    let executor = match SqliteExecutor::open(&db) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error opening '{}': {}", db.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let result = match TableQuery::new(&registry, &executor).query_data(base, &params) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Query error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let rows = match executor.fetch_rows(&result.records) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Query error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let output = RunOutput {
        total_rows: result.total_rows,
        filtered_rows: result.filtered_rows,
        rows: (!rows.is_empty()).then_some(rows),
    };
    match serde_json::to_string_pretty(&output) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            ExitCode::FAILURE
        }
    }
}
