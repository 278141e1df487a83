mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sqlbridge_core::{Dialect, Error as CoreError, Length};
use sqlbridge_guard::{ExpressionError, ExpressionKind, ExpressionValidator, OptionsError};
use thiserror::Error;

use commands::Hints;
use config::load_config;
use logging::init_logging;

#[derive(Debug, Error)]
enum CliError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    Rejected(#[from] ExpressionError),
    #[error("invalid validator options: {0}")]
    Options(#[from] OptionsError),
    #[error("no {dialect} mapping for '{type_name}'")]
    Unmapped { dialect: Dialect, type_name: String },
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "sqlbridge", version, about = "SQL dialect type mapping and expression checks")]
struct Cli {
    /// TOML config with [validator] and [logging] sections.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Append JSON log lines to this file instead of stderr.
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Map a native type name (e.g. `Nullable<Decimal>`) to SQL.
    Map(MapArgs),
    /// Map a SQL type name back to a native type.
    Reverse(ReverseArgs),
    /// Print the canonical form of a native type name.
    Render(RenderArgs),
    /// Parse a provider override string.
    Overrides(OverridesArgs),
    /// Check a raw SQL expression.
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct MapArgs {
    #[arg(value_name = "NATIVE_TYPE")]
    native_type: String,
    /// Target dialect (name or alias such as `pg`, `mssql`).
    #[arg(long, short)]
    dialect: Dialect,
    /// Length hint: a positive number or `max`.
    #[arg(long, value_parser = parse_length)]
    length: Option<Length>,
    #[arg(long)]
    precision: Option<u16>,
    #[arg(long, requires = "precision")]
    scale: Option<u16>,
    /// Prefer non-unicode text types.
    #[arg(long, default_value_t = false)]
    ascii: bool,
    /// Prefer fixed-length text and binary types.
    #[arg(long, default_value_t = false)]
    fixed: bool,
    /// Provider overrides, e.g. `{mysql:json,pg:jsonb}`.
    #[arg(long, value_name = "OVERRIDES")]
    overrides: Option<String>,
}

#[derive(Args, Debug)]
struct ReverseArgs {
    #[arg(value_name = "SQL_TYPE")]
    sql_type: String,
    #[arg(long, short)]
    dialect: Dialect,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[arg(value_name = "NATIVE_TYPE")]
    native_type: String,
}

#[derive(Args, Debug)]
struct OverridesArgs {
    #[arg(value_name = "OVERRIDES")]
    text: String,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    #[arg(value_enum)]
    kind: KindArg,
    #[arg(value_name = "EXPRESSION")]
    expression: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    View,
    Check,
    Default,
}

impl From<KindArg> for ExpressionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::View => ExpressionKind::View,
            KindArg::Check => ExpressionKind::Check,
            KindArg::Default => ExpressionKind::Default,
        }
    }
}

fn parse_length(text: &str) -> Result<Length, String> {
    Length::parse(text).ok_or_else(|| format!("expected a positive number or 'max', got '{text}'"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.logging, cli.log_file.as_deref())?;

    let output = match cli.command {
        Command::Map(args) => {
            let hints = Hints {
                length: args.length,
                precision: args.precision,
                scale: args.scale,
                ascii: args.ascii,
                fixed: args.fixed,
            };
            commands::map_native(
                &args.native_type,
                args.dialect,
                &hints,
                args.overrides.as_deref(),
            )?
        }
        Command::Reverse(args) => commands::reverse_sql(&args.sql_type, args.dialect)?,
        Command::Render(args) => commands::render(&args.native_type)?,
        Command::Overrides(args) => commands::overrides(&args.text)?,
        Command::Validate(args) => {
            let validator = ExpressionValidator::new(&config.validator)?;
            commands::validate(&validator, args.kind.into(), &args.expression)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
