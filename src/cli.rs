//! Command-line interface for `kalc`: a thin driver over [`crate::parse_source`]
//! and [`crate::analyze`].

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use crate::ast::Expr as AstExpr;
use crate::ast::Type as AstType;
use crate::{analyze, parse_source, Arena, Interner};

#[derive(Parser)]
#[command(name = "kalc")]
#[command(about = "Front end for the kalang smart-contract language", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse and semantically analyze a contract, reporting diagnostics.
    Check {
        /// Path to a `.ka` source file.
        path: PathBuf,

        /// Output format for diagnostics.
        #[arg(long, value_enum, default_value = "text")]
        format: CliOutputFormat,
    },
    /// Parse a contract and print its AST item summary, without analysis.
    Parse {
        path: PathBuf,
    },
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
pub enum CliOutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("could not read '{}': {source}", path.display())]
    ReadSource { path: PathBuf, #[source] source: std::io::Error },
    #[error("could not serialize diagnostics: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Check { path, format } => cmd_check(&path, format),
        Commands::Parse { path } => cmd_parse(&path),
    }
}

fn read_source(path: &PathBuf) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::ReadSource { path: path.clone(), source })
}

fn cmd_check(path: &PathBuf, format: CliOutputFormat) -> Result<(), CliError> {
    let filename = path.display().to_string();
    let source = read_source(path)?;
    let mut interner = Interner::new();
    let exprs: Arena<AstExpr> = Arena::new();
    let types: Arena<AstType> = Arena::new();

    let parse_start = std::time::Instant::now();
    let parsed = parse_source(&source, &mut interner, &exprs, &types);
    log::debug!("{filename}: parsed in {:?}", parse_start.elapsed());

    let analyze_start = std::time::Instant::now();
    let diagnostics = match &parsed.contract {
        Some(contract) => analyze(contract, &mut interner),
        None => Vec::new(),
    };
    log::debug!("{filename}: analyzed in {:?}", analyze_start.elapsed());

    let error_count = parsed.scan_errors.len()
        + parsed.parse_errors.len()
        + diagnostics.iter().filter(|d| d.is_error()).count();

    match format {
        CliOutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&diagnostics)?);
        }
        CliOutputFormat::Text => {
            for err in &parsed.scan_errors {
                eprintln!("{}", crate::render::render_scan_error(err, &filename, &source));
            }
            for err in &parsed.parse_errors {
                eprintln!("{}", err.display_with_source(&filename, &source));
            }
            for diag in &diagnostics {
                eprintln!("{}", crate::render::render_diagnostic(diag, &filename, &source));
            }
        }
    }

    if error_count > 0 {
        log::error!("{filename}: {error_count} error(s)");
        std::process::exit(1);
    }
    log::info!("{filename}: ok");
    Ok(())
}

fn cmd_parse(path: &PathBuf) -> Result<(), CliError> {
    let filename = path.display().to_string();
    let source = read_source(path)?;
    let mut interner = Interner::new();
    let exprs: Arena<AstExpr> = Arena::new();
    let types: Arena<AstType> = Arena::new();

    let parsed = parse_source(&source, &mut interner, &exprs, &types);
    match &parsed.contract {
        Some(contract) => {
            println!("contract {} ({} item(s))", interner.resolve(contract.name), contract.items.len());
        }
        None => eprintln!("{filename}: failed to parse"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_source_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.ka");
        let err = read_source(&missing).unwrap_err();
        assert!(matches!(err, CliError::ReadSource { .. }));
        assert!(err.to_string().contains("nope.ka"));
    }

    #[test]
    fn cmd_check_passes_on_valid_contract() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.ka");
        std::fs::write(
            &path,
            r#"
contract Token {
    #[storage]
    struct State {
        total_supply: U256,
    }

    #[create]
    fn create(supply: U256) writes State {
        State.total_supply = supply;
    }
}
"#,
        )
        .unwrap();

        cmd_check(&path, CliOutputFormat::Text).expect("well-formed contract should not error");
    }
}
