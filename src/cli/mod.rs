//! CLI module for the typesystem interpreter
//!
//! ## Commands
//!
//! - `check <file>` - Parse a typesystem document (and everything it loads) and report warnings
//! - `dump <file>` - List the registered entries, optionally as JSON
//! - `signature <sig>` - Show how a function signature decomposes
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use crate::version::TYPESYS_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// Parsed, but warnings were reported under `--deny-warnings`.
    pub const WARNINGS: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create an error with a custom exit code.
    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self::new(message, ExitCode(code))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Interpreter for typesystem binding-metadata documents
#[derive(Parser, Debug)]
#[command(name = "typesys")]
#[command(version = TYPESYS_VERSION)]
#[command(about = "Interpreter for typesystem binding-metadata documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Document to check (default action when no subcommand given)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Options shared by every command that parses a document.
#[derive(Args, Debug, Clone, Default)]
pub struct ParseOptions {
    /// Treat the document as provided by another module (generate nothing)
    #[arg(long = "no-generate")]
    pub no_generate: bool,

    /// API version being generated; tags with a later `since` are ignored
    #[arg(long = "api-version", value_name = "VERSION")]
    pub api_version: Option<f64>,

    /// Extra directory searched for documents named by `load-typesystem`
    #[arg(short = 'I', long = "typesystem-path", value_name = "DIR")]
    pub typesystem_paths: Vec<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a document and report warnings
    Check {
        /// Typesystem document
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        options: ParseOptions,
        /// Exit with status 2 when any warning was reported
        #[arg(long = "deny-warnings")]
        deny_warnings: bool,
    },

    /// List the entries a document registers
    Dump {
        /// Typesystem document
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        options: ParseOptions,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Decompose a function signature
    Signature {
        /// Signature such as `foo(int, const Bar &b = Bar())`
        #[arg(value_name = "SIGNATURE")]
        signature: String,
        /// Return type
        #[arg(long = "return-type", value_name = "TYPE", default_value = "void")]
        return_type: String,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Some(Command::Check {
            file,
            options,
            deny_warnings,
        }) => commands::check_file(&file, &options, deny_warnings),
        Some(Command::Dump { file, options, json }) => commands::dump_file(&file, &options, json),
        Some(Command::Signature { signature, return_type }) => commands::show_signature(&signature, &return_type),
        None => {
            // Default: check the file if provided
            if let Some(file) = cli.file {
                commands::check_file(&file, &ParseOptions::default(), false)
            } else {
                Err(CliError::failure("Error: no typesystem document given (see --help)"))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
