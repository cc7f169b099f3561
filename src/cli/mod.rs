//! Command-line interface
//!
//! - run: execute a query against a JSON dataset
//! - explain: show the execution strategy for a query

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{execute, explain, explain_query, run, run_command, run_query};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json_file, read_request, write_error, write_response};
