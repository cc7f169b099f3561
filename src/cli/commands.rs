//! CLI command implementations
//!
//! Every command writes exactly one JSON object to stdout: the result on
//! success, `{"status":"error",..}` on failure.

use std::path::Path;

use serde_json::{json, Value};

use crate::config::RunnerConfig;
use crate::executor::QueryRunner;
use crate::planner::ExplainPlan;
use crate::query::Query;
use crate::store::MemoryStore;
use crate::value::Document;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_json_file, read_json_input, write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run a parsed command, reporting failures on stdout
pub fn run_command(cmd: Command) -> CliResult<()> {
    let result = match cmd {
        Command::Run {
            data,
            collection,
            query,
            config,
        } => run_query(&data, &collection, query.as_deref(), config.as_deref()),
        Command::Explain { query } => explain(query.as_deref()),
    };

    if let Err(e) = &result {
        write_error(e.code_str(), e.message())?;
    }
    result
}

/// Execute a query file (or stdin line) against a dataset file
pub fn run_query(
    data: &Path,
    collection: &str,
    query: Option<&Path>,
    config: Option<&Path>,
) -> CliResult<()> {
    let config = match config {
        Some(path) => RunnerConfig::load(path)?,
        None => RunnerConfig::default(),
    };
    config.apply()?;

    let dataset = read_json_file(data)?;
    let query = read_json_input(query)?;

    let docs = execute(&dataset, collection, &query, config)?;
    write_response(docs)
}

/// Load the dataset and query, run it, and return the documents as JSON
pub fn execute(
    dataset: &Value,
    collection: &str,
    query: &Value,
    config: RunnerConfig,
) -> CliResult<Value> {
    let query = Query::from_json(query)?;
    let store = MemoryStore::from_json(dataset)?;
    let runner = QueryRunner::new(store).with_config(config);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime_error(format!("Failed to create tokio runtime: {}", e)))?;
    let docs = rt.block_on(runner.run(collection, &query))?;

    Ok(Value::Array(docs.iter().map(Document::to_json).collect()))
}

/// Print the execution strategy for a query file (or stdin line)
pub fn explain(query: Option<&Path>) -> CliResult<()> {
    let query = read_json_input(query)?;
    write_response(explain_query(&query)?)
}

/// Explain output as JSON
pub fn explain_query(query: &Value) -> CliResult<Value> {
    let query = Query::from_json(query)?;
    let plan = ExplainPlan::from_query(&query);

    Ok(json!({
        "strategy": plan.strategy.as_str(),
        "native_filters": plan.native_filters,
        "client_clauses": plan.client_clauses,
        "reasons": plan.reasons,
        "plan": plan.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use std::fs;
    use tempfile::TempDir;

    fn dataset() -> Value {
        json!({
            "users": [
                {"id": "u1", "name": "Ann", "age": 31},
                {"id": "u2", "name": "Bob", "age": 17},
                {"id": "u3", "name": "Cat", "age": 45}
            ]
        })
    }

    fn ids(value: &Value) -> Vec<String> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_execute_native() {
        let query = json!({"where": {"field": "age", "op": ">=", "value": 18}});
        let out = execute(&dataset(), "users", &query, RunnerConfig::default()).unwrap();
        assert_eq!(ids(&out), vec!["u1", "u3"]);
        assert_eq!(out[0]["data"]["name"], "Ann");
    }

    #[test]
    fn test_execute_stream() {
        let query = json!({
            "where": [
                {"field": "name", "op": "like", "value": "a"},
                {"field": "age", "op": "between[]", "value": [30, 50]}
            ],
            "limit": 1
        });
        let out = execute(&dataset(), "users", &query, RunnerConfig::default()).unwrap();
        assert_eq!(ids(&out), vec!["u3"]);
    }

    #[test]
    fn test_execute_rejects_bad_combine_with() {
        let query = json!({
            "where": {"field": "age", "op": "==", "value": 1, "combineWith": "xor"}
        });
        let err = execute(&dataset(), "users", &query, RunnerConfig::default()).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::Query("AERO_QUERY_COMBINE_WITH"));
    }

    #[test]
    fn test_execute_rejects_bad_dataset() {
        let err = execute(&json!([]), "users", &json!({}), RunnerConfig::default()).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::DataError);
    }

    #[test]
    fn test_explain_query() {
        let query = json!({"where": {"field": "tags", "op": "!in", "value": ["a"]}});
        let out = explain_query(&query).unwrap();
        assert_eq!(out["strategy"], "stream");
        assert_eq!(out["reasons"][0], "tags uses advanced operator '!in'");
    }

    #[test]
    fn test_run_query_from_files() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data.json");
        let query = dir.path().join("query.json");
        let config = dir.path().join("config.json");
        fs::write(&data, dataset().to_string()).unwrap();
        fs::write(&query, r#"{"orderBy": {"field": "age", "dir": "desc"}, "limit": 2}"#).unwrap();
        fs::write(&config, r#"{"stream_buffer": 2, "log_level": "error"}"#).unwrap();

        run_query(&data, "users", Some(&query), Some(&config)).unwrap();
    }

    #[test]
    fn test_run_query_bad_config() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data.json");
        let config = dir.path().join("config.json");
        fs::write(&data, dataset().to_string()).unwrap();
        fs::write(&config, r#"{"stream_buffer": 0}"#).unwrap();

        let err = run_query(&data, "users", None, Some(&config)).unwrap_err();
        assert_eq!(err.code_str(), "AERO_CONFIG_INVALID");
    }
}
