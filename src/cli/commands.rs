//! CLI command implementations
//!
//! Each command builds its own manager from the config file. Command
//! bodies return the JSON payload; `run_command` owns stdout.

use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::{json, Value};
use tracing::debug;

use crate::config::ManagerConfig;
use crate::operation::{Operation, OperationKind};
use crate::registry::{ModelLoader, ModelManager};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{error_response, ok_response, read_document, write_line};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    execute(cmd, io::stdin().lock(), io::stdout().lock())
}

/// Run a command against the given input and output streams.
///
/// Every outcome, including unreadable input, ends with exactly one
/// response line on `out`.
pub fn execute(cmd: Command, input: impl Read, mut out: impl Write) -> CliResult<()> {
    let outcome = match cmd {
        Command::Check { config } => check(&config),
        Command::Validate {
            config,
            model,
            operation,
        } => validate_input(&config, &model, operation.into(), input),
    };

    match outcome {
        Ok(data) => write_line(&mut out, &ok_response(data)),
        Err(e) => {
            write_line(&mut out, &error_response(e.code(), &e.to_string()))?;
            Err(e)
        }
    }
}

fn validate_input(
    config_path: &Path,
    model: &str,
    operation: OperationKind,
    input: impl Read,
) -> CliResult<Value> {
    let record = read_document(input)?;
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::Startup(format!("Failed to create tokio runtime: {}", e)))?;
    rt.block_on(validate(config_path, model, operation, record))
}

/// Build a manager with every model definition registered
pub fn load_manager(config_path: &Path) -> CliResult<ModelManager> {
    let config = ManagerConfig::load(config_path)?;
    let loader = ModelLoader::new(config.models_dir.clone());
    let mut manager = ModelManager::with_config(config);

    let loaded = loader.load_all(&mut manager)?;
    debug!(models = loaded.len(), dir = %loader.models_dir().display(), "loaded model definitions");
    Ok(manager)
}

/// Load every model definition and list the registered models
pub fn check(config_path: &Path) -> CliResult<Value> {
    let manager = load_manager(config_path)?;
    Ok(json!({ "models": manager.model_names() }))
}

/// Validate one record and return the validation report
pub async fn validate(
    config_path: &Path,
    model: &str,
    operation: OperationKind,
    record: Value,
) -> CliResult<Value> {
    let manager = load_manager(config_path)?;
    let record = manager.record_from_json(model, record)?;

    let result = manager
        .validate(&record, &Operation::new(operation), None)
        .await?;
    Ok(serde_json::to_value(&result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OperationArg;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("models")).unwrap();
        fs::write(
            dir.path().join("modelmeta.json"),
            r#"{"modelsDir": "models", "validation": {"timeoutMs": 1000}}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("models").join("user.json"),
            r#"{
                "name": "User",
                "fields": [
                    {"type": "auto_number", "name": "id", "options": {"primaryKey": true}},
                    {"type": "text", "name": "name", "options": {"minLength": 2}},
                    {"type": "integer", "name": "age", "options": {"required": false, "minValue": 0}}
                ]
            }"#,
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_check_lists_models() {
        let dir = setup();
        let data = check(&dir.path().join("modelmeta.json")).unwrap();
        assert_eq!(data, json!({"models": ["User"]}));
    }

    #[test]
    fn test_check_missing_config() {
        let dir = TempDir::new().unwrap();
        let err = check(&dir.path().join("modelmeta.json")).unwrap_err();
        assert_eq!(err.code(), "MODEL_LOAD_FAILED");
    }

    #[tokio::test]
    async fn test_validate_reports_errors() {
        let dir = setup();
        let data = validate(
            &dir.path().join("modelmeta.json"),
            "User",
            OperationKind::Create,
            json!({"name": "A", "age": -1, "nickname": "x"}),
        )
        .await
        .unwrap();

        assert_eq!(data["valid"], json!(false));
        assert_eq!(data["fieldErrors"]["name"][0]["code"], json!("min_string_length"));
        assert_eq!(data["fieldErrors"]["age"][0]["code"], json!("min_value"));
        assert_eq!(data["modelErrors"][0]["code"], json!("extra_field"));
    }

    #[tokio::test]
    async fn test_validate_clean_record() {
        let dir = setup();
        let data = validate(
            &dir.path().join("modelmeta.json"),
            "User",
            OperationKind::Create,
            json!({"name": "Ann"}),
        )
        .await
        .unwrap();
        assert_eq!(data["valid"], json!(true));
    }

    #[tokio::test]
    async fn test_validate_unknown_model() {
        let dir = setup();
        let err = validate(
            &dir.path().join("modelmeta.json"),
            "Ghost",
            OperationKind::Create,
            json!({}),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), "MODEL_NOT_REGISTERED");
    }

    fn run_validate(dir: &TempDir, input: &str) -> (CliResult<()>, Value) {
        let cmd = Command::Validate {
            config: dir.path().join("modelmeta.json"),
            model: "User".into(),
            operation: OperationArg::Create,
        };
        let mut out = Vec::new();
        let outcome = execute(cmd, input.as_bytes(), &mut out);
        let response = serde_json::from_slice(&out).unwrap();
        (outcome, response)
    }

    #[test]
    fn test_execute_writes_report() {
        let dir = setup();
        let (outcome, response) = run_validate(&dir, r#"{"name": "Ann"}"#);
        assert!(outcome.is_ok());
        assert_eq!(response["status"], json!("ok"));
        assert_eq!(response["data"]["valid"], json!(true));
    }

    #[test]
    fn test_empty_input_writes_error_envelope() {
        let dir = setup();
        let (outcome, response) = run_validate(&dir, "   ");
        assert_eq!(outcome.unwrap_err().code(), "MODELMETA_CLI_IO_ERROR");
        assert_eq!(response["status"], json!("error"));
        assert_eq!(response["code"], json!("MODELMETA_CLI_IO_ERROR"));
    }

    #[test]
    fn test_malformed_input_writes_error_envelope() {
        let dir = setup();
        let (outcome, response) = run_validate(&dir, "{not json");
        assert!(outcome.is_err());
        assert_eq!(response["status"], json!("error"));
        assert!(response["message"].as_str().unwrap().contains("JSON"));
    }
}
