use super::ScriptedModel;
use crate::ai::{ExplainInput, TranslateInput};
use crate::executor::{CommandExecutor, HandoffFile};
use crate::orchestrator::{ActionResult, ExecuteRequest, Orchestrator};
use crate::shell::{ShellType, TargetOs};
use std::sync::Arc;
use tempfile::tempdir;

fn orchestrator(model: ScriptedModel, handoff: HandoffFile) -> Orchestrator {
    Orchestrator::new(Arc::new(model), CommandExecutor::new(ShellType::Bash)).with_handoff(handoff)
}

#[cfg(unix)]
#[tokio::test]
async fn test_translate_then_run_without_arguments() {
    let temp = tempdir().unwrap();
    let handoff = HandoffFile::new(temp.path().join("last_command.sh"), ShellType::Bash);
    let orchestrator = orchestrator(ScriptedModel::reply(r#"{"command": "echo hi"}"#), handoff.clone());

    let translated = orchestrator
        .translate(TranslateInput {
            natural_language_query: "say hi to me please".to_string(),
            operating_system: TargetOs::Linux,
        })
        .await;
    assert!(translated.is_data());

    let script = std::fs::read_to_string(handoff.path()).unwrap();
    assert!(script.lines().any(|line| line == "echo hi"));

    match orchestrator.execute(ExecuteRequest::Handoff).await {
        ActionResult::Data(output) => assert!(output.stdout.contains("hi")),
        ActionResult::Error(e) => panic!("Execution failed: {}", e),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_handoff_is_read_fresh_on_every_run() {
    let temp = tempdir().unwrap();
    let handoff = HandoffFile::new(temp.path().join("last_command.sh"), ShellType::Bash);
    let orchestrator = orchestrator(
        ScriptedModel::reply(r#"{"explanation": "Prints text."}"#),
        handoff.clone(),
    );

    let explained = orchestrator
        .explain(ExplainInput { command: "echo first".to_string() })
        .await;
    assert!(explained.is_data());
    let first = orchestrator.execute(ExecuteRequest::Handoff).await.into_result().unwrap();
    assert_eq!(first.stdout, "first\n");

    handoff.write("echo second").await.unwrap();
    let second = orchestrator.execute(ExecuteRequest::Handoff).await.into_result().unwrap();
    assert_eq!(second.stdout, "second\n");
}

#[tokio::test]
async fn test_missing_handoff_file_is_error_shaped_output() {
    let temp = tempdir().unwrap();
    let handoff = HandoffFile::new(temp.path().join("never_written.sh"), ShellType::Bash);
    let orchestrator = orchestrator(ScriptedModel::default(), handoff);

    let output = orchestrator.execute(ExecuteRequest::Handoff).await.into_result().unwrap();
    assert_eq!(output.stdout, "");
    assert!(output.stderr.contains("never_written.sh"));
}

#[tokio::test]
async fn test_failed_translation_keeps_previous_handoff() {
    let temp = tempdir().unwrap();
    let handoff = HandoffFile::new(temp.path().join("last_command.sh"), ShellType::Bash);
    handoff.write("echo kept").await.unwrap();
    let orchestrator = orchestrator(ScriptedModel::failing("quota exhausted"), handoff.clone());

    let result = orchestrator
        .translate(TranslateInput {
            natural_language_query: "delete the temp folder".to_string(),
            operating_system: TargetOs::Linux,
        })
        .await;

    assert_eq!(result, ActionResult::Error("Network error: quota exhausted".to_string()));
    assert_eq!(handoff.read_command().await.unwrap(), "echo kept");
}
