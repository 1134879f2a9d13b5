use super::{ScriptedModel, TestUtils};
use crate::ai::ExplainInput;
use crate::session::{ExplanationForm, SaveCommandForm, SessionError, TranslationForm};
use crate::shell::TargetOs;
use crate::store::{CommandEntry, EntryKind, HistoryLog, KeyValueStore, HISTORY_KEY};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn form(query: &str) -> TranslationForm {
    TranslationForm {
        query: query.to_string(),
        operating_system: TargetOs::Linux,
    }
}

#[tokio::test]
async fn test_successful_translation_prepends_one_entry() {
    let model = Arc::new(ScriptedModel::reply(r#"{"command": "du -sh *"}"#));
    let (session, _store) = TestUtils::session_with(model);

    session.translate(form("show size of each folder")).await.unwrap();
    let output = session.translate(form("show size of each item here")).await.unwrap();
    assert_eq!(output.command, "du -sh *");

    let history = session.history().await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].kind, EntryKind::Translation);
    assert_eq!(history[0].output, "du -sh *");
    assert_eq!(history[0].input.summary(), "show size of each item here");
    assert_ne!(history[0].id, history[1].id);
}

#[tokio::test]
async fn test_failed_translation_leaves_history_alone() {
    let model = Arc::new(ScriptedModel::failing("connection reset"));
    let (session, _store) = TestUtils::session_with(model);

    let err = session.translate(form("list all running processes")).await.unwrap_err();
    assert!(matches!(err, SessionError::Action(ref m) if m.contains("connection reset")));
    assert!(session.history().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_command_reply_is_not_recorded() {
    let model = Arc::new(ScriptedModel::reply(r#"{"command": "   "}"#));
    let (session, _store) = TestUtils::session_with(model);

    let result = session.translate(form("show the current date and time")).await;
    assert!(matches!(result, Err(SessionError::Action(_))));
    assert!(session.history().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_short_query_never_reaches_the_model() {
    let model = Arc::new(ScriptedModel::reply(r#"{"command": "ls"}"#));
    let (session, _store) = TestUtils::session_with(Arc::clone(&model));

    let err = session.translate(form("ls")).await.unwrap_err();
    assert_eq!(err.to_string(), "Please enter a more descriptive query.");
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_explanation_is_recorded() {
    let model = Arc::new(ScriptedModel::reply(r#"{"explanation": "Prints the working directory."}"#));
    let (session, _store) = TestUtils::session_with(model);

    let output = session
        .explain(ExplanationForm { command: " pwd ".to_string() })
        .await
        .unwrap();
    assert_eq!(output.explanation, "Prints the working directory.");

    let history = session.history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, EntryKind::Explanation);
    assert_eq!(history[0].input.summary(), "pwd");
}

#[tokio::test]
async fn test_clear_history_is_idempotent() {
    let model = Arc::new(ScriptedModel::reply(r#"{"command": "uptime"}"#));
    let (session, store) = TestUtils::session_with(model);
    session.translate(form("how long has this box been up")).await.unwrap();

    session.clear_history().await.unwrap();
    assert!(session.history().await.unwrap().is_empty());
    session.clear_history().await.unwrap();
    assert!(session.history().await.unwrap().is_empty());

    assert_eq!(store.load(HISTORY_KEY).await.unwrap().as_deref(), Some("[]"));
}

#[tokio::test]
async fn test_saved_command_round_trip() {
    let (session, _store) = TestUtils::session_with(Arc::new(ScriptedModel::default()));
    session
        .save_command(SaveCommandForm {
            command: "df -h".to_string(),
            description: "disk usage".to_string(),
        })
        .await
        .unwrap();

    let saved = session
        .save_command(SaveCommandForm {
            command: "ls -la".to_string(),
            description: "list files".to_string(),
        })
        .await
        .unwrap();

    let library = session.saved_commands().await.unwrap();
    assert_eq!(library[0].command, "ls -la");
    assert_eq!(library[0].description, "list files");

    assert!(session.delete_saved(saved.id).await.unwrap());
    let library = session.saved_commands().await.unwrap();
    assert!(library.iter().all(|item| item.id != saved.id));
    assert_eq!(library.len(), 1);
}

#[tokio::test]
async fn test_save_form_is_validated() {
    let (session, _store) = TestUtils::session_with(Arc::new(ScriptedModel::default()));
    let result = session
        .save_command(SaveCommandForm {
            command: "ls".to_string(),
            description: "ls".to_string(),
        })
        .await;

    assert!(matches!(result, Err(SessionError::Invalid(_))));
    assert!(session.saved_commands().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_history_pages_of_five() {
    let (session, store) = TestUtils::session_with(Arc::new(ScriptedModel::default()));
    let history = HistoryLog::new(store as Arc<dyn KeyValueStore>);
    for n in (0..12).rev() {
        let input = ExplainInput { command: format!("cmd{}", n) };
        history.record(CommandEntry::explanation(input, "...")).await.unwrap();
    }

    let first = session.history_page(0).await.unwrap();
    let names: Vec<&str> = first.entries.iter().map(|e| e.input.summary()).collect();
    assert_eq!(names, vec!["cmd0", "cmd1", "cmd2", "cmd3", "cmd4"]);
    assert!(!first.has_previous);
    assert!(first.has_next);

    let last = session.history_page(2).await.unwrap();
    let names: Vec<&str> = last.entries.iter().map(|e| e.input.summary()).collect();
    assert_eq!(names, vec!["cmd10", "cmd11"]);
    assert_eq!(last.total_pages, 3);
    assert_eq!(last.total_entries, 12);
    assert!(!last.has_next);
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_output_is_not_persisted() {
    let (session, _store) = TestUtils::session_with(Arc::new(ScriptedModel::default()));

    let output = session
        .run(crate::orchestrator::ExecuteRequest::Command("echo transient".to_string()))
        .await
        .unwrap();
    assert_eq!(output.stdout, "transient\n");
    assert!(session.history().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_export_rejects_blank_command() {
    let (session, _store) = TestUtils::session_with(Arc::new(ScriptedModel::default()));
    let temp = tempfile::tempdir().unwrap();

    let result = session.export("   ", temp.path()).await;
    assert!(matches!(result, Err(SessionError::Invalid(_))));
}
