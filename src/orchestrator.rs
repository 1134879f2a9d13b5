//! Boundary between the front end and the three operations. Every call comes
//! back as [`ActionResult`]; nothing propagates as an error or panic.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::ai::{ExplainInput, ExplainOutput, Explainer, LanguageModel, TranslateInput, TranslateOutput, Translator};
use crate::executor::{CommandExecutor, ExecutionOutput, HandoffFile};
use crate::shell::ShellType;

/// Either a payload or a human-readable message, never both.
/// Serializes as `{"data": ...}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionResult<T> {
    Data(T),
    Error(String),
}

impl<T> ActionResult<T> {
    pub fn is_data(&self) -> bool {
        matches!(self, ActionResult::Data(_))
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            ActionResult::Data(data) => Ok(data),
            ActionResult::Error(message) => Err(message),
        }
    }
}

/// What an execute call should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteRequest {
    Command(String),
    /// Whatever the hand-off file holds at call time.
    Handoff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Translate,
    Explain,
    Execute,
}

impl Operation {
    fn name(&self) -> &'static str {
        match self {
            Operation::Translate => "translate",
            Operation::Explain => "explain",
            Operation::Execute => "execute",
        }
    }
}

/// In-flight flag for one operation.
#[derive(Debug, Default)]
struct Slot {
    busy: AtomicBool,
}

impl Slot {
    fn try_acquire(&self) -> Option<SlotPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SlotPermit { slot: self })
    }

    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

struct SlotPermit<'a> {
    slot: &'a Slot,
}

impl Drop for SlotPermit<'_> {
    fn drop(&mut self) {
        self.slot.busy.store(false, Ordering::Release);
    }
}

#[derive(Debug, Default)]
struct Slots {
    translate: Slot,
    explain: Slot,
    execute: Slot,
}

impl Slots {
    fn get(&self, operation: Operation) -> &Slot {
        match operation {
            Operation::Translate => &self.translate,
            Operation::Explain => &self.explain,
            Operation::Execute => &self.execute,
        }
    }
}

pub struct Orchestrator {
    translator: Translator,
    explainer: Explainer,
    executor: CommandExecutor,
    handoff: Option<HandoffFile>,
    slots: Slots,
}

impl Orchestrator {
    pub fn new(model: Arc<dyn LanguageModel>, executor: CommandExecutor) -> Self {
        Self {
            translator: Translator::new(Arc::clone(&model)),
            explainer: Explainer::new(model),
            executor,
            handoff: None,
            slots: Slots::default(),
        }
    }

    /// Record every produced command in `file` for later argument-less execution.
    pub fn with_handoff(mut self, file: HandoffFile) -> Self {
        self.handoff = Some(file);
        self
    }

    pub fn handoff(&self) -> Option<&HandoffFile> {
        self.handoff.as_ref()
    }

    pub fn shell(&self) -> ShellType {
        self.executor.shell()
    }

    pub fn is_pending(&self, operation: Operation) -> bool {
        self.slots.get(operation).is_busy()
    }

    pub async fn translate(&self, input: TranslateInput) -> ActionResult<TranslateOutput> {
        let Some(_permit) = self.slots.translate.try_acquire() else {
            return busy(Operation::Translate);
        };

        let translator = self.translator.clone();
        let task = tokio::spawn(async move { translator.translate(&input).await });

        match task.await {
            Ok(Ok(output)) => {
                info!(command = %output.command, "translated request");
                self.record_handoff(&output.command).await;
                ActionResult::Data(output)
            }
            Ok(Err(e)) => failure(Operation::Translate, e),
            Err(e) => failure(Operation::Translate, e),
        }
    }

    pub async fn explain(&self, input: ExplainInput) -> ActionResult<ExplainOutput> {
        let Some(_permit) = self.slots.explain.try_acquire() else {
            return busy(Operation::Explain);
        };

        let command = input.command.clone();
        let explainer = self.explainer.clone();
        let task = tokio::spawn(async move { explainer.explain(&input).await });

        match task.await {
            Ok(Ok(output)) => {
                info!(%command, "explained command");
                self.record_handoff(&command).await;
                ActionResult::Data(output)
            }
            Ok(Err(e)) => failure(Operation::Explain, e),
            Err(e) => failure(Operation::Explain, e),
        }
    }

    pub async fn execute(&self, request: ExecuteRequest) -> ActionResult<ExecutionOutput> {
        let Some(_permit) = self.slots.execute.try_acquire() else {
            return busy(Operation::Execute);
        };

        let executor = self.executor.clone();
        let task = match request {
            ExecuteRequest::Command(command) => {
                tokio::spawn(async move { executor.run(&command).await })
            }
            ExecuteRequest::Handoff => {
                let Some(file) = self.handoff.clone() else {
                    return failure(Operation::Execute, "hand-off mode is not enabled");
                };
                tokio::spawn(async move { executor.run_handoff(&file).await })
            }
        };

        match task.await {
            Ok(execution) => {
                if !execution.is_success() {
                    warn!("command did not complete successfully");
                }
                ActionResult::Data(execution.into_output())
            }
            Err(e) => failure(Operation::Execute, e),
        }
    }

    async fn record_handoff(&self, command: &str) {
        if let Some(file) = &self.handoff {
            if let Err(e) = file.write(command).await {
                warn!(error = %e, "could not update hand-off file");
            }
        }
    }
}

fn busy<T>(operation: Operation) -> ActionResult<T> {
    ActionResult::Error(format!("{} request already in progress", operation.name()))
}

fn failure<T>(operation: Operation, e: impl Display) -> ActionResult<T> {
    error!(operation = operation.name(), error = %e, "operation failed");
    ActionResult::Error(e.to_string())
}
