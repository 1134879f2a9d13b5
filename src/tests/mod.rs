use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::ai::{AIError, LanguageModel};
use crate::executor::CommandExecutor;
use crate::orchestrator::Orchestrator;
use crate::session::Session;
use crate::store::{KeyValueStore, MemoryStore};

mod handoff_flow;
mod session;

/// Stand-in model that answers every prompt the same way.
pub(crate) struct ScriptedModel {
    reply: Result<String, String>,
    calls: AtomicUsize,
    gate: Option<Gate>,
}

/// Holds the first call until released.
struct Gate {
    entered: Notify,
    release: Notify,
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self::reply("{}")
    }
}

impl ScriptedModel {
    pub fn reply(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            ..Self::default()
        }
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Gate {
            entered: Notify::new(),
            release: Notify::new(),
        });
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn wait_until_called(&self) {
        if let Some(gate) = &self.gate {
            gate.entered.notified().await;
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.release.notify_one();
        }
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, _system: &str, _prompt: &str) -> Result<String, AIError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let (0, Some(gate)) = (call, &self.gate) {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        self.reply.clone().map_err(AIError::NetworkError)
    }
}

pub(crate) struct TestUtils;

impl TestUtils {
    pub fn session_with(model: Arc<ScriptedModel>) -> (Session, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let orchestrator = Orchestrator::new(model, CommandExecutor::default());
        let session = Session::new(orchestrator, Arc::clone(&store) as Arc<dyn KeyValueStore>, 5);
        (session, store)
    }
}
