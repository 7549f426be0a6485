use chrono::Local;

use crate::engine::analyzer::TextAnalyzer;
use crate::engine::fallback;
use crate::engine::generation::{Generation, GenerationClient};
use crate::engine::prompt_builder::PromptBuilder;
use crate::model::history::{HistoryEntry, HistoryStore};
use crate::model::parameters::{GenerationParameters, ParameterError};

/// Outcome of one generate cycle. `entry` is always filled.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub entry: HistoryEntry,

    /// Informational: the canned story was used
    pub notice: Option<String>,

    /// The request itself was malformed
    pub error: Option<String>,
}

/// Session state: one per user session, owned by whoever drives it.
pub struct Orchestrator {
    client: GenerationClient,
    history: HistoryStore,
    current: Option<HistoryEntry>,
}

impl Orchestrator {
    pub fn new(client: GenerationClient) -> Self {
        Self {
            client,
            history: HistoryStore::default(),
            current: None,
        }
    }

    pub fn generate(&mut self, params: &GenerationParameters) -> CycleReport {
        match self.produce(params) {
            Ok(generation) => {
                let entry = self.record(params, generation.story, generation.is_fallback);
                CycleReport {
                    entry,
                    notice: generation.notice,
                    error: None,
                }
            }
            Err(err) => {
                tracing::error!(%err, epoch = %params.epoch, "invalid generation request");
                let story = fallback::story_for_prompt(&params.epoch).to_string();
                let entry = self.record(params, story, true);
                CycleReport {
                    entry,
                    notice: None,
                    error: Some(format!("Paramètres invalides : {err}")),
                }
            }
        }
    }

    fn produce(&self, params: &GenerationParameters) -> Result<Generation, ParameterError> {
        let epoch = params.resolve()?;
        let prompt = PromptBuilder::build(
            epoch,
            params.tech_level,
            params.social_change,
            params.fantasy_elements,
            params.length_tier,
        );
        tracing::debug!(epoch = epoch.name, prompt_chars = prompt.len(), "prompt built");

        Ok(self.client.generate(&prompt))
    }

    fn record(&mut self, params: &GenerationParameters, story: String, is_fallback: bool) -> HistoryEntry {
        let analysis = TextAnalyzer::analyze(&story);
        let entry = HistoryEntry {
            story,
            parameters: params.clone(),
            timestamp: Local::now(),
            analysis,
            is_fallback,
        };

        self.history.record(entry.clone());
        self.current = Some(entry.clone());
        entry
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Makes a past entry current again.
    pub fn reload(&mut self, index: usize) -> Option<&HistoryEntry> {
        let entry = self.history.get(index)?.clone();
        self.current = Some(entry);
        self.current.as_ref()
    }

    /// Forgets past entries. The displayed story stays.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
