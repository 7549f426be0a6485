use std::sync::mpsc::{Receiver, Sender};

use crate::engine::export;
use crate::engine::generation::{GenerationClient, RetryPolicy};
use crate::engine::llm_client::{backend_from_settings, ChatBackend};
use crate::engine::orchestrator::Orchestrator;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::settings::AppSettings;

/// Worker that owns the session and serves UI commands one at a time.
pub struct Engine {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    orchestrator: Orchestrator,
    settings: AppSettings,
}

impl Engine {
    pub fn new(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        settings: AppSettings,
    ) -> Self {
        let client = GenerationClient::new(backend_from_settings(&settings.backend))
            .with_policy(RetryPolicy::from(&settings.retry));

        Self::with_orchestrator(rx, tx, Orchestrator::new(client), settings)
    }

    pub fn with_orchestrator(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        orchestrator: Orchestrator,
        settings: AppSettings,
    ) -> Self {
        Self {
            rx,
            tx,
            orchestrator,
            settings,
        }
    }

    /// Runs until the UI side hangs up.
    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            let response = self.handle(cmd);
            if self.tx.send(response).is_err() {
                break;
            }
        }
        tracing::debug!("engine stopped");
    }

    fn handle(&mut self, cmd: EngineCommand) -> EngineResponse {
        match cmd {
            EngineCommand::Generate(params) => {
                let report = self.orchestrator.generate(&params);
                EngineResponse::Generated {
                    report,
                    history: self.orchestrator.history().list().to_vec(),
                }
            }

            EngineCommand::SaveCurrent { dir } => match self.orchestrator.current() {
                Some(entry) => match export::save_record(&dir, entry) {
                    Ok(path) => EngineResponse::Saved(path),
                    Err(e) => {
                        tracing::error!(error = %format!("{e:#}"), "save failed");
                        EngineResponse::Error(format!("Erreur lors de la sauvegarde : {e:#}"))
                    }
                },
                None => EngineResponse::Error("Aucun récit à sauvegarder.".into()),
            },

            EngineCommand::ReloadEntry(index) => match self.orchestrator.reload(index) {
                Some(entry) => EngineResponse::CurrentChanged(entry.clone()),
                None => EngineResponse::Error(format!("Entrée d'historique {index} introuvable.")),
            },

            EngineCommand::ClearHistory => {
                self.orchestrator.clear_history();
                EngineResponse::HistoryChanged(Vec::new())
            }

            EngineCommand::TestConnection => {
                let result = ChatBackend::from_settings(&self.settings.backend)
                    .map_err(anyhow::Error::from)
                    .and_then(|backend| backend.test_connection());
                match result {
                    Ok(status) => EngineResponse::Connection(status),
                    Err(e) => EngineResponse::Error(format!("Connexion impossible : {e:#}")),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    use crate::engine::fallback::RENAISSANCE_STORY;
    use crate::engine::testing::{RecordingPacer, ScriptedBackend};
    use crate::model::parameters::GenerationParameters;

    fn run_script(commands: Vec<EngineCommand>) -> Vec<EngineResponse> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        let client = GenerationClient::new(Box::new(ScriptedBackend::failing()))
            .with_pacer(Box::new(RecordingPacer::default()));
        let mut engine = Engine::with_orchestrator(
            cmd_rx,
            resp_tx,
            Orchestrator::new(client),
            AppSettings::default(),
        );

        for cmd in commands {
            cmd_tx.send(cmd).unwrap();
        }
        drop(cmd_tx);
        engine.run();

        resp_rx.try_iter().collect()
    }

    #[test]
    fn serves_commands_in_order() {
        let responses = run_script(vec![
            EngineCommand::ReloadEntry(0),
            EngineCommand::Generate(GenerationParameters::default()),
            EngineCommand::ReloadEntry(0),
            EngineCommand::ClearHistory,
        ]);

        assert_eq!(responses.len(), 4);
        assert!(matches!(responses[0], EngineResponse::Error(_)));
        match &responses[1] {
            EngineResponse::Generated { report, history } => {
                assert_eq!(report.entry.story, RENAISSANCE_STORY);
                assert!(report.notice.is_some());
                assert_eq!(history.len(), 1);
            }
            _ => panic!("expected a generated story"),
        }
        assert!(matches!(&responses[2], EngineResponse::CurrentChanged(e) if e.is_fallback));
        assert!(matches!(&responses[3], EngineResponse::HistoryChanged(h) if h.is_empty()));
    }

    #[test]
    fn save_without_story_is_an_error() {
        let responses = run_script(vec![EngineCommand::SaveCurrent {
            dir: std::env::temp_dir(),
        }]);
        assert!(matches!(responses[0], EngineResponse::Error(_)));
    }
}
