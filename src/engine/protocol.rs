use std::path::PathBuf;

use crate::engine::orchestrator::CycleReport;
use crate::model::history::HistoryEntry;
use crate::model::parameters::GenerationParameters;

pub enum EngineCommand {
    Generate(GenerationParameters),
    SaveCurrent { dir: PathBuf },
    ReloadEntry(usize),
    ClearHistory,
    TestConnection,
}

pub enum EngineResponse {
    Generated {
        report: CycleReport,
        history: Vec<HistoryEntry>,
    },

    CurrentChanged(HistoryEntry),
    HistoryChanged(Vec<HistoryEntry>),
    Saved(PathBuf),
    Connection(String),
    Error(String),
}
