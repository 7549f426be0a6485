use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::model::history::HistoryEntry;

/// Plain-text record: parameter header, blank line, narrative body.
pub fn render_record(entry: &HistoryEntry) -> String {
    let p = &entry.parameters;
    format!(
        "Époque : {}\nParamètres : Tech={}, Social={}, Fantasy={}\n\n{}",
        p.epoch, p.tech_level, p.social_change, p.fantasy_elements, entry.story
    )
}

pub fn file_name(entry: &HistoryEntry) -> String {
    format!(
        "recit_{}_{}.txt",
        entry.parameters.epoch.replace(' ', "_"),
        entry.timestamp.format("%Y%m%d_%H%M%S")
    )
}

pub fn save_record(dir: &Path, entry: &HistoryEntry) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("cannot create {}", dir.display()))?;

    let path = dir.join(file_name(entry));
    fs::write(&path, render_record(entry))
        .with_context(|| format!("cannot write {}", path.display()))?;

    tracing::info!(path = %path.display(), "narrative saved");
    Ok(path)
}
