use eframe::egui;
use std::sync::mpsc::Sender;

use crate::engine::protocol::EngineCommand;
use crate::model::history::HistoryEntry;
use crate::ui::app::{send_command, UiState};

const SHOWN_WORDS: usize = 5;

pub fn draw_right_panel(ctx: &egui::Context, state: &mut UiState, cmd_tx: &Sender<EngineCommand>) {
    egui::SidePanel::right("analysis")
        .resizable(true)
        .default_width(300.0)
        .min_width(220.0)
        .show(ctx, |ui| {
            ui.heading("📊 Analyse du texte");
            ui.separator();

            match &state.current {
                Some(entry) => draw_analysis(ui, entry),
                None => {
                    ui.label("Aucun récit pour l'instant.");
                }
            }

            ui.separator();
            ui.heading("Historique");

            let mut reload: Option<usize> = None;
            egui::ScrollArea::vertical().show(ui, |ui| {
                if state.history.is_empty() {
                    ui.label("Vide");
                }
                for (i, entry) in state.history.iter().enumerate() {
                    ui.group(|ui| {
                        ui.label(history_title(entry));
                        ui.label(egui::RichText::new(preview(&entry.story)).small());
                        if ui
                            .add_enabled(!state.busy, egui::Button::new("Recharger").small())
                            .clicked()
                        {
                            reload = Some(i);
                        }
                    });
                }
            });

            if let Some(i) = reload {
                send_command(state, cmd_tx, EngineCommand::ReloadEntry(i));
            }
        });
}

fn draw_analysis(ui: &mut egui::Ui, entry: &HistoryEntry) {
    let analysis = &entry.analysis;

    ui.label(format!("Nombre de mots : {}", analysis.word_count));
    ui.label(format!("Score de divergence : {:.1}%", analysis.divergence_score));

    ui.add_space(6.0);
    ui.label(egui::RichText::new("🔤 Mots les plus fréquents").strong());
    for (word, count) in analysis.common_words.iter().take(SHOWN_WORDS) {
        ui.label(format!("• {word} : {count}"));
    }
}

fn history_title(entry: &HistoryEntry) -> String {
    let marker = if entry.is_fallback { " (secours)" } else { "" };
    format!(
        "{} · {}{}",
        entry.timestamp.format("%H:%M:%S"),
        entry.parameters.epoch,
        marker
    )
}

fn preview(story: &str) -> String {
    const LIMIT: usize = 80;
    if story.chars().count() <= LIMIT {
        story.to_string()
    } else {
        let head: String = story.chars().take(LIMIT).collect();
        format!("{}…", head.trim_end())
    }
}
