use eframe::egui;
use std::sync::mpsc::Sender;

use crate::engine::protocol::EngineCommand;
use crate::model::epoch::{find_epoch, EPOCHS};
use crate::model::parameters::LengthTier;
use crate::ui::app::{send_command, UiState};

pub fn draw_left_panel(ctx: &egui::Context, state: &mut UiState, cmd_tx: &Sender<EngineCommand>) {
    egui::SidePanel::left("parameters")
        .resizable(false)
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.heading("Paramètres de génération");
            ui.separator();

            draw_epoch_picker(ui, state);
            ui.separator();
            draw_divergence_sliders(ui, state);
            ui.separator();
            draw_actions(ui, state, cmd_tx);

            ui.separator();
            ui.collapsing("Options", |ui| {
                ui.label("Échelle de l'interface");
                if ui
                    .add(egui::Slider::new(&mut state.ui_scale, 0.75..=2.0))
                    .changed()
                {
                    state.settings_dirty = true;
                }

                ui.label(format!("Dossier : {}", state.save_dir.display()));
                if ui.button("Changer de dossier…").clicked() {
                    if let Some(dir) = rfd::FileDialog::new()
                        .set_directory(&state.save_dir)
                        .pick_folder()
                    {
                        state.save_dir = dir;
                        state.settings_dirty = true;
                    }
                }

                if ui
                    .add_enabled(!state.busy, egui::Button::new("Tester la connexion"))
                    .clicked()
                {
                    state.clear_messages();
                    send_command(state, cmd_tx, EngineCommand::TestConnection);
                }
            });
        });
}

fn draw_epoch_picker(ui: &mut egui::Ui, state: &mut UiState) {
    egui::ComboBox::from_label("Époque")
        .selected_text(state.params.epoch.clone())
        .show_ui(ui, |ui| {
            for epoch in &EPOCHS {
                ui.selectable_value(&mut state.params.epoch, epoch.name.to_string(), epoch.name);
            }
        });

    if let Some(epoch) = find_epoch(&state.params.epoch) {
        ui.label(egui::RichText::new(epoch.description).italics());
        ui.label(format!("Thèmes : {}", epoch.keywords.join(", ")));
    }
}

fn draw_divergence_sliders(ui: &mut egui::Ui, state: &mut UiState) {
    ui.label("Paramètres de divergence");

    ui.add(egui::Slider::new(&mut state.params.tech_level, 0..=100).text("Technologie"))
        .on_hover_text("0 = technologies de l'époque, 100 = technologies très avancées");
    ui.add(egui::Slider::new(&mut state.params.social_change, 0..=100).text("Société"))
        .on_hover_text("0 = société identique, 100 = société radicalement différente");
    ui.add(egui::Slider::new(&mut state.params.fantasy_elements, 0..=100).text("Fantastique"))
        .on_hover_text("0 = réalisme pur, 100 = éléments magiques/fantastiques");

    egui::ComboBox::from_label("Longueur")
        .selected_text(state.params.length_tier.label())
        .show_ui(ui, |ui| {
            for tier in LengthTier::ALL {
                ui.selectable_value(&mut state.params.length_tier, tier, tier.label());
            }
        });
}

fn draw_actions(ui: &mut egui::Ui, state: &mut UiState, cmd_tx: &Sender<EngineCommand>) {
    let idle = !state.busy;

    if ui
        .add_enabled(idle, egui::Button::new("🎲 Générer un récit parallèle"))
        .clicked()
    {
        state.clear_messages();
        let params = state.params.clone();
        send_command(state, cmd_tx, EngineCommand::Generate(params));
    }

    if state.busy {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Génération du récit en cours…");
        });
    }

    ui.horizontal(|ui| {
        let has_story = state.current.is_some();
        if ui
            .add_enabled(idle && has_story, egui::Button::new("💾 Sauvegarder"))
            .clicked()
        {
            state.clear_messages();
            let dir = state.save_dir.clone();
            send_command(state, cmd_tx, EngineCommand::SaveCurrent { dir });
        }

        if ui
            .add_enabled(idle && !state.history.is_empty(), egui::Button::new("Effacer l'historique"))
            .clicked()
        {
            send_command(state, cmd_tx, EngineCommand::ClearHistory);
        }
    });
}
