use eframe::egui;

use crate::ui::app::UiState;

pub fn draw_center_panel(ctx: &egui::Context, state: &UiState) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("📖 Récit généré");

        if let Some(error) = &state.error {
            ui.colored_label(egui::Color32::LIGHT_RED, error);
        }
        if let Some(notice) = &state.notice {
            ui.colored_label(egui::Color32::from_rgb(200, 170, 60), notice);
        }
        if let Some(status) = &state.status {
            ui.colored_label(egui::Color32::LIGHT_GREEN, status);
        }

        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| match &state.current {
            Some(entry) => {
                let p = &entry.parameters;
                ui.label(
                    egui::RichText::new(format!(
                        "{} · Tech={} · Social={} · Fantasy={} · {}",
                        p.epoch,
                        p.tech_level,
                        p.social_change,
                        p.fantasy_elements,
                        entry.timestamp.format("%H:%M:%S"),
                    ))
                    .small()
                    .weak(),
                );
                if entry.is_fallback {
                    ui.label(egui::RichText::new("Récit de secours").small().italics());
                }
                ui.add_space(8.0);
                ui.label(egui::RichText::new(&entry.story).size(16.0));
            }
            None => {
                ui.label("Choisissez une époque et des paramètres, puis lancez la génération.");
            }
        });
    });
}
