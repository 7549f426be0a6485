use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crate::engine::engine::Engine;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::history::HistoryEntry;
use crate::model::parameters::GenerationParameters;
use crate::model::settings::AppSettings;
use crate::ui::center_panel::draw_center_panel;
use crate::ui::left_panel::draw_left_panel;
use crate::ui::right_panel::draw_right_panel;
use crate::ui::settings_io::save_settings;

/* =========================
   UI State
   ========================= */

pub struct UiState {
    pub params: GenerationParameters,

    /// Mirror of the engine's current entry
    pub current: Option<HistoryEntry>,
    pub history: Vec<HistoryEntry>,

    pub notice: Option<String>,
    pub error: Option<String>,
    pub status: Option<String>,

    /// A command is in flight; further generate clicks are ignored
    pub busy: bool,

    pub save_dir: PathBuf,
    pub ui_scale: f32,
    pub settings_dirty: bool,
}

impl UiState {
    fn from_settings(settings: &AppSettings) -> Self {
        Self {
            params: GenerationParameters::default(),
            current: None,
            history: Vec::new(),
            notice: None,
            error: None,
            status: None,
            busy: false,
            save_dir: settings.save_dir_or_default(),
            ui_scale: settings.ui_scale,
            settings_dirty: false,
        }
    }

    pub fn clear_messages(&mut self) {
        self.notice = None;
        self.error = None;
        self.status = None;
    }
}

/* =========================
   App
   ========================= */

pub struct NarrativeApp {
    ui: UiState,
    settings: AppSettings,

    cmd_tx: mpsc::Sender<EngineCommand>,
    resp_rx: mpsc::Receiver<EngineResponse>,
}

impl NarrativeApp {
    pub fn new(settings: AppSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        let engine_settings = settings.clone();
        std::thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx, engine_settings);
            engine.run();
        });

        Self {
            ui: UiState::from_settings(&settings),
            settings,
            cmd_tx,
            resp_rx,
        }
    }

    fn apply_response(&mut self, resp: EngineResponse) {
        self.ui.busy = false;

        match resp {
            EngineResponse::Generated { report, history } => {
                self.ui.notice = report.notice;
                self.ui.error = report.error;
                self.ui.current = Some(report.entry);
                self.ui.history = history;
            }
            EngineResponse::CurrentChanged(entry) => {
                self.ui.params = entry.parameters.clone();
                self.ui.current = Some(entry);
            }
            EngineResponse::HistoryChanged(history) => {
                self.ui.history = history;
            }
            EngineResponse::Saved(path) => {
                self.ui.status = Some(format!("Récit sauvegardé : {}", path.display()));
            }
            EngineResponse::Connection(status) => {
                self.ui.status = Some(status);
            }
            EngineResponse::Error(message) => {
                self.ui.error = Some(message);
            }
        }
    }

    fn persist_settings(&mut self) {
        if !self.ui.settings_dirty {
            return;
        }
        self.ui.settings_dirty = false;
        self.settings.ui_scale = self.ui.ui_scale;
        self.settings.save_dir = Some(self.ui.save_dir.clone());

        if let Err(e) = save_settings(&self.settings) {
            tracing::warn!(error = %format!("{e:#}"), "could not save settings");
        }
    }
}

/// Sends a command, flagging the UI busy. A dead engine is reported, not fatal.
pub fn send_command(ui: &mut UiState, cmd_tx: &mpsc::Sender<EngineCommand>, cmd: EngineCommand) {
    if cmd_tx.send(cmd).is_ok() {
        ui.busy = true;
    } else {
        tracing::error!("engine thread is gone");
        ui.error = Some("Le moteur de génération s'est arrêté.".into());
    }
}

/* =========================
   egui App
   ========================= */

impl eframe::App for NarrativeApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.ui.ui_scale);

        while let Ok(resp) = self.resp_rx.try_recv() {
            self.apply_response(resp);
        }

        draw_left_panel(ctx, &mut self.ui, &self.cmd_tx);
        draw_right_panel(ctx, &mut self.ui, &self.cmd_tx);
        draw_center_panel(ctx, &self.ui);

        self.persist_settings();

        if self.ui.busy {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }
}
