use parallel_narratives::ui::app::NarrativeApp;
use parallel_narratives::ui::settings_io::load_settings;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("parallel_narratives=info")),
        )
        .init();

    let settings = load_settings();
    tracing::info!(
        backend = %settings.backend.base_url,
        model = %settings.backend.model,
        "starting narrative generator"
    );

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Générateur de Récits Parallèles",
        options,
        Box::new(move |_cc| Ok(Box::new(NarrativeApp::new(settings)))),
    )
}
