mod app;

use app::UiApp;
use eframe::{App, CreationContext, NativeOptions, egui};
use predictor_core::view::TITLE;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([820.0, 720.0]),
        ..Default::default()
    };
    let title = format!("{TITLE} {}", env!("CAR_PREDICTOR_VERSION"));
    if let Err(e) = eframe::run_native(&title, options, Box::new(create_app)) {
        tracing::error!("Application stopped with error: {e}");
        std::process::exit(1);
    }
}

fn create_app(
    cc: &CreationContext<'_>,
) -> Result<Box<dyn App>, Box<dyn std::error::Error + Send + Sync>> {
    let app = UiApp::new(&cc.egui_ctx, env!("CAR_PREDICTOR_SERVER_URL"))?;
    Ok(Box::new(app))
}
