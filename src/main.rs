mod app;

use app::RasterPaintApp;
use clap::Parser;

use rasterpaint::cli::CliArgs;
use rasterpaint::{log_err, log_info, logger};

fn main() -> Result<(), eframe::Error> {
    let args = CliArgs::parse();

    // Initialize session log (overwrites previous session log)
    if !args.no_log {
        logger::init();
    }

    let settings = match args.apply(args.load_settings()) {
        Ok(s) => s,
        Err(e) => {
            log_err!("Invalid arguments: {}", e);
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };
    log_info!(
        "Starting with {}x{} canvas, tool '{}'",
        settings.canvas_width,
        settings.canvas_height,
        settings.default_tool.name()
    );

    let inner_size = [
        (settings.canvas_width as f32 + 32.0).clamp(480.0, 1600.0),
        (settings.canvas_height as f32 + 96.0).clamp(320.0, 1000.0),
    ];
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(inner_size)
            .with_title("RasterPaint"),
        ..Default::default()
    };

    eframe::run_native(
        "RasterPaint",
        options,
        Box::new(move |cc| Box::new(RasterPaintApp::new(cc, settings))),
    )
}
