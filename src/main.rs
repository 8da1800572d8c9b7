mod app;
mod style;
mod view;

use eframe::egui;
use filebrowser::config::Config;
use filebrowser::{logging, Navigator};

fn main() -> eframe::Result<()> {
    logging::init();

    if let Err(e) = Config::create_default() {
        tracing::warn!(error = %e, "could not write default config");
    }
    let config = Config::load();
    let root = config.browser.resolve_root();

    let navigator = match Navigator::new(&root) {
        Ok(nav) => nav.with_sort(config.ui.sort_options()),
        Err(e) => {
            tracing::error!(root = %root.display(), error = %e, "cannot open browsing root");
            std::process::exit(1);
        }
    };
    tracing::info!(root = %root.display(), "starting browser");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(style::WINDOW_SIZE)
            .with_title("File Browser"),
        ..Default::default()
    };

    eframe::run_native(
        "File Browser",
        options,
        Box::new(move |cc| Ok(Box::new(app::FileBrowser::new(cc, config, navigator)))),
    )
}
