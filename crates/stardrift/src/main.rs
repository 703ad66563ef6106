use winit::dpi::LogicalSize;

use stardrift::{GameConfig, StardriftApp};
use stardrift_engine::device::GpuInit;
use stardrift_engine::logging::{LoggingConfig, init_logging};
use stardrift_engine::window::{Runtime, RuntimeConfig};

fn main() {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Stardrift".to_string(),
        initial_size: LogicalSize::new(512.0, 512.0),
    };

    let app = StardriftApp::new(GameConfig::default());

    if let Err(e) = Runtime::run(config, GpuInit::default(), app) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
