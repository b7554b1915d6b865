pub mod config;
pub mod services;

use config::AppConfig;

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Load configuration and prepare the output directory.
pub fn init_foundation() -> Result<AppConfig, anyhow::Error> {
    load_dotenv();

    let config = AppConfig::load();
    let output_dir = config.output_dir();
    std::fs::create_dir_all(&output_dir)?;

    tracing::info!(
        "Settings loaded (output_dir={}, module_size={}, ec={})",
        output_dir.display(),
        config.module_size,
        config.error_correction
    );
    Ok(config)
}
