//! Command-line front end: generate QR codes and fetch stored ones.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use qr_compositor::{EcLevel, Rgb};
use qr_logo_lib::config::defaults::ordered_settings;
use qr_logo_lib::services::generate::{GenerateRequest, LogoUpload, generate};
use qr_logo_lib::services::store::QrStore;

#[derive(Parser)]
#[command(name = "qr-logo", version, about = "Generate QR codes with an optional centered logo")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode text or a URL and store the PNG
    Generate(GenerateArgs),
    /// List configuration keys with their defaults
    Settings,
    /// Copy a stored PNG out of the output directory
    Download {
        /// File name printed by `generate`
        filename: String,
        /// Destination path (defaults to the file name in the current directory)
        #[arg(long)]
        to: Option<PathBuf>,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Text or URL to encode
    #[arg(short, long)]
    text: String,
    /// Logo image to place at the center (PNG, JPG, BMP, GIF or SVG)
    #[arg(short, long)]
    logo: Option<PathBuf>,
    /// Logo side as a fraction of the QR width
    #[arg(long)]
    logo_scale: Option<f32>,
    /// Module color (name, #rgb or #rrggbb)
    #[arg(long)]
    fg: Option<Rgb>,
    /// Background color
    #[arg(long)]
    bg: Option<Rgb>,
    /// Pixels per module
    #[arg(long)]
    module_size: Option<u32>,
    /// Quiet zone width in modules
    #[arg(long)]
    quiet_zone: Option<u32>,
    /// Error correction level (L, M, Q, H)
    #[arg(long)]
    ec: Option<EcLevel>,
    /// Frame around the logo in pixels
    #[arg(long)]
    border_width: Option<u32>,
    /// Frame color
    #[arg(long)]
    border_color: Option<Rgb>,
    /// Clear near-transparent logo pixels before pasting
    #[arg(long)]
    remove_background: bool,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = qr_logo_lib::init_foundation()?;

    match cli.command {
        Command::Generate(args) => {
            let logo = args
                .logo
                .as_ref()
                .map(|path| -> anyhow::Result<LogoUpload> {
                    let bytes = std::fs::read(path)
                        .with_context(|| format!("failed to read logo {}", path.display()))?;
                    let filename = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    Ok(LogoUpload { filename, bytes })
                })
                .transpose()?;

            let req = GenerateRequest {
                text: args.text,
                foreground: args.fg,
                background: args.bg,
                error_correction: args.ec,
                module_size: args.module_size,
                quiet_zone: args.quiet_zone,
                logo_scale: args.logo_scale,
                border_width: args.border_width,
                border_color: args.border_color,
                remove_background: args.remove_background,
                logo,
            };

            let out = match generate(&config, &req) {
                Ok(out) => out,
                Err(e) => {
                    if e.is_user_error() {
                        tracing::warn!("Rejected request: {e}");
                    } else {
                        tracing::error!("Generation failed: {e}");
                    }
                    return Err(e.into());
                }
            };

            if args.json {
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", out.filename);
                println!("{}", out.path.display());
            }
        }
        Command::Settings => {
            for def in ordered_settings() {
                let default = if def.default.is_empty() { "-" } else { def.default };
                println!("{:<28} {:<8} {}", def.key, default, def.description);
            }
        }
        Command::Download { filename, to } => {
            let store = QrStore::new(config.output_dir());
            let data = store
                .open(&filename)
                .with_context(|| format!("cannot read from {}", store.dir().display()))?;
            let dest = to.unwrap_or_else(|| PathBuf::from(&filename));
            std::fs::write(&dest, &data)
                .with_context(|| format!("failed to write {}", dest.display()))?;
            tracing::info!(dest = %dest.display(), bytes = data.len(), "QR code downloaded");
            println!("{}", dest.display());
        }
    }

    Ok(())
}
