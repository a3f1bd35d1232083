use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use riptone::models::AppConfig;
use riptone::server;
use riptone::services::{processor, ConversionRequest, Dpi, OutputFormat};

#[derive(Parser)]
#[command(name = "riptone")]
#[command(about = "Riptone - PDF to print-RIP halftone conversion service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Convert a PDF directly to a screened container file
    Convert {
        /// Input PDF path
        input: PathBuf,

        /// Output file path
        output: PathBuf,

        /// Output bit depth: 1, 2, 4 or 8
        #[arg(short, long, default_value_t = 1)]
        bit_depth: u8,

        /// Output container: "tiff" or "bmp"
        #[arg(short, long, default_value = "tiff")]
        format: String,

        /// Resolution, e.g. "300" or "1200x600"
        #[arg(short, long)]
        dpi: Option<String>,

        /// Noise intensity in [0, 1]
        #[arg(short, long, default_value_t = 0.0)]
        noise: f32,

        /// Noise generator seed for reproducible output
        #[arg(short, long)]
        seed: Option<u64>,

        /// Also write a preview PNG to this path
        #[arg(short, long)]
        preview: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert {
            input,
            output,
            bit_depth,
            format,
            dpi,
            noise,
            seed,
            preview,
        }) => run_convert_command(
            &input, &output, bit_depth, &format, dpi, noise, seed, preview,
        ),
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Convert one PDF from the command line (no server needed)
#[allow(clippy::too_many_arguments)]
fn run_convert_command(
    input: &PathBuf,
    output: &PathBuf,
    bit_depth: u8,
    format: &str,
    dpi: Option<String>,
    noise: f32,
    seed: Option<u64>,
    preview: Option<PathBuf>,
) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "riptone=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config = AppConfig::load();

    let format: OutputFormat = format
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid format: {e}"))?;
    let dpi = match dpi {
        Some(s) => s
            .parse::<Dpi>()
            .map_err(|e| anyhow::anyhow!("Invalid DPI: {e}"))?,
        None => Dpi::Symmetric(config.default_dpi),
    };

    let request = ConversionRequest {
        bit_depth,
        format,
        dpi,
        noise,
        seed,
    };

    // Without an explicit preview path, drop the preview in the temp
    // directory and forget about it.
    let preview_path = match preview {
        Some(path) => path,
        None => tempfile::Builder::new()
            .prefix("riptone-preview-")
            .suffix(".png")
            .tempfile()?
            .into_temp_path()
            .keep()?,
    };

    let (width, height) = processor::convert(&config, input, &request, output, &preview_path)?;
    println!(
        "Converted {} -> {} ({}x{} px, {}-bit {})",
        input.display(),
        output.display(),
        width,
        height,
        bit_depth,
        format.extension()
    );

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();

    println!("Riptone v{VERSION}");
    println!("PDF to print-RIP halftone conversion service\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );

    println!("\nCommands:");
    println!("  riptone serve      Start the HTTP server");
    println!("  riptone convert    Convert a PDF to a screened TIFF or BMP");
    println!("\nRun 'riptone --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "riptone=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let config = AppConfig::load();
    tracing::info!(
        ghostscript = %config.ghostscript,
        default_dpi = config.default_dpi,
        "Configuration loaded"
    );

    let state = server::create_app_state(config);
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Riptone server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
