use asset_prep::imaging::{RustBackend, ensure_decoders};
use asset_prep::{bars, config, output, resize, scan};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    if env!("ASSET_PREP_TAGGED") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    match env!("ASSET_PREP_REVISION") {
        "" => "dev@unknown",
        rev => Box::leak(format!("dev@{rev}").into_boxed_str()),
    }
}

#[derive(Parser)]
#[command(name = "asset-prep")]
#[command(about = "Prepare website image assets: remove black bars, resize for the web")]
#[command(long_about = "\
Prepare website image assets: remove black bars, resize for the web

Both commands walk the source directory recursively and rewrite matching
files in place.

  bars    .jpg .jpeg .png .webp
          Trims uniformly dark borders, keeps 2px of margin, then center-crops
          to 16:9. The file keeps its format. Entirely black images are left
          alone with a warning.

  resize  .jpg .jpeg .png .tiff .tif .bmp
          Files of at least 0.5 MB are scaled down to fit 1200×900 (never
          enlarged) and rewritten as progressive JPEG, quality 85. Each file
          is copied to <name>.backup.<ext> first and restored if anything
          fails.

Extensions are matched case-insensitively; everything else is ignored.

Run 'asset-prep gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory holding the images
    #[arg(long, default_value = "assets", global = true)]
    source: PathBuf,

    /// Config file overriding the stock settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Remove black bars and crop to the target aspect ratio
    Bars,
    /// Downscale oversized images for the web, with backup/restore
    Resize,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

/// Route `tracing` output to stderr; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let fallback = if verbose { "asset_prep=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let backend = RustBackend::new();

    match cli.command {
        Command::Bars => {
            let config = config::load_config(cli.config.as_deref())?;
            ensure_decoders(scan::BARS_EXTENSIONS)?;
            let files = scan::scan(&cli.source, scan::BARS_EXTENSIONS)?;
            println!("==> Removing black bars in {}", cli.source.display());
            let summary = bars::run(&backend, &files, &config.bars, &mut |event| {
                output::print_lines(&output::format_bars_event(&event))
            });
            output::print_lines(&output::format_bars_summary(&summary));
        }
        Command::Resize => {
            let config = config::load_config(cli.config.as_deref())?;
            ensure_decoders(scan::RESIZE_EXTENSIONS)?;
            let files = scan::scan(&cli.source, scan::RESIZE_EXTENSIONS)?;
            output::print_lines(&output::format_resize_header(&cli.source, &config.resize));
            let summary = resize::run(&backend, &files, &config.resize, &mut |event| {
                output::print_lines(&output::format_resize_event(&event))
            });
            output::print_lines(&output::format_resize_summary(&summary));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
