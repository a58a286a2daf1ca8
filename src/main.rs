use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mdcard::{Theme, fonts, render_markdown_bytes};

/// Render a Markdown snippet onto an 800x600 PNG card
#[derive(Parser, Debug)]
#[command(name = "mdcard")]
#[command(version)]
#[command(about = "Render a small Markdown snippet to a PNG card", long_about = None)]
struct Args {
    /// Input markdown file (use "-" for stdin)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output PNG path
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Theme file (TOML or YAML)
    #[arg(short, long, value_name = "THEME")]
    theme: Option<PathBuf>,

    /// Emoji font file, overriding the theme's
    #[arg(long, value_name = "FONT")]
    emoji_font: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(&args.log_level);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Builds the theme and registers the emoji face.
///
/// An explicitly requested font that cannot be loaded is an error; the
/// theme's default font only produces a warning when missing.
fn prepare_theme(theme_path: Option<&Path>, emoji_font: Option<PathBuf>) -> Result<Theme, String> {
    let mut theme = match theme_path {
        Some(path) => Theme::load(path).map_err(|e| e.to_string())?,
        None => Theme::default(),
    };

    match emoji_font {
        Some(path) => {
            fonts::register_font_file(&path, &theme.emoji_family).map_err(|e| e.to_string())?;
            theme.emoji_font_path = path;
        }
        None => {
            fonts::ensure_emoji_font(&theme);
        }
    }

    Ok(theme)
}

fn run(args: Args) -> Result<(), String> {
    let theme = prepare_theme(args.theme.as_deref(), args.emoji_font)?;

    let markdown = if args.input.to_str() == Some("-") {
        let mut buffer = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        buffer
    } else {
        std::fs::read(&args.input).map_err(|e| format!("Failed to read input file: {}", e))?
    };

    let png = render_markdown_bytes(&markdown, &theme).map_err(|e| e.to_string())?;

    std::fs::write(&args.output, png).map_err(|e| format!("Failed to write PNG: {}", e))?;
    info!(output = %args.output.display(), "rendered card");
    eprintln!("PNG saved to: {}", args.output.display());

    Ok(())
}
