use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use stylecam::imaging::RustBackend;
use stylecam::session::{CameraSession, FsDocumentStore, ShareError, ShareSheet};
use stylecam::settings::{Field, StyleSettings};
use stylecam::types::ImageRef;
use stylecam::{batch, codec, config, output};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stylecam")]
#[command(about = "Apply XML style documents to camera captures")]
#[command(long_about = "\
Apply XML style documents to camera captures

A style document is a flat XML file with six fields:

  <style>
      <preset>default</preset>
      <brightness>0</brightness>     # -1 … 1   (stored, not applied)
      <saturation>1</saturation>     #  0 … 2   (stored, not applied)
      <contrast>1</contrast>         # 0.5 … 2  (stored, not applied)
      <rotation>0</rotation>         # degrees, clockwise
      <compress>0.9</compress>       # 0.1 … 1, JPEG quality factor
  </style>

Missing or malformed fields fall back to the defaults shown above.
Styled images are written as new files; sources are never modified.

Run 'stylecam gen-config' to generate a documented stylecam.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::CONFIG_FILE_NAME, global = true)]
    config: PathBuf,

    /// Style document (overrides [style] path)
    #[arg(long, global = true)]
    style: Option<PathBuf>,

    /// Output directory for styled images (overrides [output] dir)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current style settings
    Show {
        /// Print JSON instead of the field list
        #[arg(long)]
        json: bool,
    },
    /// Apply the current style to images and directories of images
    Apply {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Change one style field and save the document
    Set {
        field: Field,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Write the current style to a new document
    Export { path: PathBuf },
    /// Print the default style document
    GenStyle,
    /// Print a stock stylecam.toml with all options documented
    GenConfig,
}

/// The CLI has no share sheet; "sharing" reports where the document went.
struct ConsoleShare;

impl ShareSheet for ConsoleShare {
    fn share(&self, path: &Path, mime_type: &str) -> Result<(), ShareError> {
        println!("{} ({mime_type})", output::format_export(path));
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut app_config = config::load_config(&cli.config)?;
    if let Some(style) = cli.style {
        app_config.style.path = style;
    }
    if let Some(dir) = cli.output {
        app_config.output.dir = dir;
    }
    init_tracing(&app_config.logging);

    let style_path = app_config.style.path.clone();

    match cli.command {
        Command::Show { json } => {
            let settings = codec::load_style_or_default(&style_path);
            if json {
                println!("{}", output::format_settings_json(&settings, &style_path)?);
            } else {
                output::print_settings(&settings, &style_path, app_config.output.format);
            }
        }
        Command::Apply { paths } => {
            let images = resolve_images(&paths, &app_config.output.dir);
            if images.is_empty() {
                return Err("no JPEG or PNG images found".into());
            }
            let settings = codec::load_style_or_default(&style_path);
            init_thread_pool(&app_config.batch);

            let outcomes = batch::apply_to_all(
                &RustBackend::new(),
                &images,
                &settings,
                &app_config.apply_config(),
            );
            let base = std::env::current_dir().unwrap_or_default();
            output::print_batch_output(&outcomes, &base);

            let summary = batch::BatchSummary::of(&outcomes);
            if summary.failed > 0 {
                return Err(format!("{} of {} images failed", summary.failed, outcomes.len()).into());
            }
        }
        Command::Set { field, value } => {
            let mut settings = codec::load_style_for_edit(&style_path)?;
            settings.set(field, &value)?;
            codec::save_style(&style_path, &settings)?;
            println!("{}", output::format_set(&settings, field, &style_path));
        }
        Command::Export { path } => {
            let session = CameraSession::default();
            session.load_settings(&FsDocumentStore, &style_path);
            session
                .export(&FsDocumentStore, &ConsoleShare, &path)
                .inspect_err(|e| eprintln!("{}", e.user_message()))?;
        }
        Command::GenStyle => {
            println!("{}", codec::encode(&StyleSettings::default()));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &config::LoggingConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&logging.level)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}

/// Initialize the rayon thread pool based on batch config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(batch: &config::BatchConfig) {
    let threads = config::effective_threads(batch);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Expand directories into the images they contain; files pass through.
/// An image named more than once is styled once.
fn resolve_images(paths: &[PathBuf], output_dir: &Path) -> Vec<ImageRef> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .flat_map(|path| {
            if path.is_dir() {
                batch::collect_images(path, output_dir)
            } else {
                vec![ImageRef::new(path.clone())]
            }
        })
        .filter(|image| {
            let key = image
                .path()
                .canonicalize()
                .unwrap_or_else(|_| image.path().to_path_buf());
            seen.insert(key)
        })
        .collect()
}
