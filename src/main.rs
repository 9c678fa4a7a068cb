use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};
use webify::config::{self, WebifyConfig};
use webify::estimate::EstimateMode;
use webify::imaging::{ImageBackend, RustBackend, create_preview};
use webify::session::{FileInfo, Session, file_info};
use webify::worker::BatchRunner;
use webify::{inputs, output};

/// Shared flags for commands that work on a list of images.
#[derive(clap::Args, Clone)]
struct InputArgs {
    /// Image files, or directories to search for .jpg/.jpeg/.png
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// WebP quality (1-100)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: Option<u32>,

    /// Longer side of every output in pixels (100-4000)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(100..=4000))]
    max_dimension: Option<u32>,

    /// Only use these entries of the expanded file list (1-based, comma separated)
    #[arg(long, value_delimiter = ',', value_parser = clap::value_parser!(u64).range(1..))]
    select: Vec<u64>,
}

fn version_string() -> &'static str {
    let on_tag = env!("WEBIFY_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("WEBIFY_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "webify")]
#[command(about = "Batch-convert JPEG and PNG images to WebP")]
#[command(long_about = "\
Batch-convert JPEG and PNG images to WebP

Every output is written as <output>/<name>.webp with its longer side set to
the max dimension (smaller images are enlarged). Sources sharing a name
overwrite each other; the last one wins.

Without --output, files are written next to the first input.
Without --max-dimension, the longest side among the inputs is used,
rounded up to a multiple of 100 (disable with auto_max_dimension = false).

Run 'webify gen-config' to generate a documented webify.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (defaults to ./webify.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert images to WebP
    Convert {
        #[command(flatten)]
        input: InputArgs,

        /// Output folder (created if missing)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the summary as JSON instead of progress lines
        #[arg(long)]
        json: bool,
    },
    /// Show current and estimated WebP size of each image
    Estimate {
        #[command(flatten)]
        input: InputArgs,

        /// Quality-to-size mapping
        #[arg(long, value_enum)]
        mode: Option<EstimateMode>,

        #[arg(long)]
        json: bool,
    },
    /// Suggest a max dimension from the largest input
    SuggestSize {
        /// Image files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Render a downscaled PNG preview of one image
    Preview {
        file: PathBuf,

        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,

        /// Longest side of the preview (never enlarges)
        #[arg(long)]
        max_dimension: Option<u32>,
    },
    /// Print a stock webify.toml with all options documented
    GenConfig,
}

#[derive(Serialize)]
struct EstimateEntry<'a> {
    path: &'a Path,
    #[serde(flatten)]
    info: &'a FileInfo,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = load_config(cli.config.as_deref())?;
    let backend = Arc::new(RustBackend::new());

    match cli.command {
        Command::Convert {
            input,
            output: output_dir,
            json,
        } => {
            let mut session = build_session(&config, &input, backend.as_ref());
            if let Some(dir) = output_dir {
                session.set_output_dir(dir);
            }
            let job = session.prepare_batch()?;

            let runner = BatchRunner::new();
            let (tx, rx) = mpsc::channel();
            let handle = runner.start(Arc::clone(&backend), job, tx)?;
            for event in rx {
                if !json {
                    output::print_convert_event(&event);
                }
            }
            let summary = handle
                .join()
                .map_err(|_| "conversion worker panicked")??;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
        }
        Command::Estimate { input, mode, json } => {
            let session = build_session(&config, &input, backend.as_ref());
            let mode = mode.unwrap_or(config.estimate.mode);
            let entries: Vec<(PathBuf, FileInfo)> = session
                .selected_files()?
                .into_iter()
                .map(|path| {
                    let info = file_info(backend.as_ref(), &path, session.settings(), mode);
                    (path, info)
                })
                .collect();
            if json {
                let rows: Vec<EstimateEntry> = entries
                    .iter()
                    .map(|(path, info)| EstimateEntry { path, info })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                output::print_estimates(&entries);
            }
        }
        Command::SuggestSize { inputs: paths } => {
            let mut session = Session::new(config.settings());
            session.add_files(inputs::expand_inputs(&paths));
            let suggested = session.suggest_max_dimension(backend.as_ref());
            output::print_lines(&output::format_suggestion(suggested));
        }
        Command::Preview {
            file,
            output: preview_path,
            max_dimension,
        } => {
            let max = max_dimension.unwrap_or(config.preview.max_dimension);
            let dims = create_preview(backend.as_ref(), &file, &preview_path, max)?;
            output::print_lines(&output::format_preview(&file, &preview_path, dims));
        }
        // Printed above, before any config file is read
        Command::GenConfig => {}
    }

    Ok(())
}

/// Load the config file. An explicit `--config` path must exist.
fn load_config(explicit: Option<&Path>) -> Result<WebifyConfig, Box<dyn std::error::Error>> {
    match explicit {
        Some(path) if !path.exists() => {
            Err(format!("config file not found: {}", path.display()).into())
        }
        Some(path) => Ok(config::load_config(path)?),
        None => Ok(config::load_config(Path::new(config::DEFAULT_CONFIG_FILE))?),
    }
}

/// Build a session from command-line inputs: expand, apply overrides, select.
fn build_session(config: &WebifyConfig, args: &InputArgs, backend: &impl ImageBackend) -> Session {
    let mut session = Session::new(config.settings());
    session.add_files(inputs::expand_inputs(&args.inputs));

    if let Some(quality) = args.quality {
        session.set_quality(quality);
    }
    match args.max_dimension {
        Some(max) => session.set_max_dimension(max),
        None if config.conversion.auto_max_dimension => {
            if let Some(max) = session.apply_suggested_max_dimension(backend) {
                log::info!("max dimension set to {}px from inputs", max.value());
            }
        }
        None => {}
    }

    if args.select.is_empty() {
        session.select_all();
    } else {
        session.select(args.select.iter().map(|&i| (i - 1) as usize));
    }
    session
}
