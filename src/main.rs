use clap::{Parser, Subcommand};
use log::{error, info};
use polygen_data::app::{run_batch, run_decode, run_process};
use polygen_data::io::config::PipelineConfig;
use std::path::PathBuf;
use std::process::ExitCode;

/// Prepares OBJ meshes as quantized token sequences and turns them back into meshes.
#[derive(Parser, Debug)]
#[command(name = "polygen-data", version)]
struct Cli {
    /// Pipeline configuration (TOML). Defaults apply when omitted.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert one OBJ file into a training artifact.
    Process {
        input: PathBuf,
        /// Artifact path; defaults to the input with a `.json` extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert every OBJ file under a directory.
    Batch {
        input_dir: PathBuf,
        #[arg(short, long)]
        output_dir: PathBuf,
    },
    /// Write a training artifact back out as an OBJ mesh.
    Decode {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Keep only the first N face tokens.
        #[arg(long)]
        length: Option<usize>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            info!("Loading config: {}", path.display());
            match PipelineConfig::load(path) {
                Ok(config) => config,
                Err(e) => {
                    error!("Failed to load config '{}': {}", path.display(), e);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => PipelineConfig::default(),
    };

    let result = match &cli.command {
        Command::Process { input, output } => {
            run_process(input, output.as_deref(), &config).map(|_| ())
        }
        Command::Batch {
            input_dir,
            output_dir,
        } => run_batch(input_dir, output_dir, &config).map(|_| ()),
        Command::Decode {
            input,
            output,
            length,
        } => run_decode(input, output, *length, &config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
