use anyhow::{Context, Result, anyhow};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use gamestats::collector::DEFAULT_THREADS;
use gamestats::driver::{self, DriverArgs};
use log::{error, info};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::{fs, io, process};

/// Collect attribute statistics from a folder of JSON game records
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Folder with the input files (JSON)
    folder: PathBuf,
    /// Attribute to count: developer, yearReleased or genre
    attribute: String,
    /// Folder for the report (XML)
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    /// Number of worker threads (0 for one per CPU)
    #[arg(short, long, default_value_t = DEFAULT_THREADS)]
    threads: usize,
    /// Report errors as a JSON file
    #[arg(long)]
    error_file: Option<PathBuf>,
    /// Verbosity
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

#[derive(Serialize)]
struct OError {
    error: String,
}

fn process(args: &Args) -> Result<()> {
    let driver_args = DriverArgs {
        folder: &args.folder,
        attribute: &args.attribute,
        out_dir: &args.out_dir,
        threads: args.threads,
    };
    let path = driver::run(&driver_args)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("statistics by {} in {}", args.attribute, args.folder.display()))?;
    println!("Statistics collected in {}", path.display());
    Ok(())
}

fn store_error(error_file: &Path, e: &anyhow::Error) -> Result<()> {
    let error = OError {
        error: format!("{e:#}"),
    };
    let file = fs::File::create(error_file)
        .with_context(|| format!("creating {}", error_file.display()))?;
    let writer = io::BufWriter::new(file);
    serde_json::to_writer(writer, &error)?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    pretty_env_logger::formatted_timed_builder()
        .filter_level(args.verbose.log_level_filter())
        .init();
    match process(&args) {
        Ok(()) => (),
        Err(e) => {
            match &args.error_file {
                Some(filename) => match store_error(filename, &e) {
                    Ok(()) => {
                        info!(target: "gamestats", "error reported: {e:#}");
                    }
                    Err(e2) => {
                        error!(target: "gamestats", "{e:#}");
                        error!(target: "gamestats", "{e2:#}");
                    }
                },
                None => error!(target: "gamestats", "{e:#}"),
            }
            process::exit(1);
        }
    }
}
