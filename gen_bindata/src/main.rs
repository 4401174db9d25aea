use std::{
    io::IsTerminal,
    num::NonZeroUsize,
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::{CommandFactory, Parser};
use gen_bindata::{Codec, Config, DEFAULT_OUTPUT, DEFAULT_PACKAGE, DEFAULT_SOURCE_OUTPUT};
use tracing_subscriber::EnvFilter;

/// Pack directories into one compressed blob and generate a Rust index for it.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directories to pack, in order. Files are listed non-recursively.
    #[arg(value_name = "DIRECTORIES")]
    dirs: Vec<PathBuf>,

    /// Optional path prefix to strip off asset names.
    #[arg(long, default_value = "")]
    prefix: String,

    /// Module name to use in the generated code.
    #[arg(long, default_value = DEFAULT_PACKAGE)]
    pkg: String,

    /// Name of the blob file to be generated.
    #[arg(short = 'o', long = "output", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Name of the Rust file to be generated.
    #[arg(long, default_value = DEFAULT_SOURCE_OUTPUT)]
    rsfile: PathBuf,

    /// Compressor applied to every file (gzip or zstd).
    #[arg(long, default_value_t = Codec::Gzip)]
    codec: Codec,

    /// Compression level. Defaults to the codec's best ratio.
    #[arg(long, allow_negative_numbers = true)]
    level: Option<i32>,

    /// Maximum number of compression threads.
    #[arg(short, long)]
    jobs: Option<NonZeroUsize>,

    /// Directory for temporary compressed files.
    #[arg(long, value_name = "DIR")]
    temp_dir: Option<PathBuf>,

    /// Log every step, not just progress.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.dirs.is_empty() {
        eprintln!("{}", Cli::command().render_help());
        return ExitCode::from(1);
    }

    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::new(&cli.dirs)
        .prefix(cli.prefix)
        .package(cli.pkg)
        .output(&cli.output)
        .source_output(&cli.rsfile)
        .codec(cli.codec);
    if let Some(level) = cli.level {
        config = config.level(level);
    }
    if let Some(jobs) = cli.jobs {
        config = config.jobs(jobs);
    }
    if let Some(dir) = &cli.temp_dir {
        config = config.temp_dir(dir);
    }

    let bindata = config
        .build()
        .with_context(|| format!("packing {} into {}", join_paths(&cli.dirs), cli.output.display()))?;

    tracing::info!(
        assets = bindata.assets.len(),
        total_size = bindata.total_size,
        "done"
    );
    Ok(())
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
