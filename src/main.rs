use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use bytes::Bytes;
use clap::{Args, Parser, Subcommand, ValueEnum};
use offload_bench::bench::{self, ReportFormat};
use offload_bench::config::BenchConfig;
use offload_bench::source::{self, DEFAULT_URL_TEMPLATE, ImageSource};
use offload_bench::{CompressPool, ImageCompression, telemetry};

/// Compare image compression and DEFLATE round trips on the caller thread
/// against a pool of worker threads.
#[derive(Parser, Debug)]
#[command(name = "offload")]
#[command(about = "Benchmark work offloaded to worker threads")]
#[command(long_about = "Benchmark image compression and DEFLATE round trips on the main thread versus a \
pool of worker threads, with payloads moved or copied to the workers.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress 1 and N images in the main thread and in workers
    Images(RunArgs),
    /// Deflate/inflate 1 and N payloads in the main thread and in workers
    Deflate(RunArgs),
    /// Compress one image in a worker and write the stages to --out
    Cycle(RunArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SourceKind {
    Url,
    Dir,
    Synthetic,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Number of images to load
    #[arg(short = 'n', long, default_value_t = 20)]
    images: usize,

    /// Worker threads (default: 1 for images, 4 for deflate)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Timed runs per scenario
    #[arg(long, default_value_t = 10)]
    samples: usize,

    /// Untimed runs per scenario
    #[arg(long, default_value_t = 1)]
    warmup: usize,

    /// DEFLATE level (0-9)
    #[arg(short, long, default_value_t = 3)]
    level: u32,

    /// Target image size: megabytes, or a size like 500KB or 1.5MB
    #[arg(long, help = "Target compressed image size: 0.5 (MB), 500KB, 1.5MB")]
    max_size_mb: Option<String>,

    /// Clamp the longest image side to this many pixels
    #[arg(long)]
    max_width_or_height: Option<u32>,

    /// Where images come from
    #[arg(long, value_enum, default_value = "url")]
    source: SourceKind,

    /// Image directory for --source dir
    #[arg(long)]
    dir: Option<PathBuf>,

    /// URL template for --source url; {index} is replaced by the image number
    #[arg(long, default_value = DEFAULT_URL_TEMPLATE)]
    url: String,

    /// Report format
    #[arg(short, long, value_enum, default_value = "table")]
    format: ReportFormat,

    /// Output directory for the cycle command
    #[arg(short, long, default_value = "cycle-output")]
    out: PathBuf,
}

impl RunArgs {
    fn into_config(self) -> Result<BenchConfig> {
        let source = match self.source {
            SourceKind::Url => ImageSource::Url(self.url),
            SourceKind::Synthetic => ImageSource::Synthetic,
            SourceKind::Dir => ImageSource::Dir(
                self.dir
                    .ok_or_else(|| anyhow!("--source dir requires --dir <path>"))?,
            ),
        };

        let max_size_mb = match self.max_size_mb.as_deref() {
            Some(size) => parse_size_mb(size)?,
            None => f64::INFINITY,
        };

        let config = BenchConfig {
            images: self.images,
            workers: self.workers,
            samples: self.samples,
            warmup: self.warmup,
            level: self.level,
            max_size_mb,
            max_width_or_height: self.max_width_or_height,
            source,
            format: self.format,
            out: self.out,
        };
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_logging().map_err(|e| anyhow!("failed to initialise logging: {e}"))?;

    let cli = Cli::parse();
    match cli.command {
        Command::Images(args) => run_images(args.into_config()?).await,
        Command::Deflate(args) => run_deflate(args.into_config()?).await,
        Command::Cycle(args) => run_cycle(args.into_config()?).await,
    }
}

async fn run_images(config: BenchConfig) -> Result<()> {
    let files = source::get_image_files(&config.source, config.images).await?;
    let compression = Arc::new(ImageCompression::with_workers(config.image_workers())?);

    let suite = bench::image_suite(
        Arc::clone(&compression),
        files,
        config.to_compress_options(),
        config.to_suite_options(),
    );
    let report = suite.run().await;
    compression.destroy();

    println!("{}", report.render(config.format)?);
    Ok(())
}

async fn run_deflate(config: BenchConfig) -> Result<()> {
    let files = source::get_image_files(&config.source, config.images).await?;
    let payloads: Vec<Bytes> = files.into_iter().map(|file| Bytes::from(file.data)).collect();
    let pool = Arc::new(CompressPool::with_level(config.deflate_workers(), config.level)?);

    let suite = bench::deflate_suite(
        Arc::clone(&pool),
        payloads,
        config.level,
        config.to_suite_options(),
    );
    let report = suite.run().await;
    pool.destroy();

    println!("{}", report.render(config.format)?);
    Ok(())
}

async fn run_cycle(config: BenchConfig) -> Result<()> {
    let compression = ImageCompression::with_workers(config.image_workers())?;
    let outcome = bench::cycle(
        &compression,
        &config.source,
        &config.to_compress_options(),
        &config.out,
    )
    .await?;

    println!(
        "Compressed {} bytes to {} bytes",
        outcome.original_size, outcome.compressed_size
    );
    for path in &outcome.written {
        println!("  {}", path.display());
    }
    Ok(())
}

/// Parse a size like "0.5", "500KB", "1.5MB" or "2GB" into megabytes.
///
/// A bare number is already in megabytes. Units are binary (1 MB = 1024 KB).
fn parse_size_mb(size: &str) -> Result<f64> {
    let trimmed = size.trim();
    if let Ok(mb) = trimmed.parse::<f64>() {
        return Ok(mb);
    }

    let upper = trimmed.to_ascii_uppercase();
    let split = upper
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(|| anyhow!("Invalid size format: {}", size))?;
    let (num_str, unit) = upper.split_at(split);
    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid number in size: {}", num_str))?;

    match unit {
        "B" => Ok(num / (1024.0 * 1024.0)),
        "KB" | "K" => Ok(num / 1024.0),
        "MB" | "M" => Ok(num),
        "GB" | "G" => Ok(num * 1024.0),
        _ => Err(anyhow!(
            "Invalid size unit: {}. Use B, KB, MB or GB",
            unit
        )),
    }
}
