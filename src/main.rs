use anyhow::Context;
use clap::Parser;
use color_census::core_modules::csv_sink::CsvSink;
use color_census::core_modules::fetcher::ImageFetcher;
use color_census::core_modules::url_source::UrlSource;
use color_census::pipeline::{Pipeline, PipelineConfig};
use env_logger::Builder;
use log::LevelFilter;
use std::path::PathBuf;

/// Fetches every image named in a URL list and appends its three most
/// frequent colors to a CSV file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Text file with one image URL per line.
    #[arg(long, default_value = "input.txt")]
    input: PathBuf,

    /// CSV file the result rows are appended to.
    #[arg(long, default_value = "ColorCensusOutput.csv")]
    output: PathBuf,

    /// Number of concurrent HTTP fetch workers.
    #[arg(long)]
    fetch_workers: Option<usize>,

    /// Number of color counting workers. Defaults to the number of CPUs.
    #[arg(long)]
    count_workers: Option<usize>,

    /// Capacity of the queues between the pipeline stages.
    #[arg(long)]
    queue_capacity: Option<usize>,

    /// Enable debug logging.
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    Builder::new().filter_level(level).init();

    let mut config = PipelineConfig::default();
    if let Some(fetch_workers) = cli.fetch_workers {
        config.fetch_workers = fetch_workers;
    }
    if let Some(count_workers) = cli.count_workers {
        config.count_workers = count_workers;
    }
    if let Some(queue_capacity) = cli.queue_capacity {
        config.queue_capacity = queue_capacity;
    }

    let sink = CsvSink::open(&cli.output)
        .with_context(|| format!("could not open the output file {}", cli.output.display()))?;
    let output = sink.path().to_path_buf();

    let source = UrlSource::open(&cli.input)
        .await
        .with_context(|| format!("could not open the URL list {}", cli.input.display()))?;

    let pipeline = Pipeline::new(config, ImageFetcher::new(), sink);
    let summary = pipeline.run(source).await;

    println!(
        "Process complete: {} of {} URLs exported to {}",
        summary.rows_written,
        summary.submitted,
        output.display()
    );
    Ok(())
}
