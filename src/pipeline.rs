// THEORY:
// The `pipeline` module is the coordinator for the whole census engine. It
// owns two fixed-size worker pools connected by bounded channels: I/O-bound
// fetch workers that turn URLs into decoded images, and CPU-bound count
// workers that turn decoded images into result rows. Bounding both channels
// is what keeps the system honest. The producer stalls when the fetch pool
// falls behind, and the fetch pool stalls when the count pool falls behind,
// so fetched-but-not-yet-counted images can never pile up without limit.
//
// Shutdown is driven entirely by channel closure ordering:
// 1.  The producer drops its sender once the URL list is exhausted.
// 2.  Fetch workers drain the URL channel and exit; the image channel
//     closes when the last fetch worker drops its sender clone.
// 3.  Count workers drain the image channel and exit.
// A send on a closed channel is therefore impossible, and `run` returns
// only after every worker has been joined, which guarantees every submitted
// URL was either counted or dropped with a logged warning.

use crate::core_modules::csv_sink::{CsvSink, ResultRow};
use crate::core_modules::fetcher::ImageFetcher;
use crate::core_modules::histogram::count_colors;
use crate::core_modules::ranking::top_colors;
use crate::core_modules::url_source::UrlSource;
use futures::future::join_all;
use image::DynamicImage;
use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, mpsc};

const DEFAULT_FETCH_WORKERS: usize = 8;
const DEFAULT_QUEUE_CAPACITY: usize = 8;

/// Configuration for the census pipeline, allowing for tunable fan-out.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Size of the I/O-bound fetch pool, i.e. the network fan-out.
    pub fetch_workers: usize,
    /// Size of the CPU-bound count pool.
    pub count_workers: usize,
    /// Capacity of each bounded channel between the stages.
    pub queue_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fetch_workers: DEFAULT_FETCH_WORKERS,
            count_workers: num_cpus::get(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// A decoded image in flight between the two pools. Produced by exactly one
/// fetch worker, consumed by exactly one count worker, then discarded.
pub struct ImageTask {
    pub url: String,
    pub image: DynamicImage,
}

/// Tallies reported once the pipeline has fully drained.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// URLs read from the source and submitted to the fetch pool.
    pub submitted: usize,
    /// Images fetched and decoded successfully.
    pub fetched: usize,
    /// URLs dropped with a logged warning.
    pub skipped: usize,
    /// Rows the sink accepted.
    pub rows_written: usize,
    /// Rows the sink rejected with a write error.
    pub sink_errors: usize,
}

#[derive(Default)]
struct FetchTally {
    fetched: usize,
    skipped: usize,
}

#[derive(Default)]
struct CountTally {
    rows_written: usize,
    sink_errors: usize,
}

/// The coordinator owning both worker pools and the injected collaborators.
pub struct Pipeline {
    config: PipelineConfig,
    fetcher: Arc<ImageFetcher>,
    sink: Arc<Mutex<CsvSink>>,
}

impl Pipeline {
    /// The fetcher and sink are injected here and owned for the pipeline's
    /// lifetime; workers only ever see shared handles.
    pub fn new(config: PipelineConfig, fetcher: ImageFetcher, sink: CsvSink) -> Self {
        Self {
            config,
            fetcher: Arc::new(fetcher),
            sink: Arc::new(Mutex::new(sink)),
        }
    }

    /// Drains the URL source through both pools and returns the tallies.
    /// Output rows arrive in no particular order; per-URL processing is
    /// strictly fetch, then count, then emit.
    pub async fn run(&self, mut source: UrlSource) -> RunSummary {
        // A zero-sized pool or queue would stall the producer forever.
        let fetch_pool = self.config.fetch_workers.max(1);
        let count_pool = self.config.count_workers.max(1);
        let queue_capacity = self.config.queue_capacity.max(1);

        let (url_sender, url_receiver) = mpsc::channel::<String>(queue_capacity);
        let (image_sender, image_receiver) = mpsc::channel::<ImageTask>(queue_capacity);
        let url_receiver = Arc::new(AsyncMutex::new(url_receiver));
        let image_receiver = Arc::new(AsyncMutex::new(image_receiver));

        debug!("pipeline submitting: reading the URL list");
        let producer = tokio::spawn(async move {
            let mut submitted = 0usize;
            loop {
                match source.next_url().await {
                    Ok(Some(url)) => {
                        // Blocks when the fetch pool is saturated.
                        if url_sender.send(url).await.is_err() {
                            break;
                        }
                        submitted += 1;
                    }
                    Ok(None) => break,
                    Err(err) => {
                        error!("Stopped reading the URL list: {err}");
                        break;
                    }
                }
            }
            submitted
            // Dropping url_sender here closes the URL channel.
        });

        let mut fetch_workers = Vec::with_capacity(fetch_pool);
        for _ in 0..fetch_pool {
            let fetcher = Arc::clone(&self.fetcher);
            let urls = Arc::clone(&url_receiver);
            let images = image_sender.clone();

            fetch_workers.push(tokio::spawn(async move {
                let mut tally = FetchTally::default();
                loop {
                    // Lock only for the pull; fetching happens unlocked so
                    // the rest of the pool keeps draining the channel.
                    let url = { urls.lock().await.recv().await };
                    let Some(url) = url else { break };

                    match fetcher.fetch(&url).await {
                        Ok(image) => {
                            tally.fetched += 1;
                            if images.send(ImageTask { url, image }).await.is_err() {
                                break;
                            }
                        }
                        Err(err) => {
                            warn!("Skipping {url}: {err}");
                            tally.skipped += 1;
                        }
                    }
                }
                tally
            }));
        }
        // The fetch workers now hold the only sender clones; the image
        // channel closes when the last of them exits.
        drop(image_sender);

        let mut count_workers = Vec::with_capacity(count_pool);
        for _ in 0..count_pool {
            let images = Arc::clone(&image_receiver);
            let sink = Arc::clone(&self.sink);

            count_workers.push(tokio::spawn(async move {
                let mut tally = CountTally::default();
                loop {
                    let task = { images.lock().await.recv().await };
                    let Some(task) = task else { break };

                    let histogram = count_colors(&task.image);
                    let row = ResultRow {
                        url: task.url,
                        top_colors: top_colors(&histogram),
                    };

                    match sink.lock().unwrap().append(&row) {
                        Ok(()) => tally.rows_written += 1,
                        Err(err) => {
                            error!("Could not write the row for {}: {err}", row.url);
                            tally.sink_errors += 1;
                        }
                    }
                }
                tally
            }));
        }

        let submitted = producer.await.unwrap_or(0);
        debug!("pipeline draining: {submitted} URLs submitted, waiting for the pools");

        let mut summary = RunSummary {
            submitted,
            ..RunSummary::default()
        };
        for tally in join_all(fetch_workers).await.into_iter().flatten() {
            summary.fetched += tally.fetched;
            summary.skipped += tally.skipped;
        }
        for tally in join_all(count_workers).await.into_iter().flatten() {
            summary.rows_written += tally.rows_written;
            summary.sink_errors += tally.sink_errors;
        }

        info!(
            "Pipeline complete: {} submitted, {} fetched, {} skipped, {} rows written, {} sink errors",
            summary.submitted, summary.fetched, summary.skipped, summary.rows_written, summary.sink_errors
        );
        summary
    }
}
