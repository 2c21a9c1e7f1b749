//! Asynchronous analysis engine.
//!
//! The engine owns a fixed pool of dedicated OS worker threads fed through
//! bounded channels. Async callers submit one image and one question per
//! call and await a oneshot reply; the CPU-bound decode and analysis never
//! run on the async runtime itself. When the submission queue is full,
//! senders wait rather than spawning work or failing, so saturation turns
//! into backpressure.
//!
//! Shutdown is by dropping the engine: the submission channel closes, the
//! dispatcher drains, worker channels close and the threads exit after
//! finishing whatever was already dispatched. There is no cancellation of
//! a job once it has been accepted.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use tokio::sync::{mpsc, oneshot};

use crate::analyzer::{AnalysisConfig, Analyzer};
use crate::buffer::PixelBuffer;
use crate::decode::Decoder;
#[cfg(feature = "image-io")]
use crate::decode::ImageDecoder;
use crate::palette::{Palette, SwatchCount};
use crate::point::Point;
use crate::region::{CropOptions, Region};
use crate::trace::trace_event;
use crate::util::{SalienceError, SalienceResult};

/// Engine sizing and analysis settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Number of dedicated worker threads.
    pub workers: usize,
    /// Capacity of the submission queue; callers await once it is full.
    pub queue_depth: usize,
    /// Settings shared by every analysis the engine runs.
    pub analysis: AnalysisConfig,
}

impl Default for EngineConfig {
    /// One worker per available core and a queue twice that deep.
    fn default() -> Self {
        let workers = num_cpus::get().max(1);
        Self {
            workers,
            queue_depth: workers * 2,
            analysis: AnalysisConfig::default(),
        }
    }
}

/// An image handed to the engine.
///
/// `Pixels` skips decoding entirely, which also keeps tests free of
/// encoded fixture data.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Path to an encoded image file.
    Path(PathBuf),
    /// Encoded image bytes already in memory.
    Buffer(Vec<u8>),
    /// An already decoded buffer.
    Pixels(PixelBuffer),
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Buffer(bytes)
    }
}

impl From<PixelBuffer> for ImageSource {
    fn from(pixels: PixelBuffer) -> Self {
        Self::Pixels(pixels)
    }
}

enum Op {
    Region {
        options: Option<CropOptions>,
        reply: oneshot::Sender<SalienceResult<Region>>,
    },
    Point {
        reply: oneshot::Sender<SalienceResult<Point>>,
    },
    Palette {
        count: SwatchCount,
        reply: oneshot::Sender<SalienceResult<Palette>>,
    },
}

struct Job {
    source: ImageSource,
    op: Op,
}

/// Async facade over the analysis core.
///
/// Must be created inside a tokio runtime; the dispatcher runs as a task
/// on it. The engine is cheap to share behind an `Arc`.
pub struct Engine {
    submit: mpsc::Sender<Job>,
}

impl Engine {
    /// Engine with default sizing and the default decoder.
    #[cfg(feature = "image-io")]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Engine with explicit sizing and the default decoder.
    #[cfg(feature = "image-io")]
    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_decoder(config, ImageDecoder)
    }

    /// Engine with explicit sizing and a caller-provided decoder.
    pub fn with_decoder<D: Decoder + 'static>(config: EngineConfig, decoder: D) -> Self {
        let workers = config.workers.max(1);
        let queue_depth = config.queue_depth.max(1);
        trace_event!("engine_start", workers = workers, queue_depth = queue_depth);

        let analyzer = Arc::new(Analyzer::new(config.analysis));
        let decoder: Arc<dyn Decoder> = Arc::new(decoder);

        let (submit, mut submit_rx) = mpsc::channel::<Job>(queue_depth);
        let mut worker_txs = Vec::with_capacity(workers);
        for _ in 0..workers {
            // Capacity one per worker: the dispatcher blocks on a busy
            // worker and that backpressure reaches the submission queue.
            let (tx, rx) = mpsc::channel::<Job>(1);
            worker_txs.push(tx);
            let analyzer = Arc::clone(&analyzer);
            let decoder = Arc::clone(&decoder);
            thread::spawn(move || worker_loop(rx, analyzer, decoder));
        }

        tokio::spawn(async move {
            let mut next = 0usize;
            while let Some(job) = submit_rx.recv().await {
                if worker_txs[next].send(job).await.is_err() {
                    break;
                }
                next = (next + 1) % worker_txs.len();
            }
        });

        Self { submit }
    }

    /// Finds the most salient region of `source`, optionally constrained
    /// to a crop target.
    pub async fn region(
        &self,
        source: impl Into<ImageSource>,
        options: Option<CropOptions>,
    ) -> SalienceResult<Region> {
        let (reply, rx) = oneshot::channel();
        self.submit(Job {
            source: source.into(),
            op: Op::Region { options, reply },
        })
        .await?;
        rx.await.map_err(|_| SalienceError::EngineShutDown)?
    }

    /// Finds the focal point of `source`.
    pub async fn point(&self, source: impl Into<ImageSource>) -> SalienceResult<Point> {
        let (reply, rx) = oneshot::channel();
        self.submit(Job {
            source: source.into(),
            op: Op::Point { reply },
        })
        .await?;
        rx.await.map_err(|_| SalienceError::EngineShutDown)?
    }

    /// Extracts exactly `swatches` dominant colors from `source`.
    ///
    /// The count is validated before any work is queued.
    pub async fn palette(
        &self,
        source: impl Into<ImageSource>,
        swatches: usize,
    ) -> SalienceResult<Palette> {
        let count = SwatchCount::new(swatches)?;
        let (reply, rx) = oneshot::channel();
        self.submit(Job {
            source: source.into(),
            op: Op::Palette { count, reply },
        })
        .await?;
        rx.await.map_err(|_| SalienceError::EngineShutDown)?
    }

    async fn submit(&self, job: Job) -> SalienceResult<()> {
        self.submit
            .send(job)
            .await
            .map_err(|_| SalienceError::EngineShutDown)
    }
}

fn worker_loop(mut rx: mpsc::Receiver<Job>, analyzer: Arc<Analyzer>, decoder: Arc<dyn Decoder>) {
    while let Some(job) = rx.blocking_recv() {
        let buffer = resolve(job.source, decoder.as_ref());
        // A dropped reply means the caller went away; nothing to do.
        match job.op {
            Op::Region { options, reply } => {
                let _ = reply.send(buffer.map(|buf| analyzer.region(&buf, options.as_ref())));
            }
            Op::Point { reply } => {
                let _ = reply.send(buffer.map(|buf| analyzer.point(&buf)));
            }
            Op::Palette { count, reply } => {
                let _ = reply.send(buffer.map(|buf| analyzer.palette(&buf, count)));
            }
        }
    }
}

fn resolve(source: ImageSource, decoder: &dyn Decoder) -> SalienceResult<PixelBuffer> {
    match source {
        ImageSource::Path(path) => decoder.decode_path(&path),
        ImageSource::Buffer(bytes) => decoder.decode_bytes(&bytes),
        ImageSource::Pixels(pixels) => Ok(pixels),
    }
}

#[cfg(feature = "image-io")]
impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
