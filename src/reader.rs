use anyhow::{Context, Result};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

/// Configuration for input reading behavior
#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
    /// Whether to fail fast on first error or continue with the remaining inputs
    pub fail_fast: bool,
    /// Use memory-mapped I/O instead of async buffered reads
    pub use_mmap: bool,
}

/// Statistics for one read operation
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub source: String,
    pub bytes_read: u64,
    pub duration_ms: u64,
    pub read_error: Option<String>,
}

/// Loads whole UTF-8 documents for segmentation
#[derive(Debug, Clone)]
pub struct InputReader {
    config: ReaderConfig,
}

impl InputReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read a whole file as UTF-8 text
    pub async fn read_text<P: AsRef<Path>>(&self, path: P) -> Result<(String, ReadStats)> {
        let path = path.as_ref();
        let start_time = Instant::now();
        debug!(use_mmap = self.config.use_mmap, "Starting read of {}", path.display());

        let text = if self.config.use_mmap {
            read_mmap(path.to_path_buf()).await?
        } else {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to open file {}", path.display()))?;
            String::from_utf8(bytes)
                .with_context(|| format!("UTF-8 decoding error in {}", path.display()))?
        };

        let stats = finish_stats(path.display().to_string(), &text, start_time);
        Ok((text, stats))
    }

    /// Read all of standard input as UTF-8 text
    pub async fn read_stdin(&self) -> Result<(String, ReadStats)> {
        let start_time = Instant::now();
        let mut bytes = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut bytes)
            .await
            .context("Failed to read standard input")?;
        let text = String::from_utf8(bytes).context("UTF-8 decoding error in standard input")?;
        let stats = finish_stats("<stdin>".to_string(), &text, start_time);
        Ok((text, stats))
    }

    /// Read several files concurrently, results in input order
    ///
    /// Without `fail_fast` a failed file yields empty text and its error in
    /// `ReadStats::read_error`; with it the first failure aborts the batch.
    pub async fn read_many<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<(String, ReadStats)>> {
        let reads = paths.iter().map(|path| self.read_text(path.as_ref()));
        let results = join_all(reads).await;

        let mut outputs = Vec::with_capacity(results.len());
        for (path, result) in paths.iter().zip(results) {
            match result {
                Ok(output) => outputs.push(output),
                Err(e) if self.config.fail_fast => return Err(e),
                Err(e) => {
                    let error_msg = format!("{e:#}");
                    warn!("{}", error_msg);
                    outputs.push((
                        String::new(),
                        ReadStats {
                            source: path.as_ref().display().to_string(),
                            bytes_read: 0,
                            duration_ms: 0,
                            read_error: Some(error_msg),
                        },
                    ));
                }
            }
        }
        Ok(outputs)
    }
}

// WHY: mapping and UTF-8 validation block, so they run off the async worker threads
async fn read_mmap(path: PathBuf) -> Result<String> {
    tokio::task::spawn_blocking(move || -> Result<String> {
        let file = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open file {}", path.display()))?;
        if file.metadata()?.len() == 0 {
            return Ok(String::new());
        }
        // SAFETY: the map is read once and copied out before it is dropped
        let mmap = unsafe { memmap2::Mmap::map(&file) }
            .with_context(|| format!("Failed to memory-map {}", path.display()))?;
        let text = std::str::from_utf8(&mmap)
            .with_context(|| format!("UTF-8 decoding error in {}", path.display()))?;
        Ok(text.to_owned())
    })
    .await
    .context("Memory-mapped read task panicked")?
}

fn finish_stats(source: String, text: &str, start_time: Instant) -> ReadStats {
    let stats = ReadStats {
        source,
        bytes_read: text.len() as u64,
        duration_ms: start_time.elapsed().as_millis() as u64,
        read_error: None,
    };
    info!(
        "Successfully read {}: {} bytes in {}ms",
        stats.source, stats.bytes_read, stats.duration_ms
    );
    stats
}
