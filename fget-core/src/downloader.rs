use std::{path::Path, sync::Arc};

use futures_util::StreamExt;
use reqwest::{header, Client, StatusCode};
use tokio::{
    fs::{self, File, OpenOptions},
    io::AsyncWriteExt,
    task,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    download::{Chunk, DownloadJob},
    errors::FetchError,
    probe,
    progress::ProgressObserver,
    utils,
};

/// How a job invocation ended when no error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The destination file already existed; no network request was made.
    AlreadyPresent,
    /// The file was downloaded and passed the integrity check.
    Completed { bytes: u64 },
}

/// Represents a download session.
/// Download only starts when the start function is called.
pub struct Downloader {
    job: DownloadJob,
    client: Client,
    progress: Arc<dyn ProgressObserver>,
}

impl Downloader {
    pub fn new(job: DownloadJob, progress: Arc<dyn ProgressObserver>) -> Self {
        Downloader {
            job,
            client: Client::new(),
            progress,
        }
    }

    /// Runs the job to completion: probe, download via one of the two
    /// strategies, verify. Any failure is terminal; nothing is retried.
    pub async fn start(mut self) -> Result<Outcome, FetchError> {
        if utils::file_exists(&self.job.dest_path).await {
            return Ok(Outcome::AlreadyPresent);
        }

        utils::create_empty_file(&self.job.dest_path)
            .await
            .map_err(|source| FetchError::Write {
                path: self.job.dest_path.clone(),
                source,
            })?;

        let info = probe::probe(&self.client, &self.job.url).await?;
        self.job.total_size = info.total_size;
        self.job.supports_partial = info.supports_partial;
        self.progress.start(info.total_size);

        match (info.supports_partial, info.total_size) {
            (true, Some(total)) => self.partial_download(total).await?,
            _ => self.full_download().await?,
        }

        let bytes = self.check_integrity().await?;
        self.progress.finish();
        debug!(path = %self.job.dest_path.display(), bytes, "download complete");
        Ok(Outcome::Completed { bytes })
    }

    /// Fallback strategy: one unranged GET streamed straight into the
    /// destination file.
    async fn full_download(&self) -> Result<(), FetchError> {
        debug!(url = %self.job.url, "server lacks range support, using full download");
        let response = self.client.get(&self.job.url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(FetchError::UnexpectedStatus(response.status()));
        }

        let mut file = OpenOptions::new()
            .write(true)
            .open(&self.job.dest_path)
            .await
            .map_err(|source| FetchError::Write {
                path: self.job.dest_path.clone(),
                source,
            })?;

        let mut stream = response.bytes_stream();
        while let Some(data) = stream.next().await {
            let bytes = data?;
            file.write_all(&bytes)
                .await
                .map_err(|source| FetchError::Write {
                    path: self.job.dest_path.clone(),
                    source,
                })?;
            self.progress.add(bytes.len() as u64);
        }
        file.flush().await.map_err(|source| FetchError::Write {
            path: self.job.dest_path.clone(),
            source,
        })
    }

    /// Partitioned strategy: one worker task per chunk, a single barrier
    /// waiting for all of them, then the merge.
    ///
    /// The first worker failure cancels the token so not-yet-started
    /// workers stop early; workers already streaming run to their own
    /// completion or failure. On any failure the merge is skipped and
    /// temp files are left on disk for inspection.
    async fn partial_download(&self, total: u64) -> Result<(), FetchError> {
        let chunks = self.job.chunks(total);
        debug!(
            url = %self.job.url,
            workers = chunks.len(),
            total,
            "using partitioned download"
        );
        let token = CancellationToken::new();

        let mut handles = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let client = self.client.clone();
            let url = self.job.url.clone();
            let dest = self.job.dest_path.clone();
            let progress = Arc::clone(&self.progress);
            let token = token.clone();
            let chunk = *chunk;
            handles.push(task::spawn(async move {
                let result =
                    fetch_chunk(&client, &url, chunk, &dest, progress.as_ref(), &token).await;
                if let Err(ref e) = result {
                    if !e.is_cancelled() {
                        token.cancel();
                    }
                }
                result
            }));
        }

        let mut first_failure: Option<FetchError> = None;
        let mut cancelled: Option<FetchError> = None;
        for handle in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) if e.is_cancelled() => {
                    cancelled.get_or_insert(e);
                }
                Ok(Err(e)) => {
                    first_failure.get_or_insert(e);
                }
                Err(e) => {
                    first_failure.get_or_insert(FetchError::Join(e));
                }
            }
        }

        if let Some(e) = first_failure.or(cancelled) {
            return Err(FetchError::PartialDownload(Box::new(e)));
        }

        self.merge_chunks(&chunks).await
    }

    /// Concatenates the temp chunk files into the destination, strictly
    /// in index order, deleting each temp file once merged.
    async fn merge_chunks(&self, chunks: &[Chunk]) -> Result<(), FetchError> {
        let dest = &self.job.dest_path;
        let mut file = OpenOptions::new()
            .append(true)
            .open(dest)
            .await
            .map_err(|source| FetchError::Assembly {
                path: dest.clone(),
                source,
            })?;

        for chunk in chunks {
            let tmp_path = chunk.temp_path(dest);
            let mut tmp = File::open(&tmp_path)
                .await
                .map_err(|source| FetchError::Assembly {
                    path: tmp_path.clone(),
                    source,
                })?;
            tokio::io::copy(&mut tmp, &mut file)
                .await
                .map_err(|source| FetchError::Assembly {
                    path: tmp_path.clone(),
                    source,
                })?;
            if let Err(e) = fs::remove_file(&tmp_path).await {
                warn!("could not remove {}: {e}", tmp_path.display());
            }
        }

        file.flush().await.map_err(|source| FetchError::Assembly {
            path: dest.clone(),
            source,
        })
    }

    /// Compares the destination file size against the probed size. Purely
    /// diagnostic; skipped when the server never reported a size.
    async fn check_integrity(&self) -> Result<u64, FetchError> {
        let meta = fs::metadata(&self.job.dest_path)
            .await
            .map_err(|source| FetchError::Read {
                path: self.job.dest_path.clone(),
                source,
            })?;
        let actual = meta.len();
        if let Some(expected) = self.job.total_size {
            if actual != expected {
                return Err(FetchError::SizeMismatch { expected, actual });
            }
        }
        Ok(actual)
    }
}

/// Downloads one chunk into its temp file via a ranged GET.
///
/// Content transformation is disabled so the received byte count matches
/// the requested range. The cancellation token is consulted before the
/// request goes out and before each write.
async fn fetch_chunk(
    client: &Client,
    url: &str,
    chunk: Chunk,
    dest: &Path,
    progress: &dyn ProgressObserver,
    token: &CancellationToken,
) -> Result<(), FetchError> {
    if token.is_cancelled() {
        return Err(FetchError::Cancelled);
    }

    let range = if chunk.is_last {
        format!("bytes={}-", chunk.offset)
    } else {
        format!("bytes={}-{}", chunk.offset, chunk.offset + chunk.length - 1)
    };
    let response = client
        .get(url)
        .header(header::RANGE, range)
        .header(header::ACCEPT_ENCODING, "identity")
        .send()
        .await?;

    if response.status() != StatusCode::PARTIAL_CONTENT {
        return Err(FetchError::RangeNotHonored {
            index: chunk.index,
            status: response.status(),
        });
    }

    let tmp_path = chunk.temp_path(dest);
    let mut file = File::create(&tmp_path)
        .await
        .map_err(|source| FetchError::Write {
            path: tmp_path.clone(),
            source,
        })?;

    let mut stream = response.bytes_stream();
    while let Some(data) = stream.next().await {
        if token.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        let bytes = data?;
        file.write_all(&bytes)
            .await
            .map_err(|source| FetchError::Write {
                path: tmp_path.clone(),
                source,
            })?;
        progress.add(bytes.len() as u64);
    }

    file.flush().await.map_err(|source| FetchError::Write {
        path: tmp_path,
        source,
    })
}
