use std::path::{Path, PathBuf};

/// A single download job: one URL, one destination file, one strategy.
///
/// Probe results are filled in by the downloader before any bytes move.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub url: String,
    pub dest_path: PathBuf,
    /// Requested number of concurrent chunk workers, >= 1.
    pub concurrency: usize,
    /// Total byte size reported by the probe. None until probed or when
    /// the server sends no usable content length.
    pub total_size: Option<u64>,
    /// Whether the server advertised byte-range support.
    pub supports_partial: bool,
}

/// One contiguous byte range of the target resource, assigned to one
/// chunk worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub offset: u64,
    pub length: u64,
    /// The last chunk requests an open-ended range (`bytes=<offset>-`).
    pub is_last: bool,
}

impl DownloadJob {
    /// Creates a job for `url`, saving into `save_dir` under the file
    /// name taken from the URL's last path segment.
    pub fn new(url: impl Into<String>, save_dir: &Path, concurrency: usize) -> Self {
        let url = url.into();
        let file_name = file_name_from_url(&url);
        DownloadJob {
            dest_path: save_dir.join(file_name),
            url,
            concurrency: concurrency.max(1),
            total_size: None,
            supports_partial: false,
        }
    }

    /// Splits `[0, total)` into at most `concurrency` contiguous chunks.
    ///
    /// Every chunk except the last has length `total / n`; the last one
    /// absorbs the integer-division remainder, so the lengths sum to
    /// `total` exactly. The worker count is clamped so no chunk is ever
    /// empty.
    pub fn chunks(&self, total: u64) -> Vec<Chunk> {
        let n = (self.concurrency as u64).min(total).max(1) as usize;
        let part_size = total / n as u64;

        (0..n)
            .map(|i| {
                let offset = i as u64 * part_size;
                let is_last = i == n - 1;
                Chunk {
                    index: i,
                    offset,
                    length: if is_last { total - offset } else { part_size },
                    is_last,
                }
            })
            .collect()
    }
}

impl Chunk {
    /// Path of the temporary file this chunk streams into: `<dest>.tmp.<i>`.
    pub fn temp_path(&self, dest: &Path) -> PathBuf {
        let mut name = dest.as_os_str().to_os_string();
        name.push(format!(".tmp.{}", self.index));
        PathBuf::from(name)
    }
}

/// Derives a file name from a download URL (last path segment, query
/// string stripped).
pub fn file_name_from_url(url: &str) -> String {
    let trimmed = match url.find('?') {
        Some(i) => &url[..i],
        None => url,
    };
    match trimmed.rfind('/') {
        Some(i) if i + 1 < trimmed.len() => trimmed[i + 1..].to_string(),
        _ => String::from("Unknown_File"),
    }
}
