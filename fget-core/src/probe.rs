use reqwest::{header, Client, StatusCode};
use tracing::debug;

use crate::errors::FetchError;

/// What the metadata probe learned about the target resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    /// True only when the server explicitly advertises `Accept-Ranges:
    /// bytes` and reports a usable content length.
    pub supports_partial: bool,
    pub total_size: Option<u64>,
}

/// Issues a HEAD request to learn the resource size and whether the
/// server honors byte-range requests.
///
/// Absence of the `Accept-Ranges: bytes` signal means "not supported";
/// so does a missing, malformed, or zero `Content-Length`, since chunk
/// boundaries cannot be computed without a positive size.
pub async fn probe(client: &Client, url: &str) -> Result<ProbeResult, FetchError> {
    let response = client.head(url).send().await?;

    if response.status() != StatusCode::OK {
        return Err(FetchError::UnexpectedStatus(response.status()));
    }

    let total_size = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok());

    let accepts_ranges = response
        .headers()
        .get(header::ACCEPT_RANGES)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim() == "bytes")
        .unwrap_or(false);

    let result = ProbeResult {
        supports_partial: accepts_ranges && total_size.is_some_and(|size| size > 0),
        total_size,
    };
    debug!(
        supports_partial = result.supports_partial,
        total_size = result.total_size,
        "probed {url}"
    );
    Ok(result)
}
