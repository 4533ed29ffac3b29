//! Engine for fetching a single remote file over HTTP(S), using
//! concurrent byte-range requests when the server supports them.
//!
//! The entry point is [`downloader::Downloader`]: build a
//! [`download::DownloadJob`], pick a [`progress::ProgressObserver`], and
//! call `start`.

pub mod download;
pub mod downloader;
pub mod errors;
pub mod probe;
pub mod progress;
pub mod utils;
