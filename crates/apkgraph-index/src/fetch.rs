use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

const USER_AGENT: &str = concat!("apkgraph/", env!("CARGO_PKG_VERSION"));
const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    CacheHit,
    Downloaded { bytes: u64 },
}

impl FetchOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CacheHit => "cache-hit",
            Self::Downloaded { .. } => "downloaded",
        }
    }
}

/// Receives download progress; `total` is `None` for chunked responses.
pub trait FetchProgress {
    fn start(&mut self, total: Option<u64>);
    fn advance(&mut self, downloaded: u64);
    fn finish(&mut self);
}

/// Progress sink that ignores every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl FetchProgress for NoProgress {
    fn start(&mut self, _total: Option<u64>) {}

    fn advance(&mut self, _downloaded: u64) {}

    fn finish(&mut self) {}
}

/// Downloads `url` to `cache_path` unless it is already cached.
///
/// The body is streamed into a `.part` sibling and renamed on success so a
/// failed transfer never leaves a truncated archive in the cache.
pub fn fetch_index_archive(
    url: &str,
    cache_path: &Path,
    refresh: bool,
    progress: &mut dyn FetchProgress,
) -> Result<FetchOutcome> {
    if cache_path.exists() && !refresh {
        return Ok(FetchOutcome::CacheHit);
    }

    if let Some(parent) = cache_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create cache dir: {}", parent.display()))?;
    }
    let part_path = cache_path.with_file_name(format!(
        "{}.part",
        cache_path
            .file_name()
            .and_then(|v| v.to_str())
            .unwrap_or("index")
    ));

    let result = download_to(url, &part_path, progress);
    progress.finish();
    let bytes = match result {
        Ok(bytes) => bytes,
        Err(err) => {
            let _ = fs::remove_file(&part_path);
            return Err(err);
        }
    };

    if cache_path.exists() {
        fs::remove_file(cache_path)
            .with_context(|| format!("failed to replace cache file: {}", cache_path.display()))?;
    }
    fs::rename(&part_path, cache_path).with_context(|| {
        format!(
            "failed to move downloaded index into cache: {}",
            cache_path.display()
        )
    })?;

    Ok(FetchOutcome::Downloaded { bytes })
}

fn download_to(
    url: &str,
    out_path: &Path,
    progress: &mut dyn FetchProgress,
) -> Result<u64> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(30))
        .build()
        .context("failed to build http client")?;
    let mut response = client
        .get(url)
        .send()
        .with_context(|| format!("index download failed: {url}"))?;
    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("index download failed: status {status} for {url}"));
    }

    progress.start(response.content_length());

    let mut file = File::create(out_path)
        .with_context(|| format!("failed to create download file: {}", out_path.display()))?;
    let mut buffer = vec![0_u8; CHUNK_SIZE];
    let mut downloaded = 0_u64;
    loop {
        let read = response
            .read(&mut buffer)
            .with_context(|| format!("index download interrupted: {url}"))?;
        if read == 0 {
            break;
        }
        file.write_all(&buffer[..read])
            .with_context(|| format!("failed writing download file: {}", out_path.display()))?;
        downloaded += read as u64;
        progress.advance(downloaded);
    }
    file.flush()
        .with_context(|| format!("failed flushing download file: {}", out_path.display()))?;

    Ok(downloaded)
}
