use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::source::INDEX_ARCHIVE_NAME;

/// On-disk cache for downloaded index archives, one directory per repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn repository_dir(&self, repository: &str) -> PathBuf {
        self.root.join(cache_key(repository.trim().trim_end_matches('/')))
    }

    pub fn archive_path(&self, repository: &str) -> PathBuf {
        self.repository_dir(repository).join(INDEX_ARCHIVE_NAME)
    }

    pub fn extract_dir(&self, repository: &str) -> PathBuf {
        self.repository_dir(repository).join("extracted")
    }

    pub fn extract_dir_for_path(&self, archive: &Path) -> PathBuf {
        self.root
            .join("local")
            .join(cache_key(&archive.display().to_string()))
    }
}

fn cache_key(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    hex::encode(digest)[..16].to_string()
}

pub fn default_cache_root() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CACHE_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir).join("apkgraph"));
    }

    if cfg!(windows) {
        let app_data = std::env::var("LOCALAPPDATA")
            .context("LOCALAPPDATA is not set; cannot resolve Windows cache dir")?;
        return Ok(PathBuf::from(app_data).join("apkgraph").join("cache"));
    }

    let home = std::env::var("HOME").context("HOME is not set; cannot resolve cache dir")?;
    Ok(PathBuf::from(home).join(".cache").join("apkgraph"))
}
