use std::path::{Path, PathBuf};

pub const INDEX_ARCHIVE_NAME: &str = "APKINDEX.tar.gz";

/// Where the index comes from: a repository URL or a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    Remote(String),
    LocalFile(PathBuf),
}

impl IndexSource {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Remote(trimmed.to_string())
        } else {
            Self::LocalFile(PathBuf::from(trimmed))
        }
    }

    /// Whether a local source points at a gzip'd tarball rather than plain text.
    pub fn is_archive(&self) -> bool {
        match self {
            Self::Remote(_) => true,
            Self::LocalFile(path) => path_is_archive(path),
        }
    }
}

fn path_is_archive(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|v| v.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    name.ends_with(".tar.gz") || name.ends_with(".tgz")
}

/// `https://host/alpine/v3.20/main/x86_64/` -> `.../x86_64/APKINDEX.tar.gz`
pub fn index_archive_url(repository: &str) -> String {
    format!(
        "{}/{INDEX_ARCHIVE_NAME}",
        repository.trim().trim_end_matches('/')
    )
}
