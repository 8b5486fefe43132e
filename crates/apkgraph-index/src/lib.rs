mod extract;
mod fetch;
mod layout;
mod source;

use anyhow::{Context, Result};

pub use extract::{extract_index, INDEX_MEMBER};
pub use fetch::{fetch_index_archive, FetchOutcome, FetchProgress, NoProgress};
pub use layout::{default_cache_root, CacheLayout};
pub use source::{index_archive_url, IndexSource, INDEX_ARCHIVE_NAME};

/// Resolves `source` to APKINDEX text, downloading and unpacking as needed.
pub fn load_index_text(
    source: &IndexSource,
    layout: &CacheLayout,
    refresh: bool,
    progress: &mut dyn FetchProgress,
) -> Result<String> {
    match source {
        IndexSource::LocalFile(path) if source.is_archive() => {
            let work_dir = layout.extract_dir_for_path(path);
            extract_index(path, &work_dir)
        }
        IndexSource::LocalFile(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed reading index file: {}", path.display()))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        IndexSource::Remote(repository) => {
            let url = index_archive_url(repository);
            let archive_path = layout.archive_path(repository);
            fetch_index_archive(&url, &archive_path, refresh, progress)?;
            extract_index(&archive_path, &layout.extract_dir(repository))
        }
    }
}

#[cfg(test)]
mod tests;
