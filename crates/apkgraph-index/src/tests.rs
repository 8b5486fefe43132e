use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use super::*;

static TEST_ROOT_COUNTER: AtomicU64 = AtomicU64::new(0);

fn test_root() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    let sequence = TEST_ROOT_COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "apkgraph-index-tests-{}-{}-{}",
        std::process::id(),
        nanos,
        sequence
    ));
    fs::create_dir_all(&path).expect("must create test root");
    path
}

fn write_index_archive(dir: &Path, content: &str) -> PathBuf {
    let staging = dir.join("staging");
    fs::create_dir_all(&staging).expect("must create staging dir");
    fs::write(staging.join(INDEX_MEMBER), content).expect("must write APKINDEX");
    fs::write(staging.join("DESCRIPTION"), "test repo").expect("must write DESCRIPTION");

    let archive = dir.join(INDEX_ARCHIVE_NAME);
    let status = Command::new("tar")
        .arg("-czf")
        .arg(&archive)
        .arg("-C")
        .arg(&staging)
        .arg("DESCRIPTION")
        .arg(INDEX_MEMBER)
        .status()
        .expect("tar must start");
    assert!(status.success(), "tar must create archive");
    archive
}

#[derive(Default)]
struct RecordingProgress {
    finished: bool,
}

impl FetchProgress for RecordingProgress {
    fn start(&mut self, _total: Option<u64>) {}

    fn advance(&mut self, _downloaded: u64) {}

    fn finish(&mut self) {
        self.finished = true;
    }
}

#[test]
fn index_archive_url_appends_archive_name_once() {
    assert_eq!(
        index_archive_url("https://dl-cdn.alpinelinux.org/alpine/v3.20/main/x86_64/"),
        "https://dl-cdn.alpinelinux.org/alpine/v3.20/main/x86_64/APKINDEX.tar.gz"
    );
    assert_eq!(
        index_archive_url("http://mirror.test/main/x86_64"),
        "http://mirror.test/main/x86_64/APKINDEX.tar.gz"
    );
}

#[test]
fn index_source_parse_detects_urls_and_paths() {
    assert_eq!(
        IndexSource::parse(" https://mirror.test/main "),
        IndexSource::Remote("https://mirror.test/main".to_string())
    );
    assert_eq!(
        IndexSource::parse("./APKINDEX"),
        IndexSource::LocalFile(PathBuf::from("./APKINDEX"))
    );
    assert!(IndexSource::parse("/tmp/APKINDEX.tar.gz").is_archive());
    assert!(IndexSource::parse("/tmp/index.TGZ").is_archive());
    assert!(!IndexSource::parse("/tmp/APKINDEX").is_archive());
}

#[test]
fn cache_layout_paths_are_stable_per_repository() {
    let layout = CacheLayout::new("/cache");

    let with_slash = layout.archive_path("https://mirror.test/main/");
    let without_slash = layout.archive_path("https://mirror.test/main");
    let other = layout.archive_path("https://mirror.test/community");

    assert_eq!(with_slash, without_slash);
    assert_ne!(with_slash, other);
    assert!(with_slash.starts_with("/cache"));
    assert!(with_slash.ends_with(INDEX_ARCHIVE_NAME));
    let key = with_slash
        .parent()
        .and_then(|p| p.file_name())
        .map(|v| v.to_string_lossy().to_string())
        .expect("repository dir must have a name");
    assert_eq!(key.len(), 16);
    assert!(key.chars().all(|ch| ch.is_ascii_hexdigit()));
}

#[test]
fn load_index_text_reads_plain_local_file() {
    let root = test_root();
    let path = root.join(INDEX_MEMBER);
    fs::write(&path, "P:musl\nV:1.2.5-r0\n").expect("must write index");

    let text = load_index_text(
        &IndexSource::LocalFile(path),
        &CacheLayout::new(root.join("cache")),
        false,
        &mut NoProgress,
    )
    .expect("plain index must load");

    assert_eq!(text, "P:musl\nV:1.2.5-r0\n");
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn load_index_text_reports_missing_local_file() {
    let root = test_root();

    let err = load_index_text(
        &IndexSource::LocalFile(root.join("missing")),
        &CacheLayout::new(root.join("cache")),
        false,
        &mut NoProgress,
    )
    .expect_err("missing index must fail");

    assert!(err.to_string().contains("failed reading index file"));
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn load_index_text_extracts_local_archive() {
    let root = test_root();
    let archive = write_index_archive(&root, "P:busybox\nD:musl\n\nP:musl\n");

    let text = load_index_text(
        &IndexSource::LocalFile(archive),
        &CacheLayout::new(root.join("cache")),
        false,
        &mut NoProgress,
    )
    .expect("archive index must load");

    assert_eq!(text, "P:busybox\nD:musl\n\nP:musl\n");
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn load_index_text_uses_cached_remote_archive_without_refresh() {
    let root = test_root();
    let layout = CacheLayout::new(root.join("cache"));
    let repository = "http://127.0.0.1:9/alpine/main/x86_64";
    let archive = write_index_archive(&root, "P:apk-tools\n");
    let cached = layout.archive_path(repository);
    fs::create_dir_all(cached.parent().expect("cache path has parent"))
        .expect("must create cache dir");
    fs::copy(&archive, &cached).expect("must seed cache");

    let text = load_index_text(
        &IndexSource::Remote(repository.to_string()),
        &layout,
        false,
        &mut NoProgress,
    )
    .expect("cached index must load");

    assert_eq!(text, "P:apk-tools\n");
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn fetch_index_archive_cache_hit_skips_network() {
    let root = test_root();
    let cached = root.join(INDEX_ARCHIVE_NAME);
    fs::write(&cached, b"cached").expect("must seed cache");

    let outcome = fetch_index_archive("http://127.0.0.1:9/APKINDEX.tar.gz", &cached, false, &mut NoProgress)
        .expect("cache hit must succeed");

    assert_eq!(outcome, FetchOutcome::CacheHit);
    assert_eq!(outcome.as_str(), "cache-hit");
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn fetch_index_archive_failure_leaves_no_partial_file() {
    let root = test_root();
    let cached = root.join("repo").join(INDEX_ARCHIVE_NAME);
    let mut progress = RecordingProgress::default();

    let err = fetch_index_archive("http://127.0.0.1:9/APKINDEX.tar.gz", &cached, true, &mut progress)
        .expect_err("unreachable host must fail");

    assert!(err.to_string().contains("index download failed"), "unexpected error: {err}");
    assert!(progress.finished);
    assert!(!cached.exists());
    assert!(!root.join("repo").join("APKINDEX.tar.gz.part").exists());
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn extract_index_rejects_missing_archive() {
    let root = test_root();

    let err = extract_index(&root.join("nope.tar.gz"), &root.join("out"))
        .expect_err("missing archive must fail");

    assert!(err.to_string().contains("index archive does not exist"));
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn extract_index_reports_archive_without_index_member() {
    let root = test_root();
    let staging = root.join("staging");
    fs::create_dir_all(&staging).expect("must create staging");
    fs::write(staging.join("DESCRIPTION"), "x").expect("must write file");
    let archive = root.join("bad.tar.gz");
    let status = Command::new("tar")
        .arg("-czf")
        .arg(&archive)
        .arg("-C")
        .arg(&staging)
        .arg("DESCRIPTION")
        .status()
        .expect("tar must start");
    assert!(status.success());

    let err = extract_index(&archive, &root.join("out")).expect_err("missing member must fail");

    assert!(err.to_string().contains("failed to extract APKINDEX"));
    let _ = fs::remove_dir_all(&root);
}
