use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, Context, Result};

pub const INDEX_MEMBER: &str = "APKINDEX";

/// Unpacks the `APKINDEX` member of `archive` into `work_dir` and returns it.
pub fn extract_index(archive: &Path, work_dir: &Path) -> Result<String> {
    if !archive.is_file() {
        anyhow::bail!("index archive does not exist: {}", archive.display());
    }
    if work_dir.exists() {
        fs::remove_dir_all(work_dir).with_context(|| {
            format!("failed clearing extract directory {}", work_dir.display())
        })?;
    }
    fs::create_dir_all(work_dir)
        .with_context(|| format!("failed creating extract directory {}", work_dir.display()))?;

    run_command(
        Command::new("tar")
            .arg("-xzf")
            .arg(archive)
            .arg("-C")
            .arg(work_dir)
            .arg(INDEX_MEMBER),
        &format!("failed to extract {INDEX_MEMBER} from {}", archive.display()),
    )?;

    let member = work_dir.join(INDEX_MEMBER);
    let bytes = fs::read(&member)
        .with_context(|| format!("failed reading extracted index: {}", member.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn run_command(command: &mut Command, context_message: &str) -> Result<()> {
    let output = command
        .output()
        .with_context(|| format!("{context_message}: command failed to start"))?;
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(anyhow!(
        "{context_message}: status={} stderr='{}'",
        output.status,
        stderr.trim()
    ))
}
