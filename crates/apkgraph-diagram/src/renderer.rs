use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, Context, Result};

/// External Mermaid CLI (`mmdc` or anything accepting `-i <in> -o <out>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MermaidRenderer {
    program: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDiagram {
    pub diagram_path: PathBuf,
    pub image_path: PathBuf,
}

impl MermaidRenderer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Writes `diagram` to `diagram_path` and asks the renderer to produce
    /// `image_path`. The diagram file stays in place when rendering fails.
    pub fn render_to_file(
        &self,
        diagram: &str,
        diagram_path: &Path,
        image_path: &Path,
    ) -> Result<RenderedDiagram> {
        if let Some(parent) = diagram_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create diagram dir: {}", parent.display()))?;
        }
        fs::write(diagram_path, diagram)
            .with_context(|| format!("failed writing diagram: {}", diagram_path.display()))?;

        let mut command = Command::new(&self.program);
        command.arg("-i").arg(diagram_path).arg("-o").arg(image_path);
        run_command(
            &mut command,
            &format!("renderer '{}' failed", self.program.display()),
        )?;

        Ok(RenderedDiagram {
            diagram_path: diagram_path.to_path_buf(),
            image_path: image_path.to_path_buf(),
        })
    }
}

fn run_command(command: &mut Command, context_message: &str) -> Result<()> {
    let output = command
        .output()
        .with_context(|| format!("{context_message}: command failed to start"))?;
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    Err(anyhow!(
        "{context_message}: status={} stdout='{}' stderr='{}'",
        output.status,
        stdout.trim(),
        stderr.trim()
    ))
}
