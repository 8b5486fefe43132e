use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use apkgraph_index::{default_cache_root, IndexSource};
use apkgraph_resolver::DEFAULT_MAX_DEPTH;
use serde::Deserialize;

use crate::GraphArgs;

const DEFAULT_OUTPUT: &str = "graph.png";
const DEFAULT_DIAGRAM: &str = "graph.mmd";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub repository: Option<String>,
    pub renderer: Option<PathBuf>,
    pub max_depth: Option<usize>,
    pub output: Option<PathBuf>,
    pub diagram: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
}

impl FileConfig {
    pub(crate) fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).context("failed to parse apkgraph config")
    }
}

/// Effective settings after merging flags over the config file over defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GraphSettings {
    pub source: IndexSource,
    pub renderer: Option<PathBuf>,
    pub max_depth: usize,
    pub output: PathBuf,
    pub diagram: PathBuf,
    pub cache_root: PathBuf,
}

pub(crate) fn default_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir).join("apkgraph").join("config.toml"));
    }
    if cfg!(windows) {
        return std::env::var_os("APPDATA")
            .map(|dir| PathBuf::from(dir).join("apkgraph").join("config.toml"));
    }
    std::env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("apkgraph")
            .join("config.toml")
    })
}

/// An explicit path must exist; the default location is optional.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.is_file() => path,
            _ => return Ok(FileConfig::default()),
        },
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed reading config: {}", path.display()))?;
    FileConfig::from_toml_str(&content)
        .with_context(|| format!("failed parsing config: {}", path.display()))
}

pub(crate) fn resolve_source(repository: Option<&str>, config: &FileConfig) -> Result<IndexSource> {
    let repository = repository
        .or(config.repository.as_deref())
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            anyhow!("no repository configured: pass --repository <url|path> or set 'repository' in the config file")
        })?;
    Ok(IndexSource::parse(repository))
}

pub(crate) fn resolve_cache_root(config: &FileConfig) -> Result<PathBuf> {
    match &config.cache_dir {
        Some(dir) => Ok(dir.clone()),
        None => default_cache_root(),
    }
}

pub(crate) fn resolve_graph_settings(
    repository: Option<&str>,
    args: &GraphArgs,
    config: &FileConfig,
) -> Result<GraphSettings> {
    Ok(GraphSettings {
        source: resolve_source(repository, config)?,
        renderer: args.renderer.clone().or_else(|| config.renderer.clone()),
        max_depth: args
            .max_depth
            .or(config.max_depth)
            .unwrap_or(DEFAULT_MAX_DEPTH),
        output: args
            .output
            .clone()
            .or_else(|| config.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        diagram: args
            .diagram
            .clone()
            .or_else(|| config.diagram.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIAGRAM)),
        cache_root: resolve_cache_root(config)?,
    })
}
