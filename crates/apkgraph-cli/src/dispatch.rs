use anyhow::{anyhow, Context, Result};
use apkgraph_core::{parse_index, Diagnostic, PackageCatalog, PackageDescriptor};
use apkgraph_diagram::{render_mermaid, MermaidRenderer};
use apkgraph_index::{load_index_text, CacheLayout, IndexSource};
use apkgraph_resolver::{build_graph, DependencyEdge, DependencyGraph, GraphOptions};

use crate::completion::write_completions_script;
use crate::config::{
    load_config, resolve_cache_root, resolve_graph_settings, resolve_source, GraphSettings,
};
use crate::render::TerminalRenderer;
use crate::{Cli, Commands, GraphArgs, GraphFormat};

pub(crate) fn run_cli(cli: Cli) -> Result<()> {
    let terminal = TerminalRenderer::current();

    match cli.command {
        Commands::Graph(args) => {
            let config = load_config(cli.config.as_deref())?;
            let settings = resolve_graph_settings(cli.repository.as_deref(), &args, &config)?;
            let catalog = load_catalog(
                &settings.source,
                &CacheLayout::new(&settings.cache_root),
                cli.refresh,
                terminal,
            )?;
            run_graph_command(&catalog, &args, settings, terminal)?;
        }
        Commands::Info { package } => {
            let config = load_config(cli.config.as_deref())?;
            let source = resolve_source(cli.repository.as_deref(), &config)?;
            let layout = CacheLayout::new(resolve_cache_root(&config)?);
            let catalog = load_catalog(&source, &layout, cli.refresh, terminal)?;
            let descriptor = catalog
                .get(&package)
                .ok_or_else(|| anyhow!("package '{}' was not found in the index", package.trim()))?;
            terminal.print_lines(&format_info_lines(descriptor));
        }
        Commands::Search { query } => {
            let config = load_config(cli.config.as_deref())?;
            let source = resolve_source(cli.repository.as_deref(), &config)?;
            let layout = CacheLayout::new(resolve_cache_root(&config)?);
            let catalog = load_catalog(&source, &layout, cli.refresh, terminal)?;
            let matches = catalog.search(&query);
            if matches.is_empty() {
                println!("No packages found matching '{query}'");
            } else {
                terminal.print_lines(&format_search_lines(&catalog, &matches));
            }
        }
        Commands::Completions { shell } => {
            let mut stdout = std::io::stdout().lock();
            write_completions_script(shell, &mut stdout)?;
        }
    }

    Ok(())
}

fn load_catalog(
    source: &IndexSource,
    layout: &CacheLayout,
    refresh: bool,
    terminal: TerminalRenderer,
) -> Result<PackageCatalog> {
    let mut progress = terminal.download_progress("index");
    let text = load_index_text(source, layout, refresh, &mut progress)
        .context("failed to load package index")?;

    let parsed = parse_index(&text);
    for line in format_parse_diagnostics(&parsed.diagnostics) {
        terminal.print_status("warn", &line);
    }
    terminal.print_status(
        "info",
        &format!("loaded {} packages from index", parsed.catalog.len()),
    );
    Ok(parsed.catalog)
}

pub(crate) fn run_graph_command(
    catalog: &PackageCatalog,
    args: &GraphArgs,
    settings: GraphSettings,
    terminal: TerminalRenderer,
) -> Result<()> {
    let graph = build_graph(
        catalog,
        &args.package,
        GraphOptions {
            max_depth: settings.max_depth,
        },
    );
    for diagnostic in &graph.diagnostics {
        if !matches!(diagnostic, Diagnostic::PackageNotFound { required_by: None, .. }) {
            terminal.print_status("warn", &diagnostic.to_string());
        }
    }

    if !graph.root_found() {
        return Err(anyhow!("package '{}' was not found in the index", graph.root));
    }
    if graph.is_empty() {
        terminal.print_status("ok", &format!("package '{}' has no dependencies", graph.root));
        return Ok(());
    }

    let diagram = render_mermaid(&graph.edges);
    terminal.print_section(&format!("dependencies of {}", graph.root));
    match args.format {
        GraphFormat::Mermaid => print!("{diagram}"),
        GraphFormat::Edges => terminal.print_lines(&format_edge_lines(&graph.edges)),
        GraphFormat::Json => println!("{}", format_graph_json(&graph)?),
    }

    let Some(program) = settings.renderer.filter(|_| !args.no_render) else {
        return Ok(());
    };
    let rendered = MermaidRenderer::new(program)
        .render_to_file(&diagram, &settings.diagram, &settings.output)
        .context("failed to render dependency graph")?;
    terminal.print_status(
        "ok",
        &format!("graph saved to {}", rendered.image_path.display()),
    );
    Ok(())
}

/// Malformed lines are summarized; every other parser notice is listed.
pub(crate) fn format_parse_diagnostics(diagnostics: &[Diagnostic]) -> Vec<String> {
    let malformed = diagnostics
        .iter()
        .filter(|d| matches!(d, Diagnostic::MalformedRecord { .. }))
        .count();
    let mut lines: Vec<String> = diagnostics
        .iter()
        .filter(|d| !matches!(d, Diagnostic::MalformedRecord { .. }))
        .map(ToString::to_string)
        .collect();
    match malformed {
        0 => {}
        1 => lines.extend(
            diagnostics
                .iter()
                .filter(|d| matches!(d, Diagnostic::MalformedRecord { .. }))
                .map(ToString::to_string),
        ),
        count => lines.push(format!("skipped {count} malformed index lines")),
    }
    lines
}

pub(crate) fn format_edge_lines(edges: &[DependencyEdge]) -> Vec<String> {
    edges
        .iter()
        .map(|edge| format!("{} -> {}", edge.from, edge.to))
        .collect()
}

pub(crate) fn format_graph_json(graph: &DependencyGraph) -> Result<String> {
    serde_json::to_string_pretty(graph).context("failed serializing dependency graph")
}

pub(crate) fn format_info_lines(descriptor: &PackageDescriptor) -> Vec<String> {
    let mut lines = vec![format!("Package: {}", descriptor.name)];
    if let Some(version) = &descriptor.version {
        lines.push(format!("Version: {version}"));
    }
    if let Some(description) = &descriptor.description {
        lines.push(format!("Description: {description}"));
    }
    if let Some(license) = &descriptor.license {
        lines.push(format!("License: {license}"));
    }
    if let Some(url) = &descriptor.url {
        lines.push(format!("Homepage: {url}"));
    }
    let depends: Vec<&str> = descriptor.depends().collect();
    if depends.is_empty() {
        lines.push("Depends: (none)".to_string());
    } else {
        lines.push(format!("Depends: {}", depends.join(" ")));
    }
    lines
}

pub(crate) fn format_search_lines(catalog: &PackageCatalog, matches: &[&str]) -> Vec<String> {
    matches
        .iter()
        .map(|name| {
            let version = catalog
                .get(name)
                .and_then(|descriptor| descriptor.version.as_deref())
                .unwrap_or("unknown");
            format!("{name} {version}")
        })
        .collect()
}
