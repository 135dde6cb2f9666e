//! Command-line interface for the bundlemap utility
//!
//! Loads a metadata snapshot, builds the relation graph and writes diagrams
//! or listings of it.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{info, warn};

use bundlemap::diagram::{entity_types_of, DiagramRenderer, TemplateLinks};
use bundlemap::graph::{get_relations, Graph, RelationGraphBuilder};
use bundlemap::metadata::MetadataSnapshot;
use bundlemap::{DiagramConfig, Direction, NodeId};

/// bundlemap - Render relations between content bundles as flowcharts
#[derive(Parser)]
#[command(name = "bundlemap")]
#[command(about = "Render relations between content bundles as flowchart diagrams")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error|off)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Input snapshot and output destination shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct IoArgs {
    /// Metadata snapshot JSON file (use - for stdin)
    #[arg(short, long)]
    pub metadata: Option<PathBuf>,

    /// Output file (use - for stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the relation neighborhood of one bundle
    Render {
        #[command(flatten)]
        io: IoArgs,

        /// Bundle to center on, as entity_type/bundle
        #[arg(short, long)]
        start: String,

        /// Maximum number of hops to follow (0 = unlimited)
        #[arg(short, long, default_value_t = 1)]
        depth: usize,

        /// Flow direction of the diagram
        #[arg(long, value_enum, default_value_t = DirectionChoice::Td)]
        direction: DirectionChoice,

        /// Append the shape legend to the diagram
        #[arg(long)]
        key: bool,

        /// URL template for click links, with {entity_type} and {bundle}
        #[arg(long)]
        link_template: Option<String>,

        /// Style applied to the focus node
        #[arg(long)]
        focus_style: Option<String>,
    },

    /// Render the shape legend
    Key {
        #[command(flatten)]
        io: IoArgs,

        /// Limit the legend to the neighborhood of this bundle
        #[arg(short, long)]
        start: Option<String>,

        /// Neighborhood depth when --start is given (0 = unlimited)
        #[arg(short, long, default_value_t = 1)]
        depth: usize,
    },

    /// List every relation in the graph
    Relations {
        #[command(flatten)]
        io: IoArgs,

        /// Only relations starting or ending at this bundle
        #[arg(long)]
        touching: Option<String>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// List every bundle known to the snapshot
    Bundles {
        #[command(flatten)]
        io: IoArgs,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

/// Flowchart directions
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum DirectionChoice {
    /// Top to bottom
    #[default]
    Td,
    /// Left to right
    Lr,
    /// Right to left
    Rl,
    /// Bottom to top
    Bt,
}

impl From<DirectionChoice> for Direction {
    fn from(value: DirectionChoice) -> Self {
        match value {
            DirectionChoice::Td => Direction::TopDown,
            DirectionChoice::Lr => Direction::LeftRight,
            DirectionChoice::Rl => Direction::RightLeft,
            DirectionChoice::Bt => Direction::BottomUp,
        }
    }
}

#[derive(Debug, Serialize)]
struct BundleRow<'a> {
    entity_type: &'a str,
    bundle: &'a str,
    entity_type_label: Option<&'a str>,
    label: Option<&'a str>,
}

/// Main CLI application
pub struct BundlemapApp {
    config: DiagramConfig,
}

impl BundlemapApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::with_config(DiagramConfig::default())
    }

    /// Create a new application instance with a base render config
    pub fn with_config(config: DiagramConfig) -> Self {
        Self { config }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        if cli.verbose {
            eprintln!("bundlemap v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Render {
                io,
                start,
                depth,
                direction,
                key,
                link_template,
                focus_style,
            } => {
                let mut config = self.config.clone().with_direction(direction.into()).with_key(key);
                if let Some(style) = focus_style {
                    config = config.with_focus_style(style);
                }
                self.render_command(io, &start, depth, config, link_template, cli.verbose)
            }
            Commands::Key { io, start, depth } => {
                self.key_command(io, start.as_deref(), depth, cli.verbose)
            }
            Commands::Relations { io, touching, json } => {
                self.relations_command(io, touching.as_deref(), json, cli.verbose)
            }
            Commands::Bundles { io, json } => self.bundles_command(io, json, cli.verbose),
        }
    }

    /// Read a snapshot and build its graph
    pub fn load_graph(&self, metadata: Option<PathBuf>, verbose: bool) -> Result<Graph> {
        let content = self.read_input(metadata)?;
        if verbose {
            eprintln!("Read {} bytes of metadata", content.len());
        }

        let snapshot =
            MetadataSnapshot::from_json(&content).context("Failed to load metadata snapshot")?;
        let graph = RelationGraphBuilder::new(&snapshot).build();

        if verbose {
            eprintln!(
                "Found {} relations across {} bundles",
                graph.len(),
                graph.catalog().bundle_count()
            );
        }
        Ok(graph)
    }

    /// Handle the render command
    pub fn render_command(
        &self,
        io: IoArgs,
        start: &str,
        depth: usize,
        config: DiagramConfig,
        link_template: Option<String>,
        verbose: bool,
    ) -> Result<()> {
        let start = NodeId::parse(start)?;
        let graph = self.load_graph(io.metadata, verbose)?;

        if !graph.contains_node(&start) {
            warn!(start = %start, "Start bundle is not known");
        }

        let relations = get_relations(&graph, &start, depth);
        info!(start = %start, depth, relations = relations.len(), "Rendering neighborhood");

        let links = link_template.map(TemplateLinks::new);
        let mut renderer = DiagramRenderer::for_graph(&graph).with_config(config);
        if let Some(links) = links.as_ref() {
            renderer = renderer.with_links(links);
        }

        let text = renderer.render(&relations, &start);
        self.write_output(io.output, &text)
    }

    /// Handle the key command
    pub fn key_command(
        &self,
        io: IoArgs,
        start: Option<&str>,
        depth: usize,
        verbose: bool,
    ) -> Result<()> {
        let start = start.map(NodeId::parse).transpose()?;
        let graph = self.load_graph(io.metadata, verbose)?;

        let entity_types: Vec<String> = match start {
            Some(start) => entity_types_of(&get_relations(&graph, &start, depth)),
            None => graph
                .catalog()
                .entity_types_by_label()
                .into_iter()
                .map(str::to_string)
                .collect(),
        };

        let text = DiagramRenderer::for_graph(&graph)
            .with_config(self.config.clone())
            .key(&entity_types);
        self.write_output(io.output, &text)
    }

    /// Handle the relations command
    pub fn relations_command(
        &self,
        io: IoArgs,
        touching: Option<&str>,
        json: bool,
        verbose: bool,
    ) -> Result<()> {
        let touching = touching.map(NodeId::parse).transpose()?;
        let graph = self.load_graph(io.metadata, verbose)?;

        let relations: Vec<_> = graph
            .relations()
            .iter()
            .filter(|r| touching.as_ref().map_or(true, |node| r.touches(node)))
            .collect();

        let text = if json {
            serde_json::to_string_pretty(&relations)?
        } else {
            relations
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        };
        self.write_output(io.output, &text)
    }

    /// Handle the bundles command
    pub fn bundles_command(&self, io: IoArgs, json: bool, verbose: bool) -> Result<()> {
        let graph = self.load_graph(io.metadata, verbose)?;
        let catalog = graph.catalog();

        let rows: Vec<BundleRow> = graph
            .nodes()
            .map(|node| BundleRow {
                entity_type: node.entity_type(),
                bundle: node.bundle(),
                entity_type_label: catalog.entity_type_label(node.entity_type()),
                label: catalog.bundle_label(node),
            })
            .collect();

        let text = if json {
            serde_json::to_string_pretty(&rows)?
        } else {
            rows.iter()
                .map(|row| {
                    format!(
                        "{}/{}\t{} ({})",
                        row.entity_type,
                        row.bundle,
                        row.label.unwrap_or(row.bundle),
                        row.entity_type_label.unwrap_or(row.entity_type)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };
        self.write_output(io.output, &text)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, &content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for BundlemapApp {
    fn default() -> Self {
        Self::new()
    }
}
