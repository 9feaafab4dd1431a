//! marketmap CLI - lay out, render and check market snapshots.

#![allow(
    clippy::needless_pass_by_value,
    clippy::uninlined_format_args,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation,
    clippy::doc_markdown
)]

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use futures::executor::block_on;
use marketmap::layout::{layout_groups, DeviceProfile, LayoutFrame};
use marketmap::widgets::{format_percent, resolve_or_fallback, StaticResolver};
use marketmap::yaml::{ParseError, Settings, Snapshot};

#[derive(Parser)]
#[command(name = "marketmap")]
#[command(about = "Two-level squarified market map")]
#[command(version)]
struct Cli {
    /// Log more (repeat for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute cell rectangles for a snapshot
    Layout {
        /// Snapshot file (.yaml, .yml or .json)
        snapshot: PathBuf,

        #[command(flatten)]
        viewport: ViewportArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Render a snapshot to SVG
    Render {
        /// Snapshot file (.yaml, .yml or .json)
        snapshot: PathBuf,

        #[command(flatten)]
        viewport: ViewportArgs,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Validate a snapshot and print a summary
    Check {
        /// Snapshot file (.yaml, .yml or .json)
        snapshot: PathBuf,
    },

    /// Print the quote page URL for an instrument code
    Link {
        /// Instrument code, e.g. 600519
        code: String,

        /// Known link as CODE=URL (repeatable)
        #[arg(long = "known", value_parser = parse_known_link)]
        known: Vec<(String, String)>,
    },
}

#[derive(clap::Args)]
struct ViewportArgs {
    /// Canvas width in pixels
    #[arg(long, default_value_t = 1200.0)]
    width: f64,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Device profile; auto picks by width
    #[arg(short, long, value_enum, default_value_t = ProfileArg::Auto)]
    profile: ProfileArg,

    /// Settings file with threshold overrides
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProfileArg {
    Auto,
    Desktop,
    Mobile,
}

impl ProfileArg {
    const fn pinned(self) -> Option<DeviceProfile> {
        match self {
            Self::Auto => None,
            Self::Desktop => Some(DeviceProfile::Desktop),
            Self::Mobile => Some(DeviceProfile::Mobile),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode layout: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("viewport must be positive, got {width}x{height}")]
    Viewport { width: f64, height: f64 },

    #[error("snapshot has no groups")]
    EmptySnapshot,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Layout {
            snapshot,
            viewport,
            format,
        } => layout(&snapshot, &viewport, format),
        Commands::Render {
            snapshot,
            viewport,
            out,
        } => render(&snapshot, &viewport, out.as_deref()),
        Commands::Check { snapshot } => check(&snapshot),
        Commands::Link { code, known } => {
            link(&code, known);
            Ok(())
        }
    }
}

fn load_inputs(snapshot: &Path, viewport: &ViewportArgs) -> Result<(Snapshot, Settings), CliError> {
    if !(viewport.width > 0.0 && viewport.height > 0.0) {
        return Err(CliError::Viewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    let snapshot = Snapshot::load(snapshot)?;
    snapshot.validate()?;
    let settings = match &viewport.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    Ok((snapshot, settings))
}

fn layout(path: &Path, viewport: &ViewportArgs, format: OutputFormat) -> Result<(), CliError> {
    let (snapshot, settings) = load_inputs(path, viewport)?;
    let config = settings.layout_config(viewport.width, viewport.height, viewport.profile.pinned());
    log::info!(
        "laying out {} groups at {}x{} ({})",
        snapshot.groups.len(),
        viewport.width,
        viewport.height,
        config.device_profile.as_str()
    );
    let frame = layout_groups(&snapshot.groups, &config);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&frame)?),
        OutputFormat::Text => print!("{}", describe_frame(&frame)),
    }
    Ok(())
}

fn describe_frame(frame: &LayoutFrame) -> String {
    let mut out = String::new();
    for group in &frame.groups {
        let b = group.bounds;
        out.push_str(&format!(
            "{} {} {} [{:.0},{:.0} {:.0}x{:.0}]\n",
            group.id,
            group.label,
            format_percent(group.change_percent),
            b.x0,
            b.y0,
            b.width(),
            b.height()
        ));
        for leaf in &group.leaves {
            let b = leaf.bounds;
            out.push_str(&format!(
                "  {} {} {} [{:.0},{:.0} {:.0}x{:.0}]\n",
                leaf.id,
                leaf.name,
                format_percent(leaf.change_percent),
                b.x0,
                b.y0,
                b.width(),
                b.height()
            ));
        }
    }
    out
}

fn render(path: &Path, viewport: &ViewportArgs, out: Option<&Path>) -> Result<(), CliError> {
    let (snapshot, settings) = load_inputs(path, viewport)?;
    let svg = marketmap::render_svg(
        snapshot.groups,
        &settings,
        viewport.width as f32,
        viewport.height as f32,
        viewport.profile.pinned(),
    );
    match out {
        Some(out) => {
            fs::write(out, svg).map_err(|source| CliError::Write {
                path: out.to_path_buf(),
                source,
            })?;
            println!("SVG written to: {}", out.display());
        }
        None => print!("{svg}"),
    }
    Ok(())
}

fn check(path: &Path) -> Result<(), CliError> {
    let snapshot = Snapshot::load(path)?;
    let summary = snapshot.validate()?;
    if summary.groups == 0 {
        return Err(CliError::EmptySnapshot);
    }
    println!("Snapshot valid!");
    println!("  Groups: {}", summary.groups);
    println!("  Leaves: {}", summary.leaves);
    println!("  Empty groups: {}", summary.empty_groups);
    println!("  Invalid weights: {}", summary.invalid_weights);
    println!("  Total weight: {}", summary.total_weight);
    if summary.invalid_weights > 0 {
        log::warn!("{} leaves have no positive weight", summary.invalid_weights);
    }
    Ok(())
}

fn link(code: &str, known: Vec<(String, String)>) {
    let resolver = known
        .into_iter()
        .fold(StaticResolver::new(), |r, (code, url)| r.with_link(code, url));
    println!("{}", block_on(resolve_or_fallback(&resolver, code)));
}

fn parse_known_link(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((code, url)) if !code.is_empty() && !url.is_empty() => {
            Ok((code.to_string(), url.to_string()))
        }
        _ => Err(format!("expected CODE=URL, got '{s}'")),
    }
}
