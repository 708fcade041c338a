//! XPI packager CLI

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use xpipack::models::{Compression, LayoutKind};
use xpipack::packager::{list_archive, list_archive_bytes, read_entry};
use xpipack::{package_extension, PackError, PackOptions};

#[derive(Parser)]
#[command(name = "xpipack")]
#[command(about = "Package a legacy Firefox extension into an XPI archive", long_about = None)]
#[command(version)]
struct Cli {
    /// Show debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the XPI (the default when no command is given)
    Build(BuildArgs),

    /// Print the scripts reachable from the entry scripts
    Deps {
        /// Extension source directory
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Config file (defaults to <root>/xpipack.json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the entries of a built archive
    List {
        /// Archive to inspect
        archive: PathBuf,

        /// Also list the entries of this nested jar
        #[arg(long, value_name = "JAR")]
        nested: Option<String>,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Default)]
struct BuildArgs {
    /// Extension source directory
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Archive layout
    #[arg(short, long, value_enum)]
    layout: Option<LayoutKind>,

    /// Output archive (relative to the source directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (defaults to <root>/xpipack.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fail when a pattern matches no files
    #[arg(long)]
    strict: bool,

    /// Write a markdown build report next to the archive
    #[arg(long)]
    report: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "xpipack=debug" } else { "xpipack=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build(args: BuildArgs) -> anyhow::Result<()> {
    let BuildArgs { root, layout, output, config, strict, report } = args;
    let options = PackOptions {
        layout,
        config_path: config,
        output,
        strict,
    };

    let result = package_extension(&root, options)?;

    println!("{}", "✅ Package built successfully!".green().bold());
    println!("  - Output: {}", result.destination.display());
    println!("  - Entries: {}", result.entries.len());
    if !result.jar_entries.is_empty() {
        println!("  - Jar entries: {}", result.jar_entries.len());
    }

    if report {
        let report_path = result.destination.with_extension("md");
        std::fs::write(&report_path, xpipack::report::generate_report(&result))
            .with_context(|| format!("Failed to write report {}", report_path.display()))?;
        println!("  - Report: {}", report_path.display());
    }

    if !result.unmatched.is_empty() {
        println!();
        println!("{}", "⚠️  Patterns without matches:".yellow().bold());
        for pattern in &result.unmatched {
            println!("  - {}", pattern);
        }
    }

    Ok(())
}

fn deps(root: PathBuf, config: Option<PathBuf>) -> anyhow::Result<()> {
    let options = PackOptions {
        config_path: config,
        ..Default::default()
    };
    let config = options.resolve(&root)?;
    let requirements = xpipack::parser::scan_requires(&config.root, config.entry_scripts.as_slice())?;

    for script in &config.entry_scripts {
        println!("{} {}", script, "(entry)".dimmed());
    }
    for script in &requirements {
        println!("{}", script);
    }
    Ok(())
}

fn compression_label(compression: Compression) -> &'static str {
    match compression {
        Compression::Stored => "stored",
        Compression::Deflated => "deflated",
        Compression::Other => "other",
    }
}

fn list(archive: PathBuf, nested: Option<String>, json: bool) -> anyhow::Result<()> {
    let entries = list_archive(&archive)?;
    let jar_entries = match &nested {
        Some(name) => list_archive_bytes(&read_entry(&archive, name)?)?,
        None => Vec::new(),
    };

    if json {
        let value = serde_json::json!({ "entries": entries, "jar_entries": jar_entries });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let print = |prefix: &str, entries: &[xpipack::models::ArchiveEntry]| {
        for entry in entries {
            // Pad before colorizing; escape codes would count towards the width
            let method = format!("{:<8}", compression_label(entry.compression));
            let method = match entry.compression {
                Compression::Stored => method.normal(),
                Compression::Deflated => method.cyan(),
                Compression::Other => method.yellow(),
            };
            println!("{:>10}  {}  {}{}", entry.size, method, prefix, entry.name);
        }
    };

    print("", &entries);
    if let Some(name) = &nested {
        print(&format!("{}!/", name), &jar_entries);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match cli.command {
        None => build(BuildArgs {
            root: PathBuf::from("."),
            ..Default::default()
        }),
        Some(Commands::Build(args)) => build(args),
        Some(Commands::Deps { root, config }) => deps(root, config),
        Some(Commands::List { archive, nested, json }) => list(archive, nested, json),
    };

    if let Err(err) = outcome {
        match err.downcast_ref::<PackError>() {
            Some(PackError::DestinationExists { path }) => {
                eprintln!("{}", format!("{} is in the way", path.display()).red());
            }
            _ => {
                eprintln!("{}", "❌ Packaging failed!".red().bold());
                eprintln!("{}", format!("Error: {:#}", err).red());
            }
        }
        std::process::exit(1);
    }
}
