//! Nifheim CLI - Command-line tool for inspecting NIF scene graphs.
//!
//! This is the main entry point for the Nifheim command-line application.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use nifheim::prelude::*;

/// Nifheim - NetImmerse/Gamebryo NIF inspection tool
#[derive(Parser)]
#[command(name = "nifheim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Load files with unsupported versions best-effort
    #[arg(long, global = true, env = "NIFHEIM_LOAD_UNSUPPORTED")]
    load_unsupported: bool,

    /// Trace every record read from unsupported files
    #[arg(long, global = true, env = "NIFHEIM_DEBUG_LOG")]
    debug_log: bool,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show header information and record statistics
    Info {
        /// Path to the NIF file
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the scene graph from the roots down
    Tree {
        /// Path to the NIF file
        file: PathBuf,
    },

    /// List the record types this build can decode
    Types,

    /// Decode every NIF file under a directory
    Scan {
        /// Directory to scan
        dir: PathBuf,

        /// Comma-separated file extensions to include
        #[arg(short, long, default_value = "nif,kf,kfm")]
        ext: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    settings::set_load_unsupported_files(cli.load_unsupported);
    settings::set_write_debug_log(cli.debug_log);

    match cli.command {
        Commands::Info { file, json } => {
            cmd_info(&file, json)?;
        }
        Commands::Tree { file } => {
            cmd_tree(&file)?;
        }
        Commands::Types => {
            cmd_types();
        }
        Commands::Scan { dir, ext } => {
            cmd_scan(&dir, &ext)?;
        }
    }

    Ok(())
}

fn open(path: &Path) -> Result<NifFile> {
    NifFile::open(path).with_context(|| format!("Failed to decode {}", path.display()))
}

fn cmd_info(path: &Path, json: bool) -> Result<()> {
    let start = Instant::now();
    let file = open(path)?;
    let summary = file.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("File:          {}", summary.path.display());
    println!("Version:       {}", summary.version);
    println!("User version:  {}", summary.user_version);
    println!("Beth version:  {}", summary.beth_version);
    println!("Records:       {}", summary.records);
    println!("Roots:         {} of {}", summary.roots, file.roots().len());
    println!("Strings:       {}", summary.strings);
    println!("Skinned:       {}", summary.uses_skinning);
    println!("Hash:          {}", summary.hash);
    println!("Decoded in {:?}", start.elapsed());

    println!();
    for (name, count) in &summary.types {
        println!("{:>8}  {}", count, name);
    }

    if !summary.warnings.is_empty() {
        println!();
        for warning in &summary.warnings {
            println!("warning: {}", warning);
        }
    }

    Ok(())
}

fn cmd_tree(path: &Path) -> Result<()> {
    let file = open(path)?;
    let mut visited = HashSet::new();

    for (root, entry) in file.roots().iter().enumerate() {
        match entry {
            Some(index) => print_record(&file, *index, 0, &mut visited),
            None => println!("<root {} missing>", root + 1),
        }
    }

    Ok(())
}

fn print_record(file: &NifFile, index: usize, depth: usize, visited: &mut HashSet<usize>) {
    let Some(record) = file.record(index) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let name = record.object_name().unwrap_or_default();
    let bone = if file.is_bone(index) { " (bone)" } else { "" };
    println!("{}[{}] {} {:?}{}", indent, index, record.type_name(), name, bone);

    // Nodes can be shared by several parents; print each subtree once.
    if !visited.insert(index) {
        return;
    }
    if let Some(node) = record.data().node() {
        for child in &node.children {
            if let Some(child) = file.link(child) {
                print_record(file, child.index(), depth + 1, visited);
            }
        }
    }
}

fn cmd_types() {
    let registry = Registry::global();
    for (name, kind) in registry.names() {
        if name == kind.name() {
            println!("{}", name);
        } else {
            println!("{} (as {})", name, kind);
        }
    }
    println!("{} types", registry.len());
}

fn cmd_scan(dir: &Path, ext: &str) -> Result<()> {
    let extensions: Vec<String> = ext
        .split(',')
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    let files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| extensions.contains(&e.to_ascii_lowercase()))
        })
        .map(|e| e.into_path())
        .collect();

    println!("Scanning {} files in {}...", files.len(), dir.display());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let options = LoadOptions::from_globals();
    let start = Instant::now();
    let results: Vec<(PathBuf, std::result::Result<usize, Error>)> = files
        .into_par_iter()
        .map(|path| {
            let result = NifFile::open_with(&path, &options).map(|file| file.records().len());
            pb.inc(1);
            (path, result)
        })
        .collect();
    pb.finish_with_message("Done");

    let mut records = 0;
    let mut failures = Vec::new();
    for (path, result) in results {
        match result {
            Ok(count) => records += count,
            Err(err) => failures.push((path, err)),
        }
    }

    failures.sort_by(|a, b| a.0.cmp(&b.0));
    for (path, err) in &failures {
        println!("FAILED {}: {}", path.display(), err.kind());
    }
    println!(
        "Decoded {} records; {} failures; completed in {:?}",
        records,
        failures.len(),
        start.elapsed()
    );

    Ok(())
}
