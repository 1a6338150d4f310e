//! mipkit CLI - Command-line tool for inspecting compressed texture containers.
//!
//! This is the main entry point for the mipkit command-line application.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

use mipkit::prelude::*;

/// mipkit - KTX and DDS texture inspection tool
#[derive(Parser)]
#[command(name = "mipkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log decoder details (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show header, metadata, and mip levels of a texture
    Info {
        /// Input KTX or DDS file
        #[arg(short, long, env = "MIPKIT_INPUT")]
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write each mip level's compressed data to its own file
    Extract {
        /// Input KTX or DDS file
        #[arg(short, long, env = "MIPKIT_INPUT")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, env = "MIPKIT_OUTPUT")]
        output: PathBuf,
    },

    /// Decode every file matching the given glob patterns
    Check {
        /// Glob patterns, e.g. "assets/**/*.ktx"
        #[arg(required = true)]
        patterns: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Info { input, json } => {
            cmd_info(&input, json)?;
        }
        Commands::Extract { input, output } => {
            cmd_extract(&input, &output)?;
        }
        Commands::Check { patterns } => {
            cmd_check(&patterns)?;
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<Texture> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let texture = decode(BufReader::new(file))
        .with_context(|| format!("Failed to decode {}", path.display()))?;

    log::info!(
        "{}: {} {}x{}, {} levels",
        path.display(),
        texture.kind().name(),
        texture.width(),
        texture.height(),
        texture.level_count()
    );

    Ok(texture)
}

#[derive(Serialize)]
struct InfoReport<'a> {
    path: String,
    container: &'static str,
    header: HeaderReport<'a>,
    metadata: Vec<MetadataReport>,
    levels: Vec<LevelReport>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum HeaderReport<'a> {
    Ktx(&'a KtxHeader),
    Dds(&'a DdsHeader),
}

#[derive(Serialize)]
struct MetadataReport {
    key: String,
    len: usize,
    text: Option<String>,
}

#[derive(Serialize)]
struct LevelReport {
    width: u32,
    height: u32,
    bytes: usize,
}

fn cmd_info(path: &Path, json: bool) -> Result<()> {
    let texture = load(path)?;

    let header = match &texture {
        Texture::Ktx(image) => HeaderReport::Ktx(image.header()),
        Texture::Dds(image) => HeaderReport::Dds(image.header()),
    };

    let metadata = texture
        .metadata()
        .map(|map| {
            map.iter()
                .map(|(key, value)| MetadataReport {
                    key: key.to_owned(),
                    len: value.len(),
                    text: std::str::from_utf8(value)
                        .ok()
                        .map(|s| s.trim_end_matches('\0').to_owned()),
                })
                .collect()
        })
        .unwrap_or_default();

    let levels = texture
        .levels()
        .iter()
        .map(|level| LevelReport {
            width: level.width,
            height: level.height,
            bytes: level.len(),
        })
        .collect();

    let report = InfoReport {
        path: path.display().to_string(),
        container: texture.kind().name(),
        header,
        metadata,
        levels,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("File:       {}", report.path);
    println!("Container:  {}", report.container);
    println!("Size:       {}x{}", texture.width(), texture.height());
    println!("GL format:  {:#06X}", texture.gl_internal_format());

    match &texture {
        Texture::Ktx(image) => {
            let h = image.header();
            println!("Byte order: {:?}", h.endianness);
            println!(
                "GL type:    {:#06X} (size {}), format {:#06X}, base format {:#06X}",
                h.gl_type, h.gl_type_size, h.gl_format, h.gl_base_internal_format
            );
            println!(
                "Depth:      {}, array elements {}, faces {}",
                h.pixel_depth, h.number_of_array_elements, h.number_of_faces
            );
        }
        Texture::Dds(image) => {
            let h = image.header();
            println!("Format:     {:?} ({} bytes per block)", h.format, h.block_size());
            println!("Linear size: {}, mipmap count {}", h.linear_size, h.mipmap_count);
        }
    }

    if !report.metadata.is_empty() {
        println!("\nMetadata ({} entries):", report.metadata.len());
        for entry in &report.metadata {
            match &entry.text {
                Some(text) => println!("  {} = {:?}", entry.key, text),
                None => println!("  {} = <{} bytes>", entry.key, entry.len),
            }
        }
    }

    println!("\nLevels ({}):", report.levels.len());
    println!("{:>5} {:>7} {:>7} {:>12}", "#", "width", "height", "bytes");
    for (i, level) in report.levels.iter().enumerate() {
        println!(
            "{:>5} {:>7} {:>7} {:>12}",
            i, level.width, level.height, level.bytes
        );
    }

    Ok(())
}

fn cmd_extract(input: &Path, output: &Path) -> Result<()> {
    let texture = load(input)?;

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    for (i, level) in texture.levels().iter().enumerate() {
        let path = output.join(format!("level_{i:02}.bin"));
        fs::write(&path, &level.data)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!(
            "{} ({}x{}, {} bytes)",
            path.display(),
            level.width,
            level.height,
            level.len()
        );
    }

    println!(
        "Extracted {} levels from {} texture",
        texture.level_count(),
        texture.kind().name()
    );

    Ok(())
}

fn cmd_check(patterns: &[String]) -> Result<()> {
    let mut paths = Vec::new();
    for pattern in patterns {
        for entry in glob::glob(pattern).with_context(|| format!("Invalid pattern {pattern}"))? {
            let path = entry?;
            if path.is_file() {
                paths.push(path);
            }
        }
    }

    if paths.is_empty() {
        bail!("No files matched");
    }
    log::debug!("{} patterns matched {} files", patterns.len(), paths.len());

    println!("Checking {} files...", paths.len());

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let failures: Vec<(PathBuf, anyhow::Error)> = paths
        .par_iter()
        .filter_map(|path| {
            let result = load(path);
            pb.inc(1);
            result.err().map(|e| (path.clone(), e))
        })
        .collect();

    pb.finish_and_clear();

    for (path, err) in &failures {
        println!("FAIL {}: {:#}", path.display(), err);
    }

    println!(
        "{} ok, {} failed in {:?}",
        paths.len() - failures.len(),
        failures.len(),
        start.elapsed()
    );

    if !failures.is_empty() {
        bail!("{} files failed to decode", failures.len());
    }

    Ok(())
}
