use crate::{
    backend::{Backend, BackendChoice, IconEncoder},
    config::{Framing, IconConfig, Style},
    manifest::write_manifest,
};
use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

// Define Args struct for library compilation
#[derive(Debug, Default)]
pub struct Args {
    pub output: PathBuf,
    pub png: Option<Vec<u32>>,
    pub config: Option<PathBuf>,
    pub backend: BackendChoice,
    pub style: Option<Style>,
    pub strict_png: bool,
    pub manifest: bool,
}

/// Files written by one run, in order
#[derive(Debug, Default)]
pub struct Generated {
    pub icons: Vec<(u32, PathBuf)>,
    pub canonical: Option<PathBuf>,
}

pub fn generate_icons(args: Args) -> Result<Generated> {
    let config = build_config(&args)?;

    // Ensure the output directory exists
    std::fs::create_dir_all(&args.output).context("Can't create output directory")?;

    let backend = Backend::select(args.backend)?;
    let encoder = backend.encoder(&config)?;
    log::info!("Using the {} backend", encoder.name());

    let generated = generate_with(&*encoder, &config, &args.output)?;

    if args.manifest {
        let entries: Vec<(u32, String)> = generated
            .icons
            .iter()
            .map(|(size, _)| (*size, config.file_name(*size)))
            .collect();
        write_manifest(&args.output, &entries)?;
    }

    Ok(generated)
}

/// Resolve the effective config: file (or defaults), then command-line overrides
pub fn build_config(args: &Args) -> Result<IconConfig> {
    let mut config = match &args.config {
        Some(path) => IconConfig::load(path)?,
        None => IconConfig::default(),
    };

    if let Some(sizes) = &args.png {
        config.sizes = sizes.clone();
    }
    if let Some(style) = args.style {
        config.style = style;
    }
    if args.strict_png {
        config.framing = Framing::Conforming;
    }

    config.validate()?;
    log::debug!("Effective config: {config:?}");
    Ok(config)
}

/// Encode and write every configured size, then copy the canonical icon.
///
/// Sizes are processed one at a time; the first failure stops the run and
/// leaves files that were already written in place.
pub fn generate_with(
    encoder: &dyn IconEncoder,
    config: &IconConfig,
    out_dir: &Path,
) -> Result<Generated> {
    let mut generated = Generated::default();

    println!("Generating extension icons...");
    for &size in &config.sizes {
        let filename = config.file_name(size);
        let bytes = encoder
            .encode(size)
            .with_context(|| format!("Failed to generate {filename}"))?;

        let output_path = out_dir.join(&filename);
        write_file(&output_path, &bytes)?;
        println!("  ✓ Generated {filename} ({size}x{size})");

        generated.icons.push((size, output_path));
    }

    let canonical_source = generated
        .icons
        .iter()
        .find(|(size, _)| *size == config.canonical_size)
        .map(|(_, path)| path.clone());

    match canonical_source {
        Some(source) if source == out_dir.join(&config.canonical_name) => {
            // copying a file onto itself truncates it
            log::warn!("{} is already the canonical icon", config.canonical_name);
            generated.canonical = Some(source);
        }
        Some(source) => {
            let canonical_path = out_dir.join(&config.canonical_name);
            std::fs::copy(&source, &canonical_path).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    source.display(),
                    canonical_path.display()
                )
            })?;
            println!("  ✓ Generated {}", config.canonical_name);
            generated.canonical = Some(canonical_path);
        }
        None => log::warn!(
            "Size {} was not generated, skipping {}",
            config.canonical_size,
            config.canonical_name
        ),
    }

    Ok(generated)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut out_file = BufWriter::new(
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
    );
    out_file
        .write_all(bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    out_file.flush()?;
    Ok(())
}
