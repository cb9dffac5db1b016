//! Regenerates the demo stubs twice and checks both trees are byte-identical.
//!
//! ```bash
//! cargo run -p dev-test-runner                 # demos/metadata/*.json
//! cargo run -p dev-test-runner -- 'more/*.json'
//! ```
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use stubgen::{JsonSource, NoProgress, Source};

fn main() -> Result<()> {
    stubgen::logging::init();

    let pattern = std::env::args().nth(1).unwrap_or_else(|| {
        format!("{}/../demos/metadata/*.json", env!("CARGO_MANIFEST_DIR"))
    });
    let paths = glob::glob(&pattern)
        .with_context(|| format!("bad glob pattern: {pattern}"))?
        .collect::<Result<Vec<_>, _>>()?;
    if paths.is_empty() {
        bail!("no metadata documents match {pattern}");
    }

    let scratch = tempfile::tempdir()?;
    let first = generate(&paths, &scratch.path().join("first"))?;
    let second = generate(&paths, &scratch.path().join("second"))?;

    let mut mismatches = 0;
    for (file, bytes) in &first {
        match second.get(file) {
            Some(other) if other == bytes => {}
            Some(_) => {
                mismatches += 1;
                eprintln!("{} {}", "differs:".red().bold(), file.display());
            }
            None => {
                mismatches += 1;
                eprintln!("{} {}", "missing:".red().bold(), file.display());
            }
        }
    }
    for file in second.keys().filter(|f| !first.contains_key(*f)) {
        mismatches += 1;
        eprintln!("{} {}", "extra:".red().bold(), file.display());
    }

    if mismatches > 0 {
        bail!("{mismatches} files differ between runs");
    }
    println!("{} {} files identical across runs", "ok".green().bold(), first.len());
    Ok(())
}

/// Run the pipeline into `root` and read back every file except the readme,
/// which embeds the absolute output path.
fn generate(paths: &[PathBuf], root: &Path) -> Result<BTreeMap<PathBuf, Vec<u8>>> {
    let sources = paths
        .iter()
        .map(|path| -> Result<Box<dyn Source>> { Ok(Box::new(JsonSource::open(path)?)) })
        .collect::<Result<Vec<_>>>()?;
    stubgen::run(&sources, root, &mut NoProgress)?;

    let mut files = BTreeMap::new();
    let pattern = format!("{}/**/*", root.display());
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if !path.is_file() || path.file_name().is_some_and(|n| n == stubgen::emitter::README_FILE) {
            continue;
        }
        let relative = path.strip_prefix(root)?.to_path_buf();
        files.insert(relative, std::fs::read(&path)?);
    }
    Ok(files)
}
