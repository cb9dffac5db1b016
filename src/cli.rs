//! Minimal CLI: metadata documents → python stub tree
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::emitter::{self, Progress};
use crate::source::{JsonSource, Source};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate python type stubs (.pyi) from reflected type metadata
#[derive(Parser, Debug)]
#[command(name = "stubgen")]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// wipe the output directory and regenerate every stub from scratch
    Generate(GenerateOut),
    /// open the output directory in the platform file browser
    Open(OutputSettings),
}

#[derive(Args, Debug, Clone)]
struct OutputSettings {
    /// stub tree root; deleted and recreated by `generate`
    #[arg(short, long, default_value = "stubs")]
    out: PathBuf,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    /// One or more metadata documents. May be literal paths or quoted glob
    /// patterns; sources are processed in the order given
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    #[command(flatten)]
    output_settings: OutputSettings,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

/// Single-line progress on stderr.
#[derive(Debug, Default)]
struct TerminalProgress {
    dirty: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(())
                }

                let paths = resolve_file_path_patterns(&target.input)?;
                let sources = paths
                    .into_iter()
                    .map(|path| -> Box<dyn Source> {
                        // a document that cannot even be opened still counts as a
                        // source; the run logs it and moves on
                        match JsonSource::open(&path) {
                            Ok(source) => Box::new(source),
                            Err(_) => Box::new(JsonSource::new(path)),
                        }
                    })
                    .collect::<Vec<_>>();

                let out = &target.output_settings.out;
                let mut progress = TerminalProgress::default();
                let report = emitter::run(&sources, out, &mut progress)
                    .with_context(|| format!("python stub generation into {} failed", out.display()))?;

                if report.sources_failed > 0 {
                    eprintln!(
                        "{} {} of {} sources could not be loaded",
                        "warning:".yellow().bold(),
                        report.sources_failed,
                        sources.len(),
                    );
                }
                println!(
                    "{} {} types in {} namespaces at: {}",
                    "generated".green().bold(),
                    report.types_written,
                    report.namespaces,
                    report.output_root.to_string_lossy().replace('\\', "/"),
                );
                Ok(())
            }
            Command::Open(target) => {
                if !emitter::open_output_location(&target.out)? {
                    eprintln!("{} stubs directory does not exist.", "notice:".cyan().bold());
                }
                Ok(())
            }
        }
    }
}

impl Progress for TerminalProgress {
    fn advance(&mut self, label: &str, fraction: f32) {
        let percent = (fraction * 100.0).round() as u32;
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "\r\x1b[2K{} [{percent:>3}%] {label}", "Generating Python Stubs".bold());
        let _ = stderr.flush();
        self.dirty = true;
    }
    fn clear(&mut self) {
        if self.dirty {
            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "\r\x1b[2K");
            let _ = stderr.flush();
            self.dirty = false;
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            // Treat as a glob pattern; `glob` yields matches in sorted order
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("bad glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            // Treat as a literal path
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
