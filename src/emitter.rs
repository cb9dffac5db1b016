//! Full stub generation runs.
//!
//! A run always starts from an empty output root: nothing is patched in
//! place, so two runs over the same sources yield byte-identical trees.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::filter;
use crate::namespace::{self, NamespaceAggregator};
use crate::source::Source;

pub const README_FILE: &str = "readme.md";

// ————————————————————————————————————————————————————————————————————————————
// PROGRESS
// ————————————————————————————————————————————————————————————————————————————

/// Observer for per-source progress.
pub trait Progress {
    /// Called once before each source, with `fraction` in `[0, 1)`.
    fn advance(&mut self, label: &str, fraction: f32);
    /// Called once at the end of every run, whatever the outcome.
    fn clear(&mut self);
}

/// No observer attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn advance(&mut self, _label: &str, _fraction: f32) {}
    fn clear(&mut self) {}
}

// ————————————————————————————————————————————————————————————————————————————
// RUN
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Absolute location of the generated tree.
    pub output_root: PathBuf,
    pub sources_processed: usize,
    pub sources_failed: usize,
    pub namespaces: usize,
    pub types_written: usize,
}

/// State that lives for exactly one run.
#[derive(Debug)]
pub struct RunContext {
    aggregator: NamespaceAggregator,
    sources_processed: usize,
    sources_failed: usize,
    types_written: usize,
}

impl RunContext {
    pub fn new(output_root: &Path) -> Self {
        Self {
            aggregator: NamespaceAggregator::new(output_root),
            sources_processed: 0,
            sources_failed: 0,
            types_written: 0,
        }
    }

    /// Filter, group and append everything `source` exports.
    ///
    /// A source that cannot be exported is logged and counted; it never fails
    /// the run. Render and write errors do.
    pub fn process_source(&mut self, source: &dyn Source) -> Result {
        let types = match source.export() {
            Ok(types) => types,
            Err(reason) => {
                let error = Error::SourceLoad { source_id: source.id().to_string(), reason };
                error!("{error}");
                self.sources_failed += 1;
                return Ok(());
            }
        };

        let exported = types.len();
        let eligible = types.into_iter().filter_map(|ty| {
            if let Some(reason) = filter::type_rejection(&ty) {
                debug!(name = %ty.name, reason, "skipping type");
                return None;
            }
            let ns = namespace::namespace_of(&ty);
            if let Some(reason) = namespace::namespace_rejection(ns) {
                let error = Error::InvalidNamespace {
                    namespace: ns.to_string(),
                    name: ty.name.clone(),
                    reason,
                };
                warn!(origin = %ty.origin, "{error}");
                return None;
            }
            Some((ns.to_string(), ty))
        });
        let grouped = namespace::group(eligible);

        let mut written = 0;
        for (ns, types) in &grouped {
            written += self.aggregator.append(ns, source.id(), types)?;
        }
        info!(source = source.id(), exported, written, namespaces = grouped.len(), "processed source");
        self.types_written += written;
        self.sources_processed += 1;
        Ok(())
    }

    /// Package markers plus the readme.
    pub fn finish(self) -> Result<RunReport> {
        self.aggregator.finalize()?;
        let output_root = absolute(self.aggregator.root());
        write_readme(self.aggregator.root(), &output_root)?;
        Ok(RunReport {
            output_root,
            sources_processed: self.sources_processed,
            sources_failed: self.sources_failed,
            namespaces: self.aggregator.namespaces().count(),
            types_written: self.types_written,
        })
    }
}

/// Regenerate the whole tree under `output_root` from `sources`, in order.
pub fn run(sources: &[Box<dyn Source>], output_root: &Path, progress: &mut dyn Progress) -> Result<RunReport> {
    let result = run_inner(sources, output_root, progress);
    progress.clear();
    match &result {
        Ok(report) => info!(
            output = %report.output_root.display(),
            types = report.types_written,
            failed_sources = report.sources_failed,
            "python stubs generated"
        ),
        Err(error) => error!("python stub generation failed: {error}"),
    }
    result
}

fn run_inner(sources: &[Box<dyn Source>], output_root: &Path, progress: &mut dyn Progress) -> Result<RunReport> {
    reset_output_root(output_root)?;

    let mut cx = RunContext::new(output_root);
    let total = sources.len();
    for (i, source) in sources.iter().enumerate() {
        progress.advance(source.id(), i as f32 / total as f32);
        cx.process_source(source.as_ref())?;
    }
    cx.finish()
}

/// Delete and recreate the output root.
pub fn reset_output_root(output_root: &Path) -> Result {
    let fatal = |source| Error::FatalIo { path: output_root.to_path_buf(), source };
    if output_root.exists() {
        std::fs::remove_dir_all(output_root).map_err(fatal)?;
    }
    std::fs::create_dir_all(output_root).map_err(fatal)?;
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// OUTPUT LOCATION
// ————————————————————————————————————————————————————————————————————————————

/// Open `output_root` with the platform's file browser.
///
/// Returns `Ok(false)` without doing anything when the directory is missing.
pub fn open_output_location(output_root: &Path) -> Result<bool> {
    if !output_root.is_dir() {
        warn!(path = %output_root.display(), "stubs directory does not exist");
        return Ok(false);
    }
    let opener = ["xdg-open", "open", "explorer"]
        .into_iter()
        .find_map(|name| which::which(name).ok())
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "no file browser launcher in $PATH"))?;
    Command::new(opener).arg(output_root).spawn()?;
    Ok(true)
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Editor settings a type-checker needs to pick the stubs up.
pub fn readme_text(output_root: &Path) -> String {
    let root = output_root.to_string_lossy().replace('\\', "/");
    let settings = json!({
        "python.analysis.extraPaths": [root],
        "python.analysis.stubPath": root,
        "python.analysis.autoSearchPaths": true,
        "python.analysis.useLibraryCodeForTypes": true,
        "python.analysis.typeCheckingMode": "basic",
    });
    let settings = serde_json::to_string_pretty(&settings).unwrap_or_default();
    format!(
        "Add the following configuration to your editor's `settings.json` so the \
         type checker and auto-completion can find these stubs:\n\
         ```json\n{settings}\n```\n"
    )
}

fn write_readme(dir: &Path, output_root: &Path) -> Result {
    std::fs::write(dir.join(README_FILE), readme_text(output_root))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceLoadError;
    use crate::model::{TypeDescriptor, TypeKind};
    use crate::source::StaticSource;
    use tempfile::TempDir;

    struct Broken;

    impl Source for Broken {
        fn id(&self) -> &str {
            "broken"
        }
        fn export(&self) -> std::result::Result<Vec<TypeDescriptor>, SourceLoadError> {
            Err(SourceLoadError::Other("cannot open image".into()))
        }
    }

    #[derive(Default)]
    struct Recorder {
        steps: Vec<(String, f32)>,
        cleared: usize,
    }

    impl Progress for Recorder {
        fn advance(&mut self, label: &str, fraction: f32) {
            self.steps.push((label.to_string(), fraction));
        }
        fn clear(&mut self) {
            self.cleared += 1;
        }
    }

    #[test]
    fn reset_removes_stale_files() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("stubs");
        std::fs::create_dir_all(root.join("Old")).unwrap();
        std::fs::write(root.join("Old").join("__init__.pyi"), "class Gone: ...").unwrap();
        reset_output_root(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(std::fs::read_dir(&root).unwrap().count(), 0);
    }

    #[test]
    fn failing_sources_do_not_abort_and_progress_is_cleared() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("stubs");
        let sources: Vec<Box<dyn Source>> = vec![
            Box::new(Broken),
            Box::new(StaticSource::new("core", vec![TypeDescriptor::new("Game", "Player", TypeKind::Class)])),
        ];
        let mut progress = Recorder::default();
        let report = run(&sources, &root, &mut progress).unwrap();

        assert_eq!(report.sources_failed, 1);
        assert_eq!(report.sources_processed, 1);
        assert_eq!(report.types_written, 1);
        assert_eq!(report.namespaces, 1);
        assert!(report.output_root.is_absolute());
        assert_eq!(progress.steps, [("broken".to_string(), 0.0), ("core".to_string(), 0.5)]);
        assert_eq!(progress.cleared, 1);
        assert!(root.join("Game").join("__init__.pyi").is_file());
        assert!(root.join(README_FILE).is_file());
    }

    #[test]
    fn namespaces_outside_the_root_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("stubs");
        let escape = tmp.path().join("escaped");
        let hostile = format!("A.{}", escape.display());
        let sources: Vec<Box<dyn Source>> = vec![Box::new(StaticSource::new(
            "core",
            vec![
                TypeDescriptor::new(&hostile, "X", TypeKind::Class),
                TypeDescriptor::new("A..B", "Y", TypeKind::Class),
                TypeDescriptor::new("Game", "Player", TypeKind::Class),
            ],
        ))];
        let report = run(&sources, &root, &mut NoProgress).unwrap();

        assert_eq!(report.types_written, 1);
        assert_eq!(report.namespaces, 1);
        assert!(!escape.exists());
        assert!(!root.join("A").exists());
        assert!(root.join("Game").join("__init__.pyi").is_file());
    }

    #[test]
    fn fatal_root_errors_still_clear_progress() {
        let tmp = TempDir::new().unwrap();
        // a regular file where a directory component is expected
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let mut progress = Recorder::default();
        let err = run(&[], &blocker.join("stubs"), &mut progress).unwrap_err();
        assert!(matches!(err, Error::FatalIo { .. }), "{err}");
        assert_eq!(progress.cleared, 1);
        assert!(progress.steps.is_empty());
    }

    #[test]
    fn readme_mentions_the_search_paths() {
        let text = readme_text(Path::new("/work/stubs"));
        assert!(text.contains("\"python.analysis.extraPaths\": [\n    \"/work/stubs\"\n  ]"));
        assert!(text.contains("\"python.analysis.stubPath\": \"/work/stubs\""));
        assert!(text.contains("\"python.analysis.autoSearchPaths\": true"));
        assert!(text.contains("\"python.analysis.useLibraryCodeForTypes\": true"));
        assert!(text.contains("\"python.analysis.typeCheckingMode\": \"basic\""));
    }

    #[test]
    fn opening_a_missing_location_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        assert!(!open_output_location(&tmp.path().join("nope")).unwrap());
    }
}
