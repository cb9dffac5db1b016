use std::path::PathBuf;

use thiserror::Error;

/// The public result type of the pipeline.
pub type Result<T = ()> = std::result::Result<T, Error>;

/// Everything the pipeline can report.
///
/// Only `FatalIo`, `Io` and `Render` ever abort a run. The other variants are
/// built at the narrowest scope, logged, and the offending item is skipped.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load source `{source_id}`: {reason}")]
    SourceLoad { source_id: String, reason: SourceLoadError },
    #[error("unsupported operator `{symbol}` on `{owner}`")]
    UnsupportedOperator { owner: String, symbol: String },
    #[error("unsupported type kind for `{name}`")]
    UnsupportedTypeKind { name: String },
    #[error("namespace `{namespace}` of `{name}` cannot be laid out as directories: {reason}")]
    InvalidNamespace { namespace: String, name: String, reason: &'static str },
    #[error("cannot prepare output root {}: {source}", path.display())]
    FatalIo { path: PathBuf, source: std::io::Error },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("render error: {0}")]
    Render(#[from] std::fmt::Error),
}

/// Why a [`Source`](crate::source::Source) could not produce its descriptors.
#[derive(Debug, Error)]
pub enum SourceLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{} {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
    #[error("{0}")]
    Other(String),
}
