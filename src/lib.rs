//! Python stub (`.pyi`) generation from reflected type metadata.
//!
//! Pipeline: [`source`] → [`filter`] → [`namespace`] → [`render`] (with
//! [`mapper`]) → files on disk, orchestrated by [`emitter::run`].
pub mod model;
pub mod error;
pub mod filter;
pub mod mapper;
pub mod render;
pub mod namespace;
pub mod source;
pub mod emitter;
pub mod logging;
pub mod cli;

pub use emitter::{NoProgress, Progress, RunReport, run};
pub use error::{Error, Result, SourceLoadError};
pub use source::{JsonSource, Source, StaticSource};
