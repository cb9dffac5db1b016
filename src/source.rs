//! Where type descriptors come from.
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::SourceLoadError;
use crate::model::TypeDescriptor;

/// One binary (assembly, module, ...) worth of reflected types.
pub trait Source {
    /// Used for progress labels and the `# From source:` marker.
    fn id(&self) -> &str;
    /// Every type the source exposes, in no particular order.
    fn export(&self) -> Result<Vec<TypeDescriptor>, SourceLoadError>;
}

// ————————————————————————————————————————————————————————————————————————————
// JSON METADATA DOCUMENTS
// ————————————————————————————————————————————————————————————————————————————

/// Just the declared name; `types` is skipped without being built.
#[derive(Debug, Deserialize)]
struct DocumentName {
    #[serde(default)]
    name: Option<String>,
}

/// On-disk shape of a metadata document, minus the name.
#[derive(Debug, Deserialize)]
struct MetadataDocument {
    #[serde(default)]
    types: Vec<TypeDescriptor>,
}

/// A metadata document on disk: `{ "name": "...", "types": [ ... ] }`.
///
/// The document is read lazily in [`Source::export`]; the id comes from the
/// file stem until then.
#[derive(Debug, Clone)]
pub struct JsonSource {
    path: PathBuf,
    id: String,
}

impl JsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self { path, id }
    }

    /// Read the document's declared `name` up front so it becomes the id.
    /// The types themselves are only deserialized by [`Source::export`].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SourceLoadError> {
        let mut source = Self::new(path);
        let doc: DocumentName = source.load()?;
        if let Some(name) = doc.name {
            source.id = name;
        }
        Ok(source)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load<T: DeserializeOwned>(&self) -> Result<T, SourceLoadError> {
        let bytes = std::fs::read(&self.path)?;
        from_slice_with_path(&bytes).map_err(|reason| SourceLoadError::Parse {
            path: self.path.clone(),
            reason,
        })
    }
}

impl Source for JsonSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn export(&self) -> Result<Vec<TypeDescriptor>, SourceLoadError> {
        let doc: MetadataDocument = self.load()?;
        Ok(stamp_origin(doc.types, &self.id))
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IN-MEMORY
// ————————————————————————————————————————————————————————————————————————————

/// Descriptors already built by the host.
#[derive(Debug, Clone)]
pub struct StaticSource {
    id: String,
    types: Vec<TypeDescriptor>,
}

impl StaticSource {
    pub fn new(id: impl Into<String>, types: Vec<TypeDescriptor>) -> Self {
        Self { id: id.into(), types }
    }
}

impl Source for StaticSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn export(&self) -> Result<Vec<TypeDescriptor>, SourceLoadError> {
        Ok(stamp_origin(self.types.clone(), &self.id))
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn stamp_origin(mut types: Vec<TypeDescriptor>, id: &str) -> Vec<TypeDescriptor> {
    for ty in &mut types {
        if ty.origin.is_empty() {
            ty.origin = id.to_string();
        }
    }
    types
}

/// Deserialize with JSON-path context in error messages.
pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, String> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(format!("at JSON path {path} → {}", err.into_inner()))
        }
    }
}
