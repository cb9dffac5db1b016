//! Namespace grouping and the on-disk layout of the stub tree.
//!
//! One namespace is one directory (a segment per dot) holding an
//! `__init__.pyi`. Contributions are appended, never rewritten, so several
//! sources can feed the same namespace; the import header goes in exactly once.

use std::collections::{BTreeSet, HashSet};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;

use crate::error::Result;
use crate::model::TypeDescriptor;
use crate::render::render_type;

pub const GLOBAL_NAMESPACE: &str = "global";
pub const STUB_FILE: &str = "__init__.pyi";
pub const PACKAGE_MARKER: &str = "__init__.py";

pub const HEADER: &str = "\
# Auto-generated Python type stubs
# Generated by stubgen

from __future__ import annotations
from typing import Any, List, Set, Dict, Tuple, Optional, Union, Callable, ClassVar, overload
from enum import Enum
from datetime import datetime

";

const ROOT_BANNER: &str = "\
# Auto-generated Python stubs root
# Import all namespaces
";

// ————————————————————————————————————————————————————————————————————————————
// GROUPING
// ————————————————————————————————————————————————————————————————————————————

/// The namespace a type is filed under.
pub fn namespace_of(ty: &TypeDescriptor) -> &str {
    match ty.namespace.as_deref() {
        Some(ns) if !ns.is_empty() => ns,
        _ => GLOBAL_NAMESPACE,
    }
}

/// Group by namespace; within a namespace, types are stable-sorted by name.
pub fn group<I>(types: I) -> IndexMap<String, Vec<TypeDescriptor>>
where
    I: IntoIterator<Item = (String, TypeDescriptor)>,
{
    let mut out: IndexMap<String, Vec<TypeDescriptor>> = IndexMap::new();
    for (ns, ty) in types {
        out.entry(ns).or_default().push(ty);
    }
    for members in out.values_mut() {
        members.sort_by(|a, b| a.name.cmp(&b.name));
    }
    out
}

/// Why `namespace` cannot map onto directories below the output root, if it
/// cannot.
pub fn namespace_rejection(namespace: &str) -> Option<&'static str> {
    for segment in namespace.split('.') {
        if segment.trim().is_empty() {
            return Some("empty segment");
        }
        if segment.contains(['/', '\\', ':']) {
            return Some("path separator in segment");
        }
    }
    None
}

/// `A.B.C` → `root/A/B/C`. Callers check [`namespace_rejection`] first.
pub fn namespace_dir(root: &Path, namespace: &str) -> PathBuf {
    namespace
        .split('.')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |dir, segment| dir.join(segment))
}

pub fn stub_path(root: &Path, namespace: &str) -> PathBuf {
    namespace_dir(root, namespace).join(STUB_FILE)
}

// ————————————————————————————————————————————————————————————————————————————
// AGGREGATOR
// ————————————————————————————————————————————————————————————————————————————

/// Run-scoped record of which namespace files exist in the output tree.
#[derive(Debug)]
pub struct NamespaceAggregator {
    root: PathBuf,
    touched: BTreeSet<String>,
}

impl NamespaceAggregator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), touched: BTreeSet::new() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Namespaces written so far, in sorted order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.touched.iter().map(String::as_str)
    }

    /// Render `types` and append them to `namespace`'s stub file under a
    /// `# From source:` marker. Returns how many types were written.
    pub fn append(&mut self, namespace: &str, source_id: &str, types: &[TypeDescriptor]) -> Result<usize> {
        let mut text = String::new();
        if self.touched.insert(namespace.to_string()) {
            text.push_str(HEADER);
        }
        text.push_str(&format!("# From source: {source_id}\n\n"));

        let mut written = 0;
        for ty in types {
            if let Some(body) = render_type(ty, 0)? {
                text.push_str(&body);
                text.push('\n');
                written += 1;
            }
        }

        let dir = namespace_dir(&self.root, namespace);
        std::fs::create_dir_all(&dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(STUB_FILE))?;
        file.write_all(text.as_bytes())?;
        debug!(namespace, source = source_id, types = written, "appended namespace contribution");
        Ok(written)
    }

    /// Drop package markers into every directory without a namespace file and
    /// write the root marker re-exporting each top-level package.
    pub fn finalize(&self) -> Result {
        let stub_dirs: HashSet<PathBuf> = self
            .touched
            .iter()
            .map(|ns| namespace_dir(&self.root, ns))
            .collect();

        let mut dirs = BTreeSet::new();
        let mut top_level = BTreeSet::new();
        for ns in &self.touched {
            let mut dir = self.root.clone();
            for (i, segment) in ns.split('.').filter(|s| !s.is_empty()).enumerate() {
                if i == 0 {
                    top_level.insert(segment.to_string());
                }
                dir.push(segment);
                dirs.insert(dir.clone());
            }
        }

        for dir in dirs.iter().filter(|d| !stub_dirs.contains(*d)) {
            std::fs::write(dir.join(PACKAGE_MARKER), "")?;
        }

        // `global` is a Python keyword: its import line is emitted as is and does
        // not parse
        let mut root_marker = String::from(ROOT_BANNER);
        for package in &top_level {
            root_marker.push_str(&format!("from . import {package}\n"));
        }
        std::fs::write(self.root.join(PACKAGE_MARKER), root_marker)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeKind;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn class(ns: &str, name: &str) -> TypeDescriptor {
        TypeDescriptor::new(ns, name, TypeKind::Class)
    }

    #[test]
    fn global_namespace_fallback() {
        assert_eq!(namespace_of(&class("", "Loose")), GLOBAL_NAMESPACE);
        assert_eq!(namespace_of(&class("UnityEngine.UI", "Button")), "UnityEngine.UI");
    }

    #[test]
    fn grouping_sorts_by_name_and_keeps_duplicates() {
        let grouped = group(vec![
            ("B".to_string(), class("B", "Zeta")),
            ("A".to_string(), class("A", "Solo")),
            ("B".to_string(), class("B", "Alpha")),
            ("B".to_string(), class("B", "Alpha")),
        ]);
        assert_eq!(grouped.keys().collect::<Vec<_>>(), ["B", "A"]);
        let names: Vec<_> = grouped["B"].iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Alpha", "Zeta"]);
    }

    #[test]
    fn namespaces_that_leave_the_root_are_rejected() {
        assert_eq!(namespace_rejection("UnityEngine.UI"), None);
        assert_eq!(namespace_rejection(GLOBAL_NAMESPACE), None);
        assert_eq!(namespace_rejection("A./tmp/elsewhere"), Some("path separator in segment"));
        assert_eq!(namespace_rejection("A.\\share"), Some("path separator in segment"));
        assert_eq!(namespace_rejection("C:.Windows"), Some("path separator in segment"));
        assert_eq!(namespace_rejection("A..B"), Some("empty segment"));
        assert_eq!(namespace_rejection("A. .B"), Some("empty segment"));
        assert_eq!(namespace_rejection(".A"), Some("empty segment"));
    }

    #[test]
    fn namespace_paths() {
        let root = Path::new("out");
        assert_eq!(namespace_dir(root, "UnityEngine.UI"), root.join("UnityEngine").join("UI"));
        assert_eq!(stub_path(root, "global"), root.join("global").join(STUB_FILE));
    }

    #[test]
    fn header_is_written_once_per_namespace() {
        let tmp = TempDir::new().unwrap();
        let mut agg = NamespaceAggregator::new(tmp.path());
        agg.append("Game", "first", &[class("Game", "A")]).unwrap();
        agg.append("Game", "second", &[class("Game", "B")]).unwrap();

        let text = std::fs::read_to_string(stub_path(tmp.path(), "Game")).unwrap();
        assert_eq!(text.matches("from typing import").count(), 1);
        assert_eq!(
            text,
            format!(
                "{HEADER}# From source: first\n\nclass A:\n    pass\n\n\
                 # From source: second\n\nclass B:\n    pass\n\n"
            )
        );
    }

    #[test]
    fn finalize_writes_markers() {
        let tmp = TempDir::new().unwrap();
        let mut agg = NamespaceAggregator::new(tmp.path());
        agg.append("UnityEngine.UI", "ui", &[class("UnityEngine.UI", "Button")]).unwrap();
        agg.append("System", "core", &[class("System", "Object")]).unwrap();
        agg.finalize().unwrap();

        let root = tmp.path();
        // intermediate directory without its own stub file
        assert_eq!(std::fs::read_to_string(root.join("UnityEngine").join(PACKAGE_MARKER)).unwrap(), "");
        assert!(!root.join("UnityEngine").join(STUB_FILE).exists());
        assert!(!root.join("System").join(PACKAGE_MARKER).exists());
        assert!(!root.join("UnityEngine").join("UI").join(PACKAGE_MARKER).exists());
        assert_eq!(
            std::fs::read_to_string(root.join(PACKAGE_MARKER)).unwrap(),
            format!("{ROOT_BANNER}from . import System\nfrom . import UnityEngine\n")
        );
        assert_eq!(agg.namespaces().collect::<Vec<_>>(), ["System", "UnityEngine.UI"]);
    }
}
