//! Module index: which file declares each unit, and which units each unit uses.
//!
//! The index is built once per invocation by scanning every source file under
//! a root directory, and is read-only afterwards. Edges are keyed by unit name
//! rather than by reference, so cyclic instantiation graphs are representable
//! and harmless.
//!
//! ## Attribution
//!
//! A file can declare several units. The scanner has no notion of where a
//! module body ends, so by default ([`Attribution::PerFile`]) every unit
//! declared in a file depends on every usage found anywhere in that file.
//! [`Attribution::PerDeclaration`] instead gives each usage to the closest
//! declaration before it.

mod resolve;

pub use resolve::DependencyResolver;

use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

use crate::base::constants::SOURCE_EXTENSION;
use crate::base::{LineIndex, Position};
use crate::error::Result;
use crate::parser::{SourceScan, normalize};
use crate::project::file_loader;

/// A named declaration and the file it lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub name: SmolStr,
    pub defining_file: PathBuf,
    /// Position of the unit name in its file.
    pub position: Position,
}

impl SourceUnit {
    /// `file:line:column` of the declaration, 1-based.
    pub fn location(&self) -> String {
        format!("{}:{}", self.defining_file.display(), self.position)
    }
}

/// A unit declared again after it was already indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateDeclaration {
    pub name: SmolStr,
    /// Declaration that is no longer reachable through the index.
    pub shadowed: SourceUnit,
    /// Declaration the index now points at.
    pub winner: SourceUnit,
}

/// How usages in a file are attached to the units the file declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Attribution {
    /// Every declared unit depends on every usage in the file.
    #[default]
    PerFile,
    /// A usage belongs to the nearest preceding declaration only.
    PerDeclaration,
}

/// Unit name → defining file, and unit name → direct dependencies.
#[derive(Debug, Clone, Default)]
pub struct ModuleIndex {
    units: IndexMap<SmolStr, SourceUnit>,
    /// Dependency names in first-seen order; this order drives traversal.
    dependencies: IndexMap<SmolStr, IndexSet<SmolStr>>,
    duplicates: Vec<DuplicateDeclaration>,
    attribution: Attribution,
}

impl ModuleIndex {
    pub fn new(attribution: Attribution) -> Self {
        Self {
            attribution,
            ..Self::default()
        }
    }

    /// Scan every source file under `root` and index it.
    ///
    /// Files are visited in file-name order, so when two files declare the
    /// same unit the later one in that order wins. Files that cannot be read
    /// are logged and skipped.
    pub fn build(root: &Path, attribution: Attribution) -> Result<Self> {
        let paths = file_loader::collect_file_paths(root, SOURCE_EXTENSION)?;
        let mut index = Self::new(attribution);

        for path in paths {
            match file_loader::load_file(&path) {
                Ok(text) => index.add_file(path, &text),
                Err(e) => warn!("skipping {}: {}", path.display(), e),
            }
        }

        debug!(
            "indexed {} units ({} with dependencies) under {}",
            index.units.len(),
            index.dependencies.len(),
            root.display()
        );
        Ok(index)
    }

    /// Build an index from in-memory sources, in iteration order.
    pub fn from_sources<I, P, S>(sources: I, attribution: Attribution) -> Self
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<PathBuf>,
        S: AsRef<str>,
    {
        let mut index = Self::new(attribution);
        for (path, text) in sources {
            index.add_file(path.into(), text.as_ref());
        }
        index
    }

    /// Index one file: register its declarations, then its usages as edges.
    pub fn add_file(&mut self, path: PathBuf, text: &str) {
        let clean = normalize(text);
        let scan = SourceScan::new(&clean);
        if scan.declarations.is_empty() {
            trace!("{}: no declarations", path.display());
            return;
        }

        let lines = LineIndex::new(&clean);
        for decl in &scan.declarations {
            self.declare(SourceUnit {
                name: decl.name.clone(),
                defining_file: path.clone(),
                position: lines.position(decl.offset),
            });
        }

        match self.attribution {
            Attribution::PerFile => {
                let declared = scan.declared_names();
                for unit in &declared {
                    for usage in &scan.usages {
                        self.add_edge(unit, &usage.unit_name);
                    }
                }
            }
            Attribution::PerDeclaration => {
                for usage in &scan.usages {
                    let preceding = scan
                        .declarations
                        .partition_point(|d| d.offset < usage.offset);
                    if let Some(owner) = preceding.checked_sub(1) {
                        let owner = scan.declarations[owner].name.clone();
                        self.add_edge(&owner, &usage.unit_name);
                    }
                }
            }
        }
    }

    fn declare(&mut self, unit: SourceUnit) {
        if let Some(previous) = self.units.get(&unit.name) {
            warn!(
                "unit '{}' declared at {} shadows declaration at {}",
                unit.name,
                unit.location(),
                previous.location()
            );
            if previous.defining_file != unit.defining_file {
                // Edges describe the winning file only
                self.dependencies.shift_remove(&unit.name);
            }
            self.duplicates.push(DuplicateDeclaration {
                name: unit.name.clone(),
                shadowed: previous.clone(),
                winner: unit.clone(),
            });
        }
        self.units.insert(unit.name.clone(), unit);
    }

    fn add_edge(&mut self, dependent: &SmolStr, dependency: &SmolStr) {
        if dependent == dependency {
            return;
        }
        trace!("edge {} -> {}", dependent, dependency);
        self.dependencies
            .entry(dependent.clone())
            .or_default()
            .insert(dependency.clone());
    }

    /// File that declares `name`, if any.
    pub fn file_for(&self, name: &str) -> Option<&Path> {
        self.units.get(name).map(|u| u.defining_file.as_path())
    }

    pub fn unit(&self, name: &str) -> Option<&SourceUnit> {
        self.units.get(name)
    }

    /// Direct dependencies of `name`, in first-seen order.
    pub fn dependencies_of(&self, name: &str) -> Option<&IndexSet<SmolStr>> {
        self.dependencies.get(name)
    }

    /// All indexed units, in first-declaration order.
    pub fn units(&self) -> impl Iterator<Item = &SourceUnit> {
        self.units.values()
    }

    /// Units that have at least one dependency, with those dependencies.
    pub fn graph(&self) -> impl Iterator<Item = (&str, &IndexSet<SmolStr>)> {
        self.dependencies
            .iter()
            .filter(|(_, deps)| !deps.is_empty())
            .map(|(name, deps)| (name.as_str(), deps))
    }

    /// Every shadowed declaration, in the order it was encountered.
    pub fn duplicates(&self) -> &[DuplicateDeclaration] {
        &self.duplicates
    }

    pub fn attribution(&self) -> Attribution {
        self.attribution
    }

    /// Number of indexed units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// A resolver over this index.
    pub fn resolver(&self) -> DependencyResolver<'_> {
        DependencyResolver::new(self)
    }
}
