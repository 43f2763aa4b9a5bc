//! Dependency-first file ordering.

use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use super::ModuleIndex;
use crate::parser::{find_usages, normalize};
use crate::project::testbench_unit_name;

/// Answers "which files, in which order, does unit X need".
///
/// Results are recomputed on every call; the index is the only state.
#[derive(Debug, Clone)]
pub struct DependencyResolver<'a> {
    index: &'a ModuleIndex,
    /// Units grouped by the file that declares them, in declaration order.
    units_by_file: FxHashMap<&'a Path, Vec<&'a str>>,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(index: &'a ModuleIndex) -> Self {
        let mut units_by_file: FxHashMap<&'a Path, Vec<&'a str>> = FxHashMap::default();
        for unit in index.units() {
            units_by_file
                .entry(unit.defining_file.as_path())
                .or_default()
                .push(unit.name.as_str());
        }
        Self {
            index,
            units_by_file,
        }
    }

    /// Files needed to compile `root`, every file after the files it depends on.
    ///
    /// Depth-first post-order over files. A file is compiled whole, so its
    /// dependencies are those of every unit it declares, not only the unit
    /// that pulled it in. Each file is expanded at most once, so cycles
    /// terminate and no file repeats. Units without a known file are skipped:
    /// the compiler will report them with a better message than we could.
    pub fn resolve_files(&self, root: &str) -> Vec<PathBuf> {
        let Some(root_file) = self.index.file_for(root) else {
            trace!("no file declares '{}'", root);
            return Vec::new();
        };

        let mut visited: FxHashSet<&Path> = FxHashSet::default();
        let mut files = Vec::new();

        // (file, its dependency files, index of the next one to visit)
        let mut stack: Vec<(&Path, Vec<&Path>, usize)> =
            vec![(root_file, self.file_dependencies(root_file), 0)];
        visited.insert(root_file);

        while let Some((file, deps, next)) = stack.last_mut() {
            match deps.get(*next).copied() {
                Some(dep) => {
                    *next += 1;
                    if visited.insert(dep) {
                        stack.push((dep, self.file_dependencies(dep), 0));
                    }
                }
                None => {
                    files.push(file.to_path_buf());
                    stack.pop();
                }
            }
        }

        files
    }

    /// Files declaring the direct dependencies of every unit in `file`.
    fn file_dependencies(&self, file: &Path) -> Vec<&'a Path> {
        let mut deps: IndexSet<&'a Path> = IndexSet::new();
        let units = self.units_by_file.get(file).map(Vec::as_slice).unwrap_or_default();
        for unit in units {
            for dep in self.index.dependencies_of(unit).into_iter().flatten() {
                match self.index.file_for(dep) {
                    Some(dep_file) if dep_file != file => {
                        deps.insert(dep_file);
                    }
                    Some(_) => {}
                    None => trace!("no file declares '{}'", dep),
                }
            }
        }
        deps.into_iter().collect()
    }

    /// Files needed by every unit instantiated in `text`.
    ///
    /// Used for testbenches, which are usually not declared units themselves.
    /// Per-unit results are concatenated in usage order, keeping only the
    /// first occurrence of each file.
    pub fn resolve_files_for_usages(&self, text: &str) -> Vec<PathBuf> {
        let mut files: IndexSet<PathBuf> = IndexSet::new();
        for usage in find_usages(&normalize(text)) {
            files.extend(self.resolve_files(&usage.unit_name));
        }
        files.into_iter().collect()
    }

    /// Sources for a testbench file.
    ///
    /// Tries the testbench's usages first. If nothing resolves, falls back to
    /// the naming convention: `mux_tb.v` with suffix `_tb` tests unit `mux`.
    pub fn resolve_testbench(&self, path: &Path, text: &str, suffix: &str) -> Vec<PathBuf> {
        let files = self.resolve_files_for_usages(text);
        if !files.is_empty() {
            return files;
        }

        match testbench_unit_name(path, suffix) {
            Some(name) => {
                debug!(
                    "{}: no resolvable usages, falling back to unit '{}'",
                    path.display(),
                    name
                );
                self.resolve_files(&name)
            }
            None => Vec::new(),
        }
    }
}
