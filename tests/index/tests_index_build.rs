//! ModuleIndex built from a source tree on disk.

use std::path::PathBuf;

use vtdd::{Attribution, Error, ModuleIndex, Position};

use crate::helpers::source_fixtures::{BUFFER, INVERTER, MUX};
use crate::helpers::test_project::TestProject;

#[test]
fn test_build_indexes_nested_tree() {
    let project = TestProject::new();
    let buffer = project.source("prims/buffer.v", BUFFER);
    let mux = project.source("mux.v", MUX);
    project.source("notes.txt", "module ignored (a);");

    let index = ModuleIndex::build(&project.src_dir(), Attribution::PerFile).unwrap();

    assert_eq!(index.len(), 2);
    assert_eq!(index.file_for("buffer"), Some(buffer.as_path()));
    assert_eq!(index.file_for("mux_unit"), Some(mux.as_path()));
    assert!(index.file_for("ignored").is_none());

    let sources = index.resolver().resolve_files("mux_unit");
    assert_eq!(sources, vec![buffer, mux]);
}

#[test]
fn test_build_records_declaration_position() {
    let project = TestProject::new();
    project.source("buffer.v", BUFFER);

    let index = ModuleIndex::build(&project.src_dir(), Attribution::PerFile).unwrap();

    // BUFFER starts with a newline; `buffer` sits after `module ` on line 1
    let unit = index.unit("buffer").unwrap();
    assert_eq!(unit.position, Position::new(1, 7));
}

#[test]
fn test_build_duplicates_follow_file_name_order() {
    let project = TestProject::new();
    let first = project.source("a_inverter.v", INVERTER);
    let second = project.source(
        "b_inverter.v",
        "module inverter (a, y);\n  buffer b0 (a, y);\nendmodule\n",
    );

    let index = ModuleIndex::build(&project.src_dir(), Attribution::PerFile).unwrap();

    assert_eq!(index.file_for("inverter"), Some(second.as_path()));
    let dup = &index.duplicates()[0];
    assert_eq!(dup.name, "inverter");
    assert_eq!(dup.shadowed.defining_file, first);
    assert_eq!(dup.winner.defining_file, second);
    assert_eq!(dup.shadowed.position, Position::new(1, 7));
    assert_eq!(dup.winner.position, Position::new(0, 7));
    assert_eq!(
        index
            .dependencies_of("inverter")
            .map(|d| d.iter().map(|s| s.as_str()).collect::<Vec<_>>()),
        Some(vec!["buffer"])
    );
}

#[test]
fn test_build_missing_directory_is_an_error() {
    let project = TestProject::new();
    let missing = project.root().join("rtl");

    let err = ModuleIndex::build(&missing, Attribution::PerFile).unwrap_err();
    assert!(matches!(err, Error::DirectoryNotFound(ref dir) if *dir == missing));
}

#[test]
fn test_build_strict_attribution() {
    let project = TestProject::new();
    project.source("buffer.v", BUFFER);
    project.source("inverter.v", INVERTER);
    project.source(
        "pair.v",
        "module left (a, y);\n  buffer b0 (a, y);\nendmodule\n\
         module right (a, y);\n  inverter i0 (a, y);\nendmodule\n",
    );

    let coarse = ModuleIndex::build(&project.src_dir(), Attribution::PerFile).unwrap();
    let strict = ModuleIndex::build(&project.src_dir(), Attribution::PerDeclaration).unwrap();

    let files = |index: &ModuleIndex, unit: &str| -> Vec<PathBuf> {
        index
            .resolver()
            .resolve_files(unit)
            .iter()
            .map(|p| PathBuf::from(p.file_name().unwrap()))
            .collect()
    };
    assert_eq!(
        files(&coarse, "left"),
        vec![PathBuf::from("buffer.v"), PathBuf::from("inverter.v"), PathBuf::from("pair.v")]
    );
    assert_eq!(
        files(&strict, "left"),
        vec![PathBuf::from("buffer.v"), PathBuf::from("pair.v")]
    );
}
