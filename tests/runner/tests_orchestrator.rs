//! TestOrchestrator against a scripted simulator.

use std::path::PathBuf;

use rstest::rstest;
use vtdd::{Attribution, Error, FailureKind, ModuleIndex, TestOrchestrator};

use crate::helpers::fake_simulator::{FakeSimulator, Script};
use crate::helpers::source_fixtures::{
    BUFFER, BUFFER_TB_NO_INSTANCE, INVERTER, INVERTER_TB, MUX, MUX_TB, ORPHAN_TB,
};
use crate::helpers::test_project::TestProject;

fn index_of(project: &TestProject) -> ModuleIndex {
    ModuleIndex::build(&project.src_dir(), Attribution::PerFile).unwrap()
}

fn standard_project() -> TestProject {
    let project = TestProject::new();
    project.source("buffer.v", BUFFER);
    project.source("inverter.v", INVERTER);
    project.source("mux.v", MUX);
    project
}

#[test]
fn test_one_pass_one_fail() {
    let project = standard_project();
    project.testbench("inverter_tb.v", INVERTER_TB);
    project.testbench("mux_unit_tb.v", MUX_TB);
    let config = project.config();
    let index = index_of(&project);
    let simulator = FakeSimulator::new()
        .printing("inverter_tb", "SUCCESS: All 4 tests passed!\n")
        .printing("mux_unit_tb", "FAIL: y0\nFAILURE: 1/4 tests failed\n");

    let summary = TestOrchestrator::new(&index, simulator, &config)
        .run_all()
        .unwrap();

    assert_eq!(summary.passed(), 1);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.exit_code(), 1);

    let names: Vec<String> = summary.outcomes.iter().map(|o| o.name()).collect();
    assert_eq!(names, ["inverter_tb.v", "mux_unit_tb.v"]);
    assert_eq!(summary.outcomes[1].failure, Some(FailureKind::Simulation));
    assert!(summary.outcomes[1].output.contains("FAIL: y0"));
}

#[test]
fn test_sources_are_dependency_first() {
    let project = standard_project();
    let testbench = project.testbench("mux_unit_tb.v", MUX_TB);
    let config = project.config();
    let index = index_of(&project);
    let orchestrator = TestOrchestrator::new(&index, FakeSimulator::new(), &config);

    let outcome = orchestrator.run_one(&testbench);

    assert!(outcome.passed(), "{outcome:?}");
    assert_eq!(
        outcome.sources,
        vec![project.src_dir().join("buffer.v"), project.src_dir().join("mux.v")]
    );
    assert!(config.temp_dir.is_dir());
}

#[test]
fn test_compile_receives_sources_and_artifact() {
    let project = standard_project();
    let testbench = project.testbench("mux_unit_tb.v", MUX_TB);
    let config = project.config();
    let index = index_of(&project);
    let simulator = FakeSimulator::new();
    let orchestrator = TestOrchestrator::new(&index, &simulator, &config);

    let outcome = orchestrator.run_one(&testbench);

    let calls = simulator.compiles();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].sources, outcome.sources);
    assert_eq!(calls[0].testbench, testbench);
    assert_eq!(calls[0].artifact, config.temp_dir.join("mux_unit_tb"));
    assert!(outcome.compile_command.unwrap().starts_with("fake-iverilog -o "));
}

#[test]
fn test_file_name_fallback() {
    let project = standard_project();
    let testbench = project.testbench("buffer_tb.v", BUFFER_TB_NO_INSTANCE);
    let config = project.config();
    let index = index_of(&project);
    let orchestrator = TestOrchestrator::new(&index, FakeSimulator::new(), &config);

    let outcome = orchestrator.run_one(&testbench);

    assert!(outcome.passed());
    assert_eq!(outcome.sources, vec![project.src_dir().join("buffer.v")]);
}

#[test]
fn test_no_sources_found() {
    let project = standard_project();
    let testbench = project.testbench("orphan_tb.v", ORPHAN_TB);
    let config = project.config();
    let index = index_of(&project);
    let simulator = FakeSimulator::new();
    let orchestrator = TestOrchestrator::new(&index, &simulator, &config);

    let outcome = orchestrator.run_one(&testbench);

    assert_eq!(outcome.failure, Some(FailureKind::NoSourcesFound));
    assert_eq!(outcome.output, "No source files found for orphan_tb.v");
    assert!(simulator.compiles().is_empty());
}

#[rstest]
#[case(
    Script::CompileError("mux.v:3: syntax error".into()),
    FailureKind::Compilation,
    "Compilation error:\nmux.v:3: syntax error"
)]
#[case(Script::Hang, FailureKind::Timeout, "'fake-vvp' timed out after 1s")]
#[case(Script::Missing, FailureKind::Tool, "Failed to run 'fake-iverilog': not installed")]
#[case(Script::Print("ERROR: x is unknown".into()), FailureKind::Simulation, "ERROR: x is unknown")]
fn test_failure_kinds(#[case] script: Script, #[case] kind: FailureKind, #[case] output: &str) {
    let project = standard_project();
    let testbench = project.testbench("mux_unit_tb.v", MUX_TB);
    let config = project.config();
    let index = index_of(&project);
    let simulator = FakeSimulator::new().script("mux_unit_tb", script);

    let outcome = TestOrchestrator::new(&index, simulator, &config).run_one(&testbench);

    assert_eq!(outcome.failure, Some(kind));
    assert_eq!(outcome.output, output);
}

#[test]
fn test_failures_do_not_stop_the_run() {
    let project = standard_project();
    project.testbench("a_orphan_tb.v", ORPHAN_TB);
    project.testbench("b_mux_tb.v", MUX_TB);
    project.testbench("inverter_tb.v", INVERTER_TB);
    let config = project.config();
    let index = index_of(&project);
    let simulator = FakeSimulator::new().script("b_mux_tb", Script::CompileError("bad".into()));

    let summary = TestOrchestrator::new(&index, simulator, &config)
        .run_all()
        .unwrap();

    let kinds: Vec<_> = summary.outcomes.iter().map(|o| o.failure).collect();
    assert_eq!(
        kinds,
        vec![
            Some(FailureKind::NoSourcesFound),
            Some(FailureKind::Compilation),
            None
        ]
    );
}

#[test]
fn test_parallel_run_matches_sequential() {
    let project = standard_project();
    for i in 0..8 {
        project.testbench(&format!("group{i}/mux_unit_tb.v"), MUX_TB);
        project.testbench(&format!("group{i}/inverter_tb.v"), INVERTER_TB);
    }
    let index = index_of(&project);
    let sequential_config = project.config();
    let parallel_config = vtdd::Config {
        jobs: 4,
        ..project.config()
    };

    let sequential_sim = FakeSimulator::new();
    let parallel_sim = FakeSimulator::new();
    let sequential = TestOrchestrator::new(&index, &sequential_sim, &sequential_config)
        .run_all()
        .unwrap();
    let parallel = TestOrchestrator::new(&index, &parallel_sim, &parallel_config)
        .run_all()
        .unwrap();

    assert_eq!(parallel, sequential);
    assert_eq!(parallel.passed(), 16);

    // Same-named testbenches in different directories get distinct artifacts
    let mut artifacts: Vec<PathBuf> = parallel_sim
        .compiles()
        .into_iter()
        .map(|c| c.artifact)
        .collect();
    artifacts.sort();
    artifacts.dedup();
    assert_eq!(artifacts.len(), 16);
}

#[test]
fn test_missing_test_directory() {
    let project = standard_project();
    let config = vtdd::Config {
        test_dir: project.root().join("bench"),
        ..project.config()
    };
    let index = index_of(&project);

    let err = TestOrchestrator::new(&index, FakeSimulator::new(), &config)
        .run_all()
        .unwrap_err();

    assert!(matches!(err, Error::TestDirectoryNotFound(_)));
    assert!(err.to_string().ends_with("bench' directory not found"));
}

#[test]
fn test_empty_test_directory() {
    let project = standard_project();
    project.testbench("readme.v", "// nothing here");
    let config = project.config();
    let index = index_of(&project);

    let err = TestOrchestrator::new(&index, FakeSimulator::new(), &config)
        .run_all()
        .unwrap_err();

    assert!(matches!(err, Error::NoTestbenches { .. }));
    assert!(err.to_string().starts_with("No test files found (*_tb.v)"));
}

#[test]
fn test_artifacts_mirror_test_directory_layout() {
    let project = standard_project();
    let config = project.config();
    let index = index_of(&project);
    let orchestrator = TestOrchestrator::new(&index, FakeSimulator::new(), &config);

    let flat = orchestrator.artifact_path(&config.test_dir.join("a__b_tb.v"));
    let nested = orchestrator.artifact_path(&config.test_dir.join("a").join("b_tb.v"));

    assert_eq!(flat, config.temp_dir.join("a__b_tb"));
    assert_eq!(nested, config.temp_dir.join("a").join("b_tb"));
    assert_ne!(flat, nested);
}

#[test]
fn test_nested_testbench_gets_its_artifact_directory() {
    let project = standard_project();
    let testbench = project.testbench("mux/mux_unit_tb.v", MUX_TB);
    let config = project.config();
    let index = index_of(&project);
    let simulator = FakeSimulator::new();

    let outcome = TestOrchestrator::new(&index, &simulator, &config).run_one(&testbench);

    assert!(outcome.passed(), "{outcome:?}");
    assert_eq!(
        simulator.compiles()[0].artifact,
        config.temp_dir.join("mux").join("mux_unit_tb")
    );
    assert!(config.temp_dir.join("mux").is_dir());
}
