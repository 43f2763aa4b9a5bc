//! Project layout: finding source files and testbenches on disk.

pub mod file_loader;

pub use file_loader::{collect_file_paths, collect_testbenches, load_file, testbench_unit_name};
