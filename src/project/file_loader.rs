mod collection;
mod files;

// Re-export file discovery and reading functions (no scanning logic)
pub use collection::{collect_file_paths, collect_testbenches};
pub use files::{get_extension, has_extension, load_file, testbench_unit_name};
