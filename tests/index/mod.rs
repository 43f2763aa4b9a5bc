mod tests_index_build;
