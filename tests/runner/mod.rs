mod tests_orchestrator;
