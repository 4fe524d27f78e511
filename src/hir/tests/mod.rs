mod tests_resolve;
