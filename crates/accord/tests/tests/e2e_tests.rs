#[path = "e2e/full_cycle.rs"]
mod full_cycle;

#[path = "e2e/retry_paths.rs"]
mod retry_paths;
