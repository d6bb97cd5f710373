// Application layer: one runner per CLI subcommand. Runners take their
// output sink as `&mut dyn Write` so tests can capture it.

pub mod commands;
