//! Command-line interface of the `dendra` binary.
//!
//! Two commands read a session file (the dataset plus the clustering
//! service response) and print the clusters of one view: `cut` slices the
//! merge tree at a height, `replay` reconstructs the state after a number of
//! merge steps.

mod commands;

pub use commands::{
    Cli, CliError, Command, CutCommand, ExecutionSummary, ReplayCommand, Session, ViewArgs,
    render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;
