//! CLI subcommand implementations.

pub mod explore;
pub mod scan;
pub mod trash;
