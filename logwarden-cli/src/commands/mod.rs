//! Command handlers -- one module per subcommand

pub mod audit;
pub mod config;
pub mod sample;
pub mod triage;
