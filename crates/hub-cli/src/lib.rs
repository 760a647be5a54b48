#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary target only
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliContext, bootstrap, bootstrap_with};
pub use commands::{Commands, RateCommand, SubmitArgs, SyncArgs};
pub use config::CliConfig;
pub use error::CliError;
pub use parser::Cli;
pub use presentation::OutputFormat;
