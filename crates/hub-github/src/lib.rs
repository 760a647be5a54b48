#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// DefaultGithubClient is used through the RemoteRepositoryReader trait,
// not through its internal generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultGithubClient;

// Configuration
pub use config::GithubClientConfig;

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
