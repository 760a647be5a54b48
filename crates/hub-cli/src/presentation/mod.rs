//! Shared CLI presentation utilities.
//!
//! Keep this module format-only: no domain transforms. Formatters return
//! strings so they can be tested without capturing stdout.

pub mod resource_display;
pub mod tables;

use serde::Serialize;

pub use resource_display::{
    format_categories, format_rating_summary, format_resource_detail, format_resource_table,
    format_sync_report,
};
pub use tables::{format_rating, print_separator, truncate_string};

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub const fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }

    /// Print `value` as pretty JSON, or `text()` for humans.
    pub fn emit<T, F>(self, value: &T, text: F) -> anyhow::Result<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce() -> String,
    {
        match self {
            Self::Json => println!("{}", serde_json::to_string_pretty(value)?),
            Self::Text => println!("{}", text()),
        }
        Ok(())
    }
}
