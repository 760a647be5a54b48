//! Tag and category listing handlers.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::format_categories;

/// Execute the tags command.
pub async fn tags(ctx: &CliContext) -> Result<()> {
    let tags = ctx
        .core()
        .resources()
        .list_tags()
        .await
        .map_err(CliError::from)?;

    ctx.output.emit(&tags, || {
        if tags.is_empty() {
            "No tags found.".to_string()
        } else {
            tags.join("\n")
        }
    })
}

/// Execute the categories command.
pub async fn categories(ctx: &CliContext) -> Result<()> {
    let categories = ctx
        .core()
        .resources()
        .categories_with_tags()
        .await
        .map_err(CliError::from)?;

    ctx.output
        .emit(&categories, || format_categories(&categories))
}
