//! Sync command handler.
//!
//! Runs one reconciliation pass over a catalog repository. Ctrl-C stops the
//! pass between directories; work already committed stays.

use anyhow::Result;
use hub_core::{RepoCoordinates, SyncReport};

use crate::bootstrap::CliContext;
use crate::commands::SyncArgs;
use crate::error::CliError;
use crate::presentation::format_sync_report;

/// Execute the sync command and return the report.
pub async fn execute(ctx: &CliContext, args: &SyncArgs) -> Result<SyncReport> {
    let repo = RepoCoordinates::new(&args.owner, &args.repository, &args.git_ref);
    if ctx.output == crate::presentation::OutputFormat::Text {
        eprintln!("Synchronizing {repo}...");
    }

    let report = ctx
        .core()
        .sync()
        .sync_with_cancel(&repo, ctx.cancel.clone())
        .await
        .map_err(CliError::from)?;

    ctx.output.emit(&report, || format_sync_report(&report))?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{catalog, context};
    use hub_core::{RemoteError, ResourceFilter};

    fn args() -> SyncArgs {
        SyncArgs {
            owner: "tektoncd".to_string(),
            repository: "catalog".to_string(),
            git_ref: "main".to_string(),
            concurrency: None,
            exclude: Vec::new(),
            max_attempts: None,
        }
    }

    #[tokio::test]
    async fn test_sync_imports_catalog() {
        let (_db, ctx) = context(catalog()).await;

        let report = execute(&ctx, &args()).await.unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(report.failed, 0);

        let stored = ctx
            .core()
            .resources()
            .query_resources(&ResourceFilter::default())
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_root_listing_failure_maps_to_exit_code() {
        let reader = catalog();
        reader.fail_next(
            "",
            RemoteError::NotFound {
                path: String::new(),
            },
        );
        let (_db, ctx) = context(reader).await;

        let err = execute(&ctx, &args()).await.unwrap_err();
        let cli_err = err.downcast_ref::<CliError>().unwrap();
        assert!(matches!(cli_err, CliError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let (_db, ctx) = context(catalog()).await;
        ctx.cancel.cancel();

        let report = execute(&ctx, &args()).await.unwrap();
        assert!(report.cancelled);
        assert_eq!(report.inserted, 0);
        assert!(report.failures.is_empty());
    }
}
