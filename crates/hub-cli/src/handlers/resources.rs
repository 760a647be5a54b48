//! Resource browsing handlers: list, show, delete, links and download.

use anyhow::Result;
use hub_core::{ResourceFilter, ResourceKind};
use serde::Serialize;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{format_resource_detail, format_resource_table};

/// Filters accepted by `hub list`.
#[derive(Debug, Default)]
pub struct ListArgs {
    pub kind: Option<ResourceKind>,
    pub tags: Vec<String>,
    pub verified: Option<bool>,
    pub user: Option<i64>,
}

/// Execute the list command.
pub async fn list(ctx: &CliContext, args: ListArgs) -> Result<()> {
    let resources = ctx.core().resources();
    let found = match args.user {
        Some(user_id) => resources.resources_by_user(user_id).await,
        None => {
            let filter = ResourceFilter {
                kind: args.kind,
                verified: args.verified,
                tags: args.tags,
            };
            resources.query_resources(&filter).await
        }
    }
    .map_err(CliError::from)?;

    ctx.output.emit(&found, || format_resource_table(&found))
}

#[derive(Serialize)]
struct ResourceWithReadme<'a> {
    #[serde(flatten)]
    resource: &'a hub_core::Resource,
    readme: Option<&'a str>,
}

/// Execute the show command.
pub async fn show(ctx: &CliContext, id: i64, readme: bool) -> Result<()> {
    let resources = ctx.core().resources();
    let resource = resources.find_resource(id).await.map_err(CliError::from)?;

    let readme_text = if readme {
        resources.readme_content(id).await.map_err(CliError::from)?
    } else {
        None
    };

    let view = ResourceWithReadme {
        resource: &resource,
        readme: readme_text.as_deref(),
    };
    ctx.output.emit(&view, || {
        let mut text = format_resource_detail(&resource);
        match (readme, readme_text.as_deref()) {
            (true, Some(body)) => {
                text.push_str("\n\n");
                text.push_str(body.trim_end());
            }
            (true, None) => text.push_str("\n\n(no README)"),
            _ => {}
        }
        text
    })
}

/// Execute the delete command.
pub async fn delete(ctx: &CliContext, id: i64) -> Result<()> {
    ctx.core()
        .resources()
        .delete_resource(id)
        .await
        .map_err(CliError::from)?;

    ctx.output.emit(&serde_json::json!({ "deleted": id }), || {
        format!("Resource {id} deleted.")
    })
}

/// Execute the links command.
pub async fn links(ctx: &CliContext, id: i64) -> Result<()> {
    let links = ctx
        .core()
        .resources()
        .raw_links(id)
        .await
        .map_err(CliError::from)?;

    ctx.output.emit(&links, || match links.readme {
        Some(ref readme) => format!("{}\n{readme}", links.definition),
        None => links.definition.clone(),
    })
}

/// Execute the download command: print the definition, then count it.
///
/// The counter only moves once the content was fetched.
pub async fn download(ctx: &CliContext, id: i64) -> Result<()> {
    let resources = ctx.core().resources();
    let definition = resources
        .definition_content(id)
        .await
        .map_err(CliError::from)?;
    let downloads = resources.record_download(id).await.map_err(CliError::from)?;
    tracing::debug!(resource_id = id, downloads, "Download recorded");

    ctx.output.emit(
        &serde_json::json!({ "id": id, "downloads": downloads, "definition": definition }),
        || definition.trim_end().to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::SyncArgs;
    use crate::handlers::sync;
    use crate::handlers::test_support::{catalog, context};

    async fn synced() -> (hub_db::TestDb, CliContext) {
        let (db, ctx) = context(catalog()).await;
        let args = SyncArgs {
            owner: "tektoncd".to_string(),
            repository: "catalog".to_string(),
            git_ref: "main".to_string(),
            concurrency: None,
            exclude: Vec::new(),
            max_attempts: None,
        };
        sync::execute(&ctx, &args).await.unwrap();
        (db, ctx)
    }

    async fn id_of(ctx: &CliContext, name: &str) -> i64 {
        ctx.core()
            .resources()
            .query_resources(&ResourceFilter::default())
            .await
            .unwrap()
            .into_iter()
            .find(|r| r.name == name)
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_list_and_show() {
        let (_db, ctx) = synced().await;
        list(
            &ctx,
            ListArgs {
                tags: vec!["git".to_string()],
                ..ListArgs::default()
            },
        )
        .await
        .unwrap();

        let id = id_of(&ctx, "git-clone").await;
        show(&ctx, id, true).await.unwrap();
    }

    #[tokio::test]
    async fn test_show_missing_resource() {
        let (_db, ctx) = synced().await;
        let err = show(&ctx, 9999, false).await.unwrap_err();
        assert_eq!(err.downcast_ref::<CliError>().unwrap().exit_code(), 66);
    }

    #[tokio::test]
    async fn test_download_counts_after_fetch() {
        let (_db, ctx) = synced().await;
        let id = id_of(&ctx, "git-clone").await;

        download(&ctx, id).await.unwrap();
        download(&ctx, id).await.unwrap();

        let resource = ctx.core().resources().find_resource(id).await.unwrap();
        assert_eq!(resource.downloads, 2);
    }

    #[tokio::test]
    async fn test_delete_then_links_fail() {
        let (_db, ctx) = synced().await;
        let id = id_of(&ctx, "ci").await;

        links(&ctx, id).await.unwrap();
        delete(&ctx, id).await.unwrap();

        let err = links(&ctx, id).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::NotFound(_))
        ));
    }
}
