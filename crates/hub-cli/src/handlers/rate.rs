//! Rating command handlers.

use anyhow::Result;
use hub_core::RatingSummary;

use crate::bootstrap::CliContext;
use crate::commands::RateCommand;
use crate::error::CliError;
use crate::presentation::format_rating_summary;

/// Execute a rate subcommand.
pub async fn execute(ctx: &CliContext, command: RateCommand) -> Result<()> {
    let ratings = ctx.core().ratings();
    match command {
        RateCommand::Add {
            user,
            resource,
            stars,
        } => {
            let summary = ratings
                .add_rating(user, resource, stars)
                .await
                .map_err(CliError::from)?;
            emit_summary(ctx, &summary)
        }
        RateCommand::Update {
            user,
            resource,
            stars,
            previous,
        } => {
            let summary = ratings
                .update_rating(user, resource, stars, previous)
                .await
                .map_err(CliError::from)?;
            emit_summary(ctx, &summary)
        }
        RateCommand::Get { user, resource } => {
            let stars = ratings
                .get_user_rating(user, resource)
                .await
                .map_err(CliError::from)?;
            ctx.output.emit(
                &serde_json::json!({ "user_id": user, "resource_id": resource, "stars": stars }),
                || match stars {
                    Some(stars) => format!("User {user} rated resource {resource}: {stars}"),
                    None => format!("User {user} has not rated resource {resource}"),
                },
            )
        }
        RateCommand::Summary { resource } => {
            let summary = ratings
                .get_rating_summary(resource)
                .await
                .map_err(CliError::from)?;
            emit_summary(ctx, &summary)
        }
    }
}

fn emit_summary(ctx: &CliContext, summary: &RatingSummary) -> Result<()> {
    ctx.output
        .emit(summary, || format_rating_summary(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::submit;
    use crate::handlers::test_support::context;
    use crate::commands::SubmitArgs;
    use hub_core::ResourceKind;
    use hub_core::testing::FakeReader;

    async fn rated_context() -> (hub_db::TestDb, CliContext, i64) {
        let (db, ctx) = context(FakeReader::new()).await;
        submit::execute(
            &ctx,
            SubmitArgs {
                user: 1,
                name: "lint".to_string(),
                kind: ResourceKind::Task,
                owner: "someone".to_string(),
                repository: "tasks".to_string(),
                git_ref: "main".to_string(),
                path: "lint/lint.yaml".to_string(),
                readme_path: None,
                description: String::new(),
                tags: vec![],
                categories: vec![],
            },
        )
        .await
        .unwrap();
        let id = ctx.core().resources().resources_by_user(1).await.unwrap()[0].id;
        (db, ctx, id)
    }

    #[tokio::test]
    async fn test_add_update_and_stale_update() {
        let (_db, ctx, id) = rated_context().await;

        execute(&ctx, RateCommand::Add { user: 7, resource: id, stars: 4 })
            .await
            .unwrap();
        execute(
            &ctx,
            RateCommand::Update {
                user: 7,
                resource: id,
                stars: 5,
                previous: 4,
            },
        )
        .await
        .unwrap();

        let err = execute(
            &ctx,
            RateCommand::Update {
                user: 7,
                resource: id,
                stars: 3,
                previous: 4,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::Conflict(_))
        ));

        let summary = ctx.core().ratings().get_rating_summary(id).await.unwrap();
        assert!((summary.average - 5.0).abs() < 1e-9);
        execute(&ctx, RateCommand::Get { user: 7, resource: id })
            .await
            .unwrap();
        execute(&ctx, RateCommand::Summary { resource: id })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_out_of_range_stars() {
        let (_db, ctx, id) = rated_context().await;
        let err = execute(&ctx, RateCommand::Add { user: 7, resource: id, stars: 6 })
            .await
            .unwrap_err();
        assert_eq!(err.downcast_ref::<CliError>().unwrap().exit_code(), 65);
    }
}
