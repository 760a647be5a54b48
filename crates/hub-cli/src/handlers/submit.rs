//! Submit command handler.

use anyhow::Result;
use hub_core::{GithubDetails, ResourceSubmission};

use crate::bootstrap::CliContext;
use crate::commands::SubmitArgs;
use crate::error::CliError;
use crate::presentation::format_resource_detail;

impl From<SubmitArgs> for ResourceSubmission {
    fn from(args: SubmitArgs) -> Self {
        Self {
            user_id: args.user,
            name: args.name,
            description: args.description,
            kind: args.kind,
            github: GithubDetails {
                owner: args.owner,
                repository: args.repository,
                git_ref: args.git_ref,
                path: args.path,
                readme_path: args.readme_path.unwrap_or_default(),
            },
            tags: args.tags,
            categories: args.categories,
        }
    }
}

/// Execute the submit command.
pub async fn execute(ctx: &CliContext, args: SubmitArgs) -> Result<()> {
    let resource = ctx
        .core()
        .resources()
        .submit_resource(args.into())
        .await
        .map_err(CliError::from)?;

    ctx.output
        .emit(&resource, || format_resource_detail(&resource))
}
