use crate::cli::ProjectAction;
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &mut CliContext, action: ProjectAction) -> anyhow::Result<()> {
    match action {
        ProjectAction::Create { name, description } => {
            let project = ctx
                .adapter
                .create_project(
                    &ctx.capabilities,
                    name,
                    description,
                    &ctx.config.effective_default_columns(),
                )
                .await?;
            output::output_success(&project);
        }
        ProjectAction::List => {
            let projects = ctx.read(|store| store.projects().to_vec()).await;
            output::output_list(projects);
        }
    }
    Ok(())
}
