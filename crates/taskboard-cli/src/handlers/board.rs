use crate::cli::BoardAction;
use crate::context::CliContext;
use crate::output;
use taskboard_core::BoardError;
use taskboard_domain::DragState;

pub async fn handle(ctx: &mut CliContext, action: BoardAction) -> anyhow::Result<()> {
    match action {
        BoardAction::Show { project_id } => {
            let view = ctx
                .read(|store| {
                    store
                        .project(project_id)
                        .ok_or_else(|| BoardError::NotFound(format!("Project {}", project_id)))?;
                    serde_json::to_value(store.view(project_id, &DragState::idle()))
                        .map_err(|e| BoardError::Serialization(e.to_string()))
                })
                .await?;
            output::output_success(view);
        }
    }
    Ok(())
}
