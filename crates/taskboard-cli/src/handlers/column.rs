use crate::cli::ColumnAction;
use crate::context::CliContext;
use crate::output;
use taskboard_domain::{Column, ColumnUpdate};

pub async fn handle(ctx: &mut CliContext, action: ColumnAction) -> anyhow::Result<()> {
    match action {
        ColumnAction::Create {
            project_id,
            name,
            color,
        } => {
            let column = ctx
                .adapter
                .create_column(&ctx.capabilities, project_id, name, color)
                .await?;
            output::output_success(&column);
        }
        ColumnAction::List { project_id } => {
            let columns: Vec<Column> = ctx
                .read(|store| {
                    store
                        .project_columns(project_id)
                        .into_iter()
                        .cloned()
                        .collect()
                })
                .await;
            output::output_list(columns);
        }
        ColumnAction::Update { id, name, color } => {
            let updates = ColumnUpdate {
                name,
                color,
                position: None,
            };
            if updates.is_empty() {
                output::output_error("Nothing to update: pass --name or --color");
            }
            let column = ctx
                .adapter
                .update_column(&ctx.capabilities, id, updates)
                .await?;
            output::output_success(&column);
        }
        ColumnAction::Delete { id } => {
            ctx.adapter.delete_column(&ctx.capabilities, id).await?;
            output::output_success(serde_json::json!({"deleted": id.to_string()}));
        }
        ColumnAction::Move { id, over } => {
            let outcome = ctx
                .adapter
                .move_column(&ctx.capabilities, id, Some(over))
                .await;
            output::output_move(outcome);
        }
    }
    Ok(())
}
