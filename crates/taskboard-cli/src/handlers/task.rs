use crate::cli::{TaskAction, TaskMoveArgs, TaskUpdateArgs};
use crate::context::CliContext;
use crate::output;
use taskboard_domain::{DropTarget, FieldUpdate, ReorderPlan, Task, TaskUpdate};
use taskboard_sync::{MoveOutcome, NewTask};

pub async fn handle(ctx: &mut CliContext, action: TaskAction) -> anyhow::Result<()> {
    match action {
        TaskAction::Create {
            project_id,
            column_id,
            title,
            description,
            priority,
            due_date,
        } => {
            let new_task = NewTask {
                title,
                description,
                priority,
                due_date,
            };
            let task = ctx
                .adapter
                .create_task(&ctx.capabilities, project_id, column_id, new_task)
                .await?;
            output::output_success(&task);
        }
        TaskAction::List {
            project_id,
            column_id,
        } => {
            let tasks: Vec<Task> = ctx
                .read(|store| match column_id {
                    Some(column_id) => store
                        .column_tasks(column_id)
                        .into_iter()
                        .filter(|t| t.project_id == project_id)
                        .cloned()
                        .collect(),
                    // Board order: column by column, then tasks without a column.
                    None => store
                        .project_columns(project_id)
                        .into_iter()
                        .flat_map(|c| store.column_tasks(c.id))
                        .chain(
                            store
                                .project_tasks(project_id)
                                .into_iter()
                                .filter(|t| t.column_id.is_none()),
                        )
                        .cloned()
                        .collect(),
                })
                .await;
            output::output_list(tasks);
        }
        TaskAction::Update(args) => {
            let task = handle_update(ctx, args).await?;
            output::output_success(&task);
        }
        TaskAction::Delete { id } => {
            ctx.adapter.delete_task(&ctx.capabilities, id).await?;
            output::output_success(serde_json::json!({"deleted": id.to_string()}));
        }
        TaskAction::Move(args) => handle_move(ctx, args).await,
        TaskAction::Reorder { column_id, ids } => {
            let outcome = ctx
                .adapter
                .reorder_tasks(&ctx.capabilities, column_id, ids)
                .await;
            output::output_move(outcome);
        }
    }
    Ok(())
}

fn field<T>(value: Option<T>, clear: bool) -> FieldUpdate<T> {
    match value {
        _ if clear => FieldUpdate::Clear,
        Some(value) => FieldUpdate::Set(value),
        None => FieldUpdate::NoChange,
    }
}

async fn handle_update(ctx: &mut CliContext, args: TaskUpdateArgs) -> anyhow::Result<Task> {
    let updates = TaskUpdate {
        title: args.title,
        description: field(args.description, args.clear_description),
        status: args.status,
        priority: args.priority,
        due_date: field(args.due_date, args.clear_due_date),
    };
    let task = ctx
        .adapter
        .update_task(&ctx.capabilities, args.id, updates)
        .await?;
    Ok(task)
}

async fn handle_move(ctx: &mut CliContext, args: TaskMoveArgs) {
    let target = args
        .onto_task
        .map(DropTarget::Task)
        .or(args.onto_column.map(DropTarget::Column));
    let project_id = ctx
        .read(|store| store.task(args.id).map(|t| t.project_id))
        .await;

    let outcome = match project_id {
        Some(project_id) => {
            ctx.adapter
                .move_task(&ctx.capabilities, project_id, args.id, target)
                .await
        }
        None => {
            tracing::debug!("Ignoring move of unknown task {}", args.id);
            MoveOutcome::<ReorderPlan>::NoOp
        }
    };
    output::output_move(outcome);
}
