use crate::context::CliContext;
use crate::output;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub async fn handle(ctx: &mut CliContext, project_id: Uuid, watch: bool) -> anyhow::Result<()> {
    let reconciler = ctx.adapter.reconciler();
    if !watch {
        let report = reconciler.reconcile(project_id).await?;
        output::output_success(report);
        return Ok(());
    }

    let period = Duration::from_secs(ctx.config.effective_reconcile_interval_secs());
    tracing::info!(
        "Reconciling project {} every {}s",
        project_id,
        period.as_secs()
    );
    let handle = Arc::new(reconciler).spawn_periodic(project_id, period);
    tokio::signal::ctrl_c().await?;
    handle.abort();
    output::output_success(serde_json::json!({"watched": project_id.to_string()}));
    Ok(())
}
