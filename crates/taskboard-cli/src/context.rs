use std::str::FromStr;
use std::sync::Arc;
use taskboard_core::{AppConfig, BoardResult};
use taskboard_domain::{BoardStore, Capabilities, Role};
use taskboard_sync::{BatchPersistenceAdapter, JsonFileRemote, Remotes, TracingNotifier};

/// Everything a handler needs: the adapter over the board file, the caller's
/// capabilities and the loaded configuration.
pub struct CliContext {
    pub adapter: BatchPersistenceAdapter,
    pub capabilities: Capabilities,
    pub config: AppConfig,
}

impl CliContext {
    pub async fn load(file_path: &str, role: Option<Role>) -> BoardResult<Self> {
        let config = AppConfig::load();
        let role = match role {
            Some(role) => role,
            None => Role::from_str(config.effective_role())?,
        };
        tracing::debug!("Acting as {:?} on {}", role, file_path);

        let remote = Arc::new(JsonFileRemote::new(file_path));
        let store = BoardStore::from_snapshot(remote.load_snapshot().await?);
        let adapter =
            BatchPersistenceAdapter::new(store, Remotes::shared(remote), Arc::new(TracingNotifier));

        Ok(Self {
            adapter,
            capabilities: Capabilities::for_role(role),
            config,
        })
    }

    /// Run `f` against the current rows.
    pub async fn read<T>(&self, f: impl FnOnce(&BoardStore) -> T) -> T {
        let state = self.adapter.state();
        let store = state.read().await;
        f(&store)
    }
}
