use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A column seeded into every new project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultColumn {
    pub name: String,
    pub color: String,
}

impl DefaultColumn {
    fn new(name: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Role used to derive capabilities when none is given on the command line.
    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub default_columns: Option<Vec<DefaultColumn>>,

    /// Seconds between background reconciliation passes.
    #[serde(default)]
    pub reconcile_interval_secs: Option<u64>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/taskboard/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("taskboard/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("taskboard\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from an explicit path, falling back to defaults when the file is
    /// missing or malformed.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn effective_role(&self) -> &str {
        self.role.as_deref().unwrap_or("owner")
    }

    pub fn effective_default_columns(&self) -> Vec<DefaultColumn> {
        match &self.default_columns {
            Some(columns) if !columns.is_empty() => columns.clone(),
            _ => vec![
                DefaultColumn::new("To Do", "#6b7280"),
                DefaultColumn::new("In Progress", "#3b82f6"),
                DefaultColumn::new("Done", "#10b981"),
            ],
        }
    }

    pub fn effective_reconcile_interval_secs(&self) -> u64 {
        self.reconcile_interval_secs.unwrap_or(30).max(1)
    }
}
