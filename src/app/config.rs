use crate::app::models::Settings;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

const BASE_CONFIG: &str = include_str!("../../config/base.toml");

fn default_override_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("adoc_mirror").join("local.toml"))
}

/// Reads the local override table. A missing file is not an error.
fn load_override(path: &Path) -> Result<Option<Table>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {:?}", path))?;
    let table: Table = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config at {:?}", path))?;

    Ok(Some(table))
}

/// Tables merge key by key; any other value in `overlay` replaces the base one.
fn deep_merge(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match value {
            Value::Table(overlay_table) => {
                if let Some(Value::Table(base_table)) = base.get_mut(&key) {
                    deep_merge(base_table, overlay_table);
                    continue;
                }
                base.insert(key, Value::Table(overlay_table));
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}

fn settings_from(base: &str, overlay: Option<Table>) -> Result<Settings> {
    let mut merged: Table = toml::from_str(base).context("Failed to parse base config")?;
    if let Some(overlay) = overlay {
        deep_merge(&mut merged, overlay);
    }

    Value::Table(merged)
        .try_into::<Settings>()
        .context("Invalid rendering configuration")
}

/// Builds the run configuration: the built-in base, overridden by the local file if present.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Settings> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_override_path(),
    };

    let overlay = match &path {
        Some(path) => {
            let loaded = load_override(path)?;
            if loaded.is_none() {
                log::warn!(
                    "No local config at {}, using built-in defaults. It's a good idea to create one.",
                    path.display()
                );
            }
            loaded
        }
        None => {
            log::warn!("Could not determine home directory, using built-in defaults");
            None
        }
    };

    settings_from(BASE_CONFIG, overlay)
}
