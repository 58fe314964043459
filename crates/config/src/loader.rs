use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::BoxpanelConfig, template::default_config_template};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "boxpanel.toml",
    "boxpanel.yaml",
    "boxpanel.yml",
    "boxpanel.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<BoxpanelConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./boxpanel.{toml,yaml,yml,json}`
/// 2. `~/.config/boxpanel/boxpanel.{toml,yaml,yml,json}`
///
/// Returns `BoxpanelConfig::default()` if no config file is found or the one
/// found cannot be loaded.
pub fn discover_and_load() -> BoxpanelConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    BoxpanelConfig::default()
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    if let Some(p) = find_in_dir(Path::new(".")) {
        return Some(p);
    }
    config_dir().and_then(|dir| find_in_dir(&dir))
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/boxpanel/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "boxpanel").map(|d| d.config_dir().to_path_buf())
}

/// Returns the path of an existing config file, or the default TOML path.
pub fn find_or_default_config_path() -> PathBuf {
    if let Some(path) = find_config_file() {
        return path;
    }
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("boxpanel.toml")
}

/// Write the documented default config to `path`.
///
/// Refuses to overwrite an existing file unless `force` is set. Creates parent
/// directories if needed.
pub fn write_default_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (pass --force to overwrite)",
            path.display()
        );
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, default_config_template())?;
    debug!(path = %path.display(), "wrote default config");
    Ok(())
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<BoxpanelConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
