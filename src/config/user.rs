use std::path::PathBuf;

/// Per-user config file, e.g. `~/.config/kmpgen/config.toml` on Linux.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("kmpgen").join("config.toml"))
}
