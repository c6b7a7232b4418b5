//! Project initialization.
//!
//! Writes a default `liveboard.toml` into the target directory.

use crate::{config::Config, log};
use anyhow::{Result, bail};
use std::path::Path;

/// Create a default config file in the target directory.
///
/// Refuses to overwrite an existing config.
pub fn init_project(target: &Path, config_name: &Path) -> Result<()> {
    let config_path = target.join(config_name);
    if config_path.exists() {
        bail!("config file '{}' already exists", config_path.display());
    }

    std::fs::create_dir_all(target)?;
    std::fs::write(&config_path, generate_config_template())?;

    log!("init"; "wrote {}", config_path.display());
    Ok(())
}

/// Render the default config as commented TOML.
pub fn generate_config_template() -> String {
    let config = Config::default();
    let body = toml::to_string_pretty(&config).unwrap_or_default();
    format!(
        "# liveboard configuration\n\
         # [panel] is rewritten by the service when edited through the web panel.\n\
         {body}"
    )
}
