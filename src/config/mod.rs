//! Service configuration management for `liveboard.toml`.
//!
//! # Sections
//!
//! | Section    | Purpose                                             |
//! |------------|-----------------------------------------------------|
//! | `[panel]`  | Shared panel template (enabled, interval, content)  |
//! | `[web]`    | Control panel server (interface, port, credentials) |
//! | `[viewer]` | Viewer WebSocket server (port, max clients)         |
//!
//! `[panel]` is the persisted form of the template: the service rewrites it
//! after every successful control-plane mutation.

mod error;

pub use error::ConfigError;

use crate::{
    board::PanelTemplate,
    cli::{Cli, Commands},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::{IpAddr, Ipv4Addr},
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing liveboard.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Shared panel template
    #[serde(default)]
    pub panel: PanelTemplate,

    /// Control panel server settings
    #[serde(default)]
    pub web: WebConfig,

    /// Viewer WebSocket server settings
    #[serde(default)]
    pub viewer: ViewerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            panel: PanelTemplate::default(),
            web: WebConfig::default(),
            viewer: ViewerConfig::default(),
        }
    }
}

/// `[web]` section: control panel HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Interface to bind
    pub interface: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Panel login username
    pub username: String,
    /// Panel login password
    pub password: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            username: "admin".to_string(),
            password: "admin123".to_string(),
        }
    }
}

/// `[viewer]` section: viewer WebSocket server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Port to listen on
    pub port: u16,
    /// Capacity reported through the %max% placeholder
    pub max_clients: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            port: 8081,
            max_clients: 100,
        }
    }
}

impl Config {
    /// Load configuration from CLI arguments.
    ///
    /// For the Serve command the config file must exist; Init tolerates a
    /// missing file since it is about to create one.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let config_path = match &cli.command {
            Commands::Init { name: Some(name) } => cwd.join(name).join(&cli.config),
            _ => cwd.join(&cli.config),
        };

        if !cli.is_init() && !config_path.exists() {
            log!(
                "error";
                "Config file '{}' not found. Run 'liveboard init' to create one.",
                cli.config.display()
            );
            std::process::exit(1);
        }

        let mut config = if config_path.exists() && !cli.is_init() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };

        config.config_path = config_path;
        config.apply_command_options(cli);

        if !cli.is_init() {
            config.validate()?;
        }

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        if let Commands::Serve {
            interface,
            port,
            viewer_port,
            verbose,
        } = &cli.command
        {
            crate::logger::set_verbose(*verbose);
            Self::update_option(&mut self.web.interface, interface.as_ref());
            Self::update_option(&mut self.web.port, port.as_ref());
            Self::update_option(&mut self.viewer.port, viewer_port.as_ref());
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate loaded configuration.
    fn validate(&self) -> Result<()> {
        if self.web.port == self.viewer.port {
            return Err(ConfigError::Validation(format!(
                "web.port and viewer.port must differ (both are {})",
                self.web.port
            ))
            .into());
        }
        if self.panel.update_interval == 0 {
            return Err(
                ConfigError::Validation("panel.update_interval must be at least 1".into()).into(),
            );
        }
        if self.web.username.is_empty() {
            return Err(ConfigError::Validation("web.username must not be empty".into()).into());
        }
        Ok(())
    }

    /// Persist the config with the `[panel]` section replaced by `panel`.
    ///
    /// Called after every successful control-plane mutation so a restart
    /// picks up the latest template.
    pub fn save_with_panel(&self, panel: &PanelTemplate) -> Result<(), ConfigError> {
        let mut snapshot = self.clone();
        snapshot.panel = panel.clone();
        let content = toml::to_string_pretty(&snapshot)?;
        fs::write(&self.config_path, content)
            .map_err(|err| ConfigError::Write(self.config_path.clone(), err))
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("[panel\nenabled = true");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert!(config.panel.enabled);
        assert_eq!(config.panel.update_interval, 5);
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.web.username, "admin");
        assert_eq!(config.web.password, "admin123");
        assert_eq!(config.viewer.port, 8081);
        assert_eq!(config.viewer.max_clients, 100);
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[panel]\nenabled = true\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = Config::parse_with_ignored(content).unwrap();

        assert!(config.panel.enabled);
        assert!(!ignored.is_empty());
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let content = "[web]\nport = 9090";
        let (config, ignored) = Config::parse_with_ignored(content).unwrap();
        assert_eq!(config.web.port, 9090);
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_validate_rejects_port_collision() {
        let mut config = Config::default();
        config.config_path = PathBuf::from("liveboard.toml");
        config.web.port = 9000;
        config.viewer.port = 9000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = Config::default();
        config.panel.update_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_with_panel_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.config_path = dir.path().join("liveboard.toml");

        let mut panel = PanelTemplate::default();
        panel.update_interval = 12;
        panel.title_frames = vec!["&6Title".to_string()];
        config.save_with_panel(&panel).unwrap();

        let content = fs::read_to_string(&config.config_path).unwrap();
        let reloaded: Config = toml::from_str(&content).unwrap();
        assert_eq!(reloaded.panel.update_interval, 12);
        assert_eq!(reloaded.panel.title_frames, vec!["&6Title".to_string()]);
    }
}
