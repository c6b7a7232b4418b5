//! The shared panel template.

use serde::{Deserialize, Serialize};

/// Fallback title frame used when the template has none.
pub const DEFAULT_TITLE: &str = "&6&lLiveBoard";

/// Fallback line set used when the template has none.
pub const DEFAULT_LINES: &[&str] = &[
    "&7Welcome &e%player%",
    "&7Online: &a%online%&7/&a%max%",
    "&7World: &a%world%",
];

/// The single template shared by all connected viewers.
///
/// Persisted as the `[panel]` section of liveboard.toml and edited through
/// the web control panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelTemplate {
    /// Whether displays are shown at all
    pub enabled: bool,
    /// Ticks between animation steps (1 tick = 50 ms)
    pub update_interval: u64,
    /// Title animation frames, cycled one per tick
    pub title_frames: Vec<String>,
    /// Body lines, first line ranks highest
    pub lines: Vec<String>,
}

impl Default for PanelTemplate {
    fn default() -> Self {
        Self {
            enabled: true,
            update_interval: 5,
            title_frames: Vec::new(),
            lines: Vec::new(),
        }
    }
}

impl PanelTemplate {
    /// Copy with fallback content filled in for empty frame/line lists.
    ///
    /// The store normalizes on every set, so snapshots taken from it always
    /// have at least one frame and one line.
    pub fn normalized(&self) -> Self {
        let mut template = self.clone();
        if template.title_frames.is_empty() {
            template.title_frames = vec![DEFAULT_TITLE.to_string()];
        }
        if template.lines.is_empty() {
            template.lines = DEFAULT_LINES.iter().map(|s| s.to_string()).collect();
        }
        template
    }
}
