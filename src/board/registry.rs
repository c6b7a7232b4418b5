//! Per-client rendered display registry.
//!
//! Each connected viewer has exactly one `DisplayState`. States are built
//! completely off-map and published with a single insert, so a concurrent
//! reader never observes a half-rendered display (last write wins).

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::render::{ClientContext, substitute};

use super::template::PanelTemplate;

/// Maximum rendered line length in characters, counted after substitution
/// and de-duplication padding, style codes included.
pub const MAX_LINE_LEN: usize = 40;

/// One rendered body line with its rank score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayLine {
    pub text: String,
    /// Inverse rank: the first template line gets the highest score
    pub score: i32,
}

/// The complete rendered panel for one client.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayState {
    pub client: String,
    pub title: String,
    pub lines: Vec<DisplayLine>,
    /// Monotonic render sequence number, shared across clients
    pub seq: u64,
}

pub struct DisplayRegistry {
    displays: DashMap<String, DisplayState>,
    seq: AtomicU64,
}

impl Default for DisplayRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayRegistry {
    pub fn new() -> Self {
        Self {
            displays: DashMap::new(),
            seq: AtomicU64::new(0),
        }
    }

    /// Render and publish the display for a single client.
    pub fn refresh_one(
        &self,
        client: &str,
        ctx: &ClientContext,
        template: &PanelTemplate,
        frame: &str,
        online: usize,
        max: u32,
    ) -> DisplayState {
        let state = self.render(client, ctx, template, frame, online, max);
        self.displays.insert(client.to_string(), state.clone());
        state
    }

    /// Render and publish displays for every client in `entries`.
    ///
    /// Registry entries whose client is no longer present are dropped, so a
    /// disconnect during the pass is tolerated.
    pub fn refresh_all(
        &self,
        entries: &[(String, ClientContext)],
        template: &PanelTemplate,
        frame: &str,
        max: u32,
    ) -> Vec<DisplayState> {
        let online = entries.len();
        let states: Vec<DisplayState> = entries
            .iter()
            .map(|(client, ctx)| {
                let state = self.render(client, ctx, template, frame, online, max);
                self.displays.insert(client.clone(), state.clone());
                state
            })
            .collect();

        self.displays
            .retain(|client, _| entries.iter().any(|(name, _)| name == client));

        states
    }

    /// Drop a client's display (viewer disconnected).
    pub fn unregister(&self, client: &str) {
        self.displays.remove(client);
    }

    /// Drop every display (panel disabled or service stopping).
    pub fn clear(&self) {
        self.displays.clear();
    }

    pub fn get(&self, client: &str) -> Option<DisplayState> {
        self.displays.get(client).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.displays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.displays.is_empty()
    }

    /// Build a display without publishing it.
    fn render(
        &self,
        client: &str,
        ctx: &ClientContext,
        template: &PanelTemplate,
        frame: &str,
        online: usize,
        max: u32,
    ) -> DisplayState {
        let title = truncate(substitute(frame, ctx, online, max));

        let count = template.lines.len();
        let mut seen = FxHashSet::default();
        let lines = template
            .lines
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                let mut text = substitute(raw, ctx, online, max);
                // Pad duplicates with trailing spaces until unique, then
                // truncate; truncation may reintroduce visually equal lines
                while seen.contains(&text) {
                    text.push(' ');
                }
                seen.insert(text.clone());
                DisplayLine {
                    text: truncate(text),
                    score: (count - i) as i32,
                }
            })
            .collect();

        DisplayState {
            client: client.to_string(),
            title,
            lines,
            seq: self.seq.fetch_add(1, Ordering::SeqCst),
        }
    }
}

fn truncate(text: String) -> String {
    if text.chars().count() > MAX_LINE_LEN {
        text.chars().take(MAX_LINE_LEN).collect()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template_with_lines(lines: &[&str]) -> PanelTemplate {
        let mut template = PanelTemplate::default();
        template.title_frames = vec!["&6Title".to_string()];
        template.lines = lines.iter().map(|s| s.to_string()).collect();
        template
    }

    fn ctx(name: &str) -> ClientContext {
        ClientContext {
            name: name.to_string(),
            ..ClientContext::default()
        }
    }

    #[test]
    fn test_refresh_one_publishes() {
        let registry = DisplayRegistry::new();
        let template = template_with_lines(&["&7Hi %player%"]);

        let state = registry.refresh_one("Steve", &ctx("Steve"), &template, "&6T", 1, 10);
        assert_eq!(state.lines[0].text, "&7Hi Steve");
        assert_eq!(registry.get("Steve").unwrap().lines[0].text, "&7Hi Steve");
    }

    #[test]
    fn test_duplicate_lines_padded_unique() {
        let registry = DisplayRegistry::new();
        let template = template_with_lines(&["", "", ""]);

        let state = registry.refresh_one("A", &ctx("A"), &template, "t", 1, 10);
        assert_eq!(state.lines[0].text, "");
        assert_eq!(state.lines[1].text, " ");
        assert_eq!(state.lines[2].text, "  ");
    }

    #[test]
    fn test_scores_inverse_order() {
        let registry = DisplayRegistry::new();
        let template = template_with_lines(&["first", "second", "third"]);

        let state = registry.refresh_one("A", &ctx("A"), &template, "t", 1, 10);
        assert_eq!(state.lines[0].score, 3);
        assert_eq!(state.lines[1].score, 2);
        assert_eq!(state.lines[2].score, 1);
    }

    #[test]
    fn test_long_line_truncated_to_limit() {
        let registry = DisplayRegistry::new();
        let long = "x".repeat(60);
        let template = template_with_lines(&[&long]);

        let state = registry.refresh_one("A", &ctx("A"), &template, "t", 1, 10);
        assert_eq!(state.lines[0].text.chars().count(), MAX_LINE_LEN);
    }

    #[test]
    fn test_dedup_before_truncation() {
        // Two identical 40-char lines: padding happens first, so after
        // truncation both collapse back to the same visible text
        let registry = DisplayRegistry::new();
        let line = "y".repeat(MAX_LINE_LEN);
        let template = template_with_lines(&[&line, &line]);

        let state = registry.refresh_one("A", &ctx("A"), &template, "t", 1, 10);
        assert_eq!(state.lines[0].text, state.lines[1].text);
        assert_eq!(state.lines[1].text.chars().count(), MAX_LINE_LEN);
    }

    #[test]
    fn test_refresh_all_drops_absent_clients() {
        let registry = DisplayRegistry::new();
        let template = template_with_lines(&["line"]);

        registry.refresh_one("gone", &ctx("gone"), &template, "t", 1, 10);
        let entries = vec![("here".to_string(), ctx("here"))];
        registry.refresh_all(&entries, &template, "t", 10);

        assert!(registry.get("gone").is_none());
        assert!(registry.get("here").is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_refresh_all_online_count() {
        let registry = DisplayRegistry::new();
        let template = template_with_lines(&["&7Online: %online%/%max%"]);

        let entries = vec![
            ("a".to_string(), ctx("a")),
            ("b".to_string(), ctx("b")),
        ];
        let states = registry.refresh_all(&entries, &template, "t", 50);
        assert_eq!(states[0].lines[0].text, "&7Online: 2/50");
    }

    #[test]
    fn test_seq_monotonic() {
        let registry = DisplayRegistry::new();
        let template = template_with_lines(&["line"]);

        let first = registry.refresh_one("A", &ctx("A"), &template, "t", 1, 10);
        let second = registry.refresh_one("A", &ctx("A"), &template, "t", 1, 10);
        assert!(second.seq > first.seq);
    }

    #[test]
    fn test_clear() {
        let registry = DisplayRegistry::new();
        let template = template_with_lines(&["line"]);
        registry.refresh_one("A", &ctx("A"), &template, "t", 1, 10);

        registry.clear();
        assert!(registry.is_empty());
    }
}
