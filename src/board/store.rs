//! Atomic template store with the animation frame cursor.
//!
//! Readers take a cheap `Arc` snapshot; writers publish a full replacement.
//! A reader that loads right after a `set` sees the new template (arc-swap
//! gives read-your-writes on a single store).

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use arc_swap::ArcSwap;

use super::template::PanelTemplate;

pub struct TemplateStore {
    template: ArcSwap<PanelTemplate>,
    /// Raw frame counter, reduced modulo frame count at read time
    cursor: AtomicUsize,
}

impl TemplateStore {
    /// Create a store from the loaded config template (normalized).
    pub fn new(template: PanelTemplate) -> Self {
        Self {
            template: ArcSwap::from_pointee(template.normalized()),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Current template snapshot.
    pub fn snapshot(&self) -> Arc<PanelTemplate> {
        self.template.load_full()
    }

    /// Replace the template and restart the title animation.
    ///
    /// A write that carries a frame list resets the cursor, even when the
    /// new frames equal the old ones.
    pub fn set(&self, template: PanelTemplate) {
        self.template.store(Arc::new(template.normalized()));
        self.cursor.store(0, Ordering::SeqCst);
    }

    /// Replace the template without touching the animation cursor, for
    /// writes that did not carry a frame list.
    pub fn set_keep_cursor(&self, template: PanelTemplate) {
        self.template.store(Arc::new(template.normalized()));
    }

    /// Current frame index into the snapshot's `title_frames`.
    pub fn frame_index(&self) -> usize {
        let frames = self.template.load().title_frames.len();
        self.cursor.load(Ordering::SeqCst) % frames.max(1)
    }

    /// Current title frame text.
    pub fn current_frame(&self) -> String {
        let template = self.template.load();
        let index = self.cursor.load(Ordering::SeqCst) % template.title_frames.len().max(1);
        template
            .title_frames
            .get(index)
            .cloned()
            .unwrap_or_default()
    }

    /// Step the animation cursor forward one frame.
    pub fn advance_cursor(&self) {
        self.cursor.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_frames(frames: &[&str]) -> TemplateStore {
        let mut template = PanelTemplate::default();
        template.title_frames = frames.iter().map(|s| s.to_string()).collect();
        TemplateStore::new(template)
    }

    #[test]
    fn test_new_normalizes() {
        let store = TemplateStore::new(PanelTemplate::default());
        let snapshot = store.snapshot();
        assert!(!snapshot.title_frames.is_empty());
        assert!(!snapshot.lines.is_empty());
    }

    #[test]
    fn test_cursor_wraps() {
        let store = store_with_frames(&["a", "b", "c"]);
        assert_eq!(store.current_frame(), "a");

        store.advance_cursor();
        assert_eq!(store.current_frame(), "b");

        store.advance_cursor();
        store.advance_cursor();
        assert_eq!(store.current_frame(), "a");
    }

    #[test]
    fn test_set_new_frames_resets_cursor() {
        let store = store_with_frames(&["a", "b"]);
        store.advance_cursor();
        assert_eq!(store.frame_index(), 1);

        let mut template = store.snapshot().as_ref().clone();
        template.title_frames = vec!["x".to_string(), "y".to_string(), "z".to_string()];
        store.set(template);

        assert_eq!(store.frame_index(), 0);
        assert_eq!(store.current_frame(), "x");
    }

    #[test]
    fn test_set_resets_cursor_even_with_same_frames() {
        let store = store_with_frames(&["a", "b"]);
        store.advance_cursor();
        assert_eq!(store.frame_index(), 1);

        store.set(store.snapshot().as_ref().clone());
        assert_eq!(store.frame_index(), 0);
    }

    #[test]
    fn test_set_keep_cursor() {
        let store = store_with_frames(&["a", "b"]);
        store.advance_cursor();

        let mut template = store.snapshot().as_ref().clone();
        template.update_interval = 9;
        store.set_keep_cursor(template);

        assert_eq!(store.frame_index(), 1);
        assert_eq!(store.snapshot().update_interval, 9);
    }

    #[test]
    fn test_read_your_writes() {
        let store = store_with_frames(&["a"]);
        let mut template = store.snapshot().as_ref().clone();
        template.lines = vec!["fresh".to_string()];
        store.set(template);

        assert_eq!(store.snapshot().lines, vec!["fresh".to_string()]);
    }
}
