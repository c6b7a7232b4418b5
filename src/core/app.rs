//! Shared service handle passed to request handlers and actors.

use std::sync::Arc;

use crate::actor::SchedulerHandle;
use crate::board::{DisplayRegistry, TemplateStore};
use crate::config::Config;
use crate::viewer::Roster;
use crate::web::SessionStore;

/// Bundle of the long-lived services every control-plane handler needs.
///
/// Cheap to clone: everything inside is an `Arc` or a channel handle.
#[derive(Clone)]
pub struct App {
    /// Immutable base configuration ([web]/[viewer] sections, config path)
    pub config: Arc<Config>,
    /// Atomic template snapshot + frame cursor
    pub store: Arc<TemplateStore>,
    /// Per-client rendered displays
    pub registry: Arc<DisplayRegistry>,
    /// Connected viewer contexts
    pub roster: Arc<Roster>,
    /// Web panel sessions
    pub sessions: Arc<SessionStore>,
    /// Channel into the animation scheduler
    pub scheduler: SchedulerHandle,
}

impl App {
    pub fn new(
        config: Arc<Config>,
        store: Arc<TemplateStore>,
        registry: Arc<DisplayRegistry>,
        roster: Arc<Roster>,
        sessions: Arc<SessionStore>,
        scheduler: SchedulerHandle,
    ) -> Self {
        Self {
            config,
            store,
            registry,
            roster,
            sessions,
            scheduler,
        }
    }
}
