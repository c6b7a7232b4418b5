//! Tracks which viewer clients are connected and their latest context.

use dashmap::DashMap;

use crate::render::ClientContext;

/// Concurrent map of connected clients, keyed by client name.
///
/// The hub reader thread writes, the scheduler reads a snapshot each tick.
#[derive(Debug, Default)]
pub struct Roster {
    clients: DashMap<String, ClientContext>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a client's context.
    pub fn add(&self, ctx: ClientContext) {
        self.clients.insert(ctx.name.clone(), ctx);
    }

    /// Update the context for `name`. The stored key wins over whatever name
    /// the update carries, so a rename mid-session cannot split a client.
    pub fn update(&self, name: &str, mut ctx: ClientContext) {
        ctx.name = name.to_string();
        self.clients.insert(name.to_string(), ctx);
    }

    pub fn remove(&self, name: &str) {
        self.clients.remove(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clients.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<ClientContext> {
        self.clients.get(name).map(|entry| entry.clone())
    }

    /// Point-in-time copy of all connected clients.
    pub fn snapshot(&self) -> Vec<(String, ClientContext)> {
        self.clients
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn clear(&self) {
        self.clients.clear();
    }
}
