//! Per-client context reported by viewer clients.

use serde::{Deserialize, Serialize};

/// Snapshot of a single viewer's state, as reported in its hello message
/// and subsequent context updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientContext {
    /// Display name (also the client id)
    pub name: String,
    /// World / scene the client is in
    pub world: String,
    /// Health points, rendered truncated (19.7 -> 19)
    pub health: f64,
    /// Food level
    pub food: u32,
    /// Experience level
    pub level: u32,
    /// Position
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for ClientContext {
    fn default() -> Self {
        Self {
            name: String::new(),
            world: "world".to_string(),
            health: 20.0,
            food: 20,
            level: 0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}
