//! Actor Message Definitions
//!
//! Message types for inter-actor communication.
//!
//! ```text
//! web api --Refresh/Restart/Stop--> SchedulerActor --Push/Clear--> HubActor
//! viewer accept thread ----------------AddClient---------------------^
//! ```

use crate::board::DisplayState;

// =============================================================================
// SchedulerActor Messages
// =============================================================================

/// Messages to the animation scheduler
#[derive(Debug)]
pub enum SchedulerMsg {
    /// Out-of-cycle refresh of all displays (config was mutated).
    /// When the panel is disabled this clears displays instead.
    Refresh,
    /// Re-arm the tick interval (updateInterval changed)
    Restart { interval: u64 },
    /// Stop displaying: clear all displays, then ack synchronously
    Stop { ack: crossbeam::channel::Sender<()> },
    /// Shutdown
    Shutdown,
}

// =============================================================================
// HubActor Messages
// =============================================================================

/// Messages to the viewer hub
pub enum HubMsg {
    /// Add client from the accept thread
    AddClient(std::net::TcpStream),
    /// Push rendered displays, one per connected client
    Push(Vec<DisplayState>),
    /// Tell every client to show the neutral display
    Clear,
    /// Shutdown
    Shutdown,
}
