//! Actor System for the Panel Runtime
//!
//! Message-passing concurrency for serve mode:
//!
//! ```text
//! SchedulerActor --> HubActor
//!    (ticks)       (ws push)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `scheduler` - Animation tick loop
//! - `hub` - Viewer WebSocket connections
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod hub;
pub mod messages;
pub mod scheduler;

pub use coordinator::Coordinator;
pub use messages::{HubMsg, SchedulerMsg};
pub use scheduler::SchedulerHandle;
