//! Viewer-facing WebSocket surface: connection roster, wire protocol,
//! accept server. The connection actor itself lives in `actor::hub`.

mod message;
mod roster;
pub mod server;

pub use message::{ClientMessage, ServerMessage};
pub use roster::Roster;
