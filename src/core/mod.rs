//! Core process state and shared service handles.

mod app;
mod state;

pub use app::App;
pub use state::{is_serving, is_shutdown, register_server, set_serving, setup_shutdown_handler};
