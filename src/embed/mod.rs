//! Embedded static resources.
//!
//! The control panel is two self-contained HTML pages compiled into the
//! binary, so the service ships as a single file.

/// Login page, served at `GET /`.
pub const LOGIN_HTML: &str = include_str!("assets/login.html");

/// Control panel page, served at `GET /panel`.
pub const PANEL_HTML: &str = include_str!("assets/panel.html");
