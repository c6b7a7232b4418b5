//! WebSocket accept server for viewer clients.
//!
//! Accepted streams are sent to the hub actor via channel; all protocol
//! handling happens there.

use std::net::TcpListener;

use anyhow::Result;

use crate::actor::HubMsg;

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// Start the viewer accept server, sending new clients to the hub.
///
/// Returns the actually bound port (may differ from `base_port` after retry).
pub fn start_viewer_server(base_port: u16, hub_tx: tokio::sync::mpsc::Sender<HubMsg>) -> Result<u16> {
    let (listener, actual_port) = try_bind_port(base_port, MAX_PORT_RETRIES)?;
    listener.set_nonblocking(true)?;

    // Spawn acceptor thread
    std::thread::spawn(move || {
        loop {
            match listener.accept() {
                Ok((stream, addr)) => {
                    crate::debug!("viewer"; "client connected: {}", addr);

                    // Set blocking for the WebSocket handshake
                    let _ = stream.set_nonblocking(false);

                    let tx = hub_tx.clone();
                    if tx.blocking_send(HubMsg::AddClient(stream)).is_err() {
                        crate::log!("viewer"; "failed to send client to hub");
                        break;
                    }
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(std::time::Duration::from_millis(100));
                    continue;
                }
                Err(e) => {
                    crate::log!("viewer"; "accept error: {}", e);
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
        }
    });

    Ok(actual_port)
}

/// Try binding to port, retry with incremented port if in use
fn try_bind_port(base_port: u16, max_retries: u16) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(format!("0.0.0.0:{}", port)) {
            Ok(listener) => {
                if offset > 0 {
                    crate::log!("viewer"; "port {} in use, using {} instead", base_port, port);
                }
                let actual_port = listener.local_addr()?.port();
                return Ok((listener, actual_port));
            }
            Err(e) => {
                last_error = Some(e);
                continue;
            }
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind viewer server after {} attempts: {}",
        max_retries,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}
