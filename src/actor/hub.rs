//! Viewer Hub Actor - Bidirectional Communication
//!
//! This actor is responsible for:
//! - Managing viewer WebSocket connections
//! - Pushing each client its own rendered display
//! - Receiving client messages (hello handshake, context updates)
//!
//! # Architecture
//!
//! ```text
//! SchedulerActor --[Push/Clear]--> HubActor --[display]--> Clients
//!                                     ^                       |
//!                                     +-----[hello/context]---+
//! ```

use std::net::TcpStream;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::messages::HubMsg;
use crate::board::{DisplayRegistry, TemplateStore};
use crate::viewer::{ClientMessage, Roster, ServerMessage};

/// A connected viewer socket. `name` stays None until the hello arrives.
struct ViewerClient {
    ws: WebSocket<TcpStream>,
    name: Option<String>,
}

/// Shared pieces the reader thread needs alongside the client list.
struct HubShared {
    clients: Mutex<Vec<ViewerClient>>,
    roster: Arc<Roster>,
    registry: Arc<DisplayRegistry>,
    store: Arc<TemplateStore>,
    max_clients: u32,
}

/// Hub Actor - manages viewer connections
pub struct HubActor {
    /// Channel to receive messages
    rx: mpsc::Receiver<HubMsg>,
    shared: Arc<HubShared>,
}

impl HubActor {
    pub fn new(
        rx: mpsc::Receiver<HubMsg>,
        roster: Arc<Roster>,
        registry: Arc<DisplayRegistry>,
        store: Arc<TemplateStore>,
        max_clients: u32,
    ) -> Self {
        Self {
            rx,
            shared: Arc::new(HubShared {
                clients: Mutex::new(Vec::new()),
                roster,
                registry,
                store,
                max_clients,
            }),
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        // Spawn a background thread to poll client messages
        let shared = Arc::clone(&self.shared);
        std::thread::spawn(move || {
            Self::client_reader_loop(&shared);
        });

        while let Some(msg) = self.rx.recv().await {
            match msg {
                HubMsg::AddClient(stream) => {
                    self.add_client(stream);
                }

                HubMsg::Push(states) => {
                    self.push_displays(&states);
                }

                HubMsg::Clear => {
                    self.broadcast(Message::Text(ServerMessage::clear().to_json().into()));
                }

                HubMsg::Shutdown => {
                    crate::debug!("hub"; "shutting down");
                    let mut clients = self.shared.clients.lock();
                    for mut client in clients.drain(..) {
                        let _ = client.ws.close(None);
                    }
                    self.shared.roster.clear();
                    self.shared.registry.clear();
                    break;
                }
            }
        }
    }

    /// Add a new client connection
    fn add_client(&self, stream: TcpStream) {
        // Keep blocking mode during handshake, switch to non-blocking after
        match tungstenite::accept(stream) {
            Ok(mut ws) => {
                let mut clients = self.shared.clients.lock();
                if clients.len() >= self.shared.max_clients as usize {
                    crate::log!("hub"; "rejecting client: at capacity ({})", self.shared.max_clients);
                    let _ = ws.close(None);
                    return;
                }

                // Now set non-blocking for polling reads
                let _ = ws.get_ref().set_nonblocking(true);

                crate::debug!("hub"; "client connected (total: {})", clients.len() + 1);
                clients.push(ViewerClient { ws, name: None });
            }
            Err(e) => {
                crate::log!("hub"; "handshake failed: {}", e);
            }
        }
    }

    /// Send each registered client its own display.
    fn push_displays(&self, states: &[crate::board::DisplayState]) {
        let mut clients = self.shared.clients.lock();
        let mut sent = 0;

        clients.retain_mut(|client| {
            let Some(ref name) = client.name else {
                // Not registered yet, nothing to push
                return true;
            };
            let Some(state) = states.iter().find(|s| &s.client == name) else {
                return true;
            };

            let msg = Message::Text(ServerMessage::display(state).to_json().into());
            match client.ws.send(msg) {
                Ok(_) => {
                    sent += 1;
                    true
                }
                Err(e) => {
                    crate::debug!("hub"; "client disconnected: {}", e);
                    self.shared.roster.remove(name);
                    self.shared.registry.unregister(name);
                    false
                }
            }
        });

        if sent > 0 {
            crate::debug!("hub"; "pushed {} displays", sent);
        }
    }

    /// Broadcast a message to all connected clients
    fn broadcast(&self, msg: Message) {
        let mut clients = self.shared.clients.lock();

        clients.retain_mut(|client| match client.ws.send(msg.clone()) {
            Ok(_) => true,
            Err(e) => {
                crate::debug!("hub"; "client disconnected: {}", e);
                if let Some(ref name) = client.name {
                    self.shared.roster.remove(name);
                    self.shared.registry.unregister(name);
                }
                false
            }
        });
    }

    /// Background thread to read client messages (non-blocking poll)
    fn client_reader_loop(shared: &HubShared) {
        loop {
            std::thread::sleep(std::time::Duration::from_millis(100));

            let mut clients = shared.clients.lock();
            let mut disconnected = Vec::new();

            for (i, client) in clients.iter_mut().enumerate() {
                // Non-blocking read
                match client.ws.read() {
                    Ok(Message::Text(text)) => {
                        if !Self::handle_client_text(shared, client, &text) {
                            disconnected.push(i);
                        }
                    }
                    Ok(Message::Close(_)) => {
                        disconnected.push(i);
                    }
                    Err(tungstenite::Error::Io(ref e))
                        if e.kind() == std::io::ErrorKind::WouldBlock =>
                    {
                        // No data available, continue
                    }
                    Err(_) => {
                        disconnected.push(i);
                    }
                    _ => {}
                }
            }

            // Remove disconnected clients and evict their state
            for i in disconnected.into_iter().rev() {
                if let Some(ref name) = clients[i].name {
                    crate::debug!("hub"; "client left: {}", name);
                    shared.roster.remove(name);
                    shared.registry.unregister(name);
                }
                let _ = clients[i].ws.close(None);
                clients.remove(i);
            }
        }
    }

    /// Handle one text frame from a client. Returns false to disconnect.
    fn handle_client_text(shared: &HubShared, client: &mut ViewerClient, text: &str) -> bool {
        let Some(name) = client.name.clone() else {
            // Unregistered: the first message must be a valid hello
            return match ClientMessage::parse(text) {
                Some(ClientMessage::Hello(ctx)) if !ctx.name.is_empty() => {
                    crate::debug!("hub"; "client joined: {}", ctx.name);
                    client.name = Some(ctx.name.clone());
                    shared.roster.add(ctx.clone());
                    Self::send_initial_display(shared, client, &ctx)
                }
                _ => {
                    crate::log!("hub"; "dropping client: expected hello, got {:?}",
                        text.chars().take(40).collect::<String>());
                    false
                }
            };
        };

        match ClientMessage::parse(text) {
            // A second hello behaves like a context update
            Some(ClientMessage::Hello(ctx)) | Some(ClientMessage::Context(ctx)) => {
                shared.roster.update(&name, ctx);
                true
            }
            // Unparseable frames after registration are ignored
            None => true,
        }
    }

    /// Render and push a display immediately on registration, so a new
    /// client does not wait for the next tick.
    fn send_initial_display(
        shared: &HubShared,
        client: &mut ViewerClient,
        ctx: &crate::render::ClientContext,
    ) -> bool {
        let template = shared.store.snapshot();
        if !template.enabled {
            return true;
        }

        let frame = shared.store.current_frame();
        let state = shared.registry.refresh_one(
            &ctx.name,
            ctx,
            &template,
            &frame,
            shared.roster.len(),
            shared.max_clients,
        );

        let msg = Message::Text(ServerMessage::display(&state).to_json().into());
        if let Err(e) = client.ws.send(msg) {
            crate::debug!("hub"; "failed to send initial display: {}", e);
            shared.roster.remove(&ctx.name);
            shared.registry.unregister(&ctx.name);
            return false;
        }
        true
    }
}
