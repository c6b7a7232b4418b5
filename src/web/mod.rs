//! Web control plane: embedded panel pages plus the JSON API.

pub mod api;
mod response;
mod session;

pub use session::SessionStore;

use crate::{
    config::Config,
    core::{App, register_server},
    debug, log,
};
use anyhow::Result;
use crossbeam::channel::{self, Receiver};
use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tiny_http::{Method, Request, Server};

use crate::actor::Coordinator;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    shutdown_rx: Receiver<()>,
}

/// Bind the HTTP server without starting the request loop.
pub fn bind_server(config: &Config) -> Result<BoundServer> {
    let (server, addr) = bind_with_retry(config.web.interface, config.web.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    register_server(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{}", addr);

    Ok(BoundServer {
        server,
        addr,
        shutdown_rx,
    })
}

impl BoundServer {
    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the actor system and the request loop (blocking).
    pub fn run(self, app: App, coordinator: Coordinator) -> Result<()> {
        let actor_handle = spawn_actors(coordinator, self.shutdown_rx);
        crate::core::set_serving();
        run_request_loop(&self.server, app);
        wait_for_shutdown(actor_handle);
        Ok(())
    }
}

/// Bind to the specified interface and port, with automatic port retry.
fn bind_with_retry(interface: std::net::IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < MAX_PORT_RETRIES => continue,
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to bind after {} attempts (ports {}-{}): {}",
                    MAX_PORT_RETRIES,
                    base_port,
                    port,
                    e
                ));
            }
        }
    }
    unreachable!()
}

/// Spawn the actor system on its own runtime thread.
fn spawn_actors(coordinator: Coordinator, shutdown_rx: Receiver<()>) -> JoinHandle<()> {
    thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime");

        rt.block_on(async {
            let coordinator = coordinator.with_shutdown_signal(shutdown_rx);
            if let Err(e) = coordinator.run().await {
                log!("actor"; "error: {}", e);
            }
        });
    })
}

/// Wait for actor system to shutdown gracefully (max 2 seconds).
fn wait_for_shutdown(handle: JoinHandle<()>) {
    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(std::time::Duration::from_millis(50));
    }
}

fn run_request_loop(server: &Server, app: App) {
    // Use thread pool to handle requests concurrently
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .expect("failed to create thread pool");

    for request in server.incoming_requests() {
        let app = app.clone();
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &app) {
                log!("serve"; "request error: {e}");
            }
        });
    }
}

/// Handle a single HTTP request
fn handle_request(mut request: Request, app: &App) -> Result<()> {
    // Early exit if shutdown requested
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    let method = request.method().clone();
    let url = request.url().to_string();
    debug!("web"; "{} {}", method, url);

    // CORS preflight for any path
    if method == Method::Options {
        return response::respond_preflight(request);
    }

    let token = auth_token(&request);

    match (method, url.as_str()) {
        (Method::Get, "/") => response::send_html(request, crate::embed::LOGIN_HTML),
        (Method::Get, "/panel") => response::send_html(request, crate::embed::PANEL_HTML),

        (Method::Post, "/api/login") => {
            let body = read_body(&mut request)?;
            respond_api(request, api::login(app, &body))
        }
        (Method::Post, "/api/logout") => respond_api(request, api::logout(app, token.as_deref())),
        (Method::Get, "/api/verify") => respond_api(request, api::verify(app, token.as_deref())),

        (Method::Get, "/api/config") => {
            respond_api(request, api::get_config(app, token.as_deref()))
        }
        (Method::Post, "/api/config") => {
            let body = read_body(&mut request)?;
            respond_api(request, api::update_config(app, token.as_deref(), &body))
        }

        (Method::Get, "/api/templates") => {
            respond_api(request, api::list_templates(app, token.as_deref()))
        }
        (Method::Post, "/api/templates/apply") => {
            let body = read_body(&mut request)?;
            respond_api(request, api::apply_preset(app, token.as_deref(), &body))
        }

        _ => response::respond_not_found(request),
    }
}

/// Extract the session token from the Authorization header.
fn auth_token(request: &Request) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case("authorization"))
        .map(|h| h.value.to_string())
}

fn read_body(request: &mut Request) -> Result<String> {
    let mut body = String::new();
    request.as_reader().read_to_string(&mut body)?;
    Ok(body)
}

/// Map a handler result onto an HTTP response.
fn respond_api(request: Request, result: Result<serde_json::Value, api::ApiError>) -> Result<()> {
    match result {
        Ok(value) => response::send_json(request, 200, &value),
        Err(e) => response::send_json(request, e.status(), &e.body()),
    }
}
