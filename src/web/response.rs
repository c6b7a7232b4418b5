//! HTTP response helpers.
//!
//! Every response carries permissive CORS headers so the panel pages can be
//! served from anywhere during development.

use anyhow::Result;
use tiny_http::{Header, Request, Response, StatusCode};

pub const HTML: &str = "text/html; charset=utf-8";
pub const JSON: &str = "application/json";
const PLAIN: &str = "text/plain; charset=utf-8";

/// Respond with a JSON value.
pub fn send_json(request: Request, status: u16, value: &serde_json::Value) -> Result<()> {
    let body = serde_json::to_vec(value)?;
    send_body(request, status, JSON, body)
}

/// Respond with an embedded HTML page.
pub fn send_html(request: Request, body: &'static str) -> Result<()> {
    send_body(request, 200, HTML, body.as_bytes().to_vec())
}

/// Short-circuit response for CORS preflight requests.
pub fn respond_preflight(request: Request) -> Result<()> {
    let response = with_cors(Response::empty(StatusCode(200)));
    request.respond(response)?;
    Ok(())
}

/// Respond with 404 Not Found.
pub fn respond_not_found(request: Request) -> Result<()> {
    send_body(request, 404, PLAIN, b"404 Not Found".to_vec())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

fn send_body(request: Request, status: u16, content_type: &str, body: Vec<u8>) -> Result<()> {
    let response = with_cors(
        Response::from_data(body)
            .with_status_code(StatusCode(status))
            .with_header(make_header("Content-Type", content_type)),
    );
    request.respond(response)?;
    Ok(())
}

fn with_cors<R: std::io::Read>(response: Response<R>) -> Response<R> {
    response
        .with_header(make_header("Access-Control-Allow-Origin", "*"))
        .with_header(make_header(
            "Access-Control-Allow-Methods",
            "GET, POST, OPTIONS",
        ))
        .with_header(make_header(
            "Access-Control-Allow-Headers",
            "Content-Type, Authorization",
        ))
}

fn make_header(key: &str, value: &str) -> Header {
    // Static key/value pairs, cannot fail
    Header::from_bytes(key.as_bytes(), value.as_bytes()).unwrap()
}
