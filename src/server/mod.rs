//! HTTP API server
//!
//! A single accept loop on `tiny_http`. Requests are handled one at a time,
//! which also serializes puzzle submissions for a given player.
//!
//! Every response carries permissive CORS headers and `OPTIONS` preflights
//! are answered with 200 before routing.

mod handlers;
mod types;

pub use handlers::route;
pub use types::{ApiRequest, ApiResponse, AppState, ResponseBody};

use std::io::Read;
use std::net::SocketAddr;
use std::thread;

use anyhow::Result;
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, error, info};

const CORS_HEADERS: &[(&str, &str)] = &[
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Methods",
        "GET, POST, PUT, DELETE, OPTIONS, PATCH",
    ),
    ("Access-Control-Allow-Headers", "Content-Type, Authorization"),
];

pub struct HttpServer {
    server: Server,
    state: AppState,
}

impl HttpServer {
    /// Bind to `addr` (port 0 picks a free port)
    pub fn bind(addr: &str, state: AppState) -> Result<Self> {
        let server = Server::http(addr)
            .map_err(|e| anyhow::anyhow!("Failed to start server on {}: {}", addr, e))?;
        Ok(Self { server, state })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serve until the listener is closed
    pub fn run(self) {
        match self.local_addr() {
            Some(addr) => info!("[bq:http] Server listening on http://{}", addr),
            None => info!("[bq:http] Server listening"),
        }

        for request in self.server.incoming_requests() {
            handle_request(&self.state, request);
        }
    }

    /// Run the accept loop on a background thread
    pub fn spawn(self) -> thread::JoinHandle<()> {
        thread::spawn(move || self.run())
    }
}

fn handle_request(state: &AppState, mut request: Request) {
    let method = request.method().to_string();
    let url = request.url().to_string();
    debug!("[bq:http] {} {}", method, url);

    if *request.method() == Method::Options {
        let response = with_cors(Response::from_string(""));
        let _ = request.respond(response);
        return;
    }

    let body = match read_request_body(&mut request, state.config.server.max_body_bytes) {
        Ok(body) => body,
        Err(response) => {
            let _ = request.respond(with_cors(response));
            return;
        }
    };

    let authorization = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Authorization"))
        .map(|h| h.value.as_str().to_string());

    let mut api_request = ApiRequest::new(&method, &url).with_body(body);
    api_request.authorization = authorization;

    let api_response = route(state, &api_request);
    info!(
        "[bq:http] {} {} -> {}",
        method, api_request.path, api_response.status
    );
    respond(request, api_response);
}

fn respond(request: Request, api_response: ApiResponse) {
    let (body, content_type) = match api_response.body {
        ResponseBody::Json(value) => (
            serde_json::to_string(&value).unwrap_or_else(|_| {
                "{\"success\":false,\"message\":\"serialize\"}".to_string()
            }),
            "application/json",
        ),
        ResponseBody::Text(text) => (text, "text/html; charset=utf-8"),
    };

    let mut response = Response::from_string(body).with_status_code(api_response.status);
    if let Some(header) = header("Content-Type", content_type) {
        response = response.with_header(header);
    }
    if let Err(e) = request.respond(with_cors(response)) {
        error!("[bq:http] Failed to send response: {}", e);
    }
}

fn with_cors<R: Read>(mut response: Response<R>) -> Response<R> {
    for (name, value) in CORS_HEADERS {
        if let Some(h) = header(name, value) {
            response.add_header(h);
        }
    }
    response
}

fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

fn json_error(status: u16, message: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::json!({ "success": false, "message": message }).to_string();
    let mut response = Response::from_string(body).with_status_code(status);
    if let Some(h) = header("Content-Type", "application/json") {
        response.add_header(h);
    }
    response
}

fn read_request_body(
    request: &mut Request,
    max_bytes: usize,
) -> Result<String, Response<std::io::Cursor<Vec<u8>>>> {
    let mut body = String::new();
    let mut reader = request.as_reader().take(max_bytes as u64 + 1);
    if let Err(e) = reader.read_to_string(&mut body) {
        error!("[bq:http] Failed to read body: {}", e);
        return Err(json_error(400, "Invalid request body"));
    }

    if body.len() > max_bytes {
        return Err(json_error(413, "Payload too large"));
    }

    Ok(body)
}
