//! HTTP listener for the configuration portal.
//!
//! Uses `tiny_http`, which works on both host and ESP32 (via std::net).
//! The main loop calls [`PortalServer::poll`] once per iteration; it
//! answers whatever requests are already queued and never waits for new
//! ones.  Routing and page rendering live in [`crate::portal`].

use std::io::Read;

use log::{debug, info, warn};
use tiny_http::{Header, Response, Server};

use crate::portal::{Method, PortalRequest, PortalResponse};

/// Requests handled per poll, so a flood cannot starve the loop.
const MAX_REQUESTS_PER_POLL: usize = 4;
/// Form bodies larger than this are truncated, then decoded lossily.
const MAX_BODY_LEN: u64 = 2048;

pub struct PortalServer {
    server: Server,
    content_type: Option<Header>,
}

impl PortalServer {
    /// Bind the listener on all interfaces.
    pub fn bind(port: u16) -> std::io::Result<Self> {
        Self::bind_addr(&format!("0.0.0.0:{}", port))
    }

    pub fn bind_addr(addr: &str) -> std::io::Result<Self> {
        let server = Server::http(addr)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::AddrInUse, format!("{}", e)))?;
        info!("Portal listening on http://{}/", addr);
        Ok(Self {
            server,
            content_type: Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..])
                .ok(),
        })
    }

    /// Local address the listener is bound to.
    pub fn local_addr(&self) -> Option<std::net::SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Answer queued requests with `handler`.  Returns how many were served.
    pub fn poll(&self, mut handler: impl FnMut(&PortalRequest) -> PortalResponse) -> usize {
        let mut served = 0;
        while served < MAX_REQUESTS_PER_POLL {
            let mut request = match self.server.try_recv() {
                Ok(Some(request)) => request,
                Ok(None) => break,
                Err(e) => {
                    warn!("Portal: accept failed: {}", e);
                    break;
                }
            };

            let method = Method::from_name(request.method().as_str());
            let mut raw = Vec::new();
            if method == Method::Post {
                if let Err(e) = request.as_reader().take(MAX_BODY_LEN).read_to_end(&mut raw) {
                    warn!("Portal: body read failed after {} bytes: {}", raw.len(), e);
                }
            }
            // The length cap can split a multi-byte character.
            let body = String::from_utf8_lossy(&raw);

            let req = PortalRequest::parse(method, request.url(), &body);
            debug!("Portal: {:?} {}", req.method, req.path);
            let page = handler(&req);

            let mut response = Response::from_string(page.body).with_status_code(page.status);
            if let Some(h) = &self.content_type {
                response = response.with_header(h.clone());
            }
            if let Err(e) = request.respond(response) {
                warn!("Portal: failed to send response: {}", e);
            }
            served += 1;
        }
        served
    }
}
