//! Local configuration portal.
//!
//! Pure request routing and page rendering.  The socket side lives in
//! [`adapters::portal_server`](crate::adapters::portal_server); the
//! actions behind each route are performed by
//! [`DeskNode::handle_portal`](crate::app::service::DeskNode::handle_portal).

pub mod form;
pub mod pages;
pub mod router;
pub mod template;

pub use router::{Method, PortalRequest, PortalRoute};

/// A rendered HTML response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalResponse {
    pub status: u16,
    pub body: String,
}

impl PortalResponse {
    pub fn new(status: u16, body: String) -> Self {
        Self { status, body }
    }

    pub fn ok(body: String) -> Self {
        Self::new(200, body)
    }
}
