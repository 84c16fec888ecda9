use tracing::{debug, info, warn};

use super::endpoints::Endpoint;
use crate::error::FetchError;

/// Receives the request lifecycle of an [`XueqiuClient`](super::XueqiuClient).
/// Every method has a no-op default.
pub trait RequestObserver {
    fn request_started(&self, _endpoint: Endpoint, _query: &[(&str, String)]) {}

    fn response_received(&self, _endpoint: Endpoint, _status: u16) {}

    /// A failure the client recovered from (the quote lookup).
    fn request_tolerated(&self, _endpoint: Endpoint, _reason: &str) {}

    fn request_failed(&self, _endpoint: Endpoint, _error: &FetchError) {}

    fn records_normalized(&self, _endpoint: Endpoint, _count: usize) {}
}

/// Forwards client events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RequestObserver for TracingObserver {
    fn request_started(&self, endpoint: Endpoint, query: &[(&str, String)]) {
        info!(%endpoint, path = endpoint.path(), ?query, "Sending request");
    }

    fn response_received(&self, endpoint: Endpoint, status: u16) {
        debug!(%endpoint, status, "Response received");
    }

    fn request_tolerated(&self, endpoint: Endpoint, reason: &str) {
        warn!(%endpoint, reason, "Request failed, continuing with defaults");
    }

    fn request_failed(&self, endpoint: Endpoint, error: &FetchError) {
        warn!(%endpoint, %error, "Request failed");
    }

    fn records_normalized(&self, endpoint: Endpoint, count: usize) {
        info!(%endpoint, count, "Records normalized");
    }
}
