//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use super::state_builders::CatalogBackend;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) backend: CatalogBackend,
}

impl ServerConfig {
    /// Serve the in-memory catalogue on `bind_addr`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            backend: CatalogBackend::default(),
        }
    }

    /// Replace the catalogue backend, e.g. with a PostgreSQL pool.
    #[must_use]
    pub fn with_backend(mut self, backend: CatalogBackend) -> Self {
        self.backend = backend;
        self
    }
}
