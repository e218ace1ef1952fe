use serde::Deserialize;

/// Configuration options for the blogr server.
#[derive(Clone, Deserialize)]
pub struct ServerConfig {
    /// Path or URL of the SQLite database.
    pub database_url: String,
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Secret used to derive session and flash-message cookie keys.
    pub secret_key: String,
}
