use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for the HTTP server, the remote client and logging.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub client: ClientSettings,
    pub log: LogSettings,
}

/// Configuration settings for the server.
///
/// Defines the address the server binds to and the path prefix under which
/// the queue API is mounted.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub base_path: String,
}

/// Configuration settings for the client and polling consumer.
#[derive(Debug, Deserialize, Clone)]
pub struct ClientSettings {
    /// Server URL including the base path, e.g. `http://127.0.0.1:8080/memq/server`.
    pub server_url: String,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Every field is optional; missing values are filled from the defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub client: Option<PartialClientSettings>,
    pub log: Option<PartialLogSettings>,
}

/// Partial server settings.
#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub base_path: Option<String>,
}

/// Partial client settings.
#[derive(Debug, Deserialize)]
pub struct PartialClientSettings {
    pub server_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

/// Provides default values for `Settings`.
///
/// Ensures the application has sensible defaults if no configuration is provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_path: "/memq/server".to_string(),
            },
            client: ClientSettings {
                server_url: "http://127.0.0.1:8080/memq/server".to_string(),
                poll_interval_ms: 1000,
            },
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl Settings {
    /// Fill every missing value of `partial` from the defaults.
    pub fn merge(partial: PartialSettings) -> Self {
        let default = Settings::default();
        let server = partial.server;
        let client = partial.client;
        let log = partial.log;

        Settings {
            server: ServerSettings {
                host: server
                    .as_ref()
                    .and_then(|s| s.host.clone())
                    .unwrap_or(default.server.host),
                port: server
                    .as_ref()
                    .and_then(|s| s.port)
                    .unwrap_or(default.server.port),
                base_path: server
                    .as_ref()
                    .and_then(|s| s.base_path.clone())
                    .unwrap_or(default.server.base_path),
            },
            client: ClientSettings {
                server_url: client
                    .as_ref()
                    .and_then(|c| c.server_url.clone())
                    .unwrap_or(default.client.server_url),
                poll_interval_ms: client
                    .as_ref()
                    .and_then(|c| c.poll_interval_ms)
                    .unwrap_or(default.client.poll_interval_ms),
            },
            log: LogSettings {
                level: log
                    .as_ref()
                    .and_then(|l| l.level.clone())
                    .unwrap_or(default.log.level),
            },
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
