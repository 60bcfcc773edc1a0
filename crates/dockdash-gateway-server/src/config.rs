use dockdash_common::DashError;
use dockdash_engine::DEFAULT_SOCKET_PATH;

pub const SOCKET_ENV: &str = "DOCKER_SOCKET";
pub const HOST_ENV: &str = "DOCKDASH_HOST";
pub const PORT_ENV: &str = "DOCKDASH_PORT";

/// Gateway server configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub socket_path: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            socket_path: DEFAULT_SOCKET_PATH.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, DashError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, DashError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw
                .parse()
                .map_err(|_| DashError::Config(format!("{PORT_ENV} is not a valid port: {raw}")))?,
            None => defaults.port,
        };

        Ok(Self {
            host: lookup(HOST_ENV).unwrap_or(defaults.host),
            port,
            socket_path: lookup(SOCKET_ENV)
                .filter(|p| !p.is_empty())
                .unwrap_or(defaults.socket_path),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
