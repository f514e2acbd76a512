use bookinv_types::config::BackendConfig;
pub use clap::Parser;
use url::Url;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RunMode {
    /// Any origin may call the API
    Development,
    /// Only origins listed in --cors-origin may call the API
    Production,
}

#[derive(Debug, Clone, clap::Parser)]
#[command(version, about = "Book inventory REST API server")]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 5000,
        env = "BOOKINV_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "BOOKINV_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "BOOKINV_BASE_URL",
        default_value = "http://localhost:5000",
        help = "Base URL of server, as visible to clients"
    )]
    pub base_url: Url,

    #[arg(
        long,
        value_enum,
        env = "BOOKINV_MODE",
        default_value_t = RunMode::Development,
        help = "Run mode, decides cross-origin policy"
    )]
    pub mode: RunMode,

    #[arg(
        long = "cors-origin",
        env = "BOOKINV_CORS_ORIGINS",
        value_delimiter = ',',
        help = "Origins allowed to call the API in production mode, comma separated or used multiple times"
    )]
    pub cors_origins: Vec<String>,

    #[arg(long, env = "BOOKINV_NO_CORS", help = "Disable CORS handling completely")]
    pub no_cors: bool,

    #[command(flatten)]
    pub backend: BackendConfig,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn database_url(&self) -> String {
        self.backend.database_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let config = ServerConfig::try_parse_from([
            "bookinv-server",
            "--port",
            "8080",
            "--mode",
            "production",
            "--cors-origin",
            "https://books.example.com,https://admin.example.com",
            "--data-dir",
            "/tmp/bookinv-test",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.mode, RunMode::Production);
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(
            config.database_url(),
            "sqlite:///tmp/bookinv-test/bookinv.db"
        );
    }
}
