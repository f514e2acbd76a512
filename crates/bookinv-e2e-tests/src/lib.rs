use std::{path::Path, time::Duration};

use anyhow::{anyhow, Result};
use bookinv_server::config::{Parser, ServerConfig};
use rand::Rng as _;
use serde_json::{json, Value};
use tempfile::TempDir;
use tracing::{debug, error};
use url::Url;

fn random_port() -> Result<u16> {
    let mut rng = rand::rng();

    let mut retries = 3;
    while retries > 0 {
        let port: u16 = rng.random_range(5030..6030);
        let addr: std::net::SocketAddr = format!("127.0.0.1:{}", port).parse()?;
        match std::net::TcpStream::connect_timeout(&addr, Duration::from_millis(100)) {
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(port),
            Err(_) => retries -= 1,
            Ok(_) => retries -= 1,
        }
    }

    Err(anyhow!("Could not find a free port"))
}

pub struct ConfigGuard {
    #[allow(dead_code)]
    data_dir: TempDir,
}

pub fn test_config(test_name: &str, base_dir: &Path) -> Result<(ServerConfig, ConfigGuard)> {
    let tmp_data_dir = TempDir::with_prefix_in(format!("{}_", test_name), base_dir)?;
    let data_dir = tmp_data_dir.path().to_string_lossy().to_string();
    let database_url = format!("sqlite://{data_dir}/bookinv.db");
    let port = random_port()?.to_string();
    let base_url = format!("http://localhost:{}", port);
    let args = &[
        "bookinv-e2e-tests",
        "--data-dir",
        &data_dir,
        "--database-url",
        &database_url,
        "--port",
        &port,
        "--listen-address",
        "127.0.0.1",
        "--base-url",
        &base_url,
        "--mode",
        "development",
    ];
    let config = ServerConfig::try_parse_from(args)?;
    Ok((
        config,
        ConfigGuard {
            data_dir: tmp_data_dir,
        },
    ))
}

pub async fn prepare_env(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    let base_dir = std::env::temp_dir();
    test_config(test_name, &base_dir)
}

/// Root of the REST API for given config, with trailing slash
pub fn api_url(args: &ServerConfig) -> Result<Url> {
    Ok(args.base_url.join("api/")?)
}

/// Starts server in background and waits until it answers health check
pub async fn spawn_server(args: ServerConfig) -> Result<()> {
    let health_url = api_url(&args)?.join("health")?;
    tokio::spawn(async move {
        if let Err(e) = bookinv_server::run::run(args).await {
            error!("Server failed: {e:?}");
        }
    });

    let client = reqwest::Client::new();
    for _ in 0..50 {
        match client.get(health_url.clone()).send().await {
            Ok(response) if response.status().is_success() => return Ok(()),
            Ok(response) => debug!("Server not ready: {}", response.status()),
            Err(e) => debug!("Server not ready: {e}"),
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    Err(anyhow!("Server did not start in time"))
}

pub fn dune() -> Value {
    json!({
        "title": "Dune",
        "authorName": "Frank Herbert",
        "authorAge": 45,
        "authorEmail": "Frank@Example.com",
        "publisher": "Chilton",
        "publishedDate": "1965-08-01",
        "overview": "A desert planet saga about politics, religion, and ecology."
    })
}
