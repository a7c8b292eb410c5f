use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default, rename = "static")]
    pub static_site: StaticSiteConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Catalog (dynamic pages) listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Second listener serving a single static HTML file at `/`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticSiteConfig {
    #[serde(default = "default_static_enabled")]
    pub enabled: bool,
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_static_port")]
    pub port: u16,
    /// File served at the root path
    #[serde(default = "default_static_file")]
    pub file: PathBuf,
}

impl StaticSiteConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for StaticSiteConfig {
    fn default() -> Self {
        Self {
            enabled: default_static_enabled(),
            host: default_host(),
            port: default_static_port(),
            file: default_static_file(),
        }
    }
}

fn default_static_enabled() -> bool {
    true
}

fn default_static_port() -> u16 {
    8081
}

fn default_static_file() -> PathBuf {
    PathBuf::from("static/another.html")
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    /// Insert the demo spots when the table is empty
    #[serde(default = "default_seed")]
    pub seed: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            seed: default_seed(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("spots.db")
}

fn default_seed() -> bool {
    true
}
