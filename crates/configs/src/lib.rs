use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Which record store backs the CRUD service.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    File,
    Memory,
    Sql,
    Remote,
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(Self::File),
            "memory" | "mem" => Ok(Self::Memory),
            "sql" | "mysql" | "db" => Ok(Self::Sql),
            "remote" | "proxy" => Ok(Self::Remote),
            other => Err(anyhow!("unknown store backend `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_file_path")]
    pub file_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { backend: StoreBackend::default(), file_path: default_file_path() }
    }
}

fn default_file_path() -> String { "data/carros.json".into() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    /// Create the `carro` table on startup if it is missing.
    #[serde(default = "default_true")]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            connect_timeout_secs: default_connect_timeout(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            auto_migrate: true,
        }
    }
}

fn default_connect_timeout() -> u64 { 5 }
fn default_acquire_timeout() -> u64 { 5 }
fn default_true() -> bool { true }

/// How the remote-proxy store treats writes.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Forward writes to the peer, then mirror them locally.
    #[default]
    Forward,
    /// Apply writes to the local mirror only; the peer never sees them.
    MirrorOnly,
}

impl std::str::FromStr for WriteMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "forward" => Ok(Self::Forward),
            "mirror_only" | "mirror" => Ok(Self::MirrorOnly),
            other => Err(anyhow!("unknown remote write mode `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_remote_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_remote_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub write_mode: WriteMode,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            connect_timeout_secs: default_remote_connect_timeout(),
            request_timeout_secs: default_remote_request_timeout(),
            write_mode: WriteMode::default(),
        }
    }
}

fn default_remote_connect_timeout() -> u64 { 3 }
fn default_remote_request_timeout() -> u64 { 5 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), then apply environment overrides and validate.
    /// A missing file is not an error: defaults plus environment are used instead.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_missing_file(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.normalize_from_env()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_from_env(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("PORT").or_else(|_| std::env::var("SERVER_PORT")).ok() {
            self.server.port = port.trim().parse().map_err(|_| anyhow!("PORT must be a number, got `{port}`"))?;
        }
        if let Ok(backend) = std::env::var("STORE_BACKEND") {
            self.store.backend = backend.parse()?;
        }
        if let Ok(path) = std::env::var("CARROS_FILE") {
            self.store.file_path = path;
        }
        self.database.normalize_from_env();
        if let Ok(url) = std::env::var("REMOTE_BASE_URL") {
            self.remote.base_url = url;
        }
        if let Ok(mode) = std::env::var("REMOTE_WRITE_MODE") {
            self.remote.write_mode = mode.parse()?;
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        if self.store.file_path.trim().is_empty() {
            self.store.file_path = default_file_path();
        }
        match self.store.backend {
            StoreBackend::Sql => self.database.validate()?,
            StoreBackend::Remote => self.remote.normalize_and_validate()?,
            StoreBackend::File | StoreBackend::Memory => {}
        }
        Ok(())
    }
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // env wins only when the TOML left the URL empty
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        let supported = ["mysql://", "postgres://", "postgresql://", "sqlite:"];
        if !supported.iter().any(|p| lower.starts_with(p)) {
            return Err(anyhow!("database.url must start with mysql://, postgres://, postgresql:// or sqlite:"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration { Duration::from_secs(self.connect_timeout_secs) }

    pub fn acquire_timeout(&self) -> Duration { Duration::from_secs(self.acquire_timeout_secs) }
}

impl RemoteConfig {
    pub fn normalize_and_validate(&mut self) -> Result<()> {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        if trimmed.is_empty() {
            return Err(anyhow!("remote.base_url is empty; set it in config.toml or REMOTE_BASE_URL"));
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(anyhow!("remote.base_url must start with http(s)"));
        }
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err(anyhow!("remote timeouts must be positive seconds"));
        }
        self.base_url = trimmed;
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration { Duration::from_secs(self.connect_timeout_secs) }

    pub fn request_timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }
}
